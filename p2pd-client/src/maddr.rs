//! Address-family negotiation: the one place that decides whether an
//! endpoint is a unix socket path or a TCP loopback address.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use multiaddr::{Multiaddr, Protocol};

use crate::error::ControlError;

/// Parsed transport of a control or listener multiaddr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Unix(PathBuf),
    Tcp(SocketAddr),
}

impl Endpoint {
    /// A connection multiaddr must carry exactly one supported transport:
    /// `/unix/<path>` or `/ip4/<host>/tcp/<port>`.
    pub fn from_multiaddr(maddr: &Multiaddr) -> Result<Self, ControlError> {
        let mut unix: Option<PathBuf> = None;
        let mut ip: Option<IpAddr> = None;
        let mut tcp: Option<u16> = None;
        for proto in maddr.iter() {
            match proto {
                // The daemon's textual convention maps `/unix/tmp/x.sock` to
                // the absolute path `/tmp/x.sock`.
                Protocol::Unix(path) => unix = Some(absolute_unix_path(&path)),
                Protocol::Ip4(addr) => ip = Some(IpAddr::V4(addr)),
                Protocol::Tcp(port) => tcp = Some(port),
                _ => return Err(ControlError::UnsupportedMultiaddr(maddr.to_string())),
            }
        }
        match (unix, ip, tcp) {
            (Some(path), None, None) => Ok(Endpoint::Unix(path)),
            (None, Some(ip), Some(port)) => Ok(Endpoint::Tcp(SocketAddr::new(ip, port))),
            _ => Err(ControlError::UnsupportedMultiaddr(maddr.to_string())),
        }
    }

    pub fn to_multiaddr(&self) -> Multiaddr {
        match self {
            Endpoint::Unix(path) => {
                let value = path
                    .to_string_lossy()
                    .trim_start_matches('/')
                    .to_string();
                let mut maddr = Multiaddr::empty();
                maddr.push(Protocol::Unix(value.into()));
                maddr
            }
            Endpoint::Tcp(addr) => socket_addr_to_multiaddr(addr),
        }
    }
}

fn absolute_unix_path(value: &str) -> PathBuf {
    if value.starts_with('/') {
        PathBuf::from(value)
    } else {
        Path::new("/").join(value)
    }
}

/// Parse a textual multiaddr. `/unix/...` consumes the whole remainder as a
/// socket path (the daemon convention); everything else is standard syntax.
pub fn multiaddr_from_str(s: &str) -> Result<Multiaddr, ControlError> {
    if let Some(path) = s.strip_prefix("/unix/") {
        if path.is_empty() {
            return Err(ControlError::UnsupportedMultiaddr(s.to_string()));
        }
        let mut maddr = Multiaddr::empty();
        maddr.push(Protocol::Unix(path.to_string().into()));
        return Ok(maddr);
    }
    s.parse()
        .map_err(|_| ControlError::UnsupportedMultiaddr(s.to_string()))
}

pub(crate) fn socket_addr_to_multiaddr(addr: &SocketAddr) -> Multiaddr {
    let mut maddr = Multiaddr::empty();
    match addr.ip() {
        IpAddr::V4(ip) => maddr.push(Protocol::Ip4(ip)),
        IpAddr::V6(ip) => maddr.push(Protocol::Ip6(ip)),
    }
    maddr.push(Protocol::Tcp(addr.port()));
    maddr
}

/// Default listener endpoint for a control endpoint, same address family:
/// unix gets a sibling path, TCP gets loopback with an OS-assigned port.
pub(crate) fn default_listen_maddr(control: &Endpoint) -> Multiaddr {
    match control {
        Endpoint::Unix(path) => {
            let mut listen = path.clone().into_os_string();
            listen.push(".listener");
            Endpoint::Unix(PathBuf::from(listen)).to_multiaddr()
        }
        Endpoint::Tcp(_) => {
            Endpoint::Tcp(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)).to_multiaddr()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tcp() {
        let maddr = multiaddr_from_str("/ip4/127.0.0.1/tcp/10000").unwrap();
        let ep = Endpoint::from_multiaddr(&maddr).unwrap();
        assert_eq!(
            ep,
            Endpoint::Tcp("127.0.0.1:10000".parse::<SocketAddr>().unwrap())
        );
        assert_eq!(ep.to_multiaddr(), maddr);
    }

    #[test]
    fn parses_unix() {
        let maddr = multiaddr_from_str("/unix/tmp/p2pd.sock").unwrap();
        let ep = Endpoint::from_multiaddr(&maddr).unwrap();
        assert_eq!(ep, Endpoint::Unix(PathBuf::from("/tmp/p2pd.sock")));
        assert_eq!(ep.to_multiaddr().to_string(), "/unix/tmp/p2pd.sock");
    }

    #[test]
    fn unix_roundtrips_through_bytes() {
        let ep = Endpoint::Unix(PathBuf::from("/tmp/dir/p2pd.sock"));
        let bytes = ep.to_multiaddr().to_vec();
        let parsed = Multiaddr::try_from(bytes).unwrap();
        assert_eq!(Endpoint::from_multiaddr(&parsed).unwrap(), ep);
    }

    #[test]
    fn rejects_udp_and_mixed() {
        let maddr = multiaddr_from_str("/ip4/127.0.0.1/udp/10000").unwrap();
        assert!(matches!(
            Endpoint::from_multiaddr(&maddr),
            Err(ControlError::UnsupportedMultiaddr(_))
        ));
        let maddr = multiaddr_from_str("/ip4/127.0.0.1").unwrap();
        assert!(matches!(
            Endpoint::from_multiaddr(&maddr),
            Err(ControlError::UnsupportedMultiaddr(_))
        ));
    }

    #[test]
    fn default_listener_matches_family() {
        let unix = Endpoint::Unix(PathBuf::from("/tmp/p2pd.sock"));
        let maddr = default_listen_maddr(&unix);
        assert_eq!(
            Endpoint::from_multiaddr(&maddr).unwrap(),
            Endpoint::Unix(PathBuf::from("/tmp/p2pd.sock.listener"))
        );

        let tcp = Endpoint::Tcp("127.0.0.1:9000".parse().unwrap());
        match Endpoint::from_multiaddr(&default_listen_maddr(&tcp)).unwrap() {
            Endpoint::Tcp(addr) => {
                assert_eq!(addr.ip(), "127.0.0.1".parse::<IpAddr>().unwrap());
                assert_eq!(addr.port(), 0);
            }
            other => panic!("expected tcp endpoint, got {other:?}"),
        }
    }
}

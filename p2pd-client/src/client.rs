//! Client facade: owns the control endpoint, the listener, and the handler
//! registry; every public operation is rooted here.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use libp2p_identity::PeerId;
use multiaddr::Multiaddr;
use p2pd_proto::pb;

use crate::config::Config;
use crate::control::{Control, Duplex};
use crate::error::ControlError;
use crate::listener::{self, HandlerMap, StreamHandler};
use crate::maddr::{self, Endpoint};
use crate::types::{PeerInfo, StreamInfo};

/// Handle to one daemon. Cheap to clone; all clones share the listener,
/// registry, and shutdown signal. One control endpoint per instance.
#[derive(Clone)]
pub struct Client {
    pub(crate) inner: Arc<Inner>,
}

pub(crate) struct Inner {
    pub(crate) control: Control,
    listen_maddr: Multiaddr,
    handlers: HandlerMap,
    listener: Mutex<Option<BoundListener>>,
    pub(crate) shutdown: broadcast::Sender<()>,
    closed: AtomicBool,
}

struct BoundListener {
    maddr: Multiaddr,
    unix_path: Option<PathBuf>,
    task: JoinHandle<()>,
}

impl Client {
    /// Create a client for the daemon at `control_maddr`. When no listener
    /// multiaddr is given, one is synthesized in the control endpoint's
    /// address family. Nothing is bound until `listen` (or the first
    /// `stream_handler` registration).
    pub fn new(
        control_maddr: &Multiaddr,
        listen_maddr: Option<Multiaddr>,
    ) -> Result<Self, ControlError> {
        let control_ep = Endpoint::from_multiaddr(control_maddr)?;
        let listen_maddr = match listen_maddr {
            Some(maddr) => {
                Endpoint::from_multiaddr(&maddr)?;
                maddr
            }
            None => maddr::default_listen_maddr(&control_ep),
        };
        let (shutdown, _) = broadcast::channel(1);
        Ok(Self {
            inner: Arc::new(Inner {
                control: Control::new(control_ep),
                listen_maddr,
                handlers: HandlerMap::default(),
                listener: Mutex::new(None),
                shutdown,
                closed: AtomicBool::new(false),
            }),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ControlError> {
        let control = maddr::multiaddr_from_str(&config.control_maddr)?;
        let listen = config
            .listen_maddr
            .as_deref()
            .map(maddr::multiaddr_from_str)
            .transpose()?;
        Self::new(&control, listen)
    }

    /// The control endpoint this client talks to.
    pub fn control_maddr(&self) -> Multiaddr {
        self.inner.control.endpoint().to_multiaddr()
    }

    pub(crate) fn ensure_open(&self) -> Result<(), ControlError> {
        if self.inner.closed.load(Ordering::SeqCst) {
            Err(ControlError::Closed)
        } else {
            Ok(())
        }
    }

    /// Bind the listener and start accepting daemon-initiated streams.
    /// Idempotent: once bound, returns the bound multiaddr unchanged.
    pub async fn listen(&self) -> Result<Multiaddr, ControlError> {
        self.ensure_open()?;
        let mut guard = self.inner.listener.lock().await;
        // close() tears down under this lock; re-check so a racing listen()
        // cannot bind after teardown.
        self.ensure_open()?;
        if let Some(bound) = guard.as_ref() {
            return Ok(bound.maddr.clone());
        }
        let endpoint = Endpoint::from_multiaddr(&self.inner.listen_maddr)?;
        let (socket, maddr, unix_path) = listener::bind(&endpoint).await?;
        let task = listener::spawn_accept_loop(
            socket,
            self.inner.handlers.clone(),
            self.inner.shutdown.subscribe(),
        );
        *guard = Some(BoundListener {
            maddr: maddr.clone(),
            unix_path,
            task,
        });
        Ok(maddr)
    }

    /// Tear the client down: stop the listener, cancel subscription readers,
    /// close owned sockets, unlink the owned unix socket file. Every
    /// operation afterwards fails with `ControlError::Closed`. Idempotent.
    pub async fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.inner.shutdown.send(());
        let mut guard = self.inner.listener.lock().await;
        if let Some(bound) = guard.take() {
            bound.task.abort();
            if let Some(path) = bound.unix_path {
                let _ = std::fs::remove_file(&path);
            }
        }
    }

    /// IDENTIFY: the daemon's own peer id and listen addresses.
    pub async fn identify(&self) -> Result<(PeerId, Vec<Multiaddr>), ControlError> {
        self.ensure_open()?;
        let req = pb::Request {
            r#type: pb::request::Type::Identify as i32,
            ..Default::default()
        };
        let resp = self.inner.control.request(req).await?;
        let identify = resp
            .identify
            .ok_or_else(|| ControlError::UnexpectedResponse("missing identify result".into()))?;
        let peer_id = crate::types::peer_id_from_bytes(&identify.id)?;
        let addrs = identify
            .addrs
            .into_iter()
            .map(crate::types::maddr_from_bytes)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((peer_id, addrs))
    }

    /// CONNECT: ask the daemon to dial `peer_id` at `addrs`.
    pub async fn connect(
        &self,
        peer_id: &PeerId,
        addrs: &[Multiaddr],
    ) -> Result<(), ControlError> {
        self.ensure_open()?;
        let req = pb::Request {
            r#type: pb::request::Type::Connect as i32,
            connect: Some(pb::ConnectRequest {
                peer: peer_id.to_bytes(),
                addrs: addrs.iter().map(|a| a.to_vec()).collect(),
                timeout: None,
            }),
            ..Default::default()
        };
        self.inner.control.request(req).await?;
        Ok(())
    }

    /// LIST_PEERS: currently connected peers.
    pub async fn list_peers(&self) -> Result<Vec<PeerInfo>, ControlError> {
        self.ensure_open()?;
        let req = pb::Request {
            r#type: pb::request::Type::ListPeers as i32,
            ..Default::default()
        };
        let resp = self.inner.control.request(req).await?;
        resp.peers.into_iter().map(PeerInfo::from_pb).collect()
    }

    /// DISCONNECT: drop the daemon's connection to `peer_id`.
    pub async fn disconnect(&self, peer_id: &PeerId) -> Result<(), ControlError> {
        self.ensure_open()?;
        let req = pb::Request {
            r#type: pb::request::Type::Disconnect as i32,
            disconnect: Some(pb::DisconnectRequest {
                peer: peer_id.to_bytes(),
            }),
            ..Default::default()
        };
        self.inner.control.request(req).await?;
        Ok(())
    }

    /// STREAM_OPEN: open an outbound stream to `peer_id`, negotiating one of
    /// `protos`. The returned duplex is live; its `StreamInfo` header has
    /// already been consumed. The caller owns the duplex from here.
    pub async fn stream_open(
        &self,
        peer_id: &PeerId,
        protos: &[String],
    ) -> Result<(StreamInfo, Duplex), ControlError> {
        self.ensure_open()?;
        if protos.is_empty() {
            return Err(ControlError::InvalidArgument(
                "stream_open needs at least one protocol".into(),
            ));
        }
        let req = pb::Request {
            r#type: pb::request::Type::StreamOpen as i32,
            stream_open: Some(pb::StreamOpenRequest {
                peer: peer_id.to_bytes(),
                proto: protos.to_vec(),
                timeout: None,
            }),
            ..Default::default()
        };
        let (resp, stream) = self.inner.control.request_stream(req).await?;
        let info = resp
            .stream_info
            .ok_or_else(|| ControlError::UnexpectedResponse("missing stream info".into()))?;
        Ok((StreamInfo::from_pb(info)?, stream))
    }

    /// STREAM_HANDLER: register `handler` for `proto`. Binds the listener if
    /// it is not bound yet, tells the daemon to dial back here for `proto`,
    /// and commits the handler locally only after the daemon's OK. A second
    /// registration under the same proto replaces the first.
    pub async fn stream_handler<H>(&self, proto: &str, handler: H) -> Result<(), ControlError>
    where
        H: StreamHandler,
    {
        self.ensure_open()?;
        if proto.is_empty() {
            return Err(ControlError::InvalidArgument(
                "protocol id must not be empty".into(),
            ));
        }
        let listen_maddr = self.listen().await?;
        let req = pb::Request {
            r#type: pb::request::Type::StreamHandler as i32,
            stream_handler: Some(pb::StreamHandlerRequest {
                addr: listen_maddr.to_vec(),
                proto: vec![proto.to_string()],
            }),
            ..Default::default()
        };
        self.inner.control.request(req).await?;
        self.inner
            .handlers
            .lock()
            .await
            .insert(proto.to_string(), Arc::new(handler));
        Ok(())
    }
}

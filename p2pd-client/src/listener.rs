//! The server the client itself runs: the daemon dials back in here with
//! inbound application streams. Every accepted connection starts with one
//! framed `StreamInfo`; the `proto` field selects the handler.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, UnixListener, UnixStream};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use multiaddr::Multiaddr;
use p2pd_proto::pb;

use crate::codec;
use crate::control::Duplex;
use crate::error::ControlError;
use crate::maddr::{self, Endpoint};
use crate::types::StreamInfo;

/// Pause after a failed accept (fd exhaustion and friends) before retrying.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

pub type HandlerFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A registered protocol handler. The stream is owned by the handler for the
/// duration of the call; dropping it closes the stream.
pub trait StreamHandler: Send + Sync + 'static {
    fn handle(&self, info: StreamInfo, stream: Duplex) -> HandlerFuture;
}

impl<F, Fut> StreamHandler for F
where
    F: Fn(StreamInfo, Duplex) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn handle(&self, info: StreamInfo, stream: Duplex) -> HandlerFuture {
        Box::pin((self)(info, stream))
    }
}

/// Protocol id → handler, shared between the facade (registration) and the
/// accept loop (dispatch).
pub(crate) type HandlerMap = Arc<Mutex<HashMap<String, Arc<dyn StreamHandler>>>>;

pub(crate) enum ListenSocket {
    Unix(UnixListener),
    Tcp(TcpListener),
}

/// Bind the listener endpoint. Returns the socket, the actually-bound
/// multiaddr (TCP port 0 is resolved here), and the unix socket file this
/// client now owns, if any.
pub(crate) async fn bind(
    endpoint: &Endpoint,
) -> Result<(ListenSocket, Multiaddr, Option<PathBuf>), ControlError> {
    match endpoint {
        Endpoint::Unix(path) => {
            if path.exists() {
                // Probe with a zero-length connect: a live socket answers and
                // must be left alone; a stale file is unlinked and replaced.
                match UnixStream::connect(path).await {
                    Ok(_) => return Err(ControlError::AddrInUse(path.clone())),
                    Err(_) => std::fs::remove_file(path)?,
                }
            }
            let listener = UnixListener::bind(path)?;
            let maddr = Endpoint::Unix(path.clone()).to_multiaddr();
            Ok((ListenSocket::Unix(listener), maddr, Some(path.clone())))
        }
        Endpoint::Tcp(addr) => {
            let listener = TcpListener::bind(addr).await?;
            let bound = listener.local_addr()?;
            let maddr = maddr::socket_addr_to_multiaddr(&bound);
            Ok((ListenSocket::Tcp(listener), maddr, None))
        }
    }
}

/// Run the accept loop until the shutdown signal. Each accepted connection
/// is dispatched on its own task; handler execution never blocks accepting.
pub(crate) fn spawn_accept_loop(
    socket: ListenSocket,
    handlers: HandlerMap,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                accepted = accept(&socket) => match accepted {
                    Ok(stream) => {
                        let handlers = handlers.clone();
                        tokio::spawn(dispatch(stream, handlers));
                    }
                    Err(err) => {
                        warn!(error = %err, "listener accept failed, backing off");
                        tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                    }
                },
            }
        }
    })
}

async fn accept(socket: &ListenSocket) -> io::Result<Duplex> {
    match socket {
        ListenSocket::Unix(listener) => listener.accept().await.map(|(s, _)| Duplex::Unix(s)),
        ListenSocket::Tcp(listener) => listener.accept().await.map(|(s, _)| Duplex::Tcp(s)),
    }
}

/// Read the `StreamInfo` header and hand the stream to its handler. Misses
/// and bad headers are logged and the stream dropped; they never poison the
/// listener.
async fn dispatch(mut stream: Duplex, handlers: HandlerMap) {
    let header: pb::StreamInfo = match codec::read_msg(&mut stream).await {
        Ok(header) => header,
        Err(err) => {
            warn!(error = %err, "inbound stream without a valid header");
            return;
        }
    };
    let info = match StreamInfo::from_pb(header) {
        Ok(info) => info,
        Err(err) => {
            warn!(error = %err, "inbound stream header did not decode");
            return;
        }
    };
    let handler = handlers.lock().await.get(&info.proto).cloned();
    match handler {
        Some(handler) => {
            info!(peer = %info.peer_id, proto = %info.proto, "inbound stream");
            handler.handle(info, stream).await;
        }
        // The daemon should only dial in for registered protocols.
        None => warn!(proto = %info.proto, "inbound stream for unregistered protocol"),
    }
}

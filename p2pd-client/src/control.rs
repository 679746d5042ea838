//! Control channel: one fresh daemon connection per request. No multiplexing,
//! no correlation ids; the daemon is local and connection setup is cheap.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::{TcpStream, UnixStream};

use p2pd_proto::pb;

use crate::codec;
use crate::error::ControlError;
use crate::maddr::Endpoint;

/// A connected stream to or from the daemon, either address family. Handed
/// to stream handlers, `stream_open` callers, and subscription readers; the
/// owner closes it by dropping it.
#[derive(Debug)]
pub enum Duplex {
    Unix(UnixStream),
    Tcp(TcpStream),
}

impl AsyncRead for Duplex {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Duplex::Unix(stream) => Pin::new(stream).poll_read(cx, buf),
            Duplex::Tcp(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for Duplex {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Duplex::Unix(stream) => Pin::new(stream).poll_write(cx, buf),
            Duplex::Tcp(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Duplex::Unix(stream) => Pin::new(stream).poll_flush(cx),
            Duplex::Tcp(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Duplex::Unix(stream) => Pin::new(stream).poll_shutdown(cx),
            Duplex::Tcp(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }
}

/// The client's control endpoint. Immutable after construction.
#[derive(Debug)]
pub(crate) struct Control {
    endpoint: Endpoint,
}

impl Control {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    pub(crate) fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Dial the daemon, family-agnostic.
    pub(crate) async fn dial(&self) -> Result<Duplex, ControlError> {
        match &self.endpoint {
            Endpoint::Unix(path) => Ok(Duplex::Unix(UnixStream::connect(path).await?)),
            Endpoint::Tcp(addr) => Ok(Duplex::Tcp(TcpStream::connect(addr).await?)),
        }
    }

    /// Single-shot request: write one `Request`, read one `Response`, drop
    /// the connection.
    pub(crate) async fn request(&self, req: pb::Request) -> Result<pb::Response, ControlError> {
        let (resp, _stream) = self.request_stream(req).await?;
        Ok(resp)
    }

    /// Request whose response envelope is followed by more traffic on the
    /// same connection. Returns the envelope and the still-open duplex.
    pub(crate) async fn request_stream(
        &self,
        req: pb::Request,
    ) -> Result<(pb::Response, Duplex), ControlError> {
        let mut stream = self.dial().await?;
        codec::write_msg(&mut stream, &req).await?;
        let resp: pb::Response = codec::read_msg(&mut stream).await?;
        let resp = check_response(resp)?;
        Ok((resp, stream))
    }
}

/// Map a daemon ERROR envelope to a typed failure; reject unknown types.
pub(crate) fn check_response(resp: pb::Response) -> Result<pb::Response, ControlError> {
    match pb::response::Type::try_from(resp.r#type) {
        Ok(pb::response::Type::Ok) => Ok(resp),
        Ok(pb::response::Type::Error) => {
            let msg = resp
                .error
                .map(|e| e.msg)
                .unwrap_or_else(|| "daemon returned an error without a message".to_string());
            Err(ControlError::Daemon(msg))
        }
        Err(_) => Err(ControlError::UnexpectedResponse(format!(
            "unknown response type {}",
            resp.r#type
        ))),
    }
}

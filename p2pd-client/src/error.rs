//! Error taxonomy for control-protocol operations.

use std::path::PathBuf;

use p2pd_proto::{FrameDecodeError, FrameEncodeError};

/// Failure of a control-protocol operation. Request-bound errors surface to
/// the caller of the operation; background-task errors surface through the
/// affected channel. A failed operation never leaves partial client state,
/// and the client stays usable afterwards.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Frame(#[from] FrameDecodeError),
    #[error(transparent)]
    Encode(#[from] FrameEncodeError),
    /// The daemon answered with an ERROR envelope; carries `error.msg`.
    #[error("daemon error: {0}")]
    Daemon(String),
    /// The envelope decoded but did not have the shape the operation expects.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    /// A peer id, multiaddr, or required payload inside a response was bad.
    #[error("decode error: {0}")]
    Decode(String),
    /// Caller-side precondition violation; no daemon round trip happened.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A live socket already answers at the requested listener path.
    #[error("listener socket already in use: {}", .0.display())]
    AddrInUse(PathBuf),
    #[error("multiaddr not supported for connections: {0}")]
    UnsupportedMultiaddr(String),
    #[error("client is closed")]
    Closed,
}

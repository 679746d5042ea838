//! Wire layer for the libp2p daemon control protocol.
//! No I/O; the client crate drives these over its sockets.
//!
//! Every control-protocol message is a varint-length-delimited protobuf
//! (see the `wire` module). The message set itself lives in `pb`.

pub mod pb;
pub mod wire;

pub use wire::{
    decode_frame, encode_frame, get_uvarint, put_uvarint, FrameDecodeError, FrameEncodeError,
    MAX_FRAME_LEN,
};

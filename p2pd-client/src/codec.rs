//! Async framing over the client's sockets: varint length prefix, then the
//! protobuf payload. The buffer-level rules live in `p2pd_proto::wire`.

use std::io;

use prost::Message;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use p2pd_proto::{wire, FrameDecodeError};

use crate::error::ControlError;

const MAX_VARINT_BYTES: usize = 10;

/// Write one framed message and flush.
pub(crate) async fn write_msg<W, M>(writer: &mut W, msg: &M) -> Result<(), ControlError>
where
    W: AsyncWrite + Unpin,
    M: Message,
{
    let frame = wire::encode_frame(msg)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one framed message. A socket that closes before the first length
/// byte yields `None`; closing anywhere after that is an error.
pub(crate) async fn read_msg_opt<M, R>(reader: &mut R) -> Result<Option<M>, ControlError>
where
    M: Message + Default,
    R: AsyncRead + Unpin,
{
    let first = match reader.read_u8().await {
        Ok(byte) => byte,
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let len = read_uvarint(reader, first).await?;
    if len > wire::MAX_FRAME_LEN {
        return Err(FrameDecodeError::TooLarge.into());
    }
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf).await?;
    let msg = M::decode(&buf[..]).map_err(FrameDecodeError::Decode)?;
    Ok(Some(msg))
}

/// Read one framed message; end-of-stream is an error.
pub(crate) async fn read_msg<M, R>(reader: &mut R) -> Result<M, ControlError>
where
    M: Message + Default,
    R: AsyncRead + Unpin,
{
    match read_msg_opt(reader).await? {
        Some(msg) => Ok(msg),
        None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed").into()),
    }
}

/// Base-128 varint, one byte at a time, `first` already consumed. Same
/// overflow discipline as `wire::get_uvarint`.
async fn read_uvarint<R>(reader: &mut R, first: u8) -> Result<u64, ControlError>
where
    R: AsyncRead + Unpin,
{
    let mut result: u64 = 0;
    let mut byte = first;
    for i in 0..MAX_VARINT_BYTES {
        if i == MAX_VARINT_BYTES - 1 && byte > 1 {
            return Err(FrameDecodeError::VarintOverflow.into());
        }
        result |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        byte = reader.read_u8().await?;
    }
    Err(FrameDecodeError::VarintOverflow.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use p2pd_proto::pb;

    #[tokio::test]
    async fn roundtrip_over_duplex() {
        let (mut a, mut b) = tokio::io::duplex(1024);
        let msg = pb::Request {
            r#type: pb::request::Type::ListPeers as i32,
            ..Default::default()
        };
        write_msg(&mut a, &msg).await.unwrap();
        let read: pb::Request = read_msg(&mut b).await.unwrap();
        assert_eq!(read, msg);
    }

    #[tokio::test]
    async fn clean_close_yields_none() {
        let (a, mut b) = tokio::io::duplex(1024);
        drop(a);
        let read: Option<pb::Request> = read_msg_opt(&mut b).await.unwrap();
        assert!(read.is_none());
    }

    #[tokio::test]
    async fn close_mid_frame_is_error() {
        let (mut a, mut b) = tokio::io::duplex(1024);
        // Announce ten bytes, deliver three, close.
        a.write_all(&[0x0a, 0x01, 0x02, 0x03]).await.unwrap();
        drop(a);
        let read = read_msg_opt::<pb::Request, _>(&mut b).await;
        assert!(matches!(read, Err(ControlError::Io(_))));
    }

    #[tokio::test]
    async fn overlong_varint_is_error() {
        let (mut a, mut b) = tokio::io::duplex(1024);
        a.write_all(&[0xff; 10]).await.unwrap();
        drop(a);
        let read = read_msg_opt::<pb::Request, _>(&mut b).await;
        assert!(matches!(
            read,
            Err(ControlError::Frame(FrameDecodeError::VarintOverflow))
        ));
    }
}

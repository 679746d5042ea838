//! Framing: unsigned-varint length prefix + protobuf payload.

use prost::Message;

const MAX_VARINT_BYTES: usize = 10;
/// Largest frame payload accepted, encode and decode. The daemon does not
/// pin a wire-level limit; this is an implementation cap.
pub const MAX_FRAME_LEN: u64 = 64 * 1024 * 1024; // 64 MiB

/// Append a base-128 varint to `buf`.
pub fn put_uvarint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Decode a base-128 varint from the front of `bytes`. Returns the value and
/// the number of bytes consumed. At most 10 bytes; the 10th may only carry
/// the final bit of a 64-bit value, anything else is an overflow.
pub fn get_uvarint(bytes: &[u8]) -> Result<(u64, usize), FrameDecodeError> {
    let mut result: u64 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        if i == MAX_VARINT_BYTES - 1 && byte > 1 {
            return Err(FrameDecodeError::VarintOverflow);
        }
        result |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
    }
    Err(FrameDecodeError::NeedMore)
}

/// Encode a message into a single frame: varint length + protobuf payload.
pub fn encode_frame<M: Message>(msg: &M) -> Result<Vec<u8>, FrameEncodeError> {
    let len = msg.encoded_len();
    if len as u64 > MAX_FRAME_LEN {
        return Err(FrameEncodeError::TooLarge);
    }
    let mut out = Vec::with_capacity(MAX_VARINT_BYTES + len);
    put_uvarint(&mut out, len as u64);
    msg.encode(&mut out).map_err(FrameEncodeError::Encode)?;
    Ok(out)
}

/// Error encoding a message into a frame (prost or size limit).
#[derive(Debug, thiserror::Error)]
pub enum FrameEncodeError {
    #[error("encode error: {0}")]
    Encode(#[from] prost::EncodeError),
    #[error("frame too large")]
    TooLarge,
}

/// Decode one frame from the front of `bytes`. Returns the message and the number of bytes consumed.
/// Call with partial buffer; returns `NeedMore` if not enough bytes (caller should try again after more data).
pub fn decode_frame<M: Message + Default>(bytes: &[u8]) -> Result<(M, usize), FrameDecodeError> {
    let (len, prefix) = get_uvarint(bytes)?;
    if len > MAX_FRAME_LEN {
        return Err(FrameDecodeError::TooLarge);
    }
    let len = len as usize;
    if bytes.len() < prefix + len {
        return Err(FrameDecodeError::NeedMore);
    }
    let msg = M::decode(&bytes[prefix..prefix + len]).map_err(FrameDecodeError::Decode)?;
    Ok((msg, prefix + len))
}

/// Error decoding a frame (need more bytes, malformed varint, too large, or prost failure).
#[derive(Debug, thiserror::Error)]
pub enum FrameDecodeError {
    #[error("need more bytes")]
    NeedMore,
    #[error("varint overflowed")]
    VarintOverflow,
    #[error("frame too large")]
    TooLarge,
    #[error("decode error: {0}")]
    Decode(#[from] prost::DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pb;

    fn sample_request() -> pb::Request {
        pb::Request {
            r#type: pb::request::Type::Connect as i32,
            connect: Some(pb::ConnectRequest {
                peer: vec![0x12, 0x20, 0xaa],
                addrs: vec![vec![0x04, 0x7f, 0x00, 0x00, 0x01, 0x06, 0x27, 0x10]],
                timeout: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn uvarint_roundtrip() {
        for value in [0u64, 1, 127, 128, 300, 16_384, u64::from(u32::MAX), u64::MAX] {
            let mut buf = Vec::new();
            put_uvarint(&mut buf, value);
            let (decoded, n) = get_uvarint(&buf).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(n, buf.len());
        }
    }

    #[test]
    fn uvarint_overflow_rejected() {
        // 10 continuation bytes: the 10th carries more than the final bit.
        let buf = [0xff; 10];
        assert!(matches!(
            get_uvarint(&buf),
            Err(FrameDecodeError::VarintOverflow)
        ));
    }

    #[test]
    fn uvarint_partial_needs_more() {
        let buf = [0x80, 0x80];
        assert!(matches!(get_uvarint(&buf), Err(FrameDecodeError::NeedMore)));
    }

    #[test]
    fn roundtrip_request() {
        let msg = sample_request();
        let frame = encode_frame(&msg).unwrap();
        let (decoded, n): (pb::Request, usize) = decode_frame(&frame).unwrap();
        assert_eq!(n, frame.len());
        assert_eq!(decoded, msg);
    }

    #[test]
    fn partial_read_need_more() {
        let msg = sample_request();
        let frame = encode_frame(&msg).unwrap();
        assert!(matches!(
            decode_frame::<pb::Request>(&frame[..0]),
            Err(FrameDecodeError::NeedMore)
        ));
        assert!(matches!(
            decode_frame::<pb::Request>(&frame[..1]),
            Err(FrameDecodeError::NeedMore)
        ));
        assert!(matches!(
            decode_frame::<pb::Request>(&frame[..frame.len() - 1]),
            Err(FrameDecodeError::NeedMore)
        ));
    }

    #[test]
    fn multiple_messages() {
        let a = sample_request();
        let b = pb::Request {
            r#type: pb::request::Type::Identify as i32,
            ..Default::default()
        };
        let fa = encode_frame(&a).unwrap();
        let fb = encode_frame(&b).unwrap();
        let mut buf = Vec::new();
        buf.extend_from_slice(&fa);
        buf.extend_from_slice(&fb);
        let (m1, n1): (pb::Request, usize) = decode_frame(&buf).unwrap();
        assert_eq!(n1, fa.len());
        let (m2, n2): (pb::Request, usize) = decode_frame(&buf[n1..]).unwrap();
        assert_eq!(n2, fb.len());
        assert_eq!(m1, a);
        assert_eq!(m2, b);
    }

    #[test]
    fn zero_length_frame_decodes_default() {
        // varint 0, no payload: a valid frame holding an empty message.
        let buf = [0x00];
        let (msg, n): (pb::PsMessage, usize) = decode_frame(&buf).unwrap();
        assert_eq!(n, 1);
        assert_eq!(msg, pb::PsMessage::default());
    }

    #[test]
    fn oversized_length_rejected() {
        let mut buf = Vec::new();
        put_uvarint(&mut buf, MAX_FRAME_LEN + 1);
        assert!(matches!(
            decode_frame::<pb::Request>(&buf),
            Err(FrameDecodeError::TooLarge)
        ));
    }

    #[test]
    fn garbage_payload_rejected() {
        // length 3, then bytes that do not parse as a Request (missing required type).
        let buf = [0x03, 0xff, 0xff, 0xff];
        assert!(matches!(
            decode_frame::<pb::Request>(&buf),
            Err(FrameDecodeError::Decode(_))
        ));
    }
}

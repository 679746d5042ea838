//! Rich data types over the raw protobuf forms. Conversions are strict: a
//! bad peer id or multiaddr inside a response fails the whole operation.

use libp2p_identity::PeerId;
use multiaddr::Multiaddr;

use p2pd_proto::pb;

use crate::error::ControlError;

/// `(peer, addrs)` pair returned by `list_peers` and the DHT peer queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerInfo {
    pub peer_id: PeerId,
    pub addrs: Vec<Multiaddr>,
}

impl PeerInfo {
    pub(crate) fn from_pb(info: pb::PeerInfo) -> Result<Self, ControlError> {
        let peer_id = peer_id_from_bytes(&info.id)?;
        let addrs = info
            .addrs
            .into_iter()
            .map(maddr_from_bytes)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { peer_id, addrs })
    }
}

/// Metadata frame prefixed to every application stream, outbound and inbound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    pub peer_id: PeerId,
    pub addr: Multiaddr,
    pub proto: String,
}

impl StreamInfo {
    pub(crate) fn from_pb(info: pb::StreamInfo) -> Result<Self, ControlError> {
        Ok(Self {
            peer_id: peer_id_from_bytes(&info.peer)?,
            addr: maddr_from_bytes(info.addr)?,
            proto: info.proto,
        })
    }

    pub fn to_pb(&self) -> pb::StreamInfo {
        pb::StreamInfo {
            peer: self.peer_id.to_bytes(),
            addr: self.addr.to_vec(),
            proto: self.proto.clone(),
        }
    }
}

/// One pub/sub delivery, as pushed by the daemon on a subscription socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsMessage {
    pub from: PeerId,
    pub data: Vec<u8>,
    pub seqno: Vec<u8>,
    pub topics: Vec<String>,
    pub signature: Vec<u8>,
    pub key: Vec<u8>,
}

impl PsMessage {
    pub(crate) fn from_pb(msg: pb::PsMessage) -> Result<Self, ControlError> {
        let from = msg
            .from
            .ok_or_else(|| ControlError::Decode("pubsub message without a sender".to_string()))?;
        Ok(Self {
            from: peer_id_from_bytes(&from)?,
            data: msg.data.unwrap_or_default(),
            seqno: msg.seqno.unwrap_or_default(),
            topics: msg.topic_ids,
            signature: msg.signature.unwrap_or_default(),
            key: msg.key.unwrap_or_default(),
        })
    }
}

pub(crate) fn peer_id_from_bytes(bytes: &[u8]) -> Result<PeerId, ControlError> {
    PeerId::from_bytes(bytes).map_err(|err| ControlError::Decode(format!("bad peer id: {err}")))
}

pub(crate) fn maddr_from_bytes(bytes: Vec<u8>) -> Result<Multiaddr, ControlError> {
    Multiaddr::try_from(bytes).map_err(|err| ControlError::Decode(format!("bad multiaddr: {err}")))
}

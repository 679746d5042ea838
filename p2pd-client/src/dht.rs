//! DHT queries. Single-shot queries answer inside the response envelope
//! (`dht.type == VALUE`); streaming queries answer `BEGIN` there and then
//! push bare `DHTResponse` frames on the same connection until `END`.

use libp2p_identity::{PeerId, PublicKey};

use p2pd_proto::pb;

use crate::client::Client;
use crate::codec;
use crate::control::Duplex;
use crate::error::ControlError;
use crate::types::{self, PeerInfo};

/// Pull stream over an open DHT query. Yields one mapped item per `VALUE`
/// frame; ends on `END` or a clean socket close. Dropping it closes the
/// connection and abandons the query.
pub struct DhtResults<T> {
    stream: Option<Duplex>,
    map: fn(pb::DhtResponse) -> Result<T, ControlError>,
}

impl<T> DhtResults<T> {
    pub async fn next(&mut self) -> Option<Result<T, ControlError>> {
        let stream = self.stream.as_mut()?;
        match codec::read_msg_opt::<pb::DhtResponse, _>(stream).await {
            Ok(None) => {
                self.stream = None;
                None
            }
            Ok(Some(resp)) => match pb::dht_response::Type::try_from(resp.r#type) {
                Ok(pb::dht_response::Type::End) => {
                    self.stream = None;
                    None
                }
                Ok(pb::dht_response::Type::Value) => Some((self.map)(resp)),
                _ => {
                    self.stream = None;
                    Some(Err(ControlError::UnexpectedResponse(format!(
                        "unexpected dht frame type {}",
                        resp.r#type
                    ))))
                }
            },
            Err(err) => {
                self.stream = None;
                Some(Err(err))
            }
        }
    }

    /// Drain the remaining items, stopping at the first error.
    pub async fn collect(mut self) -> Result<Vec<T>, ControlError> {
        let mut out = Vec::new();
        while let Some(item) = self.next().await {
            out.push(item?);
        }
        Ok(out)
    }
}

fn map_peer_info(resp: pb::DhtResponse) -> Result<PeerInfo, ControlError> {
    let peer = resp
        .peer
        .ok_or_else(|| ControlError::Decode("dht response without peer info".into()))?;
    PeerInfo::from_pb(peer)
}

fn map_value(resp: pb::DhtResponse) -> Result<Vec<u8>, ControlError> {
    resp.value
        .ok_or_else(|| ControlError::Decode("dht response without value".into()))
}

fn map_peer_id(resp: pb::DhtResponse) -> Result<PeerId, ControlError> {
    let value = map_value(resp)?;
    types::peer_id_from_bytes(&value)
}

fn dht_request(r#type: pb::dht_request::Type) -> pb::DhtRequest {
    pb::DhtRequest {
        r#type: r#type as i32,
        ..Default::default()
    }
}

impl Client {
    /// One envelope carrying `dht.type == VALUE`.
    async fn dht_single(&self, dht: pb::DhtRequest) -> Result<pb::DhtResponse, ControlError> {
        self.ensure_open()?;
        let req = pb::Request {
            r#type: pb::request::Type::Dht as i32,
            dht: Some(dht),
            ..Default::default()
        };
        let resp = self.inner.control.request(req).await?;
        let dht = resp
            .dht
            .ok_or_else(|| ControlError::UnexpectedResponse("missing dht result".into()))?;
        match pb::dht_response::Type::try_from(dht.r#type) {
            Ok(pb::dht_response::Type::Value) => Ok(dht),
            _ => Err(ControlError::UnexpectedResponse(format!(
                "expected a single dht value, got type {}",
                dht.r#type
            ))),
        }
    }

    /// Envelope `BEGIN`, then a stream of frames on the same connection.
    async fn dht_stream<T>(
        &self,
        dht: pb::DhtRequest,
        map: fn(pb::DhtResponse) -> Result<T, ControlError>,
    ) -> Result<DhtResults<T>, ControlError> {
        self.ensure_open()?;
        let req = pb::Request {
            r#type: pb::request::Type::Dht as i32,
            dht: Some(dht),
            ..Default::default()
        };
        let (resp, stream) = self.inner.control.request_stream(req).await?;
        let dht = resp
            .dht
            .ok_or_else(|| ControlError::UnexpectedResponse("missing dht result".into()))?;
        match pb::dht_response::Type::try_from(dht.r#type) {
            Ok(pb::dht_response::Type::Begin) => Ok(DhtResults {
                stream: Some(stream),
                map,
            }),
            _ => Err(ControlError::UnexpectedResponse(format!(
                "expected BEGIN, got dht type {}",
                dht.r#type
            ))),
        }
    }

    /// Fire-and-forget DHT request: only the OK envelope matters.
    async fn dht_unit(&self, dht: pb::DhtRequest) -> Result<(), ControlError> {
        self.ensure_open()?;
        let req = pb::Request {
            r#type: pb::request::Type::Dht as i32,
            dht: Some(dht),
            ..Default::default()
        };
        self.inner.control.request(req).await?;
        Ok(())
    }

    /// FIND_PEER: where `peer_id` lives.
    pub async fn dht_find_peer(&self, peer_id: &PeerId) -> Result<PeerInfo, ControlError> {
        let mut dht = dht_request(pb::dht_request::Type::FindPeer);
        dht.peer = Some(peer_id.to_bytes());
        let resp = self.dht_single(dht).await?;
        map_peer_info(resp)
    }

    /// FIND_PEERS_CONNECTED_TO_PEER, streaming.
    pub async fn dht_find_peers_connected_to_peer(
        &self,
        peer_id: &PeerId,
    ) -> Result<DhtResults<PeerInfo>, ControlError> {
        let mut dht = dht_request(pb::dht_request::Type::FindPeersConnectedToPeer);
        dht.peer = Some(peer_id.to_bytes());
        self.dht_stream(dht, map_peer_info).await
    }

    /// FIND_PROVIDERS: up to `count` providers of `cid`, streaming.
    pub async fn dht_find_providers(
        &self,
        cid: &[u8],
        count: i32,
    ) -> Result<DhtResults<PeerInfo>, ControlError> {
        let mut dht = dht_request(pb::dht_request::Type::FindProviders);
        dht.cid = Some(cid.to_vec());
        dht.count = Some(count);
        self.dht_stream(dht, map_peer_info).await
    }

    /// GET_CLOSEST_PEERS to `key`, streaming peer ids.
    pub async fn dht_get_closest_peers(
        &self,
        key: &[u8],
    ) -> Result<DhtResults<PeerId>, ControlError> {
        let mut dht = dht_request(pb::dht_request::Type::GetClosestPeers);
        dht.key = Some(key.to_vec());
        self.dht_stream(dht, map_peer_id).await
    }

    /// GET_PUBLIC_KEY of `peer_id`, decoded from its protobuf encoding.
    pub async fn dht_get_public_key(&self, peer_id: &PeerId) -> Result<PublicKey, ControlError> {
        let mut dht = dht_request(pb::dht_request::Type::GetPublicKey);
        dht.peer = Some(peer_id.to_bytes());
        let resp = self.dht_single(dht).await?;
        let bytes = map_value(resp)?;
        PublicKey::try_decode_protobuf(&bytes)
            .map_err(|err| ControlError::Decode(format!("bad public key: {err}")))
    }

    /// GET_VALUE for `key`.
    pub async fn dht_get_value(&self, key: &[u8]) -> Result<Vec<u8>, ControlError> {
        let mut dht = dht_request(pb::dht_request::Type::GetValue);
        dht.key = Some(key.to_vec());
        let resp = self.dht_single(dht).await?;
        map_value(resp)
    }

    /// SEARCH_VALUE for `key`, streaming candidate values.
    pub async fn dht_search_value(&self, key: &[u8]) -> Result<DhtResults<Vec<u8>>, ControlError> {
        let mut dht = dht_request(pb::dht_request::Type::SearchValue);
        dht.key = Some(key.to_vec());
        self.dht_stream(dht, map_value).await
    }

    /// PUT_VALUE under `key`.
    pub async fn dht_put_value(&self, key: &[u8], value: &[u8]) -> Result<(), ControlError> {
        let mut dht = dht_request(pb::dht_request::Type::PutValue);
        dht.key = Some(key.to_vec());
        dht.value = Some(value.to_vec());
        self.dht_unit(dht).await
    }

    /// PROVIDE `cid` from this node.
    pub async fn dht_provide(&self, cid: &[u8]) -> Result<(), ControlError> {
        let mut dht = dht_request(pb::dht_request::Type::Provide);
        dht.cid = Some(cid.to_vec());
        self.dht_unit(dht).await
    }
}

//! Connection-manager operations: weighted peer tags and trimming.

use libp2p_identity::PeerId;

use p2pd_proto::pb;

use crate::client::Client;
use crate::error::ControlError;

impl Client {
    async fn connmgr(&self, req: pb::ConnManagerRequest) -> Result<(), ControlError> {
        self.ensure_open()?;
        let req = pb::Request {
            r#type: pb::request::Type::Connmanager as i32,
            conn_manager: Some(req),
            ..Default::default()
        };
        self.inner.control.request(req).await?;
        Ok(())
    }

    /// TAG_PEER: attach an int-weighted tag to `peer_id`.
    pub async fn connmgr_tag_peer(
        &self,
        peer_id: &PeerId,
        tag: &str,
        weight: i64,
    ) -> Result<(), ControlError> {
        self.connmgr(pb::ConnManagerRequest {
            r#type: pb::conn_manager_request::Type::TagPeer as i32,
            peer: Some(peer_id.to_bytes()),
            tag: Some(tag.to_string()),
            weight: Some(weight),
        })
        .await
    }

    /// UNTAG_PEER: remove `tag` from `peer_id`.
    pub async fn connmgr_untag_peer(
        &self,
        peer_id: &PeerId,
        tag: &str,
    ) -> Result<(), ControlError> {
        self.connmgr(pb::ConnManagerRequest {
            r#type: pb::conn_manager_request::Type::UntagPeer as i32,
            peer: Some(peer_id.to_bytes()),
            tag: Some(tag.to_string()),
            weight: None,
        })
        .await
    }

    /// TRIM: prune low-weighted connections.
    pub async fn connmgr_trim(&self) -> Result<(), ControlError> {
        self.connmgr(pb::ConnManagerRequest {
            r#type: pb::conn_manager_request::Type::Trim as i32,
            peer: None,
            tag: None,
            weight: None,
        })
        .await
    }
}

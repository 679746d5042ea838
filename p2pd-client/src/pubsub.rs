//! Pub/sub operations. Subscriptions keep the control connection of the
//! SUBSCRIBE request: the daemon pushes framed `PSMessage`s on that same
//! duplex, and a background reader forwards them to the caller in order.

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::debug;

use libp2p_identity::PeerId;
use p2pd_proto::pb;

use crate::client::Client;
use crate::codec;
use crate::control::Duplex;
use crate::error::ControlError;
use crate::types::{self, PsMessage};

/// A live subscription. Messages arrive in the daemon's send order; after an
/// error or a daemon-side close the channel yields `None` forever.
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<Result<PsMessage, ControlError>>,
    cancel: Option<oneshot::Sender<()>>,
}

impl Subscription {
    /// Next delivery, or `None` once the subscription has ended. A reader
    /// failure is delivered once as `Err` before the end.
    pub async fn recv(&mut self) -> Option<Result<PsMessage, ControlError>> {
        self.rx.recv().await
    }

    /// End the subscription: the reader closes its duplex and exits, which
    /// the daemon observes as an unsubscribe. Also happens on drop.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Reader loop for one subscription duplex. Exits on cancel, client
/// shutdown, daemon close, or error; dropping the duplex closes it.
async fn run_reader(
    mut stream: Duplex,
    topic: String,
    tx: mpsc::UnboundedSender<Result<PsMessage, ControlError>>,
    mut cancel: oneshot::Receiver<()>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = &mut cancel => break,
            _ = shutdown.recv() => break,
            read = codec::read_msg_opt::<pb::PsMessage, _>(&mut stream) => match read {
                Ok(None) => break,
                Ok(Some(msg)) => match PsMessage::from_pb(msg) {
                    Ok(msg) => {
                        if tx.send(Ok(msg)).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        let _ = tx.send(Err(err));
                        break;
                    }
                },
                Err(err) => {
                    let _ = tx.send(Err(err));
                    break;
                }
            },
        }
    }
    debug!(topic = %topic, "subscription reader finished");
}

impl Client {
    async fn pubsub(&self, req: pb::PsRequest) -> Result<pb::Response, ControlError> {
        self.ensure_open()?;
        let req = pb::Request {
            r#type: pb::request::Type::Pubsub as i32,
            pubsub: Some(req),
            ..Default::default()
        };
        self.inner.control.request(req).await
    }

    /// PUBSUB GET_TOPICS: topics this daemon is subscribed to.
    pub async fn pubsub_get_topics(&self) -> Result<Vec<String>, ControlError> {
        let resp = self
            .pubsub(pb::PsRequest {
                r#type: pb::ps_request::Type::GetTopics as i32,
                topic: None,
                data: None,
            })
            .await?;
        let pubsub = resp
            .pubsub
            .ok_or_else(|| ControlError::UnexpectedResponse("missing pubsub result".into()))?;
        Ok(pubsub.topics)
    }

    /// PUBSUB LIST_PEERS: peers participating in `topic`.
    pub async fn pubsub_list_peers(&self, topic: &str) -> Result<Vec<PeerId>, ControlError> {
        let resp = self
            .pubsub(pb::PsRequest {
                r#type: pb::ps_request::Type::ListPeers as i32,
                topic: Some(topic.to_string()),
                data: None,
            })
            .await?;
        let pubsub = resp
            .pubsub
            .ok_or_else(|| ControlError::UnexpectedResponse("missing pubsub result".into()))?;
        pubsub
            .peer_ids
            .iter()
            .map(|bytes| types::peer_id_from_bytes(bytes))
            .collect()
    }

    /// PUBSUB PUBLISH `data` to `topic`.
    pub async fn pubsub_publish(&self, topic: &str, data: &[u8]) -> Result<(), ControlError> {
        self.pubsub(pb::PsRequest {
            r#type: pb::ps_request::Type::Publish as i32,
            topic: Some(topic.to_string()),
            data: Some(data.to_vec()),
        })
        .await?;
        Ok(())
    }

    /// PUBSUB SUBSCRIBE: open a long-lived duplex for `topic` and spawn the
    /// reader that feeds the returned subscription.
    pub async fn pubsub_subscribe(&self, topic: &str) -> Result<Subscription, ControlError> {
        self.ensure_open()?;
        let req = pb::Request {
            r#type: pb::request::Type::Pubsub as i32,
            pubsub: Some(pb::PsRequest {
                r#type: pb::ps_request::Type::Subscribe as i32,
                topic: Some(topic.to_string()),
                data: None,
            }),
            ..Default::default()
        };
        let (_resp, stream) = self.inner.control.request_stream(req).await?;
        let (tx, rx) = mpsc::unbounded_channel();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        tokio::spawn(run_reader(
            stream,
            topic.to_string(),
            tx,
            cancel_rx,
            self.inner.shutdown.subscribe(),
        ));
        Ok(Subscription {
            rx,
            cancel: Some(cancel_tx),
        })
    }
}

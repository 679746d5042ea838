//! Async client for the libp2p daemon control protocol.
//! Speaks varint-length-delimited protobuf over a local unix socket or TCP
//! loopback connection to an out-of-process daemon; the daemon does the
//! actual libp2p networking.
//!
//! One `Client` owns one control endpoint. Outbound operations each use a
//! fresh control connection. For inbound streams the client runs its own
//! listener, which the daemon dials back into; registered handlers are keyed
//! by protocol id and receive `(StreamInfo, Duplex)`.

pub mod client;
mod codec;
pub mod config;
mod connmgr;
mod control;
pub mod dht;
pub mod error;
pub mod listener;
pub mod maddr;
pub mod pubsub;
pub mod types;

pub use client::Client;
pub use config::Config;
pub use control::Duplex;
pub use dht::DhtResults;
pub use error::ControlError;
pub use listener::{HandlerFuture, StreamHandler};
pub use maddr::{multiaddr_from_str, Endpoint};
pub use pubsub::Subscription;
pub use types::{PeerInfo, PsMessage, StreamInfo};

pub use libp2p_identity::{PeerId, PublicKey};
pub use multiaddr::Multiaddr;
pub use p2pd_proto as proto;

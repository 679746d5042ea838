//! Protobuf messages of the daemon control protocol.
//!
//! Hand-maintained mirror of the daemon's `p2pd.proto` (proto2), compatible
//! with the Go daemon v0.2.0 and the JS daemon v0.10.2. Kept as plain prost
//! derives so the crate builds without a protoc toolchain; tags and labels
//! must not drift from the upstream schema.

/// Request envelope. `type` selects which optional sub-request is set.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Request {
    #[prost(enumeration = "request::Type", required, tag = "1")]
    pub r#type: i32,
    #[prost(message, optional, tag = "2")]
    pub connect: ::core::option::Option<ConnectRequest>,
    #[prost(message, optional, tag = "3")]
    pub stream_open: ::core::option::Option<StreamOpenRequest>,
    #[prost(message, optional, tag = "4")]
    pub stream_handler: ::core::option::Option<StreamHandlerRequest>,
    #[prost(message, optional, tag = "5")]
    pub dht: ::core::option::Option<DhtRequest>,
    #[prost(message, optional, tag = "6")]
    pub conn_manager: ::core::option::Option<ConnManagerRequest>,
    #[prost(message, optional, tag = "7")]
    pub disconnect: ::core::option::Option<DisconnectRequest>,
    #[prost(message, optional, tag = "8")]
    pub pubsub: ::core::option::Option<PsRequest>,
    #[prost(message, optional, tag = "9")]
    pub peerstore: ::core::option::Option<PeerstoreRequest>,
}

pub mod request {
    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration,
    )]
    #[repr(i32)]
    pub enum Type {
        Identify = 0,
        Connect = 1,
        StreamOpen = 2,
        StreamHandler = 3,
        Dht = 4,
        ListPeers = 5,
        Connmanager = 6,
        Disconnect = 7,
        Pubsub = 8,
        Peerstore = 9,
    }
}

/// Response envelope. `type` is OK or ERROR; result members are optional.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Response {
    #[prost(enumeration = "response::Type", required, tag = "1")]
    pub r#type: i32,
    #[prost(message, optional, tag = "2")]
    pub error: ::core::option::Option<ErrorResponse>,
    #[prost(message, optional, tag = "3")]
    pub stream_info: ::core::option::Option<StreamInfo>,
    #[prost(message, optional, tag = "4")]
    pub identify: ::core::option::Option<IdentifyResponse>,
    #[prost(message, optional, tag = "5")]
    pub dht: ::core::option::Option<DhtResponse>,
    #[prost(message, repeated, tag = "6")]
    pub peers: ::prost::alloc::vec::Vec<PeerInfo>,
    #[prost(message, optional, tag = "7")]
    pub pubsub: ::core::option::Option<PsResponse>,
    #[prost(message, optional, tag = "8")]
    pub peerstore: ::core::option::Option<PeerstoreResponse>,
}

pub mod response {
    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration,
    )]
    #[repr(i32)]
    pub enum Type {
        Ok = 0,
        Error = 1,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IdentifyResponse {
    #[prost(bytes = "vec", required, tag = "1")]
    pub id: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub addrs: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConnectRequest {
    #[prost(bytes = "vec", required, tag = "1")]
    pub peer: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub addrs: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
    #[prost(int64, optional, tag = "3")]
    pub timeout: ::core::option::Option<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StreamOpenRequest {
    #[prost(bytes = "vec", required, tag = "1")]
    pub peer: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, repeated, tag = "2")]
    pub proto: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(int64, optional, tag = "3")]
    pub timeout: ::core::option::Option<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StreamHandlerRequest {
    /// Listener multiaddr, binary form. The daemon dials back here.
    #[prost(bytes = "vec", required, tag = "1")]
    pub addr: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, repeated, tag = "2")]
    pub proto: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ErrorResponse {
    #[prost(string, required, tag = "1")]
    pub msg: ::prost::alloc::string::String,
}

/// First frame on every application stream, outbound and inbound.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StreamInfo {
    #[prost(bytes = "vec", required, tag = "1")]
    pub peer: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", required, tag = "2")]
    pub addr: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, required, tag = "3")]
    pub proto: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DhtRequest {
    #[prost(enumeration = "dht_request::Type", required, tag = "1")]
    pub r#type: i32,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub peer: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "3")]
    pub cid: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "4")]
    pub key: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "5")]
    pub value: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    #[prost(int32, optional, tag = "6")]
    pub count: ::core::option::Option<i32>,
    #[prost(int64, optional, tag = "7")]
    pub timeout: ::core::option::Option<i64>,
}

pub mod dht_request {
    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration,
    )]
    #[repr(i32)]
    pub enum Type {
        FindPeer = 0,
        FindPeersConnectedToPeer = 1,
        FindProviders = 2,
        GetClosestPeers = 3,
        GetPublicKey = 4,
        GetValue = 5,
        SearchValue = 6,
        PutValue = 7,
        Provide = 8,
    }
}

/// Single-shot results arrive as `VALUE` inside the response envelope;
/// streaming queries send `BEGIN` there, then bare frames until `END`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DhtResponse {
    #[prost(enumeration = "dht_response::Type", required, tag = "1")]
    pub r#type: i32,
    #[prost(message, optional, tag = "2")]
    pub peer: ::core::option::Option<PeerInfo>,
    #[prost(bytes = "vec", optional, tag = "3")]
    pub value: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
}

pub mod dht_response {
    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration,
    )]
    #[repr(i32)]
    pub enum Type {
        Begin = 0,
        Value = 1,
        End = 2,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PeerInfo {
    #[prost(bytes = "vec", required, tag = "1")]
    pub id: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub addrs: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConnManagerRequest {
    #[prost(enumeration = "conn_manager_request::Type", required, tag = "1")]
    pub r#type: i32,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub peer: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    #[prost(string, optional, tag = "3")]
    pub tag: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(int64, optional, tag = "4")]
    pub weight: ::core::option::Option<i64>,
}

pub mod conn_manager_request {
    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration,
    )]
    #[repr(i32)]
    pub enum Type {
        TagPeer = 0,
        UntagPeer = 1,
        Trim = 2,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DisconnectRequest {
    #[prost(bytes = "vec", required, tag = "1")]
    pub peer: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PsRequest {
    #[prost(enumeration = "ps_request::Type", required, tag = "1")]
    pub r#type: i32,
    #[prost(string, optional, tag = "2")]
    pub topic: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(bytes = "vec", optional, tag = "3")]
    pub data: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
}

pub mod ps_request {
    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration,
    )]
    #[repr(i32)]
    pub enum Type {
        GetTopics = 0,
        ListPeers = 1,
        Publish = 2,
        Subscribe = 3,
    }
}

/// Delivered by the daemon on the subscription duplex, one frame per message.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PsMessage {
    #[prost(bytes = "vec", optional, tag = "1")]
    pub from: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub data: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "3")]
    pub seqno: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    #[prost(string, repeated, tag = "4")]
    pub topic_ids: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(bytes = "vec", optional, tag = "5")]
    pub signature: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "6")]
    pub key: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PsResponse {
    #[prost(string, repeated, tag = "1")]
    pub topics: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub peer_ids: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PeerstoreRequest {
    #[prost(enumeration = "peerstore_request::Type", required, tag = "1")]
    pub r#type: i32,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub id: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    #[prost(string, repeated, tag = "3")]
    pub protos: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

pub mod peerstore_request {
    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration,
    )]
    #[repr(i32)]
    pub enum Type {
        GetProtocols = 1,
        GetPeerInfo = 2,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PeerstoreResponse {
    #[prost(message, optional, tag = "1")]
    pub peer: ::core::option::Option<PeerInfo>,
    #[prost(string, repeated, tag = "2")]
    pub protos: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

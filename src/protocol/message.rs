//! Parsed protocol events and the types they carry

use bytes::Bytes;
use serde::Deserialize;

/// A message delivered to a subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Subject the message was published to
    pub subject: String,
    /// Subscription id exactly as sent by the server
    pub sid: String,
    /// Optional reply subject for request/reply
    pub reply_to: Option<String>,
    /// Message body, without the trailing terminator
    pub payload: Bytes,
}

/// Event produced by the frame parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedEvent {
    /// A `MSG` frame and its payload were fully received
    Message(Message),
    /// `+OK`
    Ok,
    /// `-ERR`, with the quotes stripped from the server message
    ServerError(String),
    /// `PING`; the owner must answer with `PONG`
    Ping,
    /// `PONG`
    Pong,
    /// `INFO`, carrying the raw JSON text
    Info(String),
    /// A control line that matched no known production
    Unrecognized(String),
}

/// Fields of the server `INFO` document the client cares about
///
/// Unknown fields are ignored so newer servers stay compatible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerInfo {
    /// Unique server id
    pub server_id: String,
    /// Server name
    pub server_name: String,
    /// Server version string
    pub version: String,
    /// Protocol version
    pub proto: i32,
    /// Largest payload the server accepts (0 = unknown)
    pub max_payload: usize,
    /// Whether the server requires authentication
    pub auth_required: bool,
    /// Whether the server requires TLS
    pub tls_required: bool,
    /// Other cluster members the client could connect to
    pub connect_urls: Vec<String>,
}

impl ServerInfo {
    /// Parse the JSON body of an `INFO` line
    pub fn parse(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

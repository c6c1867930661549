//! Connection-level events surfaced to the application

use tokio::sync::mpsc;

use crate::protocol::message::ServerInfo;

/// Events from the client connection
///
/// Delivered over the channel returned by [`Client::connect`]. Message
/// deliveries go to subscription callbacks, not here.
///
/// [`Client::connect`]: super::Client::connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// CONNECT was written and the reader task is running
    Connected,

    /// Server sent (or re-sent) its INFO document
    ServerInfo(ServerInfo),

    /// Server sent `-ERR`; the connection stays open unless configured otherwise
    ServerError(String),

    /// A control line matched no known production and was skipped
    MalformedFrame(String),

    /// Server answered a client PING
    Pong,

    /// The inbound stream desynchronized; the connection has been abandoned
    Desync(String),

    /// The connection is closed
    Disconnected,
}

/// Send an event without waiting; a full or closed channel drops it with a warning
pub(crate) fn emit(events: &mpsc::Sender<ClientEvent>, event: ClientEvent) {
    if let Err(e) = events.try_send(event) {
        tracing::warn!(error = %e, "Client event not delivered");
    }
}

//! Event dispatcher
//!
//! Applies the reaction for every [`ParsedEvent`] the frame parser produces:
//! completed messages go to their subscription callback, PING is answered,
//! everything else is recorded and surfaced as a [`ClientEvent`].

use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

use crate::error::{Error, Result};
use crate::protocol::command::pong_frame;
use crate::protocol::message::{Message, ParsedEvent, ServerInfo};
use crate::protocol::subject::Subject;
use crate::registry::{SubscriptionId, SubscriptionRegistry};
use crate::stats::ClientStats;

use super::event::{self, ClientEvent};
use super::writer::FrameWriter;

/// Routes parsed events for one connection
pub struct Dispatcher {
    registry: Arc<SubscriptionRegistry>,
    writer: FrameWriter,
    events: mpsc::Sender<ClientEvent>,
    stats: Arc<ClientStats>,
    server_info: Arc<RwLock<Option<ServerInfo>>>,
    close_on_server_error: bool,
}

impl Dispatcher {
    /// Create a dispatcher
    pub fn new(
        registry: Arc<SubscriptionRegistry>,
        writer: FrameWriter,
        events: mpsc::Sender<ClientEvent>,
        stats: Arc<ClientStats>,
        server_info: Arc<RwLock<Option<ServerInfo>>>,
    ) -> Self {
        Self {
            registry,
            writer,
            events,
            stats,
            server_info,
            close_on_server_error: false,
        }
    }

    /// Treat `-ERR` as fatal for the connection
    pub fn close_on_server_error(mut self, close: bool) -> Self {
        self.close_on_server_error = close;
        self
    }

    /// Apply the reaction for one event
    ///
    /// Returns an error only when the connection should be closed: the PONG
    /// reply could not be written, or a server error hit a closing policy.
    pub async fn dispatch(&self, event: ParsedEvent) -> Result<()> {
        match event {
            ParsedEvent::Message(message) => {
                self.deliver(message).await;
            }
            ParsedEvent::Ok => {
                tracing::trace!("+OK");
            }
            ParsedEvent::Ping => {
                self.stats.inc_pings_received();
                tracing::debug!("PING received, sending PONG");
                self.writer.send(pong_frame()).await?;
            }
            ParsedEvent::Pong => {
                self.stats.inc_pongs_received();
                tracing::debug!("PONG received");
                self.emit(ClientEvent::Pong);
            }
            ParsedEvent::Info(raw) => match ServerInfo::parse(&raw) {
                Ok(info) => {
                    tracing::debug!(
                        server_id = %info.server_id,
                        version = %info.version,
                        max_payload = info.max_payload,
                        "Server INFO received"
                    );
                    *self.server_info.write().await = Some(info.clone());
                    self.emit(ClientEvent::ServerInfo(info));
                }
                Err(e) => {
                    self.stats.inc_malformed_frames();
                    tracing::warn!(error = %e, info = %raw, "Unparseable server INFO");
                    self.emit(ClientEvent::MalformedFrame(raw));
                }
            },
            ParsedEvent::ServerError(message) => {
                self.stats.inc_server_errors();
                tracing::info!(error = %message, "Server error");
                self.emit(ClientEvent::ServerError(message.clone()));

                if self.close_on_server_error {
                    return Err(Error::Server(message));
                }
            }
            ParsedEvent::Unrecognized(line) => {
                self.stats.inc_malformed_frames();
                tracing::warn!(line = %line, "Unrecognized frame skipped");
                self.emit(ClientEvent::MalformedFrame(line));
            }
        }

        Ok(())
    }

    /// Hand a completed message to its subscription callback
    ///
    /// The callback runs inline: a slow callback stalls this connection.
    async fn deliver(&self, message: Message) {
        let subscription = match message.sid.parse::<SubscriptionId>() {
            Ok(id) => self.registry.lookup(id).await,
            Err(_) => None,
        };

        let Some(subscription) = subscription else {
            self.stats.inc_messages_dropped();
            tracing::warn!(
                sid = %message.sid,
                subject = %message.subject,
                bytes = message.payload.len(),
                "Message for unknown subscription dropped"
            );
            return;
        };

        if !Subject::matches(&subscription.pattern, &message.subject) {
            tracing::warn!(
                sid = %message.sid,
                subject = %message.subject,
                pattern = %subscription.pattern,
                "Delivered subject does not match subscription pattern"
            );
        }

        self.stats.inc_messages_received();
        tracing::trace!(
            sid = %message.sid,
            subject = %message.subject,
            bytes = message.payload.len(),
            "Delivering message"
        );
        subscription.deliver(&message);
    }

    fn emit(&self, event: ClientEvent) {
        event::emit(&self.events, event);
    }
}

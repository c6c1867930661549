//! # nats-rs
//!
//! Client library for the NATS text protocol over a persistent stream.
//!
//! The heart of the crate is the streaming frame parser: bytes arrive in
//! arbitrary fragments, and [`protocol::FrameParser`] turns them into discrete
//! events with byte-exact message payloads, however the frames were split or
//! coalesced by the transport.
//!
//! ```text
//! bytes ──► FrameParser ──► control event ─────────────────► Dispatcher
//!                │                                              ▲
//!                └──► MSG header ──► PendingMessage ──► Message ┘
//!                                                               │
//!                                          SubscriptionRegistry ┴► callback
//! ```
//!
//! # Example
//! ```no_run
//! use nats_rs::{Client, ClientConfig};
//!
//! # async fn example() -> nats_rs::Result<()> {
//! let (client, _events) = Client::connect(ClientConfig::new("localhost")).await?;
//! client.subscribe("greetings.>", |msg| {
//!     println!("{}: {:?}", msg.subject, msg.payload);
//! }).await?;
//! client.publish("greetings.world", b"hello").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod stats;

pub use client::{Client, ClientConfig, ClientEvent};
pub use error::{Error, ProtocolError, Result};
pub use protocol::{FrameParser, Message, ParsedEvent, ServerInfo, Subject};
pub use registry::{SubscriptionId, SubscriptionRegistry};

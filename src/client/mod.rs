//! NATS client implementation
//!
//! Provides the client side of the NATS text protocol:
//! - Authenticating with CONNECT
//! - Subscribing and unsubscribing with wildcard patterns
//! - Publishing, with or without a reply subject
//! - Answering server PINGs automatically
//!
//! # Callback contract
//!
//! Subscription callbacks run synchronously on the connection's reader task,
//! in stream order. While a callback runs no further frames are parsed for
//! that connection, so callbacks should be fast; heavy work belongs on a
//! separate task fed through a channel.

pub mod config;
pub mod connection;
pub mod dispatcher;
pub mod event;
pub mod writer;

pub use config::ClientConfig;
pub use connection::Client;
pub use dispatcher::Dispatcher;
pub use event::ClientEvent;
pub use writer::FrameWriter;

//! Subscription registry
//!
//! The registry owns the mapping from subscription id to pattern and callback.
//! It is the one structure shared between the application-facing [`Client`]
//! handle and the connection's reader task.
//!
//! # Architecture
//!
//! ```text
//!                       Arc<SubscriptionRegistry>
//!                    ┌──────────────────────────────┐
//!                    │ subscriptions: HashMap<Sid,  │
//!                    │   Subscription {             │
//!                    │     pattern,                 │
//!                    │     callback,                │
//!                    │   }                          │
//!                    │ >                            │
//!                    └───────┬──────────────┬───────┘
//!                            │              │
//!              subscribe() / unsubscribe()  lookup(sid)
//!                            │              │
//!                        [Client]      [Dispatcher]
//! ```
//!
//! Dispatch always goes by id, never by pattern: the server has already done
//! the subject matching.
//!
//! [`Client`]: crate::client::Client

pub mod entry;
pub mod error;
pub mod store;

pub use entry::{MessageCallback, Subscription, SubscriptionId};
pub use error::RegistryError;
pub use store::SubscriptionRegistry;

//! Registry error types

use thiserror::Error;

use super::entry::SubscriptionId;

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Pattern does not follow the subject grammar
    #[error("Invalid subscription pattern: {0:?}")]
    InvalidPattern(String),
    /// No subscription with this id
    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(SubscriptionId),
}

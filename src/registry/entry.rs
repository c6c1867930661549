//! Subscription entry types

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::Arc;

use crate::protocol::message::Message;

/// Callback invoked for every message delivered to a subscription
///
/// Runs on the connection's reader task; see [`crate::client`] for the
/// blocking contract.
pub type MessageCallback = Arc<dyn Fn(&Message) + Send + Sync>;

/// Subscription id shared by client and server
///
/// Rendered on the wire as a decimal integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Wrap a raw id
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubscriptionId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A registered interest in a subject pattern
#[derive(Clone)]
pub struct Subscription {
    /// Id assigned at subscribe time
    pub id: SubscriptionId,
    /// Subject pattern, possibly with wildcards
    pub pattern: String,
    callback: MessageCallback,
}

impl Subscription {
    pub(super) fn new(id: SubscriptionId, pattern: String, callback: MessageCallback) -> Self {
        Self {
            id,
            pattern,
            callback,
        }
    }

    /// Invoke the callback for a delivered message
    pub fn deliver(&self, message: &Message) {
        (self.callback)(message);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_id_wire_form() {
        let id = SubscriptionId::new(17);
        assert_eq!(id.to_string(), "17");
        assert_eq!("17".parse::<SubscriptionId>().unwrap(), id);
        assert!("abc".parse::<SubscriptionId>().is_err());
    }
}

//! Subscription registry implementation
//!
//! Per-connection map from subscription id to pattern and callback.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::protocol::message::Message;
use crate::protocol::subject::Subject;

use super::entry::{Subscription, SubscriptionId};
use super::error::RegistryError;

/// Registry of active subscriptions for one connection
///
/// Thread-safe via `RwLock`: the reader task looks subscriptions up for every
/// delivered message while the application subscribes and unsubscribes.
pub struct SubscriptionRegistry {
    /// Map of subscription id to subscription
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,

    /// Next id to hand out
    next_id: AtomicU64,
}

impl SubscriptionRegistry {
    /// Create an empty registry; the first id handed out is 1
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a callback for a subject pattern
    ///
    /// The pattern is validated before an id is allocated, so a rejected
    /// pattern leaves the id sequence untouched.
    pub async fn subscribe<F>(
        &self,
        pattern: &str,
        callback: F,
    ) -> Result<SubscriptionId, RegistryError>
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        if !Subject::is_valid_pattern(pattern) {
            return Err(RegistryError::InvalidPattern(pattern.to_string()));
        }

        let id = SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let subscription = Subscription::new(id, pattern.to_string(), Arc::new(callback));

        let mut subscriptions = self.subscriptions.write().await;
        subscriptions.insert(id, subscription);

        tracing::debug!(
            sid = %id,
            pattern = pattern,
            total = subscriptions.len(),
            "Subscription registered"
        );

        Ok(id)
    }

    /// Remove a subscription
    ///
    /// Messages still in flight for this id are drained by the parser but
    /// no longer delivered.
    pub async fn unsubscribe(&self, id: SubscriptionId) -> Result<Subscription, RegistryError> {
        let mut subscriptions = self.subscriptions.write().await;

        let removed = subscriptions
            .remove(&id)
            .ok_or(RegistryError::SubscriptionNotFound(id))?;

        tracing::debug!(
            sid = %id,
            pattern = %removed.pattern,
            total = subscriptions.len(),
            "Subscription removed"
        );

        Ok(removed)
    }

    /// Look up a subscription by id
    ///
    /// Returns a clone so the lock is not held while the callback runs.
    pub async fn lookup(&self, id: SubscriptionId) -> Option<Subscription> {
        self.subscriptions.read().await.get(&id).cloned()
    }

    /// Number of active subscriptions
    pub async fn len(&self) -> usize {
        self.subscriptions.read().await.len()
    }

    /// Check if there are no active subscriptions
    pub async fn is_empty(&self) -> bool {
        self.subscriptions.read().await.is_empty()
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use bytes::Bytes;

    use super::*;

    fn message(sid: &str) -> Message {
        Message {
            subject: "foo.bar".into(),
            sid: sid.into(),
            reply_to: None,
            payload: Bytes::from_static(b"x"),
        }
    }

    #[tokio::test]
    async fn test_ids_start_at_one_and_increase() {
        let registry = SubscriptionRegistry::new();

        let first = registry.subscribe("foo.*", |_| {}).await.unwrap();
        let second = registry.subscribe("bar", |_| {}).await.unwrap();

        assert_eq!(first.to_string(), "1");
        assert_eq!(second.to_string(), "2");
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_invalid_pattern_rejected() {
        let registry = SubscriptionRegistry::new();

        let result = registry.subscribe("a..b", |_| {}).await;
        assert_eq!(result, Err(RegistryError::InvalidPattern("a..b".into())));
        assert!(registry.is_empty().await);

        // Rejected pattern does not burn an id
        let id = registry.subscribe("a.b", |_| {}).await.unwrap();
        assert_eq!(id.get(), 1);
    }

    #[tokio::test]
    async fn test_lookup_and_deliver() {
        let registry = SubscriptionRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        let id = registry
            .subscribe("foo.>", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await
            .unwrap();

        let subscription = registry.lookup(id).await.unwrap();
        assert_eq!(subscription.pattern, "foo.>");
        subscription.deliver(&message("1"));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let registry = SubscriptionRegistry::new();
        let id = registry.subscribe("foo", |_| {}).await.unwrap();

        let removed = registry.unsubscribe(id).await.unwrap();
        assert_eq!(removed.id, id);
        assert!(registry.lookup(id).await.is_none());

        let again = registry.unsubscribe(id).await;
        assert!(matches!(again, Err(RegistryError::SubscriptionNotFound(_))));
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_unsubscribe() {
        let registry = SubscriptionRegistry::new();
        let first = registry.subscribe("foo", |_| {}).await.unwrap();
        registry.unsubscribe(first).await.unwrap();

        let second = registry.subscribe("foo", |_| {}).await.unwrap();
        assert_eq!(second.get(), 2);
    }
}

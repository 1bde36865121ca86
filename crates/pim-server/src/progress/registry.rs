//! Job subscriber registry
//!
//! Maps job ids to the live observer handles of that job. Built once at
//! startup and injected into router state; lives for the process lifetime.

use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use super::message::ProgressMessage;

/// One observer's end of the progress channel
pub struct ProgressSubscription {
    pub id: Uuid,
    pub receiver: mpsc::UnboundedReceiver<ProgressMessage>,
}

/// Per-job publish/subscribe registry
///
/// Subscriber sets mutate concurrently with publishes; `publish` iterates
/// over a snapshot taken under the read lock, never the live set.
#[derive(Default)]
pub struct ProgressRegistry {
    jobs: RwLock<HashMap<String, HashMap<Uuid, mpsc::UnboundedSender<ProgressMessage>>>>,
}

impl ProgressRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new observer for `job_id`, creating the job's subscriber
    /// set if this is its first observer.
    pub async fn subscribe(&self, job_id: &str) -> ProgressSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();

        let mut jobs = self.jobs.write().await;
        jobs.entry(job_id.to_string()).or_default().insert(id, tx);

        tracing::debug!(job_id = %job_id, subscriber = %id, "progress subscriber added");

        ProgressSubscription { id, receiver: rx }
    }

    /// Remove an observer; the job's entry is dropped once its set empties.
    pub async fn unsubscribe(&self, job_id: &str, id: Uuid) {
        let mut jobs = self.jobs.write().await;
        if let Some(subscribers) = jobs.get_mut(job_id) {
            subscribers.remove(&id);
            if subscribers.is_empty() {
                jobs.remove(job_id);
            }
        }
        tracing::debug!(job_id = %job_id, subscriber = %id, "progress subscriber removed");
    }

    /// Deliver `message` to every observer currently subscribed to `job_id`.
    ///
    /// A handle whose channel has closed is pruned as a side effect; its
    /// failure never aborts delivery to the remaining handles. Publishing to
    /// a job with no subscribers is a silent no-op — messages are not
    /// buffered for late subscribers.
    pub async fn publish(&self, job_id: &str, message: ProgressMessage) {
        let snapshot: Vec<(Uuid, mpsc::UnboundedSender<ProgressMessage>)> = {
            let jobs = self.jobs.read().await;
            match jobs.get(job_id) {
                Some(subscribers) => subscribers
                    .iter()
                    .map(|(id, tx)| (*id, tx.clone()))
                    .collect(),
                None => return,
            }
        };

        let mut dead = Vec::new();
        for (id, tx) in snapshot {
            if tx.send(message.clone()).is_err() {
                dead.push(id);
            }
        }

        if !dead.is_empty() {
            let mut jobs = self.jobs.write().await;
            if let Some(subscribers) = jobs.get_mut(job_id) {
                for id in &dead {
                    subscribers.remove(id);
                    tracing::debug!(job_id = %job_id, subscriber = %id, "pruned dead progress subscriber");
                }
                if subscribers.is_empty() {
                    jobs.remove(job_id);
                }
            }
        }
    }

    /// Number of live subscribers for `job_id`
    pub async fn subscriber_count(&self, job_id: &str) -> usize {
        self.jobs
            .read()
            .await
            .get(job_id)
            .map_or(0, |subscribers| subscribers.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_all_job_subscribers() {
        let registry = ProgressRegistry::new();
        let mut a = registry.subscribe("job-1").await;
        let mut b = registry.subscribe("job-1").await;

        registry.publish("job-1", ProgressMessage::log("started")).await;

        assert_eq!(a.receiver.recv().await, Some(ProgressMessage::log("started")));
        assert_eq!(b.receiver.recv().await, Some(ProgressMessage::log("started")));
    }

    #[tokio::test]
    async fn test_publish_is_scoped_to_job_id() {
        let registry = ProgressRegistry::new();
        let mut one = registry.subscribe("job-1").await;
        let mut other = registry.subscribe("job-2").await;

        registry.publish("job-1", ProgressMessage::log("hello")).await;

        assert_eq!(one.receiver.recv().await, Some(ProgressMessage::log("hello")));
        assert!(other.receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let registry = ProgressRegistry::new();
        registry.publish("job-1", ProgressMessage::log("nobody home")).await;

        // A subscriber arriving afterwards never sees earlier messages.
        let mut late = registry.subscribe("job-1").await;
        assert!(late.receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dead_handle_is_pruned() {
        let registry = ProgressRegistry::new();
        let sub = registry.subscribe("job-1").await;
        let mut alive = registry.subscribe("job-1").await;
        assert_eq!(registry.subscriber_count("job-1").await, 2);

        drop(sub.receiver);
        registry.publish("job-1", ProgressMessage::log("first")).await;

        // The closed handle is gone; the live one still receives.
        assert_eq!(registry.subscriber_count("job-1").await, 1);
        assert_eq!(alive.receiver.recv().await, Some(ProgressMessage::log("first")));

        registry.publish("job-1", ProgressMessage::log("second")).await;
        assert_eq!(alive.receiver.recv().await, Some(ProgressMessage::log("second")));
    }

    #[tokio::test]
    async fn test_unsubscribe_drops_empty_job_entry() {
        let registry = ProgressRegistry::new();
        let sub = registry.subscribe("job-1").await;
        registry.unsubscribe("job-1", sub.id).await;

        assert_eq!(registry.subscriber_count("job-1").await, 0);
        assert!(registry.jobs.read().await.get("job-1").is_none());
    }
}

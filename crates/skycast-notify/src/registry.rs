//! In-memory collection of active notifications.
//!
//! Latest analysis wins: each successful engine run hands its whole batch
//! to [`NotificationRegistry::replace`], discarding the previous one.
//! Dismissal state therefore spans a single data generation.
//!
//! The registry is mutated only from the single control-flow thread that
//! handles UI and timer events; the API is plain `&mut self`.

use crate::types::Notification;

#[derive(Debug, Default)]
pub struct NotificationRegistry {
    items: Vec<Notification>,
}

impl NotificationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current set with a fresh batch.
    pub fn replace(&mut self, batch: Vec<Notification>) {
        self.items = batch;
    }

    /// Non-dismissed notifications, in insertion order.
    pub fn active(&self) -> Vec<&Notification> {
        self.items.iter().filter(|n| !n.dismissed).collect()
    }

    /// Number of non-dismissed notifications.
    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|n| !n.dismissed).count()
    }

    /// Total stored notifications, dismissed included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Mark one notification dismissed. Unknown ids are ignored.
    pub fn dismiss(&mut self, id: &str) {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(item) => item.dismissed = true,
            None => tracing::debug!("Dismiss for unknown notification id {id}"),
        }
    }

    /// Mark every notification dismissed.
    pub fn dismiss_all(&mut self) {
        for item in &mut self.items {
            item.dismissed = true;
        }
    }
}

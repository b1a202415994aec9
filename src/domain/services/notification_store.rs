//! In-memory notification list with its derived unread counter.
//!
//! Every operation keeps `unread_count == items.iter().filter(|n| !n.read).count()`
//! on return. The list is newest-first by arrival: pushed records are
//! prepended regardless of their `created_at`.

use crate::domain::entities::{Notification, NotificationId};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct NotificationStore {
    items: Vec<Notification>,
    unread_count: usize,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards the current state and adopts the server snapshot.
    ///
    /// Later duplicates of an id are dropped so the list never holds the same
    /// notification twice.
    pub fn replace_snapshot(&mut self, records: Vec<Notification>) {
        let mut seen = HashSet::with_capacity(records.len());
        self.items = records
            .into_iter()
            .filter(|n| seen.insert(n.id.clone()))
            .collect();
        self.unread_count = self.items.iter().filter(|n| n.is_unread()).count();
    }

    /// Prepends a pushed record. Returns `false` for a duplicate id, which is
    /// left untouched.
    pub fn ingest(&mut self, record: Notification) -> bool {
        if self.contains(&record.id) {
            return false;
        }
        if record.is_unread() {
            self.unread_count += 1;
        }
        self.items.insert(0, record);
        true
    }

    /// Returns `true` if the record existed and was unread.
    pub fn mark_read(&mut self, id: &NotificationId) -> bool {
        match self.items.iter_mut().find(|n| &n.id == id) {
            Some(notification) if notification.is_unread() => {
                notification.mark_as_read();
                self.unread_count = self.unread_count.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    pub fn delete_notification(&mut self, id: &NotificationId) -> Option<Notification> {
        let position = self.items.iter().position(|n| &n.id == id)?;
        let removed = self.items.remove(position);
        if removed.is_unread() {
            self.unread_count = self.unread_count.saturating_sub(1);
        }
        Some(removed)
    }

    /// Marks everything read and returns the ids that changed.
    pub fn mark_all_read(&mut self) -> Vec<NotificationId> {
        let mut changed = Vec::with_capacity(self.unread_count);
        for notification in self.items.iter_mut().filter(|n| n.is_unread()) {
            notification.mark_as_read();
            changed.push(notification.id.clone());
        }
        self.unread_count = 0;
        changed
    }

    pub fn clear(&mut self) {
        self.replace_snapshot(Vec::new());
    }

    pub fn contains(&self, id: &NotificationId) -> bool {
        self.items.iter().any(|n| &n.id == id)
    }

    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.items.iter().find(|n| &n.id == id)
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn ids(&self) -> impl Iterator<Item = &NotificationId> {
        self.items.iter().map(|n| &n.id)
    }

    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

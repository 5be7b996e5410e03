//! Notification queue: the prepend-newest activity feed.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{CommentEvent, Notification};
use crate::storage::{slots, SlotStore};

const SLOT: &str = slots::NOTIFICATIONS;

#[derive(Debug, Default, Serialize, Deserialize)]
struct NotificationsState {
    notifications: Vec<Notification>,
}

/// Notification service. Entries are only ever created from comment
/// events the handlers pass along.
pub struct NotificationStore {
    state: RwLock<NotificationsState>,
    slots: SlotStore,
}

impl NotificationStore {
    pub async fn open(store: SlotStore) -> Result<Self, AppError> {
        let state: NotificationsState = store.read_slot_or_default(SLOT).await?;
        Ok(Self {
            state: RwLock::new(state),
            slots: store,
        })
    }

    /// Turn a comment event into an unread entry at the head of the queue.
    pub async fn record(&self, event: &CommentEvent) -> Result<Notification, AppError> {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            kind: event.kind,
            comment_id: event.comment_id.clone(),
            from_user: event.from_user.clone(),
            to_user: event.to_user.clone(),
            message: event.message(),
            read: false,
            timestamp: Utc::now().to_rfc3339(),
        };
        let mut state = self.state.write().await;
        state.notifications.insert(0, notification.clone());
        self.persist(&state).await?;
        Ok(notification)
    }

    /// Mark one entry read. Missing ids are silent no-ops.
    pub async fn mark_read(&self, id: &str) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let Some(notification) = state.notifications.iter_mut().find(|n| n.id == id) else {
            return Ok(false);
        };
        if notification.read {
            return Ok(true);
        }
        notification.read = true;
        self.persist(&state).await?;
        Ok(true)
    }

    /// Empty the whole queue, for every user at once.
    pub async fn clear_all(&self) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.notifications.clear();
        self.persist(&state).await
    }

    pub async fn unread_count_for(&self, email: &str) -> usize {
        self.state
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| n.to_user == email && !n.read)
            .count()
    }

    /// A user's notifications, newest first.
    pub async fn list_for(&self, email: &str) -> Vec<Notification> {
        let mut list: Vec<Notification> = self
            .state
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| n.to_user == email)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        list
    }

    async fn persist(&self, state: &NotificationsState) -> Result<(), AppError> {
        self.slots.write_slot(SLOT, state).await
    }
}

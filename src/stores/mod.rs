//! Store service objects.
//!
//! Each store owns its in-memory state behind a `tokio::sync::RwLock` and
//! persists a whole-state snapshot through [`crate::storage::SlotStore`]
//! while still holding the write lock, so snapshots always land in
//! mutation order.

mod comments;
mod content;
mod favorites;
mod identity;
mod notifications;
mod reports;

pub use comments::CommentStore;
pub use content::ContentStore;
pub use favorites::FavoriteStore;
pub use identity::IdentityStore;
pub use notifications::NotificationStore;
pub use reports::ReportStore;

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Millisecond sequencer behind every time-derived id. Ids never repeat
/// and never go backwards, even for mutations inside one millisecond.
#[derive(Debug, Default)]
pub struct MillisSequencer {
    last: AtomicI64,
}

impl MillisSequencer {
    pub fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    pub fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let prev = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(prev + 1)
    }
}

//! Favorite index: which posts each identity has starred.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::storage::{slots, SlotStore};

const SLOT: &str = slots::FAVORITES;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FavoritesState {
    /// Post ids per identity, in the order they were starred.
    favorites_by_user: BTreeMap<String, Vec<i64>>,
}

/// Favorite service. Pure toggle semantics per identity.
pub struct FavoriteStore {
    state: RwLock<FavoritesState>,
    slots: SlotStore,
}

impl FavoriteStore {
    pub async fn open(store: SlotStore) -> Result<Self, AppError> {
        let state: FavoritesState = store.read_slot_or_default(SLOT).await?;
        Ok(Self {
            state: RwLock::new(state),
            slots: store,
        })
    }

    /// Star or unstar a post. Returns whether it is starred afterwards.
    pub async fn toggle(&self, email: &str, post_id: i64) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let list = state.favorites_by_user.entry(email.to_string()).or_default();
        let now_favorited = match list.iter().position(|id| *id == post_id) {
            Some(pos) => {
                list.remove(pos);
                false
            }
            None => {
                list.push(post_id);
                true
            }
        };
        self.persist(&state).await?;
        Ok(now_favorited)
    }

    pub async fn favorites_for(&self, email: &str) -> Vec<i64> {
        self.state
            .read()
            .await
            .favorites_by_user
            .get(email)
            .cloned()
            .unwrap_or_default()
    }

    async fn persist(&self, state: &FavoritesState) -> Result<(), AppError> {
        self.slots.write_slot(SLOT, state).await
    }
}

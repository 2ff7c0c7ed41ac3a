//! Swipe service
//!
//! Records likes/passes and tells the caller when a like closes a match.

use std::sync::Arc;

use tracing::info;

use crate::errors::{AppError, Result};
use crate::storage::{SeaOrmStorage, Swipe};

/// Result of a swipe
#[derive(Debug, Clone)]
pub struct SwipeOutcome {
    pub swipe: Swipe,
    /// 这次 like 是否与对方构成互相 like
    pub matched: bool,
}

pub struct SwipeService {
    storage: Arc<SeaOrmStorage>,
}

impl SwipeService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn swipe(&self, user_id: i32, target_id: i32, liked: bool) -> Result<SwipeOutcome> {
        if user_id == target_id {
            return Err(AppError::self_swipe("Cannot swipe yourself"));
        }

        if self.storage.find_user(target_id).await?.is_none() {
            return Err(AppError::swipe_target_not_found(format!(
                "User {} not found",
                target_id
            )));
        }

        let swipe = self.storage.upsert_swipe(user_id, target_id, liked).await?;
        let matched = liked && self.storage.has_liked(target_id, user_id).await?;

        if matched {
            info!("SwipeService: match between {} and {}", user_id, target_id);
        }

        Ok(SwipeOutcome { swipe, matched })
    }

    pub async fn list_swipes(&self, user_id: i32) -> Result<Vec<Swipe>> {
        self.storage.list_swipes(user_id).await
    }
}

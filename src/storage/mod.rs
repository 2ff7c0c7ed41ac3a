use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{Needs, NewUser, Role, StoredCredentials, Swipe, User, UserChanges};

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        // 从 URL 自动推断数据库类型
        let storage = SeaOrmStorage::new(config).await?;
        Ok(Arc::new(storage))
    }
}

//! 滑动记录读写与配对查询

use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, sea_query::OnConflict,
};
use tracing::debug;

use super::SeaOrmStorage;
use super::converters::model_to_swipe;
use crate::errors::{AppError, Result};
use crate::storage::models::Swipe;

use migration::entities::swipe;

impl SeaOrmStorage {
    /// 记录一次滑动，(user_id, target_id) 已存在时只更新 liked
    pub async fn upsert_swipe(&self, user_id: i32, target_id: i32, liked: bool) -> Result<Swipe> {
        use sea_orm::ActiveValue::{NotSet, Set};

        let active_model = swipe::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            target_id: Set(target_id),
            liked: Set(liked),
            created_at: Set(chrono::Utc::now()),
        };

        swipe::Entity::insert(active_model)
            .on_conflict(
                OnConflict::columns([swipe::Column::UserId, swipe::Column::TargetId])
                    .update_column(swipe::Column::Liked)
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                AppError::database_operation(format!(
                    "记录滑动 {} -> {} 失败: {}",
                    user_id, target_id, e
                ))
            })?;

        let model = swipe::Entity::find()
            .filter(swipe::Column::UserId.eq(user_id))
            .filter(swipe::Column::TargetId.eq(target_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::database_operation("滑动记录写入后未找到"))?;

        debug!("Swipe {} -> {} (liked={})", user_id, target_id, liked);
        Ok(model_to_swipe(model))
    }

    /// 某用户滑过的所有 target id（like 与 pass 都算）
    pub async fn swiped_target_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        let ids = swipe::Entity::find()
            .select_only()
            .column(swipe::Column::TargetId)
            .filter(swipe::Column::UserId.eq(user_id))
            .into_tuple::<i32>()
            .all(&self.db)
            .await?;
        Ok(ids)
    }

    /// 与 user_id 互相 like 的用户 id
    pub async fn matched_user_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        let liked: Vec<i32> = swipe::Entity::find()
            .select_only()
            .column(swipe::Column::TargetId)
            .filter(swipe::Column::UserId.eq(user_id))
            .filter(swipe::Column::Liked.eq(true))
            .into_tuple::<i32>()
            .all(&self.db)
            .await?;

        if liked.is_empty() {
            return Ok(Vec::new());
        }

        let matched = swipe::Entity::find()
            .select_only()
            .column(swipe::Column::UserId)
            .filter(swipe::Column::TargetId.eq(user_id))
            .filter(swipe::Column::Liked.eq(true))
            .filter(swipe::Column::UserId.is_in(liked))
            .into_tuple::<i32>()
            .all(&self.db)
            .await?;
        Ok(matched)
    }

    pub async fn has_liked(&self, from: i32, to: i32) -> Result<bool> {
        let found = swipe::Entity::find()
            .filter(swipe::Column::UserId.eq(from))
            .filter(swipe::Column::TargetId.eq(to))
            .filter(swipe::Column::Liked.eq(true))
            .one(&self.db)
            .await?;
        Ok(found.is_some())
    }

    pub async fn list_swipes(&self, user_id: i32) -> Result<Vec<Swipe>> {
        let models = swipe::Entity::find()
            .filter(swipe::Column::UserId.eq(user_id))
            .order_by_asc(swipe::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_swipe).collect())
    }
}

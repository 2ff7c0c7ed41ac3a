//! 用户表读写

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    SqlErr, TransactionTrait,
};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{changes_to_active_model, model_to_user, new_user_to_active_model};
use crate::errors::{AppError, Result};
use crate::storage::models::{Needs, NewUser, Role, StoredCredentials, User, UserChanges};

use migration::entities::{swipe, user};

/// 唯一约束冲突单独映射成 UserAlreadyExists
fn map_write_err(e: sea_orm::DbErr, action: &str) -> AppError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
        return AppError::user_already_exists("User already exist");
    }
    AppError::database_operation(format!("{}失败: {}", action, e))
}

impl SeaOrmStorage {
    pub async fn insert_user(&self, new_user: NewUser) -> Result<User> {
        let email = new_user.email.clone();
        let model = new_user_to_active_model(new_user)
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, "创建用户"))?;

        info!("User created: {} (id {})", email, model.id);
        Ok(model_to_user(model))
    }

    pub async fn find_user(&self, id: i32) -> Result<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_user))
    }

    pub async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(model.map(|m| {
            let password_hash = m.password.clone();
            StoredCredentials {
                user: model_to_user(m),
                password_hash,
            }
        }))
    }

    /// 邮箱是否已被占用（可排除某个用户自身）
    pub async fn email_taken(&self, email: &str, except: Option<i32>) -> Result<bool> {
        let mut query = user::Entity::find().filter(user::Column::Email.eq(email));
        if let Some(id) = except {
            query = query.filter(user::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_user).collect())
    }

    pub async fn list_users_by_ids(&self, ids: &[i32]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = user::Entity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_user).collect())
    }

    /// 候选人：非管理员、不在 exclude 中、needs 匹配
    pub async fn find_candidates(&self, exclude: &[i32], needs: Needs) -> Result<Vec<User>> {
        let mut query = user::Entity::find()
            .filter(user::Column::Role.ne(Role::Admin.as_ref()))
            .filter(user::Column::Needs.eq(needs.as_ref()));

        if !exclude.is_empty() {
            query = query.filter(user::Column::Id.is_not_in(exclude.iter().copied()));
        }

        let models = query.order_by_asc(user::Column::Id).all(&self.db).await?;
        debug!(
            "Candidate query (needs={}, excluded={}) returned {} rows",
            needs.as_ref(),
            exclude.len(),
            models.len()
        );
        Ok(models.into_iter().map(model_to_user).collect())
    }

    /// 部分更新，返回受影响行数
    pub async fn update_user(&self, id: i32, changes: UserChanges) -> Result<u64> {
        if changes.is_empty() {
            return Err(AppError::validation("没有需要更新的字段"));
        }

        let result = user::Entity::update_many()
            .set(changes_to_active_model(changes))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| map_write_err(e, "更新用户"))?;

        debug!("User {} updated, {} rows affected", id, result.rows_affected);
        Ok(result.rows_affected)
    }

    /// 删除用户及其发出和收到的所有滑动记录
    pub async fn delete_user(&self, id: i32) -> Result<u64> {
        let txn = self.db.begin().await?;

        swipe::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(swipe::Column::UserId.eq(id))
                    .add(swipe::Column::TargetId.eq(id)),
            )
            .exec(&txn)
            .await?;

        let result = user::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        if result.rows_affected > 0 {
            info!("User deleted: {}", id);
        }
        Ok(result.rows_affected)
    }

    /// 两份材料都已上传但尚未认证的用户
    pub async fn list_pending_verifications(&self) -> Result<Vec<User>> {
        let models = user::Entity::find()
            .filter(user::Column::CarteId.is_not_null())
            .filter(user::Column::CertificatScolaire.is_not_null())
            .filter(user::Column::Verified.eq(false))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_user).collect())
    }

    /// 除 `owner` 以外是否还有用户引用这张头像
    pub async fn picture_referenced_by_others(&self, picture: &str, owner: i32) -> Result<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Picture.eq(picture))
            .filter(user::Column::Id.ne(owner))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn count_users(&self) -> Result<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }
}

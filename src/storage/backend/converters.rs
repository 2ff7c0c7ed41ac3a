use sea_orm::ActiveValue::{NotSet, Set};
use tracing::warn;

use crate::storage::models::{Needs, NewUser, Role, Swipe, User, UserChanges};
use migration::entities::{swipe, user};

/// 数据库中的角色字符串 -> Role，未知值按 Customer 处理
fn parse_role(raw: &str) -> Role {
    raw.parse().unwrap_or_else(|_| {
        warn!("Unknown role '{}' in users table, treating as customer", raw);
        Role::Customer
    })
}

fn parse_needs(raw: &str) -> Needs {
    raw.parse().unwrap_or_default()
}

/// 将 Sea-ORM Model 转换为 User（丢弃密码哈希）
pub fn model_to_user(model: user::Model) -> User {
    User {
        id: model.id,
        role: parse_role(&model.role),
        needs: parse_needs(&model.needs),
        name: model.name,
        surname: model.surname,
        email: model.email,
        picture: model.picture,
        description: model.description,
        carte_id: model.carte_id,
        certificat_scolaire: model.certificat_scolaire,
        verified: model.verified,
        created_at: model.created_at,
    }
}

pub fn new_user_to_active_model(new_user: NewUser) -> user::ActiveModel {
    user::ActiveModel {
        id: NotSet,
        name: Set(new_user.name),
        surname: Set(new_user.surname),
        email: Set(new_user.email),
        password: Set(new_user.password_hash),
        role: Set(new_user.role.as_ref().to_string()),
        picture: Set(new_user.picture),
        description: Set(new_user.description),
        needs: Set(new_user.needs.as_ref().to_string()),
        carte_id: Set(None),
        certificat_scolaire: Set(None),
        verified: Set(new_user.verified),
        created_at: Set(chrono::Utc::now()),
    }
}

/// 只把 Some 字段标记为 Set，其余保持 NotSet（配合 update_many 使用）
pub fn changes_to_active_model(changes: UserChanges) -> user::ActiveModel {
    fn opt<T: Into<sea_orm::Value>>(v: Option<T>) -> sea_orm::ActiveValue<T> {
        match v {
            Some(v) => Set(v),
            None => NotSet,
        }
    }

    user::ActiveModel {
        id: NotSet,
        name: opt(changes.name),
        surname: opt(changes.surname),
        email: opt(changes.email),
        password: opt(changes.password_hash),
        role: NotSet,
        picture: opt(changes.picture),
        description: opt(changes.description.map(Some)),
        needs: opt(changes.needs.map(|n| n.as_ref().to_string())),
        carte_id: opt(changes.carte_id.map(Some)),
        certificat_scolaire: opt(changes.certificat_scolaire.map(Some)),
        verified: opt(changes.verified),
        created_at: NotSet,
    }
}

pub fn model_to_swipe(model: swipe::Model) -> Swipe {
    Swipe {
        id: model.id,
        user_id: model.user_id,
        target_id: model.target_id,
        liked: model.liked,
        created_at: model.created_at,
    }
}

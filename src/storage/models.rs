use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// 用户角色
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumIter, AsRefStr,
    EnumString,
)]
pub enum Role {
    #[serde(rename = "A")]
    #[strum(serialize = "A")]
    Admin,
    #[default]
    #[serde(rename = "C")]
    #[strum(serialize = "C")]
    Customer,
}

/// 三值配对需求
///
/// H 与 T 互补，D 只和 D 配对。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumIter, AsRefStr,
    EnumString,
)]
pub enum Needs {
    #[serde(rename = "H")]
    #[strum(serialize = "H")]
    Host,
    #[serde(rename = "T")]
    #[strum(serialize = "T")]
    Tenant,
    #[default]
    #[serde(rename = "D")]
    #[strum(serialize = "D")]
    Duo,
}

impl Needs {
    /// The needs value a user with `self` should be shown.
    pub fn complement(self) -> Needs {
        match self {
            Needs::Host => Needs::Tenant,
            Needs::Tenant => Needs::Host,
            Needs::Duo => Needs::Duo,
        }
    }

    /// Candidate filter from the raw `needs` request header.
    ///
    /// Missing or unknown values fall back to `D`.
    pub fn wanted_for(raw: Option<&str>) -> Needs {
        raw.and_then(|s| s.trim().parse::<Needs>().ok())
            .unwrap_or(Needs::Duo)
            .complement()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub role: Role,
    pub picture: String,
    pub description: Option<String>,
    pub needs: Needs,
    pub carte_id: Option<String>,
    pub certificat_scolaire: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// 登录时使用：用户 + 密码哈希
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: String,
}

/// 新建用户（密码已哈希）
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub picture: String,
    pub description: Option<String>,
    pub needs: Needs,
    pub verified: bool,
}

/// 部分更新，None 表示不修改
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub picture: Option<String>,
    pub description: Option<String>,
    pub needs: Option<Needs>,
    pub carte_id: Option<String>,
    pub certificat_scolaire: Option<String>,
    pub verified: Option<bool>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.surname.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.picture.is_none()
            && self.description.is_none()
            && self.needs.is_none()
            && self.carte_id.is_none()
            && self.certificat_scolaire.is_none()
            && self.verified.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swipe {
    pub id: i32,
    pub user_id: i32,
    pub target_id: i32,
    pub liked: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_complement() {
        assert_eq!(Needs::Host.complement(), Needs::Tenant);
        assert_eq!(Needs::Tenant.complement(), Needs::Host);
        assert_eq!(Needs::Duo.complement(), Needs::Duo);
    }

    #[test]
    fn test_wanted_for_header() {
        assert_eq!(Needs::wanted_for(Some("H")), Needs::Tenant);
        assert_eq!(Needs::wanted_for(Some("T")), Needs::Host);
        assert_eq!(Needs::wanted_for(Some("D")), Needs::Duo);
        assert_eq!(Needs::wanted_for(Some("x")), Needs::Duo);
        assert_eq!(Needs::wanted_for(None), Needs::Duo);
    }

    #[test]
    fn test_role_codes() {
        assert_eq!(Role::Admin.as_ref(), "A");
        assert_eq!("C".parse::<Role>().ok(), Some(Role::Customer));
        assert!("Z".parse::<Role>().is_err());
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"A\"");
    }

    #[test]
    fn test_user_changes_is_empty() {
        assert!(UserChanges::default().is_empty());
        let changes = UserChanges {
            verified: Some(true),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}

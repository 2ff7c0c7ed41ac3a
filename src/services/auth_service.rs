//! Sign-in and session lookup

use std::sync::Arc;

use tracing::info;

use crate::api::jwt::JwtService;
use crate::errors::{AppError, Result};
use crate::services::UserService;
use crate::storage::User;
use crate::utils::credentials::parse_basic;

/// Result of a successful sign-in
#[derive(Debug, Clone)]
pub struct SignInResult {
    pub access_token: String,
    pub expires_in: String,
    pub user: User,
}

pub struct AuthService {
    users: Arc<UserService>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(users: Arc<UserService>, jwt: Arc<JwtService>) -> Self {
        Self { users, jwt }
    }

    /// 解析 `Basic <base64(email:password)>` 并签发 access token
    pub async fn sign_in(&self, credential: Option<&str>) -> Result<SignInResult> {
        let raw = credential
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| AppError::missing_credential("Invalid or missing Basic credential"))?;
        let creds = parse_basic(raw)?;

        let user = self.users.authenticate(&creds.email, &creds.password).await?;
        let access_token = self.jwt.generate_access_token(&user)?;

        info!("User {} signed in (id {})", user.email, user.id);
        Ok(SignInResult {
            access_token,
            expires_in: self.jwt.expires_in(),
            user,
        })
    }

    /// 当前 token 对应的用户
    pub async fn session(&self, user_id: i32) -> Result<User> {
        self.users.get_user(user_id).await
    }
}

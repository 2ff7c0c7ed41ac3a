//! API 类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::{CreateUserRequest, SignInResult, SwipeOutcome, UpdateUserRequest};
use crate::storage::{Needs, Role, Swipe, User};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

// ============ Auth ============

/// POST /auth/token 的请求体，凭据也可以放在 Authorization 头里
#[derive(Deserialize, Clone, Debug, Default)]
pub struct SignInRequest {
    #[serde(rename = "Authorization", alias = "authorization")]
    pub authorization: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SignInResponse {
    pub grant_type: String,
    pub scope: String,
    pub expires_in: String,
    pub access_token: String,
}

impl From<SignInResult> for SignInResponse {
    fn from(result: SignInResult) -> Self {
        Self {
            grant_type: "password".to_string(),
            scope: "*".to_string(),
            expires_in: result.expires_in,
            access_token: result.access_token,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SessionResponse {
    pub user: UserResponse,
}

// ============ Users ============

/// 用户公开视图（不含密码）
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub role: Role,
    pub picture: String,
    pub description: Option<String>,
    pub needs: Needs,
    pub carte_id: Option<String>,
    #[serde(rename = "certificatScolaire")]
    pub certificat_scolaire: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            surname: user.surname,
            email: user.email,
            role: user.role,
            picture: user.picture,
            description: user.description,
            needs: user.needs,
            carte_id: user.carte_id,
            certificat_scolaire: user.certificat_scolaire,
            verified: user.verified,
            created_at: user.created_at,
        }
    }
}

/// 滑动候选人只暴露展示用字段
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CandidateResponse {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub needs: Needs,
    pub picture: String,
    pub description: Option<String>,
}

impl From<User> for CandidateResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            surname: user.surname,
            needs: user.needs,
            picture: user.picture,
            description: user.description,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct PostNewUser {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub description: Option<String>,
    pub needs: Option<Needs>,
}

impl From<PostNewUser> for CreateUserRequest {
    fn from(body: PostNewUser) -> Self {
        Self {
            name: body.name,
            surname: body.surname,
            email: body.email,
            password: body.password,
            description: body.description,
            needs: body.needs,
            role: Role::Customer,
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct PatchUser {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub description: Option<String>,
    pub needs: Option<Needs>,
    pub picture: Option<String>,
    pub verified: Option<bool>,
}

impl From<PatchUser> for UpdateUserRequest {
    fn from(body: PatchUser) -> Self {
        Self {
            name: body.name,
            surname: body.surname,
            email: body.email,
            password: body.password,
            description: body.description,
            needs: body.needs,
            picture: body.picture,
            verified: body.verified,
        }
    }
}

/// DELETE /users 的请求体
///
/// 客户端附带的 `picture` 字段被忽略，删除时只以数据库里的头像为准。
#[derive(Deserialize, Clone, Debug)]
pub struct DeleteUserBody {
    pub id: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AffectedResponse {
    pub affected: u64,
}

/// GET /users/files 的查询参数
#[derive(Deserialize, Clone, Debug)]
pub struct FileQuery {
    pub bearer: Option<String>,
    pub user_id: i32,
    pub filename: String,
}

// ============ Swipe ============

#[derive(Deserialize, Clone, Debug)]
pub struct PostSwipe {
    pub target_id: i32,
    pub liked: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SwipeResponse {
    pub swipe: Swipe,
    pub matched: bool,
}

impl From<SwipeOutcome> for SwipeResponse {
    fn from(outcome: SwipeOutcome) -> Self {
        Self {
            swipe: outcome.swipe,
            matched: outcome.matched,
        }
    }
}

// ============ Health ============

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    pub latency_ms: Option<u64>,
    pub users_count: Option<u64>,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthGatewayCheck {
    pub connected_users: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthChecks {
    pub storage: HealthStorageCheck,
    pub gateway: HealthGatewayCheck,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub checks: HealthChecks,
    pub response_time_ms: u32,
}

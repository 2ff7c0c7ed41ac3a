//! `/auth` 处理函数

use actix_web::http::header::AUTHORIZATION;
use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::trace;

use crate::api::jwt::Claims;
use crate::services::AuthService;

use super::helpers::api_result;
use super::types::{SessionResponse, SignInRequest, SignInResponse, UserResponse};

/// POST /auth/token
///
/// 凭据优先取 body 里的 `Authorization` 字段，其次取同名请求头。
pub async fn sign_in(
    req: HttpRequest,
    body: Option<web::Json<SignInRequest>>,
    auth: web::Data<Arc<AuthService>>,
) -> ActixResult<impl Responder> {
    trace!("Auth API: sign-in request");

    let from_body = body.and_then(|b| b.into_inner().authorization);
    let credential = from_body.or_else(|| {
        req.headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
    });

    let result = auth.sign_in(credential.as_deref()).await;
    Ok(api_result(result.map(SignInResponse::from)))
}

/// GET /auth/session
pub async fn session(
    claims: web::ReqData<Claims>,
    auth: web::Data<Arc<AuthService>>,
) -> ActixResult<impl Responder> {
    let result = auth.session(claims.id).await.map(|user| SessionResponse {
        user: UserResponse::from(user),
    });
    Ok(api_result(result))
}

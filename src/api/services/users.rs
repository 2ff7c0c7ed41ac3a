//! `/users` 资料与配对相关处理函数

use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace};

use crate::api::jwt::Claims;
use crate::errors::AppError;
use crate::services::{UpdateScope, UserService};

use super::helpers::{api_result, error_from_app};
use super::types::{
    AffectedResponse, CandidateResponse, DeleteUserBody, PatchUser, PostNewUser, UserResponse,
};

fn to_responses<T: From<crate::storage::User>>(users: Vec<crate::storage::User>) -> Vec<T> {
    users.into_iter().map(T::from).collect()
}

/// POST /users
pub async fn create_user(
    body: web::Json<PostNewUser>,
    users: web::Data<Arc<UserService>>,
) -> ActixResult<impl Responder> {
    trace!("Users API: create {}", body.email);
    let result = users.create_user(body.into_inner().into()).await;
    Ok(api_result(result.map(UserResponse::from)))
}

/// GET /users
pub async fn list_users(users: web::Data<Arc<UserService>>) -> ActixResult<impl Responder> {
    let result = users.list_users().await;
    Ok(api_result(result.map(to_responses::<UserResponse>)))
}

/// GET /users/swipe
///
/// `needs` 请求头给出调用者自己的需求，返回互补的候选人。
pub async fn list_candidates(
    req: HttpRequest,
    claims: web::ReqData<Claims>,
    users: web::Data<Arc<UserService>>,
) -> ActixResult<impl Responder> {
    let needs = req.headers().get("needs").and_then(|h| h.to_str().ok());
    let result = users.candidates(claims.id, needs).await;
    Ok(api_result(result.map(to_responses::<CandidateResponse>)))
}

/// GET /users/match
pub async fn list_matches(
    claims: web::ReqData<Claims>,
    users: web::Data<Arc<UserService>>,
) -> ActixResult<impl Responder> {
    let result = users.matches(claims.id).await;
    Ok(api_result(result.map(to_responses::<UserResponse>)))
}

/// PATCH /users/{id}，只能修改自己
pub async fn update_own_profile(
    path: web::Path<i32>,
    claims: web::ReqData<Claims>,
    body: web::Json<PatchUser>,
    users: web::Data<Arc<UserService>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    if id != claims.id {
        info!("User {} tried to update user {}", claims.id, id);
        return Ok(error_from_app(&AppError::unauthorized("Unauthorized")));
    }

    let result = users
        .update_user(id, body.into_inner().into(), UpdateScope::OwnProfile)
        .await;
    Ok(api_result(result.map(|affected| AffectedResponse { affected })))
}

/// PATCH /users/verified/{id}
pub async fn update_as_admin(
    path: web::Path<i32>,
    body: web::Json<PatchUser>,
    users: web::Data<Arc<UserService>>,
) -> ActixResult<impl Responder> {
    let result = users
        .update_user(path.into_inner(), body.into_inner().into(), UpdateScope::Admin)
        .await;
    Ok(api_result(result.map(|affected| AffectedResponse { affected })))
}

/// DELETE /users
pub async fn delete_user(
    body: web::Json<DeleteUserBody>,
    users: web::Data<Arc<UserService>>,
) -> ActixResult<impl Responder> {
    let result = users.delete_user(body.id).await;
    Ok(api_result(result.map(|affected| AffectedResponse { affected })))
}

/// GET /users/verifications
pub async fn list_pending_verifications(
    users: web::Data<Arc<UserService>>,
) -> ActixResult<impl Responder> {
    let result = users.pending_verifications().await;
    Ok(api_result(result.map(to_responses::<UserResponse>)))
}

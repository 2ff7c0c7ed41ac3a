//! API 路由配置
//!
//! 守卫按路由挂载：同一个 scope 下既有公开接口也有需要登录的接口。

use actix_web::web;

use crate::api::middleware::BearerAuth;

use super::auth::{session, sign_in};
use super::swipe::{list_swipes, post_swipe};
use super::uploads::{download_file, upload_picture, upload_verifications};
use super::users::{
    create_user, delete_user, list_candidates, list_matches, list_pending_verifications,
    list_users, update_as_admin, update_own_profile,
};

/// 认证路由 `/auth`
///
/// - POST /auth/token - 用 Basic 凭据换 access token
/// - GET /auth/session - 当前用户
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route("/token", web::post().to(sign_in))
        .route("/session", web::get().to(session).wrap(BearerAuth::any()))
}

/// 用户路由 `/users`
///
/// 固定路径必须放在 `/{id}` 之前。
pub fn users_routes() -> actix_web::Scope {
    web::scope("/users")
        .route("", web::post().to(create_user))
        .route("", web::get().to(list_users).wrap(BearerAuth::admin()))
        .route("", web::delete().to(delete_user).wrap(BearerAuth::admin()))
        .route("/swipe", web::get().to(list_candidates).wrap(BearerAuth::any()))
        .route("/match", web::get().to(list_matches).wrap(BearerAuth::any()))
        .route("/upload", web::post().to(upload_picture).wrap(BearerAuth::any()))
        .route(
            "/uploadVerifications",
            web::post()
                .to(upload_verifications)
                .wrap(BearerAuth::any().with_verified(false)),
        )
        .route(
            "/verifications",
            web::get()
                .to(list_pending_verifications)
                .wrap(BearerAuth::admin()),
        )
        // token 在 query 里，由 handler 自己校验
        .route("/files", web::get().to(download_file))
        .route(
            "/verified/{id}",
            web::patch().to(update_as_admin).wrap(BearerAuth::admin()),
        )
        .route(
            "/{id}",
            web::patch().to(update_own_profile).wrap(BearerAuth::any()),
        )
}

/// 滑动路由 `/swipe`
pub fn swipe_routes() -> actix_web::Scope {
    web::scope("/swipe")
        .route("", web::post().to(post_swipe).wrap(BearerAuth::any()))
        .route("", web::get().to(list_swipes).wrap(BearerAuth::any()))
}

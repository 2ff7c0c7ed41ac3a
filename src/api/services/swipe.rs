//! `/swipe` 处理函数

use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::trace;

use crate::api::jwt::Claims;
use crate::services::SwipeService;

use super::helpers::api_result;
use super::types::{PostSwipe, SwipeResponse};

/// POST /swipe
pub async fn post_swipe(
    claims: web::ReqData<Claims>,
    body: web::Json<PostSwipe>,
    swipes: web::Data<Arc<SwipeService>>,
) -> ActixResult<impl Responder> {
    trace!(
        "Swipe API: {} -> {} (liked={})",
        claims.id, body.target_id, body.liked
    );
    let result = swipes.swipe(claims.id, body.target_id, body.liked).await;
    Ok(api_result(result.map(SwipeResponse::from)))
}

/// GET /swipe
pub async fn list_swipes(
    claims: web::ReqData<Claims>,
    swipes: web::Data<Arc<SwipeService>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(swipes.list_swipes(claims.id).await))
}

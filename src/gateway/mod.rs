//! WebSocket 消息网关
//!
//! `/ws` 升级前校验 token，通过后为每个 socket 启动一个 session 任务。

use std::sync::Arc;
use std::time::Duration;

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use tracing::{debug, error};

use crate::api::jwt::JwtService;
use crate::api::middleware::{bearer_from_header, strip_bearer};
use crate::api::services::error_from_app;
use crate::config::GatewayConfig;
use crate::errors::AppError;

pub mod messages;
pub mod registry;
mod session;

pub use registry::{ConnectionId, ConnectionRegistry, RelayOutcome};

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub me: Option<i32>,
    pub token: Option<String>,
}

/// 心跳参数
#[derive(Debug, Clone, Copy)]
pub struct GatewaySettings {
    pub heartbeat: Duration,
    pub client_timeout: Duration,
}

impl GatewaySettings {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            heartbeat: Duration::from_secs(config.heartbeat_secs.max(1)),
            client_timeout: Duration::from_secs(config.client_timeout_secs.max(1)),
        }
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            heartbeat: Duration::from_secs(5),
            client_timeout: Duration::from_secs(10),
        }
    }
}

/// token 来自 query（可带 `Bearer ` 前缀）或 Authorization 头
fn authorize(req: &HttpRequest, query: &WsQuery, jwt: &JwtService) -> Result<i32, AppError> {
    let token = query
        .token
        .as_deref()
        .map(strip_bearer)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| bearer_from_header(req.headers()))
        .ok_or_else(|| AppError::unauthorized("Unauthorized: Invalid or missing token"))?;

    let claims = jwt.validate_access_token(&token)?;

    if let Some(me) = query.me
        && me != claims.id
    {
        return Err(AppError::unauthorized("Unauthorized"));
    }

    Ok(claims.id)
}

/// Handle WebSocket upgrade for the `/ws` endpoint
pub async fn ws_entry(
    req: HttpRequest,
    body: web::Payload,
    query: web::Query<WsQuery>,
    jwt: web::Data<Arc<JwtService>>,
    registry: web::Data<Arc<ConnectionRegistry>>,
    settings: web::Data<GatewaySettings>,
) -> actix_web::Result<HttpResponse> {
    let user_id = match authorize(&req, &query, &jwt) {
        Ok(id) => id,
        Err(e) => {
            debug!("WebSocket upgrade refused: {}", e);
            return Ok(error_from_app(&e));
        }
    };

    let (response, session, stream) = actix_ws::handle(&req, body).map_err(|e| {
        error!("WebSocket upgrade failed: {}", e);
        e
    })?;

    let peer = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string();

    let gateway = session::GatewaySession::new(
        user_id,
        registry.get_ref().clone(),
        *settings.get_ref(),
    );
    actix_web::rt::spawn(gateway.run(session, stream, peer));

    Ok(response)
}

/// 注册 `/ws`
pub fn gateway_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/ws", web::get().to(ws_entry));
}

//! Server mode
//!
//! HTTP server startup: CORS, middleware, shared state and routes.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::warn;

use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{
    auth_routes, health_routes, payload_error_handler, swipe_routes, users_routes,
};
use crate::config::{CorsConfig, StaticConfig};
use crate::gateway::gateway_routes;
use crate::runtime::lifetime::{self, startup::StartupContext};

/// Build CORS middleware from configuration
fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");

    let cors = if is_any_origin {
        Cors::default().allow_any_origin()
    } else {
        cors_config
            .allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    let cors = cors
        .allow_any_method()
        .allow_any_header()
        .max_age(cors_config.max_age);

    // any_origin + credentials 会回显 Origin，不开启
    if is_any_origin {
        cors
    } else {
        cors.supports_credentials()
    }
}

fn validate_cors_config(cors_config: &CorsConfig) {
    if cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS allowed_origins is empty. \
            No cross-origin requests will be allowed."
        );
    }
}

/// 注册共享状态和全部路由
///
/// 集成测试用同一个函数组装 App。
pub fn configure_app(cfg: &mut web::ServiceConfig, ctx: &StartupContext) {
    cfg.app_data(web::Data::new(ctx.storage.clone()))
        .app_data(web::Data::new(ctx.files.clone()))
        .app_data(web::Data::new(ctx.jwt.clone()))
        .app_data(web::Data::new(ctx.user_service.clone()))
        .app_data(web::Data::new(ctx.auth_service.clone()))
        .app_data(web::Data::new(ctx.swipe_service.clone()))
        .app_data(web::Data::new(ctx.registry.clone()))
        .app_data(web::Data::new(ctx.gateway))
        .app_data(web::Data::new(ctx.start_time.clone()))
        .app_data(web::JsonConfig::default().error_handler(|err, _| payload_error_handler(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _| payload_error_handler(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _| payload_error_handler(err)))
        .service(auth_routes())
        .service(users_routes())
        .service(swipe_routes())
        .service(health_routes())
        .configure(gateway_routes);
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(config)
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    let storage_for_shutdown = startup.storage.clone();

    let server = HttpServer::new(move || {
        let cors = build_cors_middleware(&cors_config);

        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(cors)
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .configure(|cfg| configure_app(cfg, &startup))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(&bind_address)?.disable_signals().run();
    let handle = server.handle();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::wait_for_signal() => {
            handle.stop(true).await;
        }
    }

    lifetime::shutdown::close_resources(storage_for_shutdown).await;
    warn!("Graceful shutdown: all tasks completed");

    Ok(())
}

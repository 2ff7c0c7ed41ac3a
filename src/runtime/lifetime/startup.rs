use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::jwt::JwtService;
use crate::api::services::AppStartTime;
use crate::config::StaticConfig;
use crate::gateway::{ConnectionRegistry, GatewaySettings};
use crate::services::{AuthService, FileStore, SwipeService, UserService};
use crate::storage::{SeaOrmStorage, StorageFactory};

/// 服务器运行需要的全部共享组件
///
/// 全是 `Arc`，每个 worker clone 一份。
#[derive(Clone)]
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub files: Arc<FileStore>,
    pub jwt: Arc<JwtService>,
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub swipe_service: Arc<SwipeService>,
    pub registry: Arc<ConnectionRegistry>,
    pub gateway: GatewaySettings,
    pub start_time: AppStartTime,
}

impl StartupContext {
    /// 在已有存储上组装服务
    pub async fn build(storage: Arc<SeaOrmStorage>, config: &StaticConfig) -> Result<Self> {
        let files = Arc::new(FileStore::new(&config.uploads));
        files
            .ensure_dirs()
            .await
            .context("Failed to prepare upload directories")?;

        let jwt = Arc::new(JwtService::from_config(&config.auth));
        let user_service = Arc::new(UserService::new(storage.clone(), files.clone()));
        let auth_service = Arc::new(AuthService::new(user_service.clone(), jwt.clone()));
        let swipe_service = Arc::new(SwipeService::new(storage.clone()));
        let registry = Arc::new(ConnectionRegistry::new(config.gateway.outbox_capacity));

        Ok(Self {
            storage,
            files,
            jwt,
            user_service,
            auth_service,
            swipe_service,
            registry,
            gateway: GatewaySettings::from_config(&config.gateway),
            start_time: AppStartTime {
                start_datetime: chrono::Utc::now(),
            },
        })
    }
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let context = StartupContext::build(storage, config).await?;

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(context)
}

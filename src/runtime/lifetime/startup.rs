use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::StaticConfig;
use crate::services::{LinkService, RateLimiter};
use crate::storage::StorageFactory;

pub struct StartupContext {
    pub link_service: Arc<LinkService>,
    pub rate_limiter: Arc<RateLimiter>,
}

/// 创建存储与业务服务（CLI 子命令同样使用）
pub async fn prepare_services(config: &StaticConfig) -> Result<Arc<LinkService>> {
    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    Ok(Arc::new(LinkService::from_config(storage, config)))
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let link_service = prepare_services(config).await?;

    if config.admin_enabled() {
        info!(
            "Admin surface enabled at /translate and /api for user '{}'",
            config.admin.username
        );
    } else {
        warn!("Admin password is empty: /translate and /api are disabled and will answer 404");
    }

    let rate_limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));
    if config.rate_limit.enabled {
        info!(
            "Rate limiting: {} requests per {}s per client",
            config.rate_limit.max_requests, config.rate_limit.window_size_seconds
        );
    } else {
        warn!("Rate limiting is disabled");
    }

    debug!("Pre-startup processing completed in {:?}", start_time.elapsed());

    Ok(StartupContext {
        link_service,
        rate_limiter,
    })
}

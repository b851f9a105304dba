//! Server mode
//!
//! Configures and starts the HTTP server with all routes.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, Condition, DefaultHeaders},
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::configure_routes;
use crate::api::middleware::{AdminCredentials, RateLimit, TimingMiddleware};
use crate::api::services::PublicOrigin;
use crate::config::StaticConfig;
use crate::runtime::lifetime;
use crate::utils::ClientIpResolver;

/// Run the HTTP server until it stops or Ctrl+C is received
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {}", e))?;

    let link_service = startup.link_service.clone();
    let rate_limiter = startup.rate_limiter.clone();
    let rate_limit_enabled = config.rate_limit.enabled;
    let resolver = ClientIpResolver::from_config(&config.rate_limit);
    let credentials = AdminCredentials::from_config(&config.admin);
    let public_origin = PublicOrigin::new(config.server.public_url.as_deref());

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    if rate_limit_enabled
        && config.rate_limit.trusted_proxies.is_empty()
        && let Some(header) = &config.rate_limit.client_ip_header
    {
        warn!(
            "Client IP taken from {} on every connection. \
             Configure rate_limit.trusted_proxies unless all traffic passes through a proxy that sets it.",
            header
        );
    }

    let server = HttpServer::new(move || {
        let link_service = link_service.clone();
        let credentials = credentials.clone();
        let public_origin = public_origin.clone();

        App::new()
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .wrap(Condition::new(
                rate_limit_enabled,
                RateLimit::new(rate_limiter.clone(), resolver.clone()),
            ))
            .wrap(TimingMiddleware) // 最外层，记录请求延迟
            .configure(move |cfg| configure_routes(cfg, link_service, credentials, public_origin))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown complete");
        }
    }

    Ok(())
}

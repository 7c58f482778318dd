//! 服务启动器
//!
//! 提供统一的 HTTP 服务启动模式

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use zipper_config::AppConfig;
use zipper_errors::AppResult;
use zipper_telemetry::init_metrics;

use crate::health::ops_routes;
use crate::runtime::{init_runtime, shutdown_signal};

/// 运行 HTTP 服务
///
/// 1. 加载 `.env` 与配置
/// 2. 初始化运行时（日志）和 Prometheus 记录器
/// 3. 调用 `build_router` 构建业务路由，合并 /health 与 /metrics
/// 4. 启动服务器并处理 graceful shutdown
///
/// # 示例
///
/// ```ignore
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     zipper_bootstrap::run_http("config", |config| Ok(my_routes(config))).await
/// }
/// ```
pub async fn run_http<F>(config_dir: &str, build_router: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&AppConfig) -> AppResult<Router>,
{
    dotenvy::dotenv().ok();

    // 1. 加载配置
    let config = AppConfig::load(config_dir)?;

    // 2. 初始化运行时
    init_runtime(&config);
    let metrics_handle = init_metrics()?;

    info!("Starting {} service", config.app_name);

    // 3. 构建路由
    let app = build_router(&config)?
        .merge(ops_routes(Some(metrics_handle)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // 4. 启动服务器
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service stopped");

    Ok(())
}

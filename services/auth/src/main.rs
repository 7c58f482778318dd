//! Zipper Auth Service

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    zipper_bootstrap::run_http(&config_dir, zipper_auth::app::build_router).await
}

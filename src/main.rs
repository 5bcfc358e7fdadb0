use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;
mod state;
mod view;

use services::object_store::ObjectStore;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config ---
    let cfg = config::AppConfig::from_env_and_args()?;

    tracing::info!(
        "Starting image-host for bucket `{}` in `{}` (dev mode: {})",
        cfg.aws_bucket,
        cfg.aws_region,
        cfg.dev_mode
    );

    // --- Connect the bucket handle ---
    let store: Arc<dyn ObjectStore> = Arc::new(services::s3_store::S3Store::new(&cfg)?);

    // --- Parse the listing template once ---
    let template = view::IndexTemplate::load(view::TEMPLATE_FILE)?;

    // --- Build router ---
    let app_state = state::AppState::new(store, cfg.auth_key.clone(), template);
    let app: Router = routes::routes::routes().with_state(app_state);

    // --- Start server ---
    let addr = cfg.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

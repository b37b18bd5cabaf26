use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod codec;
mod config;
mod error;
mod routes;
mod services;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = config::Config::from_env_and_args()?;
    tracing::info!(
        env = %cfg.app_env,
        bucket = %cfg.s3_bucket_name,
        "starting video-vault"
    );

    let blob_store = services::s3::S3BlobStore::new(&cfg).await;
    let store = services::videos::VideoStore::new(Arc::new(blob_store));

    let app = routes::create_routes(store);

    let listener = tokio::net::TcpListener::bind(cfg.addr()).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

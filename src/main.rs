use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Khai báo các module con
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod services;
#[cfg(test)]
mod test_support;

use config::Config;
use services::image_cache::ImageCache;

// Trạng thái dùng chung cho mọi handler
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub http: reqwest::Client,
    pub image_cache: ImageCache,
}

#[tokio::main]
async fn main() {
    // 1. Nạp biến môi trường từ .env (trước khi khởi tạo log để RUST_LOG có hiệu lực)
    dotenv().ok();

    // 2. Khởi tạo hệ thống log
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    // 3. Khởi tạo connection pool, tạo một lần và dùng lại suốt vòng đời process
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to create database connection pool");

    // 4. HTTP client dùng chung cho Unsplash, Gemini và Supabase
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .expect("Failed to build HTTP client");

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("HOST/PORT must form a valid socket address");

    let shared_state = Arc::new(AppState {
        db: pool,
        config,
        http,
        image_cache: ImageCache::default(),
    });

    // 5. Xây dựng router
    let app = routes::build_router(shared_state);

    // 6. Khởi động server
    tracing::info!("🚀 Server started at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        tracing::info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

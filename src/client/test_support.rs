//! Real HTTP server for client tests

use tokio::net::TcpListener;

use crate::api::{build_router, build_state};
use crate::config::AuthConfig;
use crate::db::{create_test_pool, migrations};

pub(crate) struct TestApi {
    pub base_url: String,
    _static_dir: tempfile::TempDir,
}

/// Serve a fresh in-memory API on an ephemeral port
pub(crate) async fn spawn_server() -> TestApi {
    let pool = create_test_pool().await.expect("Failed to create pool");
    migrations::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let static_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let state = build_state(pool, &AuthConfig::default(), static_dir.path().to_path_buf());
    let router = build_router(state, "*");

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    TestApi {
        base_url: format!("http://{}", addr),
        _static_dir: static_dir,
    }
}

/// Base URL of a port nothing listens on
pub(crate) async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    drop(listener);
    format!("http://{}", addr)
}

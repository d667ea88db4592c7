//! Frontend serving with single-page-app fallback
//!
//! Files are read from the configured static directory. Any path that is not
//! a file falls back to `index.html` so client-side routing works. Unknown
//! `/api/*` paths get a JSON 404 instead.

use axum::{
    extract::{OriginalUri, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::api::middleware::{ApiError, AppState};

/// Fallback handler for every route not matched by the API
pub async fn serve_static(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let raw_path = uri.path();
    let decoded = urlencoding::decode(raw_path).unwrap_or_else(|_| raw_path.into());
    let path = decoded.as_ref();

    if path == "/api" || path.starts_with("/api/") {
        return ApiError::not_found(format!("No API route for {}", path)).into_response();
    }

    let asset_path = path.trim_start_matches('/');
    if let Some(file) = resolve_asset(&state.static_dir, asset_path) {
        if let Ok(contents) = fs::read(&file).await {
            return build_response(asset_path, contents);
        }
    }

    match fs::read(state.static_dir.join("index.html")).await {
        Ok(contents) => build_response("index.html", contents),
        Err(_) => not_found(),
    }
}

/// Map a request path to a file under `root`, rejecting anything that could
/// escape it.
fn resolve_asset(root: &Path, asset_path: &str) -> Option<PathBuf> {
    if asset_path.is_empty() {
        return None;
    }

    let relative = Path::new(asset_path);
    if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
        return None;
    }

    Some(root.join(relative))
}

fn build_response(path: &str, data: Vec<u8>) -> Response {
    let content_type = get_content_type(path);
    let cache_control = if content_type.starts_with("text/html") {
        "no-cache"
    } else {
        "public, max-age=3600"
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, cache_control),
        ],
        data,
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        "<html><body><h1>404 Not Found</h1></body></html>",
    )
        .into_response()
}

fn get_content_type(path: &str) -> &'static str {
    match path.rsplit('.').next().unwrap_or("") {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "webp" => "image/webp",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

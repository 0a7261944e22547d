//! Embedded page assets and the optional logo.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

use crate::web::error::WebError;
use crate::web::state::WebAppState;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct PageAssets;

fn asset_response(path: &str) -> Option<Response> {
    let asset = PageAssets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Some(
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, mime.as_ref().to_string())],
            Body::from(asset.data.into_owned()),
        )
            .into_response(),
    )
}

/// Serve the form page.
pub async fn serve_index() -> Result<Response, WebError> {
    asset_response("index.html")
        .ok_or_else(|| WebError::Internal("index.html missing from embedded assets".to_string()))
}

/// Serve a file from the embedded assets folder.
pub async fn serve_static_file(Path(path): Path<String>) -> Result<Response, WebError> {
    asset_response(&path).ok_or(WebError::NotFound(path))
}

/// Serve the configured logo, or 404 when there is none.
pub async fn serve_logo(State(state): State<WebAppState>) -> Result<Response, WebError> {
    let path = state.config().logo_path();
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(WebError::NotFound("logo".to_string()));
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read logo");
            return Err(WebError::NotFound("logo".to_string()));
        }
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok((
        [(header::CONTENT_TYPE, mime.as_ref().to_string())],
        Body::from(bytes),
    )
        .into_response())
}

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::error::{AppError, Result};
use crate::model::{ShortenRequest, ShortenResponse};
use crate::state::AppState;

pub async fn shorten_handler(
    State(state): State<AppState>,
    request: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>> {
    let Json(request) = request.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let link = state.shortener().shorten(request.into()).await?;
    info!(code = %link.short_code, protected = link.is_protected(), "created short link");

    Ok(Json(ShortenResponse {
        short_url: link.short_code.to_url(state.base_url()),
        original_url: link.original_url,
        expires_at: link.expires_at,
    }))
}

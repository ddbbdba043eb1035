use axum::extract::{Path, State};
use axum::Json;
use snip_core::ShortCode;

use crate::error::{AppError, Result};
use crate::model::AnalyticsResponse;
use crate::state::AppState;

pub async fn analytics_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsResponse>> {
    let code = ShortCode::new(short_code.as_str())
        .map_err(|_| AppError::NotFound(format!("short code not found: {short_code}")))?;

    let analytics = state.analytics().analytics(&code).await?;

    Ok(Json(AnalyticsResponse::new(analytics, state.base_url())))
}

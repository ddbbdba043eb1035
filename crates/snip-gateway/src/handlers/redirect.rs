use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use snip_core::ShortCode;
use snip_redirector::RedirectRequest;

use crate::error::{AppError, Result};
use crate::handlers::ClientIp;
use crate::model::RedirectQuery;
use crate::state::AppState;

pub const PASSWORD_HEADER: &str = "x-link-password";

fn password(query: RedirectQuery, headers: &HeaderMap) -> Option<String> {
    query.password.or_else(|| {
        headers
            .get(PASSWORD_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    })
}

pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    query: std::result::Result<Query<RedirectQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Result<Response> {
    // a malformed code can never have been issued
    let code = ShortCode::new(short_code.as_str())
        .map_err(|_| AppError::NotFound(format!("short code not found: {short_code}")))?;

    // an unreadable query string counts as no password
    let query = query.map(|Query(query)| query).unwrap_or_default();
    let mut request = RedirectRequest::new(code, client_ip);
    request.password = password(query, &headers);

    let redirect = state.redirector().redirect(request).await?;

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, redirect.original_url)],
    )
        .into_response())
}

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::state::AppState;

/// Bearer token middleware.
///
/// Validates `Authorization: Bearer <token>` and inserts [`AuthClient`] into
/// the request extensions for handlers to use.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

    let claims = state.tokens.validate(token)?;

    req.extensions_mut().insert(AuthClient {
        gov_id: claims.sub,
        name: claims.name,
    });

    Ok(next.run(req).await)
}

/// The client a validated bearer token was issued to.
#[derive(Clone, Debug)]
pub struct AuthClient {
    pub gov_id: String,
    pub name: String,
}

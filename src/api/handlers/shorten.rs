//! Handler for link shortening endpoint.

use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::domain::entities::{LinkOwner, Session};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for the caller.
///
/// # Endpoint
///
/// `POST /api/shorten` (bearer token optional)
///
/// # Ownership
///
/// - Authenticated callers own the link; `anonymous_id` in the body is ignored
/// - Anonymous callers own it through `anonymous_id`, minted when absent
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/very/long/path", "anonymous_id": "anon-..." }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "short_code": "aZ3kP9qB",
///   "short_url": "http://localhost:3000/aZ3kP9qB",
///   "original_url": "https://example.com/very/long/path",
///   "anonymous_id": "anon-..."
/// }
/// ```
///
/// # Errors
///
/// - 400 `invalid_url` if the URL is not absolute with a host
/// - 503 `allocation_exhausted` if no free short code was found
pub async fn shorten_handler(
    State(state): State<AppState>,
    session: Option<Extension<Session>>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let user_id = session.map(|Extension(session)| session.user_id);
    let owner = LinkOwner::for_caller(user_id, payload.anonymous_id);

    let link = state
        .link_service
        .create_short_link(&payload.url, owner)
        .await?;

    let short_url = state
        .link_service
        .get_short_url(&state.base_url, &link.short_code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            short_code: link.short_code,
            short_url,
            original_url: link.original_url,
            anonymous_id: link.anonymous_id,
        }),
    ))
}

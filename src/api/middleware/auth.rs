//! Bearer token authentication middleware.
//!
//! Both layers verify JWT access tokens and, on success, insert the caller's
//! [`Session`] into request extensions for handlers to extract.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use tracing::debug;

use crate::application::services::TokenKind;
use crate::domain::entities::Session;
use crate::{error::AppError, state::AppState};

/// Requires a valid access token.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <access_token>
/// ```
///
/// # Errors
///
/// Returns `401 Unauthorized` with `WWW-Authenticate: Bearer` if:
/// - Authorization header is missing or not a bearer token
/// - Token is malformed, badly signed, expired or not yet valid
/// - Token is a refresh token
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/api/auth/claim-links", post(claim_links_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::require));
/// ```
pub async fn require(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| AppError::invalid_token("Authorization header is missing or invalid"))?;

    let session = st.token_service.verify(&token, TokenKind::Access)?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}

/// Attaches a [`Session`] when a valid access token is presented.
///
/// A missing or invalid token is not an error: the request continues as
/// anonymous.
pub async fn optional(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let session: Option<Session> = match AuthBearer::from_request_parts(&mut parts, &()).await {
        Ok(AuthBearer(token)) => match st.token_service.verify(&token, TokenKind::Access) {
            Ok(session) => Some(session),
            Err(e) => {
                debug!(error = %e, "Ignoring invalid bearer token");
                None
            }
        },
        Err(_) => None,
    };

    let mut req = Request::from_parts(parts, body);
    if let Some(session) = session {
        req.extensions_mut().insert(session);
    }

    next.run(req).await
}

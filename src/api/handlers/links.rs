//! Handlers for link listing and details.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use crate::api::dto::links::{LinkListResponse, LinkResponse, ListLinksQuery};
use crate::domain::entities::{LinkOwner, Session};
use crate::error::AppError;
use crate::state::AppState;

/// Lists links, newest first.
///
/// # Endpoint
///
/// `GET /api/urls?anonymous_id=...` (bearer token optional)
///
/// # Filtering
///
/// 1. Authenticated caller: their own links
/// 2. Otherwise, with `anonymous_id`: links still held by that token
/// 3. Otherwise: every link
pub async fn list_links_handler(
    State(state): State<AppState>,
    session: Option<Extension<Session>>,
    Query(query): Query<ListLinksQuery>,
) -> Result<Json<LinkListResponse>, AppError> {
    let owner = match (session, query.anonymous_id) {
        (Some(Extension(session)), _) => Some(LinkOwner::User(session.user_id)),
        (None, Some(anonymous_id)) if !anonymous_id.trim().is_empty() => {
            Some(LinkOwner::Anonymous(anonymous_id))
        }
        _ => None,
    };

    let links = state.link_service.list_links(owner).await?;

    let urls: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| {
            let short_url = state
                .link_service
                .get_short_url(&state.base_url, &link.short_code);
            LinkResponse::new(link, short_url)
        })
        .collect();

    Ok(Json(LinkListResponse {
        total: urls.len(),
        urls,
    }))
}

/// Returns details of a single link without counting a click.
///
/// # Endpoint
///
/// `GET /api/urls/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn link_details_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(&code).await?;
    let short_url = state
        .link_service
        .get_short_url(&state.base_url, &link.short_code);

    Ok(Json(LinkResponse::new(link, short_url)))
}

//! DTOs for link listing and details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Link;

#[derive(Debug, Deserialize)]
pub struct ListLinksQuery {
    pub anonymous_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub user_id: Option<i64>,
    pub anonymous_id: Option<String>,
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            user_id: link.user_id,
            anonymous_id: link.anonymous_id,
            short_code: link.short_code,
            short_url,
            original_url: link.original_url,
            clicks: link.clicks,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub urls: Vec<LinkResponse>,
}

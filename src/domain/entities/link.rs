//! Link entity representing a shortened URL and its owner.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Prefix of server-minted anonymous tokens.
pub const ANONYMOUS_ID_PREFIX: &str = "anon-";

/// A shortened URL with click counter and ownership.
///
/// At most one of `user_id` and `anonymous_id` is set. Claiming a link sets
/// `user_id` and clears `anonymous_id`; there is no way back.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub user_id: Option<i64>,
    pub anonymous_id: Option<String>,
    pub short_code: String,
    pub original_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Who owns a link: a registered user or an anonymous token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOwner {
    User(i64),
    Anonymous(String),
}

impl LinkOwner {
    /// Resolves the owner of a new link from the caller's identity.
    ///
    /// An authenticated user always wins. Otherwise the client-supplied
    /// anonymous token is used, and a fresh one is minted when it is absent
    /// or blank.
    pub fn for_caller(user_id: Option<i64>, anonymous_id: Option<String>) -> Self {
        if let Some(user_id) = user_id {
            return LinkOwner::User(user_id);
        }

        match anonymous_id {
            Some(id) if !id.trim().is_empty() => LinkOwner::Anonymous(id),
            _ => LinkOwner::Anonymous(Self::mint_anonymous_id()),
        }
    }

    /// Generates a new anonymous token (`anon-` followed by 32 hex digits).
    pub fn mint_anonymous_id() -> String {
        format!("{}{}", ANONYMOUS_ID_PREFIX, Uuid::new_v4().simple())
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            LinkOwner::User(id) => Some(*id),
            LinkOwner::Anonymous(_) => None,
        }
    }

    pub fn anonymous_id(&self) -> Option<&str> {
        match self {
            LinkOwner::User(_) => None,
            LinkOwner::Anonymous(id) => Some(id),
        }
    }
}

/// Input data for creating a new link. Clicks always start at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub short_code: String,
    pub original_url: String,
    pub owner: LinkOwner,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_caller_prefers_user() {
        let owner = LinkOwner::for_caller(Some(3), Some("anon-1".to_string()));
        assert_eq!(owner, LinkOwner::User(3));
    }

    #[test]
    fn test_for_caller_keeps_client_token() {
        let owner = LinkOwner::for_caller(None, Some("anon-1".to_string()));
        assert_eq!(owner, LinkOwner::Anonymous("anon-1".to_string()));
    }

    #[test]
    fn test_for_caller_mints_token_when_missing_or_blank() {
        for supplied in [None, Some(String::new()), Some("  ".to_string())] {
            let owner = LinkOwner::for_caller(None, supplied);
            let id = owner.anonymous_id().unwrap();

            assert!(id.starts_with(ANONYMOUS_ID_PREFIX));
            assert_eq!(id.len(), ANONYMOUS_ID_PREFIX.len() + 32);
        }
    }

    #[test]
    fn test_minted_tokens_are_distinct() {
        assert_ne!(LinkOwner::mint_anonymous_id(), LinkOwner::mint_anonymous_id());
    }
}

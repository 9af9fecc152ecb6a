//! Target URL validation.
//!
//! A target must be an absolute URL with a non-empty scheme and host. The
//! input is never rewritten: what is stored is exactly what the client sent.

use url::Url;

/// Reasons a target URL is rejected.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL must include a host")]
    MissingHost,
}

/// Checks that `input` parses as an absolute URL with a scheme and a host.
///
/// Whitespace and control characters are rejected anywhere in the input.
///
/// # Errors
///
/// Returns [`UrlValidationError::Empty`] for blank input,
/// [`UrlValidationError::InvalidFormat`] for relative or malformed URLs and
/// [`UrlValidationError::MissingHost`] for host-less URLs such as
/// `mailto:someone@example.com`.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_url("https://example.com/path").is_ok());
/// assert!(validate_url("/relative/path").is_err());
/// assert!(validate_url("example.com").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if input != input.trim() {
        return Err(UrlValidationError::InvalidFormat(
            "leading or trailing whitespace".to_string(),
        ));
    }

    // The parser strips tabs and newlines, but the input is stored as given
    // and later sent back in a `Location` header.
    if input.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(UrlValidationError::InvalidFormat(
            "control or whitespace character".to_string(),
        ));
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    if url.scheme().is_empty() {
        return Err(UrlValidationError::InvalidFormat(
            "missing scheme".to_string(),
        ));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_https_url() {
        assert!(validate_url("https://a.example/path").is_ok());
    }

    #[test]
    fn test_accepts_url_with_query_port_and_fragment() {
        assert!(validate_url("http://example.com:8080/search?q=rust#top").is_ok());
    }

    #[test]
    fn test_accepts_non_http_scheme_with_host() {
        assert!(validate_url("ftp://files.example.com/pub").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(validate_url(""), Err(UrlValidationError::Empty)));
        assert!(matches!(validate_url("   "), Err(UrlValidationError::Empty)));
    }

    #[test]
    fn test_rejects_relative_path() {
        assert!(matches!(
            validate_url("/some/path"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_bare_domain() {
        assert!(validate_url("example.com").is_err());
    }

    #[test]
    fn test_rejects_scheme_without_host() {
        assert!(matches!(
            validate_url("mailto:someone@example.com"),
            Err(UrlValidationError::MissingHost)
        ));
        assert!(validate_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_rejects_control_characters_and_whitespace() {
        for input in [
            "https://a.example/\npath",
            "https://a.example/\tx",
            "https://a.example/\rx",
            "https://a.example/a b",
            " https://a.example/x ",
            "https://a.example/x\n",
        ] {
            assert!(
                matches!(validate_url(input), Err(UrlValidationError::InvalidFormat(_))),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_rejects_http_without_host() {
        assert!(validate_url("http://").is_err());
    }
}

//! Short code generation.

use rand::{Rng, distr::Alphanumeric};

/// Number of characters in a generated short code.
pub const CODE_LENGTH: usize = 8;

/// Generates a random short code over `[A-Za-z0-9]`.
///
/// With 62^8 possible values a collision is rare; uniqueness is still
/// enforced by the store (see [`crate::application::services::CodeAllocator`]).
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 8);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_LENGTH)
        .map(char::from)
        .collect()
}

//! Utility functions for short code generation, URL checks, password hashing
//! and database error inspection.
//!
//! - [`code_generator`] - Random short code generation
//! - [`url_validator`] - Absolute URL validation
//! - [`password`] - Argon2 password hashing
//! - [`db_error`] - Unique-violation detection for sqlx errors

pub mod code_generator;
pub mod db_error;
pub mod password;
pub mod url_validator;

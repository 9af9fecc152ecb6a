//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx with
//! bound parameters and `FromRow` row mapping.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage, click counters and claiming
//! - [`PgUserRepository`] - User accounts

pub mod pg_link_repository;
pub mod pg_user_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_user_repository::PgUserRepository;

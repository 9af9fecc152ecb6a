//! Repository trait definitions for the domain layer.
//!
//! These traits are the record store contract. Implementations live in
//! `crate::infrastructure::persistence`; mocks are generated with `mockall`
//! for unit tests.
//!
//! - [`LinkRepository`] - Short links, click counters and ownership transfer
//! - [`UserRepository`] - User accounts

pub mod link_repository;
pub mod user_repository;

pub use link_repository::LinkRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;

//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and business rules, and
//! give HTTP handlers a narrow API to call.
//!
//! # Available Services
//!
//! - [`services::code_allocator::CodeAllocator`] - Unique short code allocation
//! - [`services::link_service::LinkService`] - Link creation, redirects, listing and claiming
//! - [`services::auth_service::AuthService`] - User registration and login
//! - [`services::token_service::TokenService`] - JWT access and refresh tokens

pub mod services;

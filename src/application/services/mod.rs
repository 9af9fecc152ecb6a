//! Business logic services for the application layer.

pub mod auth_service;
pub mod code_allocator;
pub mod link_service;
pub mod token_service;

pub use auth_service::{AuthService, LoginIdentifier};
pub use code_allocator::CodeAllocator;
pub use link_service::LinkService;
pub use token_service::{TokenKind, TokenService};

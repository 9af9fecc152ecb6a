//! Core domain entities.
//!
//! Entities are plain data structures; creation inputs live in separate
//! `New*` structs.
//!
//! - [`Link`] - A shortened URL with its owner and click counter
//! - [`User`] - A registered account
//! - [`Session`] - The identity carried by a verified token

pub mod link;
pub mod session;
pub mod user;

pub use link::{Link, LinkOwner, NewLink};
pub use session::{Session, TokenPair};
pub use user::{NewUser, User};

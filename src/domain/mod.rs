//! Domain layer containing business entities and data access contracts.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click counting event model
//! - [`click_worker`] - Asynchronous click counting worker
//!
//! # Click Processing Flow
//!
//! 1. [`crate::application::services::LinkService::resolve`] finds the link
//! 2. A [`click_event::ClickEvent`] is offered to a bounded channel (never awaited)
//! 3. [`click_worker::run_click_worker`] applies the increment in the background

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;

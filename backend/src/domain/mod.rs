//! Domain model for the skill-swap marketplace.
//!
//! Entities, validated value types, and the services that implement the
//! use-case ports. Nothing in here touches HTTP or storage directly; the
//! boundary traits live in [`ports`].

pub mod admin_service;
pub mod directory_service;
mod error;
pub mod moderation;
pub mod ports;
pub mod swap;
pub mod swap_service;
pub mod user;

pub use admin_service::AdminService;
pub use directory_service::DirectoryService;
pub use error::{Error, ErrorCode};
pub use swap_service::SwapService;

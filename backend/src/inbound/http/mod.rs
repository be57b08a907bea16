//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod error;
pub mod health;
pub mod session;
pub mod state;
pub mod swaps;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
pub use state::HttpState;

//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AdminCommand, AdminQuery, DirectoryCommand, DirectoryQuery, LoginService, SwapCommand,
    SwapQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub directory: Arc<dyn DirectoryQuery>,
    pub directory_command: Arc<dyn DirectoryCommand>,
    pub swaps: Arc<dyn SwapCommand>,
    pub swaps_query: Arc<dyn SwapQuery>,
    pub admin: Arc<dyn AdminCommand>,
    pub admin_query: Arc<dyn AdminQuery>,
}

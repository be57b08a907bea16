//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;

use crate::domain::{AdminService, DirectoryService, SwapService};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::MemoryStore;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Build handler state over a fresh in-memory store, returning the store
/// so tests can seed fixtures directly.
pub fn test_state() -> (HttpState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let directory = Arc::new(DirectoryService::new(store.clone()));
    let swaps = Arc::new(SwapService::new(store.clone(), store.clone(), store.clone()));
    let admin = Arc::new(AdminService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    ));
    let state = HttpState {
        login: directory.clone(),
        directory: directory.clone(),
        directory_command: directory,
        swaps: swaps.clone(),
        swaps_query: swaps,
        admin: admin.clone(),
        admin_query: admin,
    };
    (state, store)
}

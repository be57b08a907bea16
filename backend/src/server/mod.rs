//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{AdminService, DirectoryService, SwapService};
use crate::inbound::http::admin::{
    ban_user, broadcast, latest_message, list_users, messages, redact_skill, report, stats,
};
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::swaps::{cancel, feedback, mine, propose, set_status};
use crate::inbound::http::users::{login, me, public_users, register, update_me};
use crate::middleware::Trace;
use crate::outbound::persistence::MemoryStore;

/// Wire the domain services over a shared in-memory store.
#[must_use]
pub fn build_http_state() -> HttpState {
    let store = Arc::new(MemoryStore::new());
    let directory = Arc::new(DirectoryService::new(store.clone()));
    let swaps = Arc::new(SwapService::new(store.clone(), store.clone(), store.clone()));
    let admin = Arc::new(AdminService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store,
    ));
    HttpState {
        login: directory.clone(),
        directory: directory.clone(),
        directory_command: directory,
        swaps: swaps.clone(),
        swaps_query: swaps,
        admin: admin.clone(),
        admin_query: admin,
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(same_site)
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(register)
        .service(login)
        .service(me)
        .service(update_me)
        .service(public_users)
        .service(propose)
        .service(mine)
        .service(set_status)
        .service(cancel)
        .service(feedback)
        .service(broadcast)
        .service(messages)
        .service(latest_message)
        .service(ban_user)
        .service(redact_skill)
        .service(list_users)
        .service(stats)
        .service(report);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state());
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

//! Admin overlay handlers.
//!
//! ```text
//! POST /api/v1/admin/messages {"text":"Maintenance at 22:00 UTC"}
//! GET  /api/v1/admin/messages
//! GET  /api/v1/admin/messages/latest
//! PUT  /api/v1/admin/users/{id}/ban
//! PUT  /api/v1/admin/users/{id}/redact-skill {"list":"offered","skill":"spam"}
//! GET  /api/v1/admin/users
//! GET  /api/v1/admin/stats
//! GET  /api/v1/admin/report
//! ```
//!
//! Message reads are public so clients can render the active broadcast
//! without a session; everything else requires an admin account.

use actix_web::{get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::moderation::{AdminMessage, PlatformReport, PlatformStats};
use crate::domain::user::{AccountView, SkillListKind, UserId};
use crate::domain::Error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Broadcast body for `POST /api/v1/admin/messages`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct BroadcastBody {
    pub text: String,
}

/// Redaction body for `PUT /api/v1/admin/users/{id}/redact-skill`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RedactSkillBody {
    /// Which list to redact from, `"offered"` or `"wanted"`.
    pub list: String,
    pub skill: String,
}

/// Publish a platform-wide broadcast message.
#[utoipa::path(
    post,
    path = "/api/v1/admin/messages",
    request_body = BroadcastBody,
    responses(
        (status = 201, description = "Message published", body = AdminMessage),
        (status = 400, description = "Empty message text", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin access required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "broadcastMessage"
)]
#[post("/admin/messages")]
pub async fn broadcast(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BroadcastBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let message = state.admin.broadcast(&user_id, &payload.text).await?;
    Ok(HttpResponse::Created().json(message))
}

/// Broadcast history, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/messages",
    responses(
        (status = 200, description = "Messages, newest first", body = [AdminMessage]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listMessages",
    security([])
)]
#[get("/admin/messages")]
pub async fn messages(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<AdminMessage>>> {
    Ok(web::Json(state.admin_query.messages().await?))
}

/// The currently active broadcast message, or JSON `null`.
#[utoipa::path(
    get,
    path = "/api/v1/admin/messages/latest",
    responses(
        (status = 200, description = "Active message, or JSON null when none exists", body = AdminMessage),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "latestMessage",
    security([])
)]
#[get("/admin/messages/latest")]
pub async fn latest_message(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Option<AdminMessage>>> {
    Ok(web::Json(state.admin_query.latest_message().await?))
}

/// Ban a user. Idempotent; the account vanishes from public queries.
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/ban",
    params(("id" = UserId, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User banned"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin access required", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "banUser"
)]
#[put("/admin/users/{id}/ban")]
pub async fn ban_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    let acting = session.require_user_id()?;
    state.admin.ban_user(&acting, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Redact one skill entry on a user's listing, preserving list length.
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/redact-skill",
    params(("id" = UserId, Path, description = "User identifier")),
    request_body = RedactSkillBody,
    responses(
        (status = 204, description = "Skill redacted (or absent, a no-op)"),
        (status = 400, description = "Unknown skill list kind", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin access required", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "redactSkill"
)]
#[put("/admin/users/{id}/redact-skill")]
pub async fn redact_skill(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserId>,
    payload: web::Json<RedactSkillBody>,
) -> ApiResult<HttpResponse> {
    let acting = session.require_user_id()?;
    let kind: SkillListKind = payload.list.parse().map_err(
        |error: crate::domain::user::UserValidationError| {
            Error::invalid_request(error.to_string()).with_details(json!({ "field": "list" }))
        },
    )?;
    state
        .admin
        .redact_skill(&acting, &path.into_inner(), kind, &payload.skill)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Every account in the directory, banned and private ones included.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    responses(
        (status = 200, description = "All accounts", body = [AccountView]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin access required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listAllUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<AccountView>>> {
    let acting = session.require_user_id()?;
    Ok(web::Json(state.admin_query.list_users(&acting).await?))
}

/// Usage counters computed by full scan.
#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    responses(
        (status = 200, description = "Platform statistics", body = PlatformStats),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin access required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "platformStats"
)]
#[get("/admin/stats")]
pub async fn stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<PlatformStats>> {
    let acting = session.require_user_id()?;
    Ok(web::Json(state.admin_query.stats(&acting).await?))
}

/// Structured export of users, swaps, and the feedback log.
#[utoipa::path(
    get,
    path = "/api/v1/admin/report",
    responses(
        (status = 200, description = "Platform report", body = PlatformReport),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin access required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "platformReport"
)]
#[get("/admin/report")]
pub async fn report(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<PlatformReport>> {
    let acting = session.require_user_id()?;
    Ok(web::Json(state.admin_query.report(&acting).await?))
}

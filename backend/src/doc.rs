//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: every inbound handler path, the wire schemas, and the
//! session cookie security scheme. Swagger UI serves the document under
//! `/docs` in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::moderation::{
    AdminMessage, PlatformReport, PlatformStats, ReportFeedbackRow, ReportSwapRow, ReportUserRow,
};
use crate::domain::swap::{Feedback, Rating, SwapBoard, SwapId, SwapStatus, SwapView};
use crate::domain::user::{AccountView, ParticipantSummary, SkillListKind, UserId, UserProfile};
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::admin::{BroadcastBody, RedactSkillBody};
use crate::inbound::http::swaps::{DecisionBody, FeedbackBody, ProposeBody};
use crate::inbound::http::users::{LoginBody, RegisterBody, UpdateMeBody};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "SkillSwap backend API",
        description = "Skill-bartering marketplace: user directory, swap lifecycle, and admin overlay."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::me,
        crate::inbound::http::users::update_me,
        crate::inbound::http::users::public_users,
        crate::inbound::http::swaps::propose,
        crate::inbound::http::swaps::mine,
        crate::inbound::http::swaps::set_status,
        crate::inbound::http::swaps::cancel,
        crate::inbound::http::swaps::feedback,
        crate::inbound::http::admin::broadcast,
        crate::inbound::http::admin::messages,
        crate::inbound::http::admin::latest_message,
        crate::inbound::http::admin::ban_user,
        crate::inbound::http::admin::redact_skill,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::stats,
        crate::inbound::http::admin::report,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserId,
        SkillListKind,
        UserProfile,
        ParticipantSummary,
        AccountView,
        SwapId,
        SwapStatus,
        Rating,
        Feedback,
        SwapView,
        SwapBoard,
        AdminMessage,
        PlatformStats,
        PlatformReport,
        ReportUserRow,
        ReportSwapRow,
        ReportFeedbackRow,
        RegisterBody,
        LoginBody,
        UpdateMeBody,
        ProposeBody,
        DecisionBody,
        FeedbackBody,
        BroadcastBody,
        RedactSkillBody,
    )),
    tags(
        (name = "users", description = "Directory, registration, and sessions"),
        (name = "swaps", description = "Swap proposals, lifecycle, and feedback"),
        (name = "admin", description = "Moderation, broadcasts, and reporting"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

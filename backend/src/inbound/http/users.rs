//! User directory and authentication handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"name":"Priya Sharma","email":"priya@example.com","password":"..."}
//! POST /api/v1/auth/login {"email":"priya@example.com","password":"..."}
//! GET  /api/v1/users/me
//! PUT  /api/v1/users/me
//! GET  /api/v1/users/public?search=cooking
//! ```

use actix_web::{get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{RegisterUserRequest, UpdateProfileRequest};
use crate::domain::user::{AccountView, UserProfile};
use crate::domain::Error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Registration request body for `POST /api/v1/auth/register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub skills_offered: Vec<String>,
    #[serde(default)]
    pub skills_wanted: Vec<String>,
}

impl From<RegisterBody> for RegisterUserRequest {
    fn from(body: RegisterBody) -> Self {
        Self {
            name: body.name,
            email: body.email,
            credential: body.password,
            location: body.location,
            photo: body.photo,
            availability: body.availability,
            skills_offered: body.skills_offered,
            skills_wanted: body.skills_wanted,
        }
    }
}

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// Partial profile update body for `PUT /api/v1/users/me`. Absent fields
/// are left untouched; empty strings clear optional fields.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub skills_offered: Option<Vec<String>>,
    #[serde(default)]
    pub skills_wanted: Option<Vec<String>>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

impl From<UpdateMeBody> for UpdateProfileRequest {
    fn from(body: UpdateMeBody) -> Self {
        Self {
            name: body.name,
            location: body.location,
            photo: body.photo,
            availability: body.availability,
            skills_offered: body.skills_offered,
            skills_wanted: body.skills_wanted,
            is_public: body.is_public,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    search: Option<String>,
}

/// Create an account and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterBody,
    responses(
        (status = 201, description = "Account created", body = AccountView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterBody>,
) -> ApiResult<HttpResponse> {
    let account = state
        .directory_command
        .register(payload.into_inner().into())
        .await?;
    session.persist_user(&account.id)?;
    Ok(HttpResponse::Created().json(account))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Login success", body = AccountView,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let account = state.login.login(&body.email, &body.password).await?;
    session.persist_user(&account.id)?;
    Ok(HttpResponse::Ok().json(account))
}

/// The logged-in user's own account, credential excluded.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Own account", body = AccountView),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "me"
)]
#[get("/users/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AccountView>> {
    let user_id = session.require_user_id()?;
    let account = state.directory.fetch_account(&user_id).await?;
    Ok(web::Json(account))
}

/// Partially update the logged-in user's profile.
#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    request_body = UpdateMeBody,
    responses(
        (status = 200, description = "Updated account", body = AccountView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateMe"
)]
#[put("/users/me")]
pub async fn update_me(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateMeBody>,
) -> ApiResult<web::Json<AccountView>> {
    let user_id = session.require_user_id()?;
    let account = state
        .directory_command
        .update_profile(&user_id, payload.into_inner().into())
        .await?;
    Ok(web::Json(account))
}

/// Browse public profiles, optionally filtered by a substring search over
/// name, location, and skill lists.
#[utoipa::path(
    get,
    path = "/api/v1/users/public",
    params(("search" = Option<String>, Query, description = "Case-insensitive substring filter")),
    responses(
        (status = 200, description = "Public profiles", body = [UserProfile]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "publicUsers",
    security([])
)]
#[get("/users/public")]
pub async fn public_users(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<UserProfile>>> {
    let profiles = state
        .directory
        .find_public_users(query.search.as_deref())
        .await?;
    Ok(web::Json(profiles))
}

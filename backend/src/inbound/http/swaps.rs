//! Swap lifecycle handlers.
//!
//! ```text
//! POST   /api/v1/swaps {"toUser":"...","skillOffered":"Cooking","skillWanted":"Guitar"}
//! GET    /api/v1/swaps/mine
//! PUT    /api/v1/swaps/{id}/status {"status":"accepted"}
//! DELETE /api/v1/swaps/{id}
//! POST   /api/v1/swaps/{id}/feedback {"rating":5,"text":"Great teacher"}
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::ProposeSwapRequest;
use crate::domain::swap::{Rating, SwapBoard, SwapDecision, SwapId, SwapView};
use crate::domain::user::UserId;
use crate::domain::Error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Proposal request body for `POST /api/v1/swaps`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposeBody {
    pub to_user: UserId,
    pub skill_offered: String,
    pub skill_wanted: String,
}

/// Decision body for `PUT /api/v1/swaps/{id}/status`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct DecisionBody {
    pub status: String,
}

impl DecisionBody {
    fn decision(&self) -> Result<SwapDecision, Error> {
        match self.status.as_str() {
            "accepted" => Ok(SwapDecision::Accepted),
            "rejected" => Ok(SwapDecision::Rejected),
            other => Err(
                Error::invalid_request(format!("unknown swap status {other:?}"))
                    .with_details(json!({ "field": "status" })),
            ),
        }
    }
}

/// Feedback body for `POST /api/v1/swaps/{id}/feedback`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct FeedbackBody {
    pub rating: u8,
    #[serde(default)]
    pub text: Option<String>,
}

/// Propose a skill swap to another user.
#[utoipa::path(
    post,
    path = "/api/v1/swaps",
    request_body = ProposeBody,
    responses(
        (status = 201, description = "Pending swap created", body = SwapView),
        (status = 400, description = "Invalid request or skill mismatch", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Either party is banned", body = Error),
        (status = 404, description = "Target user not found", body = Error),
        (status = 409, description = "Active swap already exists for this pair", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["swaps"],
    operation_id = "proposeSwap"
)]
#[post("/swaps")]
pub async fn propose(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProposeBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let body = payload.into_inner();
    let view = state
        .swaps
        .propose(
            &user_id,
            ProposeSwapRequest {
                to_user: body.to_user,
                skill_offered: body.skill_offered,
                skill_wanted: body.skill_wanted,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(view))
}

/// The logged-in user's swap board: incoming, outgoing, and accepted.
#[utoipa::path(
    get,
    path = "/api/v1/swaps/mine",
    responses(
        (status = 200, description = "Swap board", body = SwapBoard),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["swaps"],
    operation_id = "mySwaps"
)]
#[get("/swaps/mine")]
pub async fn mine(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SwapBoard>> {
    let user_id = session.require_user_id()?;
    let board = state.swaps_query.list_for_user(&user_id).await?;
    Ok(web::Json(board))
}

/// Accept or reject a pending swap (recipient only).
#[utoipa::path(
    put,
    path = "/api/v1/swaps/{id}/status",
    params(("id" = SwapId, Path, description = "Swap identifier")),
    request_body = DecisionBody,
    responses(
        (status = 200, description = "Updated swap", body = SwapView),
        (status = 400, description = "Unknown status or swap not pending", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Only the recipient may respond", body = Error),
        (status = 404, description = "Swap not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["swaps"],
    operation_id = "respondToSwap"
)]
#[put("/swaps/{id}/status")]
pub async fn set_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SwapId>,
    payload: web::Json<DecisionBody>,
) -> ApiResult<web::Json<SwapView>> {
    let user_id = session.require_user_id()?;
    let decision = payload.decision()?;
    let view = state
        .swaps
        .respond(&path.into_inner(), &user_id, decision)
        .await?;
    Ok(web::Json(view))
}

/// Cancel a pending swap (proposer only). The record is deleted.
#[utoipa::path(
    delete,
    path = "/api/v1/swaps/{id}",
    params(("id" = SwapId, Path, description = "Swap identifier")),
    responses(
        (status = 204, description = "Swap deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Only the proposer may cancel a pending swap", body = Error),
        (status = 404, description = "Swap not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["swaps"],
    operation_id = "cancelSwap"
)]
#[delete("/swaps/{id}")]
pub async fn cancel(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SwapId>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.swaps.cancel(&path.into_inner(), &user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Leave or replace feedback on an accepted swap.
#[utoipa::path(
    post,
    path = "/api/v1/swaps/{id}/feedback",
    params(("id" = SwapId, Path, description = "Swap identifier")),
    request_body = FeedbackBody,
    responses(
        (status = 200, description = "Swap with updated feedback", body = SwapView),
        (status = 400, description = "Rating out of range or swap not accepted", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Only participants may leave feedback", body = Error),
        (status = 404, description = "Swap not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["swaps"],
    operation_id = "leaveFeedback"
)]
#[post("/swaps/{id}/feedback")]
pub async fn feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SwapId>,
    payload: web::Json<FeedbackBody>,
) -> ApiResult<web::Json<SwapView>> {
    let user_id = session.require_user_id()?;
    let body = payload.into_inner();
    let rating = Rating::new(body.rating).map_err(|error| {
        Error::invalid_request(error.to_string()).with_details(json!({ "field": "rating" }))
    })?;
    let view = state
        .swaps
        .attach_feedback(&path.into_inner(), &user_id, rating, body.text)
        .await?;
    Ok(web::Json(view))
}

//! Swap matcher and lifecycle service.
//!
//! `propose` is the matcher: it decides whether a valid skill-for-skill
//! match exists and constructs the pending swap. The remaining operations
//! drive the state machine (respond, cancel) and feedback attachment.
//!
//! Error precedence for `propose` follows the contract: missing target
//! (`NotFound`), banned party (`Forbidden`), duplicate active pair
//! (`Conflict`), then skill mismatch (`InvalidRequest`). The advisory
//! duplicate check runs before skill validation for that ordering; the
//! store re-checks the pair atomically at insert to close the race.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::error::Error;
use crate::domain::ports::{
    FeedbackLog, FeedbackLogError, ProposeSwapRequest, SwapCommand, SwapPersistenceError,
    SwapQuery, SwapRepository, UserPersistenceError, UserRepository,
};
use crate::domain::swap::{
    Feedback, FeedbackLogEntry, Rating, Swap, SwapBoard, SwapDecision, SwapId, SwapStatus,
    SwapView,
};
use crate::domain::user::{User, UserId};

/// Swap service implementing the matcher and lifecycle driving ports.
#[derive(Clone)]
pub struct SwapService<S, U, F> {
    swaps: Arc<S>,
    users: Arc<U>,
    feedback_log: Arc<F>,
}

impl<S, U, F> SwapService<S, U, F> {
    /// Create a new service with the given stores.
    pub fn new(swaps: Arc<S>, users: Arc<U>, feedback_log: Arc<F>) -> Self {
        Self {
            swaps,
            users,
            feedback_log,
        }
    }
}

fn map_swap_store_error(error: SwapPersistenceError) -> Error {
    match error {
        SwapPersistenceError::Query { message } => {
            Error::internal(format!("swap store error: {message}"))
        }
        SwapPersistenceError::ActivePairExists { .. } => {
            Error::conflict("swap request already exists between these users")
        }
        SwapPersistenceError::Missing { id } => Error::not_found(format!("swap {id} not found")),
    }
}

fn map_user_store_error(error: UserPersistenceError) -> Error {
    Error::internal(format!("user store error: {error}"))
}

fn map_log_error(error: FeedbackLogError) -> Error {
    Error::internal(format!("feedback log error: {error}"))
}

impl<S, U, F> SwapService<S, U, F>
where
    S: SwapRepository,
    U: UserRepository,
    F: FeedbackLog,
{
    async fn fetch_swap(&self, id: &SwapId) -> Result<Swap, Error> {
        self.swaps
            .find_by_id(id)
            .await
            .map_err(map_swap_store_error)?
            .ok_or_else(|| Error::not_found(format!("swap {id} not found")))
    }

    async fn fetch_participant(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::internal(format!("swap participant {id} missing from directory")))
    }

    async fn resolve_view(&self, swap: &Swap) -> Result<SwapView, Error> {
        let from = self.fetch_participant(swap.from_user()).await?;
        let to = self.fetch_participant(swap.to_user()).await?;
        Ok(swap.view(from.summary(), to.summary()))
    }
}

#[async_trait]
impl<S, U, F> SwapCommand for SwapService<S, U, F>
where
    S: SwapRepository,
    U: UserRepository,
    F: FeedbackLog,
{
    async fn propose(
        &self,
        from: &UserId,
        request: ProposeSwapRequest,
    ) -> Result<SwapView, Error> {
        if from == &request.to_user {
            return Err(Error::invalid_request("cannot open a swap with yourself"));
        }

        let proposer = self
            .users
            .find_by_id(from)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::not_found(format!("user {from} not found")))?;
        if proposer.is_banned() {
            return Err(Error::forbidden("banned users cannot open swaps"));
        }

        let target = self
            .users
            .find_by_id(&request.to_user)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::not_found("target user not found"))?;
        if target.is_banned() {
            return Err(Error::forbidden("target user is banned"));
        }

        // Advisory duplicate check so Conflict outranks skill validation;
        // the store repeats it atomically inside insert_pending.
        if self
            .swaps
            .find_active_between(from, &request.to_user)
            .await
            .map_err(map_swap_store_error)?
            .is_some()
        {
            return Err(Error::conflict(
                "swap request already exists between these users",
            ));
        }

        // Both legs validate against *offered* lists. The target's wanted
        // list is a UI suggestion, never enforced.
        if !proposer.offers_skill(&request.skill_offered) {
            return Err(
                Error::invalid_request("offered skill is not in your offered list")
                    .with_details(json!({ "field": "skillOffered" })),
            );
        }
        if !target.offers_skill(&request.skill_wanted) {
            return Err(
                Error::invalid_request("wanted skill is not offered by the target user")
                    .with_details(json!({ "field": "skillWanted" })),
            );
        }

        let swap = Swap::propose(
            *from,
            request.to_user,
            request.skill_offered,
            request.skill_wanted,
        );
        self.swaps
            .insert_pending(&swap)
            .await
            .map_err(map_swap_store_error)?;
        tracing::info!(swap = %swap.id(), from = %from, to = %request.to_user, "swap proposed");
        Ok(swap.view(proposer.summary(), target.summary()))
    }

    async fn respond(
        &self,
        swap_id: &SwapId,
        acting: &UserId,
        decision: SwapDecision,
    ) -> Result<SwapView, Error> {
        let mut swap = self.fetch_swap(swap_id).await?;
        if swap.to_user() != acting {
            return Err(Error::forbidden("only the recipient can respond to a swap"));
        }
        if swap.status() != SwapStatus::Pending {
            return Err(Error::invalid_request("swap is no longer pending"));
        }

        swap.decide(decision);
        self.swaps.update(&swap).await.map_err(map_swap_store_error)?;
        tracing::info!(swap = %swap_id, ?decision, "swap decided");
        self.resolve_view(&swap).await
    }

    async fn cancel(&self, swap_id: &SwapId, acting: &UserId) -> Result<(), Error> {
        let swap = self.fetch_swap(swap_id).await?;
        if swap.from_user() != acting || swap.status() != SwapStatus::Pending {
            return Err(Error::forbidden(
                "only the proposer can cancel a pending swap",
            ));
        }

        self.swaps.delete(swap_id).await.map_err(map_swap_store_error)?;
        tracing::info!(swap = %swap_id, "swap cancelled");
        Ok(())
    }

    async fn attach_feedback(
        &self,
        swap_id: &SwapId,
        acting: &UserId,
        rating: Rating,
        text: Option<String>,
    ) -> Result<SwapView, Error> {
        let mut swap = self.fetch_swap(swap_id).await?;
        if !swap.involves(acting) {
            return Err(Error::forbidden(
                "only participants can leave feedback on a swap",
            ));
        }
        if swap.status() != SwapStatus::Accepted {
            return Err(Error::invalid_request(
                "feedback can only be left on accepted swaps",
            ));
        }

        let feedback = Feedback::new(*acting, rating, text);
        let log_entry = FeedbackLogEntry::record(*swap_id, &feedback);
        swap.upsert_feedback(feedback);
        self.swaps.update(&swap).await.map_err(map_swap_store_error)?;
        // The audit log grows on every submission, replacements included.
        self.feedback_log
            .append(&log_entry)
            .await
            .map_err(map_log_error)?;
        self.resolve_view(&swap).await
    }
}

#[async_trait]
impl<S, U, F> SwapQuery for SwapService<S, U, F>
where
    S: SwapRepository,
    U: UserRepository,
    F: FeedbackLog,
{
    async fn list_for_user(&self, user: &UserId) -> Result<SwapBoard, Error> {
        let swaps = self
            .swaps
            .list_involving(user)
            .await
            .map_err(map_swap_store_error)?;

        let mut board = SwapBoard::default();
        for swap in &swaps {
            let view = self.resolve_view(swap).await?;
            match swap.status() {
                SwapStatus::Pending if swap.to_user() == user => board.incoming.push(view),
                SwapStatus::Pending => board.outgoing.push(view),
                SwapStatus::Accepted => board.accepted.push(view),
                // Rejected swaps are silently archived: no view surfaces
                // them to either party.
                SwapStatus::Rejected => {}
            }
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::user::{Credential, DisplayName, EmailAddress};
    use crate::outbound::persistence::MemoryStore;
    use rstest::rstest;

    struct Fixture {
        service: SwapService<MemoryStore, MemoryStore, MemoryStore>,
        store: Arc<MemoryStore>,
    }

    impl Fixture {
        fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            Self {
                service: SwapService::new(store.clone(), store.clone(), store.clone()),
                store,
            }
        }

        async fn add_user(&self, name: &str, offered: &[&str], wanted: &[&str]) -> UserId {
            let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
            let user = User::new(
                DisplayName::new(name).expect("valid name"),
                EmailAddress::new(email).expect("valid email"),
                Credential::new("password123").expect("valid credential"),
            )
            .with_skills_offered(offered.iter().map(|s| (*s).to_owned()).collect())
            .with_skills_wanted(wanted.iter().map(|s| (*s).to_owned()).collect());
            let id = *user.id();
            self.store.insert(&user).await.expect("user stored");
            id
        }

        async fn add_banned_user(&self, name: &str) -> UserId {
            let id = self.add_user(name, &["Chess"], &[]).await;
            let mut user = UserRepository::find_by_id(&*self.store, &id)
                .await
                .expect("lookup")
                .expect("user exists");
            user.ban();
            UserRepository::update(&*self.store, &user).await.expect("user updated");
            id
        }

        fn propose_request(&self, to: UserId) -> ProposeSwapRequest {
            ProposeSwapRequest {
                to_user: to,
                skill_offered: "Cooking".into(),
                skill_wanted: "Programming".into(),
            }
        }

        /// The A-offers-Cooking, B-offers-Programming pair used throughout.
        async fn standard_pair(&self) -> (UserId, UserId) {
            let a = self.add_user("Priya Sharma", &["Cooking"], &["Programming"]).await;
            let b = self.add_user("Arjun Patel", &["Programming"], &["Cooking"]).await;
            (a, b)
        }
    }

    fn rating(value: u8) -> Rating {
        Rating::new(value).expect("valid rating")
    }

    #[tokio::test]
    async fn propose_creates_pending_swap_with_resolved_participants() {
        let fx = Fixture::new();
        let (a, b) = fx.standard_pair().await;

        let view = fx
            .service
            .propose(&a, fx.propose_request(b))
            .await
            .expect("proposal succeeds");
        assert_eq!(view.status, SwapStatus::Pending);
        assert_eq!(view.from_user.name, "Priya Sharma");
        assert_eq!(view.to_user.name, "Arjun Patel");
        assert_eq!(view.skill_offered, "Cooking");
        assert_eq!(view.skill_wanted, "Programming");
    }

    #[tokio::test]
    async fn propose_rejects_self_swap() {
        let fx = Fixture::new();
        let (a, _) = fx.standard_pair().await;

        let error = fx
            .service
            .propose(&a, fx.propose_request(a))
            .await
            .expect_err("self swap");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn propose_rejects_unknown_target_with_not_found() {
        let fx = Fixture::new();
        let (a, _) = fx.standard_pair().await;

        let error = fx
            .service
            .propose(&a, fx.propose_request(UserId::random()))
            .await
            .expect_err("unknown target");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn propose_rejects_banned_target_with_forbidden() {
        let fx = Fixture::new();
        let (a, _) = fx.standard_pair().await;
        let banned = fx.add_banned_user("Rahul Singh").await;

        let error = fx
            .service
            .propose(&a, fx.propose_request(banned))
            .await
            .expect_err("banned target");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn propose_rejects_banned_proposer_with_forbidden() {
        let fx = Fixture::new();
        let (_, b) = fx.standard_pair().await;
        let banned = fx.add_banned_user("Rahul Singh").await;

        let error = fx
            .service
            .propose(&banned, fx.propose_request(b))
            .await
            .expect_err("banned proposer");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case("Juggling", "Programming")] // not in proposer's offered list
    #[case("Cooking", "Meditation")] // not in target's *offered* list
    #[case("Cooking", "Cooking")] // target wants it, but does not offer it
    #[tokio::test]
    async fn propose_validates_both_legs_against_offered_lists(
        #[case] offered: &str,
        #[case] wanted: &str,
    ) {
        let fx = Fixture::new();
        let (a, b) = fx.standard_pair().await;

        let error = fx
            .service
            .propose(
                &a,
                ProposeSwapRequest {
                    to_user: b,
                    skill_offered: offered.into(),
                    skill_wanted: wanted.into(),
                },
            )
            .await
            .expect_err("skill mismatch");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn duplicate_active_pair_conflicts_in_both_directions() {
        let fx = Fixture::new();
        let (a, b) = fx.standard_pair().await;

        fx.service
            .propose(&a, fx.propose_request(b))
            .await
            .expect("first proposal succeeds");

        let error = fx
            .service
            .propose(&a, fx.propose_request(b))
            .await
            .expect_err("same direction duplicate");
        assert_eq!(error.code(), ErrorCode::Conflict);

        let error = fx
            .service
            .propose(
                &b,
                ProposeSwapRequest {
                    to_user: a,
                    skill_offered: "Programming".into(),
                    skill_wanted: "Cooking".into(),
                },
            )
            .await
            .expect_err("reverse direction duplicate");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn accepted_swap_still_blocks_new_proposals() {
        let fx = Fixture::new();
        let (a, b) = fx.standard_pair().await;

        let view = fx
            .service
            .propose(&a, fx.propose_request(b))
            .await
            .expect("proposal succeeds");
        fx.service
            .respond(&view.id, &b, SwapDecision::Accepted)
            .await
            .expect("acceptance succeeds");

        let error = fx
            .service
            .propose(&a, fx.propose_request(b))
            .await
            .expect_err("accepted swap blocks");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn rejection_frees_the_pair_for_a_new_proposal() {
        let fx = Fixture::new();
        let (a, b) = fx.standard_pair().await;

        let view = fx
            .service
            .propose(&a, fx.propose_request(b))
            .await
            .expect("proposal succeeds");
        fx.service
            .respond(&view.id, &b, SwapDecision::Rejected)
            .await
            .expect("rejection succeeds");

        fx.service
            .propose(&a, fx.propose_request(b))
            .await
            .expect("pair is free again");
    }

    #[tokio::test]
    async fn only_the_recipient_may_respond() {
        let fx = Fixture::new();
        let (a, b) = fx.standard_pair().await;
        let outsider = fx.add_user("Meera Reddy", &["Dance"], &[]).await;

        let view = fx
            .service
            .propose(&a, fx.propose_request(b))
            .await
            .expect("proposal succeeds");

        for wrong_actor in [a, outsider] {
            let error = fx
                .service
                .respond(&view.id, &wrong_actor, SwapDecision::Accepted)
                .await
                .expect_err("wrong actor");
            assert_eq!(error.code(), ErrorCode::Forbidden);
        }

        // The stored swap is unchanged.
        let board = fx.service.list_for_user(&b).await.expect("board");
        assert_eq!(board.incoming.len(), 1);
        assert_eq!(board.incoming[0].status, SwapStatus::Pending);
    }

    #[tokio::test]
    async fn responding_twice_is_an_invalid_transition() {
        let fx = Fixture::new();
        let (a, b) = fx.standard_pair().await;

        let view = fx
            .service
            .propose(&a, fx.propose_request(b))
            .await
            .expect("proposal succeeds");
        fx.service
            .respond(&view.id, &b, SwapDecision::Accepted)
            .await
            .expect("first response succeeds");

        let error = fx
            .service
            .respond(&view.id, &b, SwapDecision::Rejected)
            .await
            .expect_err("second response");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn cancel_deletes_a_pending_swap_for_the_proposer_only() {
        let fx = Fixture::new();
        let (a, b) = fx.standard_pair().await;

        let view = fx
            .service
            .propose(&a, fx.propose_request(b))
            .await
            .expect("proposal succeeds");

        let error = fx
            .service
            .cancel(&view.id, &b)
            .await
            .expect_err("recipient cannot cancel");
        assert_eq!(error.code(), ErrorCode::Forbidden);

        fx.service.cancel(&view.id, &a).await.expect("proposer cancels");

        let error = fx
            .service
            .cancel(&view.id, &a)
            .await
            .expect_err("already deleted");
        assert_eq!(error.code(), ErrorCode::NotFound);

        // Deletion frees the pair.
        fx.service
            .propose(&a, fx.propose_request(b))
            .await
            .expect("pair is free after cancel");
    }

    #[tokio::test]
    async fn cancel_is_forbidden_once_accepted() {
        let fx = Fixture::new();
        let (a, b) = fx.standard_pair().await;

        let view = fx
            .service
            .propose(&a, fx.propose_request(b))
            .await
            .expect("proposal succeeds");
        fx.service
            .respond(&view.id, &b, SwapDecision::Accepted)
            .await
            .expect("acceptance succeeds");

        let error = fx
            .service
            .cancel(&view.id, &a)
            .await
            .expect_err("accepted swaps cannot be cancelled");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn feedback_needs_an_accepted_swap_and_a_participant() {
        let fx = Fixture::new();
        let (a, b) = fx.standard_pair().await;
        let outsider = fx.add_user("Meera Reddy", &["Dance"], &[]).await;

        let view = fx
            .service
            .propose(&a, fx.propose_request(b))
            .await
            .expect("proposal succeeds");

        let error = fx
            .service
            .attach_feedback(&view.id, &a, rating(5), None)
            .await
            .expect_err("pending swap");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);

        fx.service
            .respond(&view.id, &b, SwapDecision::Accepted)
            .await
            .expect("acceptance succeeds");

        let error = fx
            .service
            .attach_feedback(&view.id, &outsider, rating(5), None)
            .await
            .expect_err("outsider");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn feedback_resubmission_replaces_on_swap_but_grows_the_log() {
        let fx = Fixture::new();
        let (a, b) = fx.standard_pair().await;

        let view = fx
            .service
            .propose(&a, fx.propose_request(b))
            .await
            .expect("proposal succeeds");
        fx.service
            .respond(&view.id, &b, SwapDecision::Accepted)
            .await
            .expect("acceptance succeeds");

        let view = fx
            .service
            .attach_feedback(&view.id, &a, rating(5), Some("Great!".into()))
            .await
            .expect("first feedback");
        assert_eq!(view.feedback.len(), 1);
        assert_eq!(fx.store.entries().await.expect("log").len(), 1);

        let view = fx
            .service
            .attach_feedback(&view.id, &a, rating(4), Some("Actually, good".into()))
            .await
            .expect("second feedback");
        assert_eq!(view.feedback.len(), 1);
        assert_eq!(view.feedback[0].rating.value(), 4);
        assert_eq!(fx.store.entries().await.expect("log").len(), 2);

        // Both participants can hold one entry each.
        let view = fx
            .service
            .attach_feedback(&view.id, &b, rating(3), None)
            .await
            .expect("recipient feedback");
        assert_eq!(view.feedback.len(), 2);
        assert_eq!(fx.store.entries().await.expect("log").len(), 3);
    }

    #[tokio::test]
    async fn board_partitions_views_and_hides_rejected_swaps() {
        let fx = Fixture::new();
        let (a, b) = fx.standard_pair().await;
        let c = fx.add_user("Meera Reddy", &["Dance"], &["Cooking"]).await;

        // a -> b pending, a -> c accepted.
        let pending = fx
            .service
            .propose(&a, fx.propose_request(b))
            .await
            .expect("proposal succeeds");
        let accepted = fx
            .service
            .propose(
                &a,
                ProposeSwapRequest {
                    to_user: c,
                    skill_offered: "Cooking".into(),
                    skill_wanted: "Dance".into(),
                },
            )
            .await
            .expect("proposal succeeds");
        fx.service
            .respond(&accepted.id, &c, SwapDecision::Accepted)
            .await
            .expect("acceptance succeeds");

        let board_a = fx.service.list_for_user(&a).await.expect("board for a");
        assert_eq!(board_a.outgoing.len(), 1);
        assert_eq!(board_a.outgoing[0].id, pending.id);
        assert!(board_a.incoming.is_empty());
        assert_eq!(board_a.accepted.len(), 1);

        let board_b = fx.service.list_for_user(&b).await.expect("board for b");
        assert_eq!(board_b.incoming.len(), 1);
        assert!(board_b.outgoing.is_empty());
        assert!(board_b.accepted.is_empty());

        // Rejecting hides the swap from every view of both parties.
        fx.service
            .respond(&pending.id, &b, SwapDecision::Rejected)
            .await
            .expect("rejection succeeds");
        let board_a = fx.service.list_for_user(&a).await.expect("board for a");
        assert!(board_a.outgoing.is_empty());
        let board_b = fx.service.list_for_user(&b).await.expect("board for b");
        assert!(board_b.incoming.is_empty());
    }

    #[tokio::test]
    async fn respond_to_unknown_swap_is_not_found() {
        let fx = Fixture::new();
        let (a, _) = fx.standard_pair().await;

        let error = fx
            .service
            .respond(&SwapId::random(), &a, SwapDecision::Accepted)
            .await
            .expect_err("unknown swap");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}

//! In-memory store backing every driven port.
//!
//! One [`RwLock`] guards the whole dataset, so each port call is a single
//! critical section. That makes `insert_pending` the serialisation point
//! for the one-active-swap-per-pair invariant: the pair check and the
//! insert happen under the same write guard.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::moderation::AdminMessage;
use crate::domain::ports::{
    AdminMessageRepository, FeedbackLog, FeedbackLogError, MessagePersistenceError,
    SwapPersistenceError, SwapRepository, UserPersistenceError, UserRepository,
};
use crate::domain::swap::{FeedbackLogEntry, Swap, SwapId};
use crate::domain::user::{EmailAddress, User, UserId};

const POISONED: &str = "store lock poisoned";

#[derive(Default)]
struct StoreInner {
    users: HashMap<Uuid, User>,
    user_order: Vec<Uuid>,
    emails: HashMap<String, Uuid>,
    swaps: HashMap<Uuid, Swap>,
    swap_order: Vec<Uuid>,
    // Pending or accepted swap per normalised (lesser, greater) user pair.
    active_pairs: HashMap<(Uuid, Uuid), Uuid>,
    feedback_log: Vec<FeedbackLogEntry>,
    messages: Vec<AdminMessage>,
}

fn pair_key(a: &UserId, b: &UserId) -> (Uuid, Uuid) {
    let (a, b) = (*a.as_uuid(), *b.as_uuid());
    if a <= b { (a, b) } else { (b, a) }
}

impl StoreInner {
    fn swap_pair_key(swap: &Swap) -> (Uuid, Uuid) {
        pair_key(swap.from_user(), swap.to_user())
    }

    /// Keep the active-pair index consistent with one swap's status.
    fn reindex_pair(&mut self, swap: &Swap) {
        let key = Self::swap_pair_key(swap);
        if swap.is_active() {
            self.active_pairs.insert(key, *swap.id().as_uuid());
        } else if self.active_pairs.get(&key) == Some(swap.id().as_uuid()) {
            self.active_pairs.remove(&key);
        }
    }
}

/// Shared in-memory dataset implementing all of the driven ports.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, StoreInner>, &'static str> {
        self.inner.read().map_err(|_| POISONED)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, StoreInner>, &'static str> {
        self.inner.write().map_err(|_| POISONED)
    }
}

fn user_query_error(message: &str) -> UserPersistenceError {
    UserPersistenceError::Query {
        message: message.to_owned(),
    }
}

fn swap_query_error(message: &str) -> SwapPersistenceError {
    SwapPersistenceError::Query {
        message: message.to_owned(),
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut inner = self.write().map_err(user_query_error)?;
        let email = user.email().as_ref().to_owned();
        if inner.emails.contains_key(&email) {
            return Err(UserPersistenceError::DuplicateEmail { email });
        }
        let id = *user.id().as_uuid();
        inner.emails.insert(email, id);
        inner.user_order.push(id);
        inner.users.insert(id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut inner = self.write().map_err(user_query_error)?;
        let id = *user.id().as_uuid();
        let Some(existing) = inner.users.get(&id) else {
            return Err(UserPersistenceError::Missing {
                id: user.id().to_string(),
            });
        };
        let old_email = existing.email().as_ref().to_owned();
        let new_email = user.email().as_ref().to_owned();
        if old_email != new_email {
            if inner.emails.contains_key(&new_email) {
                return Err(UserPersistenceError::DuplicateEmail { email: new_email });
            }
            inner.emails.remove(&old_email);
            inner.emails.insert(new_email, id);
        }
        inner.users.insert(id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let inner = self.read().map_err(user_query_error)?;
        Ok(inner.users.get(id.as_uuid()).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let inner = self.read().map_err(user_query_error)?;
        Ok(inner
            .emails
            .get(email.as_ref())
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let inner = self.read().map_err(user_query_error)?;
        Ok(inner
            .user_order
            .iter()
            .filter_map(|id| inner.users.get(id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SwapRepository for MemoryStore {
    async fn insert_pending(&self, swap: &Swap) -> Result<(), SwapPersistenceError> {
        let mut inner = self.write().map_err(swap_query_error)?;
        let key = StoreInner::swap_pair_key(swap);
        if inner.active_pairs.contains_key(&key) {
            return Err(SwapPersistenceError::ActivePairExists {
                first: swap.from_user().to_string(),
                second: swap.to_user().to_string(),
            });
        }
        let id = *swap.id().as_uuid();
        inner.active_pairs.insert(key, id);
        inner.swap_order.push(id);
        inner.swaps.insert(id, swap.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SwapId) -> Result<Option<Swap>, SwapPersistenceError> {
        let inner = self.read().map_err(swap_query_error)?;
        Ok(inner.swaps.get(id.as_uuid()).cloned())
    }

    async fn update(&self, swap: &Swap) -> Result<(), SwapPersistenceError> {
        let mut inner = self.write().map_err(swap_query_error)?;
        let id = *swap.id().as_uuid();
        if !inner.swaps.contains_key(&id) {
            return Err(SwapPersistenceError::Missing {
                id: swap.id().to_string(),
            });
        }
        inner.swaps.insert(id, swap.clone());
        inner.reindex_pair(swap);
        Ok(())
    }

    async fn delete(&self, id: &SwapId) -> Result<bool, SwapPersistenceError> {
        let mut inner = self.write().map_err(swap_query_error)?;
        let Some(swap) = inner.swaps.remove(id.as_uuid()) else {
            return Ok(false);
        };
        inner.swap_order.retain(|entry| entry != id.as_uuid());
        let key = StoreInner::swap_pair_key(&swap);
        if inner.active_pairs.get(&key) == Some(id.as_uuid()) {
            inner.active_pairs.remove(&key);
        }
        Ok(true)
    }

    async fn find_active_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Swap>, SwapPersistenceError> {
        let inner = self.read().map_err(swap_query_error)?;
        Ok(inner
            .active_pairs
            .get(&pair_key(a, b))
            .and_then(|id| inner.swaps.get(id))
            .cloned())
    }

    async fn list_involving(&self, user: &UserId) -> Result<Vec<Swap>, SwapPersistenceError> {
        let inner = self.read().map_err(swap_query_error)?;
        Ok(inner
            .swap_order
            .iter()
            .filter_map(|id| inner.swaps.get(id))
            .filter(|swap| swap.involves(user))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Swap>, SwapPersistenceError> {
        let inner = self.read().map_err(swap_query_error)?;
        Ok(inner
            .swap_order
            .iter()
            .filter_map(|id| inner.swaps.get(id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FeedbackLog for MemoryStore {
    async fn append(&self, entry: &FeedbackLogEntry) -> Result<(), FeedbackLogError> {
        let mut inner = self.write().map_err(|message| FeedbackLogError::Query {
            message: message.to_owned(),
        })?;
        inner.feedback_log.push(entry.clone());
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<FeedbackLogEntry>, FeedbackLogError> {
        let inner = self.read().map_err(|message| FeedbackLogError::Query {
            message: message.to_owned(),
        })?;
        Ok(inner.feedback_log.clone())
    }
}

#[async_trait]
impl AdminMessageRepository for MemoryStore {
    async fn append(&self, message: &AdminMessage) -> Result<(), MessagePersistenceError> {
        let mut inner = self.write().map_err(|message| MessagePersistenceError::Query {
            message: message.to_owned(),
        })?;
        inner.messages.push(message.clone());
        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<AdminMessage>, MessagePersistenceError> {
        let inner = self.read().map_err(|message| MessagePersistenceError::Query {
            message: message.to_owned(),
        })?;
        Ok(inner.messages.iter().rev().cloned().collect())
    }

    async fn latest(&self) -> Result<Option<AdminMessage>, MessagePersistenceError> {
        let inner = self.read().map_err(|message| MessagePersistenceError::Query {
            message: message.to_owned(),
        })?;
        Ok(inner.messages.last().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::swap::SwapDecision;
    use crate::domain::user::{Credential, DisplayName, EmailAddress};

    fn user(name: &str, email: &str) -> User {
        User::new(
            DisplayName::new(name).expect("valid name"),
            EmailAddress::new(email).expect("valid email"),
            Credential::new("password123").expect("valid credential"),
        )
    }

    fn swap_between(from: &User, to: &User) -> Swap {
        Swap::propose(*from.id(), *to.id(), "Cooking".into(), "Programming".into())
    }

    #[tokio::test]
    async fn insert_enforces_unique_email() {
        let store = MemoryStore::new();
        store
            .insert(&user("Priya Sharma", "priya@example.com"))
            .await
            .expect("first insert succeeds");

        let error = store
            .insert(&user("Other Priya", "priya@example.com"))
            .await
            .expect_err("duplicate email");
        assert!(matches!(
            error,
            UserPersistenceError::DuplicateEmail { .. }
        ));
    }

    #[tokio::test]
    async fn list_all_preserves_insertion_order() {
        let store = MemoryStore::new();
        for (name, email) in [
            ("Priya Sharma", "priya@example.com"),
            ("Arjun Patel", "arjun@example.com"),
            ("Meera Reddy", "meera@example.com"),
        ] {
            store.insert(&user(name, email)).await.expect("insert");
        }

        let names: Vec<String> = UserRepository::list_all(&store)
            .await
            .expect("listing")
            .iter()
            .map(|u| u.name().as_ref().to_owned())
            .collect();
        assert_eq!(names, ["Priya Sharma", "Arjun Patel", "Meera Reddy"]);
    }

    #[tokio::test]
    async fn update_missing_user_fails() {
        let store = MemoryStore::new();
        let error = UserRepository::update(&store, &user("Priya Sharma", "priya@example.com"))
            .await
            .expect_err("missing user");
        assert!(matches!(error, UserPersistenceError::Missing { .. }));
    }

    #[tokio::test]
    async fn find_by_email_uses_the_index() {
        let store = MemoryStore::new();
        let priya = user("Priya Sharma", "priya@example.com");
        store.insert(&priya).await.expect("insert");

        let found = store
            .find_by_email(&EmailAddress::new("priya@example.com").expect("valid email"))
            .await
            .expect("lookup")
            .expect("user found");
        assert_eq!(found.id(), priya.id());

        assert!(store
            .find_by_email(&EmailAddress::new("nobody@example.com").expect("valid email"))
            .await
            .expect("lookup")
            .is_none());
    }

    #[tokio::test]
    async fn insert_pending_rejects_an_active_pair_in_either_direction() {
        let store = MemoryStore::new();
        let a = user("Priya Sharma", "priya@example.com");
        let b = user("Arjun Patel", "arjun@example.com");
        store.insert(&a).await.expect("insert a");
        store.insert(&b).await.expect("insert b");

        store
            .insert_pending(&swap_between(&a, &b))
            .await
            .expect("first swap succeeds");

        let error = store
            .insert_pending(&swap_between(&a, &b))
            .await
            .expect_err("same direction");
        assert!(matches!(
            error,
            SwapPersistenceError::ActivePairExists { .. }
        ));

        let error = store
            .insert_pending(&swap_between(&b, &a))
            .await
            .expect_err("reverse direction");
        assert!(matches!(
            error,
            SwapPersistenceError::ActivePairExists { .. }
        ));
    }

    #[tokio::test]
    async fn rejection_clears_the_active_pair_index() {
        let store = MemoryStore::new();
        let a = user("Priya Sharma", "priya@example.com");
        let b = user("Arjun Patel", "arjun@example.com");
        let mut swap = swap_between(&a, &b);
        store.insert_pending(&swap).await.expect("insert swap");

        swap.decide(SwapDecision::Rejected);
        SwapRepository::update(&store, &swap).await.expect("update swap");

        assert!(store
            .find_active_between(a.id(), b.id())
            .await
            .expect("lookup")
            .is_none());
        store
            .insert_pending(&swap_between(&a, &b))
            .await
            .expect("pair is free again");
    }

    #[tokio::test]
    async fn acceptance_keeps_the_pair_active() {
        let store = MemoryStore::new();
        let a = user("Priya Sharma", "priya@example.com");
        let b = user("Arjun Patel", "arjun@example.com");
        let mut swap = swap_between(&a, &b);
        store.insert_pending(&swap).await.expect("insert swap");

        swap.decide(SwapDecision::Accepted);
        SwapRepository::update(&store, &swap).await.expect("update swap");

        assert!(store
            .find_active_between(b.id(), a.id())
            .await
            .expect("lookup")
            .is_some());
    }

    #[tokio::test]
    async fn delete_removes_the_swap_and_frees_the_pair() {
        let store = MemoryStore::new();
        let a = user("Priya Sharma", "priya@example.com");
        let b = user("Arjun Patel", "arjun@example.com");
        let swap = swap_between(&a, &b);
        store.insert_pending(&swap).await.expect("insert swap");

        assert!(store.delete(swap.id()).await.expect("delete"));
        assert!(!store.delete(swap.id()).await.expect("second delete"));
        assert!(SwapRepository::find_by_id(&store, swap.id())
            .await
            .expect("lookup")
            .is_none());
        store
            .insert_pending(&swap_between(&a, &b))
            .await
            .expect("pair is free again");
    }

    #[tokio::test]
    async fn list_involving_filters_by_participant() {
        let store = MemoryStore::new();
        let a = user("Priya Sharma", "priya@example.com");
        let b = user("Arjun Patel", "arjun@example.com");
        let c = user("Meera Reddy", "meera@example.com");
        store.insert_pending(&swap_between(&a, &b)).await.expect("a-b");
        store.insert_pending(&swap_between(&a, &c)).await.expect("a-c");

        assert_eq!(store.list_involving(a.id()).await.expect("a").len(), 2);
        assert_eq!(store.list_involving(b.id()).await.expect("b").len(), 1);
        assert_eq!(store.list_involving(c.id()).await.expect("c").len(), 1);
    }

    #[tokio::test]
    async fn message_history_is_newest_first() {
        let store = MemoryStore::new();
        let first = AdminMessage::broadcast("first").expect("valid message");
        let second = AdminMessage::broadcast("second").expect("valid message");
        AdminMessageRepository::append(&store, &first)
            .await
            .expect("append first");
        AdminMessageRepository::append(&store, &second)
            .await
            .expect("append second");

        let history = store.list_newest_first().await.expect("history");
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].id, first.id);
        assert_eq!(
            store.latest().await.expect("latest").expect("present").id,
            second.id
        );
    }
}

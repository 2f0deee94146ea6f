//! Identity Resolver
//!
//! Resolves a login identifier of unknown shape to one account by trying
//! each lookup strategy in a fixed order, each at most once.

use crate::application::identity_store::IdentityStore;
use crate::domain::entity::account::Account;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::email::EmailAddress;
use crate::error::{IdentityError, IdentityResult};

/// One way of interpreting an identifier token
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum LookupStrategy {
    #[display("username")]
    Username,
    #[display("email")]
    Email,
    #[display("uuid")]
    Uuid,
}

impl LookupStrategy {
    /// Evaluation order: the common case first
    pub const ORDER: [LookupStrategy; 3] = [
        LookupStrategy::Username,
        LookupStrategy::Email,
        LookupStrategy::Uuid,
    ];
}

/// Resolves identifier tokens against the store
pub struct IdentityResolver<R> {
    store: IdentityStore<R>,
}

impl<R> Clone for IdentityResolver<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<R: IdentityRepository> IdentityResolver<R> {
    pub fn new(store: IdentityStore<R>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, token: &str) -> IdentityResult<Account> {
        self.resolve_with_strategy(token)
            .await
            .map(|(account, _)| account)
    }

    /// Resolve and report which strategy matched
    ///
    /// A strategy that finds nothing or rejects the token's shape hands over
    /// to the next one. Store failures end the search.
    pub async fn resolve_with_strategy(
        &self,
        token: &str,
    ) -> IdentityResult<(Account, LookupStrategy)> {
        for strategy in LookupStrategy::ORDER {
            match self.attempt(strategy, token).await {
                Ok(Some(account)) => {
                    tracing::debug!(account_id = %account.id, %strategy, "Identifier resolved");
                    return Ok((account, strategy));
                }
                Ok(None) => {
                    tracing::debug!(%strategy, "Identifier is not of this kind");
                }
                Err(IdentityError::NotFound | IdentityError::Validation(_)) => {
                    tracing::debug!(%strategy, "No match, trying next strategy");
                }
                Err(e) => return Err(e),
            }
        }

        Err(IdentityError::NotFound)
    }

    /// `Ok(None)` when the strategy does not apply to this token
    async fn attempt(
        &self,
        strategy: LookupStrategy,
        token: &str,
    ) -> IdentityResult<Option<Account>> {
        match strategy {
            LookupStrategy::Username => self.store.find_by_username(token).await.map(Some),
            LookupStrategy::Email => match EmailAddress::parse(token) {
                Ok(email) => self.store.find_by_email(&email).await.map(Some),
                Err(_) => Ok(None),
            },
            LookupStrategy::Uuid => self.store.find_by_uuid(token).await.map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::IdentityConfig;
    use crate::application::fake::InMemoryIdentityRepository;
    use std::sync::Arc;

    struct Fixture {
        resolver: IdentityResolver<InMemoryIdentityRepository>,
        store: IdentityStore<InMemoryIdentityRepository>,
        repo: Arc<InMemoryIdentityRepository>,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryIdentityRepository::default());
        let store = IdentityStore::new(Arc::clone(&repo), &IdentityConfig::default());
        Fixture {
            resolver: IdentityResolver::new(store.clone()),
            store,
            repo,
        }
    }

    async fn create(
        store: &IdentityStore<InMemoryIdentityRepository>,
        email: &str,
    ) -> Account {
        let email = EmailAddress::parse(email).unwrap();
        store
            .create_account("Grace", "Hopper", &email, "Passw0rd!")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_username_short_circuits() {
        let f = fixture();
        let account = create(&f.store, "grace@example.com").await;
        f.store.set_username(&account.id, "ghopper").await.unwrap();
        f.repo.clear_calls().await;

        let (found, strategy) = f.resolver.resolve_with_strategy("ghopper").await.unwrap();

        assert_eq!(found.id, account.id);
        assert_eq!(strategy, LookupStrategy::Username);
        assert_eq!(f.repo.calls().await, vec!["find_by_username"]);
    }

    #[tokio::test]
    async fn test_email_found_when_no_username_matches() {
        let f = fixture();
        let account = create(&f.store, "grace@example.com").await;
        f.store.set_username(&account.id, "ghopper").await.unwrap();
        f.repo.clear_calls().await;

        let (found, strategy) = f
            .resolver
            .resolve_with_strategy("Grace@Example.com")
            .await
            .unwrap();

        assert_eq!(found.id, account.id);
        assert_eq!(strategy, LookupStrategy::Email);
        assert_eq!(f.repo.calls().await, vec!["find_by_username", "find_by_email"]);
    }

    #[tokio::test]
    async fn test_uuid_found_last() {
        let f = fixture();
        let account = create(&f.store, "grace@example.com").await;
        f.repo.clear_calls().await;

        let (found, strategy) = f
            .resolver
            .resolve_with_strategy(&account.id.to_string())
            .await
            .unwrap();

        assert_eq!(found.id, account.id);
        assert_eq!(strategy, LookupStrategy::Uuid);
        // A UUID passes the username syntax check but is not an email
        assert_eq!(f.repo.calls().await, vec!["find_by_username", "find_by_id"]);
    }

    #[tokio::test]
    async fn test_nothing_matches() {
        let f = fixture();
        create(&f.store, "grace@example.com").await;
        f.repo.clear_calls().await;

        let result = f.resolver.resolve("nobody@example.com").await;

        assert!(matches!(result, Err(IdentityError::NotFound)));
        assert_eq!(
            f.repo.calls().await,
            vec!["find_by_username", "find_by_email"]
        );
    }

    #[tokio::test]
    async fn test_malformed_token_is_not_found() {
        let f = fixture();

        let result = f.resolver.resolve("has spaces in it").await;

        assert!(matches!(result, Err(IdentityError::NotFound)));
        assert!(f.repo.calls().await.is_empty());
    }

    #[test]
    fn test_strategy_order() {
        assert_eq!(
            LookupStrategy::ORDER,
            [
                LookupStrategy::Username,
                LookupStrategy::Email,
                LookupStrategy::Uuid
            ]
        );
        assert_eq!(LookupStrategy::Email.to_string(), "email");
    }
}

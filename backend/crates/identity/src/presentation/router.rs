//! Identity Router

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::application::{IdentityConfig, IdentityStore};
use crate::domain::repository::IdentityRepository;
use crate::infra::postgres::PgIdentityRepository;
use crate::presentation::handlers::{self, IdentityAppState};

/// Create the Identity router with PostgreSQL repository
pub fn identity_router(repo: PgIdentityRepository, config: IdentityConfig) -> Router {
    identity_router_generic(Arc::new(repo), config)
}

/// Create a generic Identity router for any repository implementation
///
/// `/me` routes require a [`CallerIdentity`](crate::presentation::CallerIdentity)
/// in the request extensions and answer 401 without one.
pub fn identity_router_generic<R: IdentityRepository>(
    repo: Arc<R>,
    config: IdentityConfig,
) -> Router {
    let store = IdentityStore::new(repo, &config);
    let state = IdentityAppState {
        store,
        config: Arc::new(config),
    };

    Router::new()
        // Public
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/signin", post(handlers::sign_in::<R>))
        .route("/verify-email", post(handlers::verify_email::<R>))
        // Caller-scoped
        .route("/me", get(handlers::me::<R>))
        .route("/me/password", put(handlers::set_password::<R>))
        .route("/me/username", put(handlers::set_username::<R>))
        .route("/me/name", put(handlers::set_name::<R>))
        .route("/me/info", put(handlers::set_info::<R>))
        .route("/me/email", put(handlers::set_email::<R>))
        .route("/me/roles", get(handlers::roles::<R>))
        .route("/me/permissions", get(handlers::permissions::<R>))
        .route("/me/role-permissions", get(handlers::role_permissions::<R>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::EmailVerificationUseCase;
    use crate::application::fake::InMemoryIdentityRepository;
    use crate::domain::value_object::account_id::AccountId;
    use crate::presentation::CallerIdentity;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct Fixture {
        app: Router,
        repo: Arc<InMemoryIdentityRepository>,
        config: IdentityConfig,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryIdentityRepository::with_standard_role());
        let config = IdentityConfig::development();
        Fixture {
            app: identity_router_generic(Arc::clone(&repo), config.clone()),
            repo,
            config,
        }
    }

    impl Fixture {
        async fn call(
            &self,
            caller: Option<AccountId>,
            method: Method,
            uri: &str,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut request = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json");
            if let Some(id) = caller {
                request = request.extension(CallerIdentity(id));
            }
            let request = match body {
                Some(body) => request.body(Body::from(body.to_string())).unwrap(),
                None => request.body(Body::empty()).unwrap(),
            };

            let response = self.app.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, value)
        }

        async fn signup(&self, email: &str, password: &str) -> (StatusCode, Value) {
            let body = json!({
                "firstName": "Edsger",
                "lastName": "Dijkstra",
                "email": email,
                "password": password,
            });
            self.call(None, Method::POST, "/signup", Some(body)).await
        }

        async fn signin(&self, identifier: &str, password: &str) -> (StatusCode, Value) {
            let body = json!({ "identifier": identifier, "password": password });
            self.call(None, Method::POST, "/signin", Some(body)).await
        }

        /// The code as the mailbox owner would receive it
        async fn mailed_code(&self, id: &str) -> String {
            let store = IdentityStore::new(Arc::clone(&self.repo), &self.config);
            let id = AccountId::parse_str(id).unwrap();
            EmailVerificationUseCase::new(store)
                .issue(&id)
                .await
                .unwrap()
                .into_inner()
        }
    }

    fn account_id(body: &Value) -> String {
        body["account"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_signup_then_reissue_then_reject() {
        let f = fixture();

        let (status, body) = f.signup("edsger@example.com", "GoTo1968!").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["state"], "created");
        assert_eq!(body["account"]["username"], "edsger@example.com");
        assert!(body["account"].get("passwordHash").is_none());
        let id = account_id(&body);

        let (status, body) = f.signup("edsger@example.com", "Semaph0re").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "reissued");
        assert_eq!(body["account"]["id"], id.as_str());

        let code = f.mailed_code(&id).await;
        let (status, body) = f
            .call(
                None,
                Method::POST,
                "/verify-email",
                Some(json!({ "email": "edsger@example.com", "code": code })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id.as_str());

        let (status, body) = f.signup("edsger@example.com", "GoTo1968!").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["action"], "Please sign up with another email address");
    }

    #[tokio::test]
    async fn test_unverified_signup_cannot_be_claimed_without_the_mailbox() {
        let f = fixture();
        let (_, body) = f.signup("edsger@example.com", "Squatter1").await;
        let id = account_id(&body);

        let (status, _) = f
            .call(None, Method::POST, &format!("/accounts/{id}/otp"), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (guess_status, guess) = f
            .call(
                None,
                Method::POST,
                "/verify-email",
                Some(json!({ "email": "edsger@example.com", "code": "123456" })),
            )
            .await;
        let (unknown_status, unknown) = f
            .call(
                None,
                Method::POST,
                "/verify-email",
                Some(json!({ "email": "nobody@example.com", "code": "123456" })),
            )
            .await;
        assert_eq!(guess_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(guess, unknown);

        // The real owner can still take the address over
        let (status, body) = f.signup("edsger@example.com", "GoTo1968!").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "reissued");

        let (status, _) = f.signin("edsger@example.com", "Squatter1").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = f.signin("edsger@example.com", "GoTo1968!").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_signin_does_not_enumerate_accounts() {
        let f = fixture();
        f.signup("edsger@example.com", "GoTo1968!").await;

        let (status, body) = f.signin("edsger@example.com", "GoTo1968!").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "edsger@example.com");

        let (wrong_status, wrong) = f.signin("edsger@example.com", "Wrong-pass").await;
        let (unknown_status, unknown) = f.signin("nobody@example.com", "GoTo1968!").await;

        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong, unknown);
    }

    #[tokio::test]
    async fn test_anonymous_caller_learns_nothing_about_accounts() {
        let f = fixture();
        let (_, body) = f.signup("edsger@example.com", "GoTo1968!").await;
        let known = account_id(&body);
        let unknown = AccountId::new().to_string();

        for identifier in [known.as_str(), "edsger@example.com"] {
            let found = json!({ "identifier": identifier });
            let missing = json!({ "identifier": "nobody@example.com" });
            let (known_status, known_body) =
                f.call(None, Method::POST, "/resolve", Some(found)).await;
            let (unknown_status, unknown_body) =
                f.call(None, Method::POST, "/resolve", Some(missing)).await;
            assert_eq!(known_status, unknown_status);
            assert_eq!(known_body, unknown_body);
        }

        let (known_status, known_body) = f
            .call(None, Method::GET, &format!("/accounts/{known}"), None)
            .await;
        let (unknown_status, unknown_body) = f
            .call(None, Method::GET, &format!("/accounts/{unknown}"), None)
            .await;
        assert_eq!(known_status, unknown_status);
        assert_eq!(known_body, unknown_body);

        let (status, body) = f.call(None, Method::GET, "/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Sign in required");
    }

    #[tokio::test]
    async fn test_account_changes_need_a_caller() {
        let f = fixture();
        let (_, body) = f.signup("edsger@example.com", "GoTo1968!").await;
        let id = account_id(&body);

        let (status, _) = f
            .call(
                None,
                Method::PUT,
                "/me/password",
                Some(json!({ "password": "Hijacked1" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = f
            .call(
                None,
                Method::PUT,
                &format!("/accounts/{id}/password"),
                Some(json!({ "password": "Hijacked1" })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = f.signin("edsger@example.com", "Hijacked1").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = f.signin("edsger@example.com", "GoTo1968!").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_caller_updates_and_views() {
        let f = fixture();
        let (_, body) = f.signup("edsger@example.com", "GoTo1968!").await;
        let caller = Some(AccountId::parse_str(&account_id(&body)).unwrap());

        let (status, _) = f
            .call(
                caller,
                Method::PUT,
                "/me/username",
                Some(json!({ "username": "ewd" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = f
            .call(
                caller,
                Method::PUT,
                "/me/info",
                Some(json!({
                    "username": "ewdijkstra",
                    "firstName": "Edsger",
                    "lastName": "Wybe Dijkstra",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = f.call(caller, Method::GET, "/me", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "ewdijkstra");
        assert_eq!(body["lastName"], "Wybe Dijkstra");

        let (status, body) = f.call(caller, Method::GET, "/me/roles", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["roles"], json!(["Standard"]));

        let (status, body) = f
            .call(caller, Method::GET, "/me/role-permissions", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_caller_without_account() {
        let f = fixture();

        let (status, _) = f
            .call(Some(AccountId::new()), Method::GET, "/me", None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

//! Signup/login/logout protocol and session validation.

use std::sync::Arc;

use parking_lot::Mutex;
use skygate_core::ApiClient;
use tracing::instrument;

use crate::session::{
    AuthStatus, LoginForm, LoginResponse, LoginResult, Session, SignupForm, SignupResponse,
    SignupResult, VerifyResponse,
};
use crate::storage::{SessionStore, StoredSession};

const VERIFY_PATH: &str = "/verify";
const SIGNUP_PATH: &str = "/signup";
const LOGIN_PATH: &str = "/login";
const LOGOUT_PATH: &str = "/logout";

/// Owns authentication state and the persisted session token.
pub struct SessionController {
    client: ApiClient,
    store: Arc<dyn SessionStore>,
    session: Mutex<Session>,
    /// Token a logout failed to remove from storage. It never authenticates
    /// again in this process.
    revoked: Mutex<Option<String>>,
}

impl SessionController {
    /// Starts Unauthenticated; call [`check_auth`](Self::check_auth) to
    /// validate any stored token.
    pub fn new(client: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        Self {
            client,
            store,
            session: Mutex::new(Session::default()),
            revoked: Mutex::new(None),
        }
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.session.lock().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.lock().is_authenticated
    }

    /// Validate the stored token against the server.
    ///
    /// No stored token means Unauthenticated without a network call. Any
    /// failure of the verify request also reports Unauthenticated; the stored
    /// token is left in place either way.
    #[instrument(skip(self), level = "info")]
    pub async fn check_auth(&self) -> AuthStatus {
        let Some(token) = self.store.token() else {
            tracing::debug!("No stored session");
            *self.session.lock() = Session::default();
            return AuthStatus::Unauthenticated;
        };

        if self.revoked.lock().as_deref() == Some(token.as_str()) {
            tracing::debug!("Stored session was logged out, skipping verify");
            *self.session.lock() = Session::default();
            return AuthStatus::Unauthenticated;
        }

        let status = match self
            .client
            .get_json::<VerifyResponse>(VERIFY_PATH, Some(&token))
            .await
        {
            Ok(resp) => AuthStatus::from(resp.valid),
            Err(e) => {
                tracing::error!(kind = ?e.kind(), "Session verification failed: {}", e);
                AuthStatus::Unauthenticated
            }
        };

        tracing::info!("Session check: {:?}", status);
        *self.session.lock() = Session {
            token: Some(token),
            is_authenticated: status.is_authenticated(),
        };
        status
    }

    /// Register a new account. Does not log the user in.
    #[instrument(skip(self, form), level = "info")]
    pub async fn signup(&self, form: &SignupForm) -> SignupResult {
        match self
            .client
            .post_json::<_, SignupResponse>(SIGNUP_PATH, form, None)
            .await
        {
            Ok(resp) if resp.ok => {
                tracing::info!("Signup succeeded");
                SignupResult::Created
            }
            Ok(_) => {
                tracing::info!("Signup rejected: account exists");
                SignupResult::AlreadyExists
            }
            Err(e) => {
                tracing::error!(kind = ?e.kind(), "Signup error: {}", e);
                SignupResult::RequestFailed(e.user_message().to_string())
            }
        }
    }

    /// Log in and persist the returned token.
    ///
    /// On any failure nothing is persisted and the session is unchanged.
    #[instrument(skip(self, form), level = "info")]
    pub async fn login(&self, form: &LoginForm) -> LoginResult {
        let resp = match self
            .client
            .post_json::<_, LoginResponse>(LOGIN_PATH, form, None)
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!(kind = ?e.kind(), "Login error: {}", e);
                return LoginResult::RequestFailed {
                    explanation: format!("Login failed: {}", e.user_message()),
                };
            }
        };

        if !resp.ok {
            tracing::info!("Login rejected");
            return LoginResult::Rejected {
                explanation: resp
                    .explanation
                    .unwrap_or_else(|| "Invalid email or password".to_string()),
            };
        }

        let Some(token) = resp.token.filter(|t| !t.is_empty()) else {
            tracing::error!("Login succeeded but response carried no token");
            return LoginResult::RequestFailed {
                explanation: "Login failed: the server did not return a session".to_string(),
            };
        };

        if let Err(e) = self.store.save(&StoredSession {
            token: token.clone(),
        }) {
            tracing::error!("Failed to persist session: {}", e);
            return LoginResult::RequestFailed {
                explanation: format!("Login failed: {}", e.user_message()),
            };
        }

        *self.revoked.lock() = None;
        *self.session.lock() = Session {
            token: Some(token.clone()),
            is_authenticated: true,
        };

        LoginResult::Success {
            token,
            explanation: resp
                .explanation
                .unwrap_or_else(|| "Logged in successfully".to_string()),
        }
    }

    /// Tell the server we're leaving, then always clear the local session.
    ///
    /// Remote failures are logged only. If the stored record cannot be
    /// removed, its token is revoked locally so `check_auth` keeps reporting
    /// Unauthenticated until the next login.
    #[instrument(skip(self), level = "info")]
    pub async fn logout(&self) {
        let token = self.store.token();
        match &token {
            Some(token) => {
                match self
                    .client
                    .post_discard(LOGOUT_PATH, &serde_json::json!({}), Some(token))
                    .await
                {
                    Ok(()) => tracing::info!("Logout request sent to server"),
                    Err(e) => tracing::warn!(kind = ?e.kind(), "Logout request failed: {}", e),
                }
            }
            None => tracing::debug!("No stored session, skipping remote logout"),
        }

        if let Err(e) = self.store.clear() {
            tracing::error!("Failed to clear stored session: {}", e);
            *self.revoked.lock() = token;
        }
        *self.session.lock() = Session::default();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::storage::{MemorySessionStore, StoreError};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Store whose record cannot be removed
    struct StuckStore(MemorySessionStore);

    impl SessionStore for StuckStore {
        fn load(&self) -> Result<Option<StoredSession>, StoreError> {
            self.0.load()
        }

        fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
            self.0.save(session)
        }

        fn clear(&self) -> Result<(), StoreError> {
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied).into())
        }
    }

    fn controller(server: &MockServer, store: Arc<dyn SessionStore>) -> SessionController {
        SessionController::new(ApiClient::new(&server.uri(), None).unwrap(), store)
    }

    #[tokio::test]
    async fn test_check_auth_without_token_skips_network() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"valid": true})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let ctrl = controller(&mock_server, Arc::new(MemorySessionStore::new()));
        assert_eq!(ctrl.check_auth().await, AuthStatus::Unauthenticated);
        assert_eq!(ctrl.session(), Session::default());
    }

    #[tokio::test]
    async fn test_check_auth_rejected_token_keeps_storage() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/verify"))
            .and(header("Authorization", "Bearer forged"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"valid": false})))
            .mount(&mock_server)
            .await;

        let store = Arc::new(MemorySessionStore::with_token("forged"));
        let ctrl = controller(&mock_server, store.clone());

        assert_eq!(ctrl.check_auth().await, AuthStatus::Unauthenticated);
        assert!(!ctrl.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("forged"));
    }

    #[tokio::test]
    async fn test_signup_outcomes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/signup"))
            .and(body_json(serde_json::json!({
                "name": "Ada", "email": "ada@example.com", "password": "pw"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"bool": true})))
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/signup"))
            .and(body_json(serde_json::json!({
                "name": "Bob", "email": "bob@example.com", "password": "pw"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"bool": false})))
            .mount(&mock_server)
            .await;

        let ctrl = controller(&mock_server, Arc::new(MemorySessionStore::new()));

        let created = ctrl
            .signup(&SignupForm {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                password: "pw".into(),
            })
            .await;
        assert_eq!(created, SignupResult::Created);
        assert!(!ctrl.is_authenticated());

        let exists = ctrl
            .signup(&SignupForm {
                name: "Bob".into(),
                email: "bob@example.com".into(),
                password: "pw".into(),
            })
            .await;
        assert_eq!(exists, SignupResult::AlreadyExists);
    }

    #[tokio::test]
    async fn test_signup_transport_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/signup"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let ctrl = controller(&mock_server, Arc::new(MemorySessionStore::new()));
        let result = ctrl.signup(&SignupForm::default()).await;
        assert!(matches!(result, SignupResult::RequestFailed(_)));
    }

    #[tokio::test]
    async fn test_login_rejected_persists_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bool": false,
                "explanation": "Incorrect password"
            })))
            .mount(&mock_server)
            .await;

        let store = Arc::new(MemorySessionStore::new());
        let ctrl = controller(&mock_server, store.clone());

        let result = ctrl.login(&LoginForm::default()).await;
        assert_eq!(
            result,
            LoginResult::Rejected {
                explanation: "Incorrect password".into()
            }
        );
        assert!(store.token().is_none());
        assert!(!ctrl.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_success_without_token_is_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bool": true,
                "explanation": "ok"
            })))
            .mount(&mock_server)
            .await;

        let store = Arc::new(MemorySessionStore::new());
        let ctrl = controller(&mock_server, store.clone());

        let result = ctrl.login(&LoginForm::default()).await;
        assert!(matches!(result, LoginResult::RequestFailed { .. }));
        assert!(store.token().is_none());
    }

    #[tokio::test]
    async fn test_logout_without_token_skips_network() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/logout"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let ctrl = controller(&mock_server, Arc::new(MemorySessionStore::new()));
        ctrl.logout().await;
        assert_eq!(ctrl.session(), Session::default());
    }

    #[tokio::test]
    async fn test_logout_with_stuck_storage_stays_logged_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/verify"))
            .and(header("Authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"valid": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let store = Arc::new(StuckStore(MemorySessionStore::with_token("abc")));
        let ctrl = controller(&mock_server, store.clone());

        assert_eq!(ctrl.check_auth().await, AuthStatus::Authenticated);

        ctrl.logout().await;
        assert!(!ctrl.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("abc"));

        // The leftover record must not log the user back in
        assert_eq!(ctrl.check_auth().await, AuthStatus::Unauthenticated);
        assert!(!ctrl.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_after_stuck_logout_authenticates_again() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bool": true,
                "explanation": "ok",
                "token": "abc"
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"valid": true})))
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/logout"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let ctrl = controller(
            &mock_server,
            Arc::new(StuckStore(MemorySessionStore::new())),
        );

        assert!(ctrl.login(&LoginForm::default()).await.is_success());
        ctrl.logout().await;
        assert_eq!(ctrl.check_auth().await, AuthStatus::Unauthenticated);

        assert!(ctrl.login(&LoginForm::default()).await.is_success());
        assert_eq!(ctrl.check_auth().await, AuthStatus::Authenticated);
    }
}

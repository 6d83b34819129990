use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{AuthenticationError, RequestError};
use crate::AdminClient;

/// Message shown after any failed login.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Snapshot of the [`AuthStore`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Token obtained at login.
    pub token: Option<String>,
    /// A login succeeded and no logout happened since.
    pub is_logged_in: bool,
    /// Message describing the last failed login.
    pub error: Option<String>,
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("token", &self.token.as_ref().map(|_| "***REDACTED***"))
            .field("is_logged_in", &self.is_logged_in)
            .field("error", &self.error)
            .finish()
    }
}

/// Login state of the admin.
///
/// The token is kept in memory and in the session cookie, which every other store reads
/// through the shared [`Session`](crate::Session).
#[derive(Debug, Clone)]
pub struct AuthStore {
    client: AdminClient,
    state: Arc<RwLock<AuthState>>,
}

impl AuthStore {
    /// Creates a logged-out store.
    #[must_use]
    pub fn new(client: AdminClient) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(AuthState::default())),
        }
    }

    /// Current state.
    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    /// Whether a login succeeded and no logout happened since.
    pub async fn is_logged_in(&self) -> bool {
        self.state.read().await.is_logged_in
    }

    /// Logs in once, without retrying.
    ///
    /// On success the token is written to the session cookie for an hour. On failure the
    /// state's error is set and the error is returned so the login form can react.
    ///
    /// # Example
    /// ```rust,ignore
    /// if let Err(error) = state.auth.login("admin@example.com", "YOUR_PASSWORD").await {
    ///     eprintln!("{error}");
    /// }
    /// ```
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthenticationError> {
        if email.trim().is_empty() || password.is_empty() {
            self.state.write().await.error = Some(INVALID_CREDENTIALS.to_string());

            return Err(AuthenticationError::EmptyField {
                email: email.trim().is_empty(),
                password: password.is_empty(),
            });
        }

        match self.client.auth_login(email, password).await {
            Ok(response) => {
                self.client.session().set_token(&response.token);

                *self.state.write().await = AuthState {
                    token: Some(response.token),
                    is_logged_in: true,
                    error: None,
                };
                tracing::info!("Logged in");

                Ok(())
            }
            Err(error) => {
                tracing::error!(%error, "Login failed");
                self.state.write().await.error = Some(INVALID_CREDENTIALS.to_string());

                Err(error.into())
            }
        }
    }

    /// Expires the session cookie and forgets the token. The backend is not contacted.
    pub async fn logout(&self) {
        self.client.session().clear_token();
        *self.state.write().await = AuthState::default();

        tracing::info!("Logged out");
    }

    /// Ends the session on the backend, then logs out locally.
    ///
    /// The local logout happens even if the backend call fails; that failure is returned.
    pub async fn sign_out(&self) -> Result<(), RequestError> {
        let result = self.client.auth_logout().await;
        if let Err(error) = &result {
            tracing::warn!(%error, "Backend logout failed, clearing the local session anyway");
        }

        self.logout().await;

        result
    }

    /// Adopts a token still present in the session cookie, e.g. after a restart.
    ///
    /// Returns whether the store is now logged in.
    pub async fn restore(&self) -> bool {
        let Some(token) = self.client.session().current_token() else {
            return false;
        };

        *self.state.write().await = AuthState {
            token: Some(token),
            is_logged_in: true,
            error: None,
        };

        true
    }

    /// The token held in the session cookie.
    #[must_use]
    pub fn get_token_from_cookie(&self) -> Option<String> {
        self.client.session().current_token()
    }
}

use serde::{Deserialize, Serialize};

use crate::api::{check_status, parse_json};
use crate::error::RequestError;
use crate::AdminClient;

#[derive(Clone, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Body returned by a successful login.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    /// The session token.
    pub token: String,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"***REDACTED***")
            .finish()
    }
}

impl AdminClient {
    /// Exchange admin credentials for a session token.
    ///
    /// The token is returned as-is; storing it in the session is up to the caller
    /// (see [`AuthStore::login`](crate::AuthStore::login)).
    pub async fn auth_login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, RequestError> {
        let url = self.url("auth/login");
        let credentials = Credentials { email, password };

        let request = self.request_post_json(&url, &credentials).send().await;

        parse_json(request).await
    }

    /// End the session on the backend.
    pub async fn auth_logout(&self) -> Result<(), RequestError> {
        let url = self.url("auth/logout");

        let request = self.request_post(&url).send().await;

        check_status(request).await.map(|_| ())
    }
}

//! `interview-admin` is a typed client and state-store layer for the interview
//! administration REST API: question packages, interviews, and the candidates' recorded
//! answers.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::error::Error;
//!
//! use interview_admin::{AppState, Config, PackageEditor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn Error>> {
//!     let state = AppState::from_config(&Config::from_env()?)?;
//!
//!     state.auth.login("admin@example.com", "YOUR_PASSWORD").await?;
//!
//!     let mut editor = PackageEditor::new("Backend Developer");
//!     editor.add_question("Tell us about a system you designed.", 3, 0)?;
//!     state.packages.add_package(&editor.finish()?).await?;
//!
//!     for package in state.packages.state().await.packages {
//!         println!("{}: {} questions", package.package_name, package.questions.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

use std::sync::Arc;

pub use api::auth::LoginResponse;
pub use api::Endpoint;
pub use cache::{KeyedCache, Ticket};
pub use config::Config;
pub use editor::{EditorQuestion, PackageEditor};
pub use error::*;
pub use models::*;
use reqwest::RequestBuilder;
use serde::Serialize;
pub use session::Session;
pub use store::{
    AppState, AuthState, AuthStore, CandidateVideo, InterviewState, InterviewStore, PackageState,
    PackageStore, VideoState, VideoStore, INVALID_CREDENTIALS,
};

pub(crate) mod api;
pub mod cache;
pub mod config;
pub mod editor;
pub mod error;
pub mod models;
pub mod session;
pub mod store;

/// A client for sending requests to the interview administration API.
///
/// Cloning is cheap: clones share the HTTP connection pool and the [`Session`].
///
/// The `Debug` implementation for this struct redacts the session token
/// to prevent accidental exposure in logs.
///
/// # Example
/// ```rust,ignore
/// let client = AdminClient::new("http://localhost:5000/api");
///
/// let token = client.auth_login("admin@example.com", "YOUR_PASSWORD").await?.token;
/// client.session().set_token(&token);
///
/// let packages: Vec<Package> = client.endpoint("question-package").list().await?;
/// ```
#[derive(Clone)]
pub struct AdminClient {
    pub(crate) base_url: String,
    pub(crate) user_url: Option<String>,
    pub(crate) session: Arc<Session>,
    pub(crate) reqwest_client: reqwest::Client,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.base_url)
            .field("user_url", &self.user_url)
            .field("session", &self.session)
            .field("reqwest_client", &"Client")
            .finish()
    }
}

impl AdminClient {
    /// Creates a new client with the default timeouts.
    ///
    /// # Example
    /// ```rust
    /// let client = interview_admin::AdminClient::new("http://localhost:5000/api");
    /// assert_eq!(client.base_url(), "http://localhost:5000/api");
    /// ```
    /// # Panics
    ///
    /// This method will panic if the provided `base_url` is not a valid http(s) URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let config = Config::new(base_url)
            .expect("Invalid base_url: must start with http:// or https://");

        Self::from_config(&config).expect("Failed to create HTTP client")
    }

    /// Creates a client from a [`Config`].
    ///
    /// The session's cookie jar is installed as the HTTP client's cookie provider, so the
    /// token cookie is forwarded with every request.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let session = Arc::new(Session::new(&config.base_url));

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .cookie_provider(session.jar())
            .build()?;

        Ok(Self {
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            user_url: config
                .user_url
                .as_ref()
                .map(|url| url.as_str().trim_end_matches('/').to_string()),
            session,
            reqwest_client: client,
        })
    }

    /// Creates a client around a custom reqwest client.
    ///
    /// The bearer token is still attached to every request, but cookies are only forwarded
    /// if `client` was built with `.cookie_provider(session.jar())` for the returned session.
    ///
    /// # Example
    /// ```rust
    /// use std::time::Duration;
    ///
    /// let reqwest_client = reqwest::Client::builder()
    ///     .timeout(Duration::from_secs(60))
    ///     .build()
    ///     .expect("Failed to build client");
    ///
    /// let client =
    ///     interview_admin::AdminClient::new_with_client("http://localhost:5000/api", reqwest_client);
    /// ```
    ///
    /// # Panics
    ///
    /// This method will panic if the provided `base_url` is not a valid http(s) URL.
    #[must_use]
    pub fn new_with_client(base_url: &str, client: reqwest::Client) -> Self {
        let config = Config::new(base_url)
            .expect("Invalid base_url: must start with http:// or https://");

        Self {
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            user_url: None,
            session: Arc::new(Session::new(&config.base_url)),
            reqwest_client: client,
        }
    }

    /// Returns the base URL of the API.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the candidate-facing site URL, if one was configured.
    #[must_use]
    pub fn user_url(&self) -> Option<&str> {
        self.user_url.as_deref()
    }

    /// The session holding the authentication token.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Creates an [`Endpoint`] for a CRUD resource such as `"question-package"` or `"interviews"`.
    ///
    /// # Panics
    ///
    /// This method will panic if the name is empty or contains characters other than
    /// alphanumerics, `-` and `_`.
    #[must_use]
    pub fn endpoint(&self, name: &'static str) -> Endpoint<'_> {
        assert!(!name.is_empty(), "Endpoint name cannot be empty");
        assert!(
            name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_'),
            "Endpoint name contains invalid characters. Only alphanumeric characters, dashes and underscores are allowed"
        );

        Endpoint { client: self, name }
    }

    /// Joins `path` onto the base URL.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl AdminClient {
    /// Adds the session token to the request as a bearer token, if there is one.
    pub(crate) fn with_authorization_token(
        &self,
        request_builder: RequestBuilder,
    ) -> RequestBuilder {
        if let Some(token) = self.session.current_token() {
            request_builder.bearer_auth(token)
        } else {
            request_builder
        }
    }

    /// Creates a GET request builder expecting a JSON response.
    pub(crate) fn request_get(&self, endpoint: &str) -> RequestBuilder {
        tracing::debug!(method = "GET", url = endpoint, "Sending API request");
        let request_builder = self
            .reqwest_client
            .get(endpoint)
            .header("Accept", "application/json");

        self.with_authorization_token(request_builder)
    }

    /// Creates a POST request builder without a body.
    pub(crate) fn request_post(&self, endpoint: &str) -> RequestBuilder {
        tracing::debug!(method = "POST", url = endpoint, "Sending API request");
        let request_builder = self.reqwest_client.post(endpoint);

        self.with_authorization_token(request_builder)
    }

    /// Creates a POST request builder with a JSON body.
    pub(crate) fn request_post_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> RequestBuilder {
        self.request_post(endpoint).json(params)
    }

    /// Creates a PUT request builder without a body.
    pub(crate) fn request_put(&self, endpoint: &str) -> RequestBuilder {
        tracing::debug!(method = "PUT", url = endpoint, "Sending API request");
        let request_builder = self.reqwest_client.put(endpoint);

        self.with_authorization_token(request_builder)
    }

    /// Creates a PUT request builder with a JSON body.
    pub(crate) fn request_put_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> RequestBuilder {
        self.request_put(endpoint).json(params)
    }

    /// Creates a DELETE request builder.
    pub(crate) fn request_delete(&self, endpoint: &str) -> RequestBuilder {
        tracing::debug!(method = "DELETE", url = endpoint, "Sending API request");
        let request_builder = self.reqwest_client.delete(endpoint);

        self.with_authorization_token(request_builder)
    }
}

//! State stores: one cache per domain, all sharing a single [`AdminClient`] and session.

mod auth;
mod crud;
mod interviews;
mod packages;
mod shared;
mod videos;

pub use auth::{AuthState, AuthStore, INVALID_CREDENTIALS};
pub use interviews::{InterviewState, InterviewStore};
pub use packages::{PackageState, PackageStore};
pub use videos::{CandidateVideo, VideoState, VideoStore};

use crate::config::Config;
use crate::error::ConfigError;
use crate::AdminClient;

/// Every store of the application, built around one client.
///
/// Pass it (or clones of individual stores) to whatever renders the state; all mutation
/// goes through the store actions.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The shared client.
    pub client: AdminClient,
    /// Login state.
    pub auth: AuthStore,
    /// Question packages.
    pub packages: PackageStore,
    /// Interviews.
    pub interviews: InterviewStore,
    /// Candidate submissions and videos.
    pub videos: VideoStore,
}

impl AppState {
    /// Builds the stores around `client`.
    #[must_use]
    pub fn new(client: AdminClient) -> Self {
        Self {
            auth: AuthStore::new(client.clone()),
            packages: PackageStore::new(client.clone()),
            interviews: InterviewStore::new(client.clone()),
            videos: VideoStore::new(client.clone()),
            client,
        }
    }

    /// Builds the client from `config`, then the stores.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        AdminClient::from_config(config).map(Self::new)
    }
}

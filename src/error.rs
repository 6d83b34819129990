//! Various errors module.

use std::fmt;

use thiserror::Error;

/// Represents errors when interacting with the interview administration API.
///
/// This enum provides a set of error types that may occur during
/// API requests, each indicating a specific issue encountered.
#[derive(Error, Debug)]
pub enum RequestError {
    /// Communication with the API was successful,
    /// but returned a [400 Bad Request]("https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/400") HTTP error response.
    ///
    /// Your request may be missing fields or its content doesn't match what the backend expects to receive.
    #[error("Bad Request: Something went wrong while processing your request. {0}")]
    BadRequest(String),
    /// Communication with the API was successful,
    /// but returned a [401 Unauthorized]("https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/401") HTTP error response.
    ///
    /// The session token is missing or expired.
    #[error("Unauthorized: The request requires a valid session token.")]
    Unauthorized,
    /// Communication with the API was successful,
    /// but returned a [403 Forbidden]("https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/403") HTTP error response.
    #[error("Forbidden: The authenticated admin may not have permissions for this interaction.")]
    Forbidden,
    /// Communication with the API was successful,
    /// but returned a [404 Not Found]("https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/404") HTTP error response.
    #[error("Not Found: The requested resource could not be found.")]
    NotFound,
    /// Too many requests were sent to the API.
    #[error("Too Many Requests: The server is rate limiting requests. Please wait before retrying.")]
    TooManyRequests,
    /// Communication with the API failed.
    ///
    /// This could be caused by an internet outage, a timeout, a wrong base URL
    /// and similar errors.
    #[error("Unreachable: The communication with the API failed: {0}")]
    Unreachable(String),
    /// The response could not be parsed into the expected data structure.
    #[error("Parse Error: Could not parse response into the expected data structure: {0}")]
    ParseError(String),
    /// The API answered with a status code this crate doesn't handle.
    #[error("An unhandled status code was returned by the API: {0}")]
    UnexpectedResponse(String),
}

impl From<reqwest::Error> for RequestError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Unreachable("Request timed out".to_string())
        } else if error.is_connect() {
            Self::Unreachable("Failed to connect to server".to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::Unreachable(error.to_string())
        }
    }
}

/// A client-side validation failure, raised before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The package name is blank.
    #[error("Please enter a package name.")]
    EmptyPackageName,
    /// A package must contain at least one question to be saved.
    #[error("Please add at least one question to the package.")]
    NoQuestions,
    /// The question at the given position has no text.
    #[error("Question {0} is empty.")]
    EmptyQuestion(usize),
    /// The question at the given position has no time allotted.
    #[error("Question {0} needs a time greater than zero.")]
    ZeroQuestionTime(usize),
    /// A question position outside the current list was given.
    #[error("There is no question at position {index} (the package has {len}).")]
    QuestionOutOfRange {
        /// The requested position (0-based).
        index: usize,
        /// Current number of questions.
        len: usize,
    },
    /// The interview title is blank.
    #[error("Please enter an interview title.")]
    EmptyTitle,
    /// An interview must reference at least one package.
    #[error("Please select at least one package.")]
    NoPackages,
}

/// Represents errors that can occur while logging in.
#[derive(Error, Debug)]
pub enum AuthenticationError {
    /// The backend rejected the given email/password combination.
    #[error("Authentication failed: Invalid Credentials. Given email and/or password is wrong.")]
    InvalidCredentials,
    /// Email and/or Password cannot be empty.
    ///
    /// The fields are represented as booleans:
    ///
    /// - `email`: is blank and shouldn't be.
    /// - `password`: is blank and shouldn't be.
    #[error("Authentication failed: Empty Credential Field. Given email and/or password is empty.")]
    EmptyField {
        /// Is email blank.
        email: bool,
        /// Is password blank.
        password: bool,
    },
    /// Any other failure while talking to the login endpoint.
    #[error("Authentication failed: {0}")]
    Request(RequestError),
}

impl From<RequestError> for AuthenticationError {
    fn from(error: RequestError) -> Self {
        match error {
            RequestError::BadRequest(_) | RequestError::Unauthorized | RequestError::NotFound => {
                Self::InvalidCredentials
            }
            other => Self::Request(other),
        }
    }
}

/// One of the three steps of removing a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionStep {
    /// Deleting the recorded video.
    Video,
    /// Deleting the user record.
    User,
    /// Removing the user reference from the interview.
    Unlink,
}

impl fmt::Display for DeletionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => f.write_str("delete video"),
            Self::User => f.write_str("delete user"),
            Self::Unlink => f.write_str("remove user from interview"),
        }
    }
}

/// A candidate deletion stopped part way.
///
/// Steps listed in `completed` already took effect on the backend and are not rolled back.
#[derive(Error, Debug)]
#[error("Failed to {failed} (completed steps: {completed:?}): {source}")]
pub struct DeleteCandidateError {
    /// The step that failed.
    pub failed: DeletionStep,
    /// Steps that succeeded before the failure.
    pub completed: Vec<DeletionStep>,
    /// Why the failing step was rejected.
    #[source]
    pub source: RequestError,
}

/// Some records of a multi-record deletion could not be deleted.
///
/// The other records were deleted and dropped from the cache.
#[derive(Error, Debug)]
#[error("Failed to delete {} of {attempted} records.", .failed.len())]
pub struct BulkDeleteError {
    /// How many deletions were attempted.
    pub attempted: usize,
    /// Ids that could not be deleted, with the reason.
    pub failed: Vec<(String, StoreError)>,
}

/// Errors returned by store actions.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Input was rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The request failed.
    #[error(transparent)]
    Request(#[from] RequestError),
    /// A candidate deletion stopped part way.
    #[error(transparent)]
    DeleteCandidate(#[from] DeleteCandidateError),
    /// Some records of a multi-record deletion failed.
    #[error(transparent)]
    BulkDelete(#[from] BulkDeleteError),
}

/// Errors raised while building the configuration or the client.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("Missing environment variable `{0}`.")]
    MissingVariable(&'static str),
    /// The base URL is not an absolute http(s) URL.
    #[error("Invalid base URL `{0}`: must be an absolute http:// or https:// URL.")]
    InvalidBaseUrl(String),
    /// The candidate-facing site URL is not an absolute http(s) URL.
    #[error("Invalid user URL `{0}`: must be an absolute http:// or https:// URL.")]
    InvalidUserUrl(String),
    /// A timeout variable is not a whole number of seconds.
    #[error("Invalid value `{value}` for `{name}`: expected a number of seconds.")]
    InvalidTimeout {
        /// The variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
    /// The HTTP client could not be built.
    #[error("Failed to build the HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

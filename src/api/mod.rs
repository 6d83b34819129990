use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::RequestError;
use crate::AdminClient;

pub mod auth;
pub mod crud;
pub mod interviews;
pub mod media;

/// A CRUD resource of the API, such as `question-package` or `interviews`.
///
/// Instances are created with [`AdminClient::endpoint`]. The resource exposes
/// `GET /{name}/list`, `POST /{name}/create`, `PUT /{name}/update/:id` and
/// `DELETE /{name}/delete/:id`.
///
/// # Fields
/// - `client`: The client the requests are sent through.
/// - `name`: The resource path segment.
pub struct Endpoint<'a> {
    pub(crate) client: &'a AdminClient,
    pub(crate) name: &'a str,
}

/// Error body returned by the backend.
#[derive(Deserialize, Debug)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Maps a sent request to its response, turning transport failures and non-2xx statuses
/// into [`RequestError`]s.
pub(crate) async fn check_status(
    request: Result<Response, reqwest::Error>,
) -> Result<Response, RequestError> {
    let response = request?;

    match response.status() {
        status if status.is_success() => Ok(response),

        StatusCode::BAD_REQUEST => {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_default();

            Err(RequestError::BadRequest(message))
        }

        StatusCode::UNAUTHORIZED => Err(RequestError::Unauthorized),
        StatusCode::FORBIDDEN => Err(RequestError::Forbidden),
        StatusCode::NOT_FOUND => Err(RequestError::NotFound),
        StatusCode::TOO_MANY_REQUESTS => Err(RequestError::TooManyRequests),

        status => Err(RequestError::UnexpectedResponse(status.to_string())),
    }
}

/// Like [`check_status`], then decodes the JSON body.
pub(crate) async fn parse_json<T: DeserializeOwned>(
    request: Result<Response, reqwest::Error>,
) -> Result<T, RequestError> {
    let response = check_status(request).await?;

    response
        .json::<T>()
        .await
        .map_err(|error| RequestError::ParseError(error.to_string()))
}

/// Rejects empty path ids before they turn `/delete/:id` into `/delete/`.
pub(crate) fn require_id(id: &str) -> Result<(), RequestError> {
    if id.trim().is_empty() {
        return Err(RequestError::BadRequest("Missing record id.".to_string()));
    }
    Ok(())
}

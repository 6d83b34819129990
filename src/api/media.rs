use serde::{Deserialize, Serialize};

use crate::api::{check_status, parse_json, require_id};
use crate::error::RequestError;
use crate::models::CandidateReview;
use crate::AdminClient;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoUrlRequest<'a> {
    video_id: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoUrlResponse {
    video_url: String,
}

#[derive(Serialize)]
struct WatchStatus {
    status: &'static str,
}

impl AdminClient {
    /// Resolve a stored video id to a playable URL.
    pub async fn video_url(&self, video_id: &str) -> Result<String, RequestError> {
        require_id(video_id)?;
        let url = self.url("upload/video-url");

        let request = self
            .request_post_json(&url, &VideoUrlRequest { video_id })
            .send()
            .await;

        parse_json::<VideoUrlResponse>(request)
            .await
            .map(|response| response.video_url)
    }

    /// Delete a recorded video.
    pub async fn delete_video(&self, video_id: &str) -> Result<(), RequestError> {
        require_id(video_id)?;
        let url = self.url(&format!("upload/videos/{video_id}"));

        let request = self.request_delete(&url).send().await;

        check_status(request).await.map(|_| ())
    }

    /// Mark a video as watched.
    pub async fn mark_video_watched(&self, video_id: &str) -> Result<(), RequestError> {
        require_id(video_id)?;
        let url = self.url(&format!("videos/{video_id}/watch-status"));

        let request = self
            .request_put_json(&url, &WatchStatus { status: "watched" })
            .send()
            .await;

        check_status(request).await.map(|_| ())
    }

    /// Save a reviewer's notes and verdict on a candidate.
    pub async fn update_user(
        &self,
        user_id: &str,
        review: &CandidateReview,
    ) -> Result<(), RequestError> {
        require_id(user_id)?;
        let url = self.url(&format!("users/{user_id}"));

        let request = self.request_put_json(&url, review).send().await;

        check_status(request).await.map(|_| ())
    }

    /// Delete a candidate's user record.
    pub async fn delete_user(&self, user_id: &str) -> Result<(), RequestError> {
        require_id(user_id)?;
        let url = self.url(&format!("users/delete/{user_id}"));

        let request = self.request_delete(&url).send().await;

        check_status(request).await.map(|_| ())
    }
}

use serde::Deserialize;

use crate::api::{check_status, parse_json, require_id};
use crate::error::RequestError;
use crate::models::{AnswerTiming, InterviewQuestion, PersonalForm};
use crate::AdminClient;

/// The personal-forms route nests the candidates under `userId`.
#[derive(Deserialize)]
struct PersonalFormsResponse {
    #[serde(rename = "userId", default)]
    users: Vec<PersonalForm>,
}

impl AdminClient {
    /// Fetch the questions asked in an interview, in order.
    pub async fn interview_questions(
        &self,
        interview_id: &str,
    ) -> Result<Vec<InterviewQuestion>, RequestError> {
        require_id(interview_id)?;
        let url = self.url(&format!("interviews/{interview_id}/questions"));

        let request = self.request_get(&url).send().await;

        parse_json(request).await
    }

    /// Fetch the candidates who submitted an interview.
    pub async fn personal_forms(
        &self,
        interview_id: &str,
    ) -> Result<Vec<PersonalForm>, RequestError> {
        require_id(interview_id)?;
        let url = self.url(&format!("interviews/{interview_id}/personal-forms"));

        let request = self.request_get(&url).send().await;

        parse_json::<PersonalFormsResponse>(request)
            .await
            .map(|response| response.users)
    }

    /// Fetch when a candidate answered each question of an interview.
    pub async fn question_times(
        &self,
        interview_id: &str,
        user_id: &str,
    ) -> Result<Vec<AnswerTiming>, RequestError> {
        require_id(interview_id)?;
        require_id(user_id)?;
        let url = self.url(&format!("interviews/{interview_id}/users/{user_id}/question-times"));

        let request = self.request_get(&url).send().await;

        parse_json(request).await
    }

    /// Remove a candidate reference from an interview.
    pub async fn remove_user_from_interview(
        &self,
        interview_id: &str,
        user_id: &str,
    ) -> Result<(), RequestError> {
        require_id(interview_id)?;
        require_id(user_id)?;
        let url = self.url(&format!("interviews/{interview_id}/remove-user/{user_id}"));

        let request = self.request_put(&url).send().await;

        check_status(request).await.map(|_| ())
    }
}

use crate::api::{check_status, require_id, Endpoint};
use crate::error::RequestError;

impl Endpoint<'_> {
    /// Delete a single record.
    ///
    /// # Example
    /// ```rust,ignore
    /// client.endpoint("interviews")
    ///     .delete("RECORD_ID")
    ///     .await?;
    /// ```
    pub async fn delete(&self, record_id: &str) -> Result<(), RequestError> {
        require_id(record_id)?;

        let url = self.client.url(&format!("{}/delete/{record_id}", self.name));

        let request = self.client.request_delete(&url).send().await;

        check_status(request).await.map(|_| ())
    }
}

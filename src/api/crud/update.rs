use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{parse_json, require_id, Endpoint};
use crate::error::RequestError;

impl Endpoint<'_> {
    /// Replace a single record and return the updated version.
    ///
    /// # Example
    /// ```rust,ignore
    /// let package: Package = client
    ///     .endpoint("question-package")
    ///     .update("record_id_123", &draft)
    ///     .await?;
    /// ```
    pub async fn update<B, T>(&self, record_id: &str, record: &B) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        require_id(record_id)?;

        let url = self.client.url(&format!("{}/update/{record_id}", self.name));

        let request = self.client.request_put_json(&url, record).send().await;

        parse_json(request).await
    }
}

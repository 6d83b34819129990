use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{parse_json, Endpoint};
use crate::error::RequestError;

impl Endpoint<'_> {
    /// Create a new record and return it as stored by the backend, with its assigned id.
    ///
    /// # Example
    /// ```rust,ignore
    /// let package: Package = client
    ///     .endpoint("question-package")
    ///     .create(&PackageDraft::new("Backend", questions))
    ///     .await?;
    ///
    /// println!("Created {}", package.id);
    /// ```
    pub async fn create<B, T>(&self, record: &B) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.client.url(&format!("{}/create", self.name));

        let request = self.client.request_post_json(&url, record).send().await;

        parse_json(request).await
    }
}

use serde::de::DeserializeOwned;

use crate::api::{parse_json, Endpoint};
use crate::error::RequestError;

impl Endpoint<'_> {
    /// Fetch every record of the resource, in server order.
    ///
    /// # Example
    /// ```rust,ignore
    /// let packages: Vec<Package> = client
    ///     .endpoint("question-package")
    ///     .list()
    ///     .await?;
    /// ```
    pub async fn list<T: DeserializeOwned>(&self) -> Result<Vec<T>, RequestError> {
        let url = self.client.url(&format!("{}/list", self.name));

        let request = self.client.request_get(&url).send().await;

        parse_json(request).await
    }
}

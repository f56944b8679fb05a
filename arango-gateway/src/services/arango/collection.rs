use super::{ArangoClient, ArangoError};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
struct CollectionList {
    result: Vec<CollectionEntry>,
}

#[derive(Deserialize)]
struct CollectionEntry {
    name: String,
}

/// Collection existence check and creation within one database.
pub struct CollectionApi<'a> {
    client: &'a ArangoClient,
}

impl<'a> CollectionApi<'a> {
    pub(super) fn new(client: &'a ArangoClient) -> Self {
        Self { client }
    }

    /// Whether `database` holds a non-system collection named `name`.
    pub async fn exists(&self, database: &str, name: &str) -> Result<bool, ArangoError> {
        let mut url = self
            .client
            .endpoint(&["_db", database, "_api", "collection"])?;
        url.query_pairs_mut().append_pair("excludeSystem", "true");
        let endpoint = url.to_string();

        let response = self.client.get(url).await?;
        let collections: CollectionList = serde_json::from_value(response).map_err(|source| {
            tracing::error!(endpoint = %endpoint, error = %source, "Error deserializing collection list");
            ArangoError::Decode {
                method: Method::GET,
                endpoint,
                source,
            }
        })?;

        Ok(collections
            .result
            .iter()
            .any(|collection| collection.name == name))
    }

    pub async fn create(&self, database: &str, name: &str) -> Result<(), ArangoError> {
        let url = self
            .client
            .endpoint(&["_db", database, "_api", "collection"])?;

        self.client
            .post_authenticated(url, &json!({ "name": name }))
            .await?;

        tracing::info!(database = %database, collection = %name, "Created ArangoDB collection");
        Ok(())
    }
}

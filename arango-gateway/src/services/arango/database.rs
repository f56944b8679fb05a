use super::{ArangoClient, ArangoError};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

/// Every database-level call goes through the `_system` database.
const SYSTEM_DATABASE: &str = "_system";

#[derive(Deserialize)]
struct DatabaseList {
    result: Vec<String>,
}

/// Database existence check and creation.
pub struct DatabaseApi<'a> {
    client: &'a ArangoClient,
}

impl<'a> DatabaseApi<'a> {
    pub(super) fn new(client: &'a ArangoClient) -> Self {
        Self { client }
    }

    /// Whether a database named exactly `name` exists.
    pub async fn exists(&self, name: &str) -> Result<bool, ArangoError> {
        let url = self
            .client
            .endpoint(&["_db", SYSTEM_DATABASE, "_api", "database"])?;
        let endpoint = url.to_string();

        let response = self.client.get(url).await?;
        let databases: DatabaseList = serde_json::from_value(response).map_err(|source| {
            tracing::error!(endpoint = %endpoint, error = %source, "Error deserializing database list");
            ArangoError::Decode {
                method: Method::GET,
                endpoint,
                source,
            }
        })?;

        Ok(databases.result.iter().any(|database| database == name))
    }

    /// Create database `name`. Callers check [`exists`](Self::exists) first;
    /// creating an existing database is a backend error.
    pub async fn create(&self, name: &str) -> Result<(), ArangoError> {
        let url = self
            .client
            .endpoint(&["_db", SYSTEM_DATABASE, "_api", "database"])?;

        self.client
            .post_authenticated(url, &json!({ "name": name }))
            .await?;

        tracing::info!(database = %name, "Created ArangoDB database");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DATABASE_PATH: &str = "/_db/_system/_api/database";

    #[tokio::test]
    async fn exists_matches_exact_names_only() {
        let server = MockServer::start().await;
        mount_auth(&server, 3).await;
        Mock::given(method("GET"))
            .and(path(DATABASE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": false,
                "code": 200,
                "result": ["_system", "mydatabase"]
            })))
            .expect(3)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let databases = client.databases();
        assert!(databases.exists("mydatabase").await.unwrap());
        assert!(!databases.exists("mydata").await.unwrap());
        assert!(!databases.exists("MyDatabase").await.unwrap());
    }

    #[tokio::test]
    async fn exists_rejects_unexpected_result_shape() {
        let server = MockServer::start().await;
        mount_auth(&server, 1).await;
        Mock::given(method("GET"))
            .and(path(DATABASE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": 7 })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .databases()
            .exists("mydatabase")
            .await
            .unwrap_err();
        assert!(matches!(err, super::ArangoError::Decode { .. }));
    }

    #[tokio::test]
    async fn create_posts_name() {
        let server = MockServer::start().await;
        mount_auth(&server, 1).await;
        Mock::given(method("POST"))
            .and(path(DATABASE_PATH))
            .and(body_json(json!({ "name": "mydatabase" })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({ "error": false, "code": 201, "result": true })),
            )
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .databases()
            .create("mydatabase")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_duplicate_fails() {
        let server = MockServer::start().await;
        mount_auth(&server, 1).await;
        Mock::given(method("POST"))
            .and(path(DATABASE_PATH))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "error": true,
                "code": 409,
                "errorNum": 1207,
                "errorMessage": "duplicate database name"
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).databases().create("mydatabase").await;
        assert!(result.is_err());
    }
}

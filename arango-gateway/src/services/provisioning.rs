//! Create-document flow: make sure the database and collection exist, then
//! store the document.
//!
//! Steps run strictly in sequence and are never retried. If the document call
//! fails after the database or collection was created, those stay in place.

use crate::services::arango::{ArangoClient, ArangoError, DocumentOptions};
use serde_json::{Map, Value};

pub async fn create_document(
    client: &ArangoClient,
    database: &str,
    collection: &str,
    fields: &Map<String, Value>,
    options: DocumentOptions,
) -> Result<Value, ArangoError> {
    if !client.databases().exists(database).await? {
        client.databases().create(database).await?;
    }

    if !client.collections().exists(database, collection).await? {
        client.collections().create(database, collection).await?;
    }

    let created = client
        .documents()
        .create(database, collection, fields, options)
        .await?;

    let id = created.get("_id").and_then(Value::as_str).unwrap_or("-");
    tracing::info!(
        database = %database,
        collection = %collection,
        id = %id,
        "Document created"
    );

    Ok(created)
}

use super::{ArangoClient, ArangoError};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Query options forwarded verbatim to the ArangoDB document endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOptions {
    pub wait_for_sync: Option<bool>,
    pub return_new: Option<bool>,
}

/// Document creation in an existing collection.
pub struct DocumentApi<'a> {
    client: &'a ArangoClient,
}

impl<'a> DocumentApi<'a> {
    pub(super) fn new(client: &'a ArangoClient) -> Self {
        Self { client }
    }

    /// Store `fields` as a new document and return ArangoDB's response
    /// (`_id`, `_key`, `_rev`, and `new` when requested) untouched.
    ///
    /// The database and collection must already exist; a missing one comes
    /// back as an ordinary status error.
    pub async fn create(
        &self,
        database: &str,
        collection: &str,
        fields: &Map<String, Value>,
        options: DocumentOptions,
    ) -> Result<Value, ArangoError> {
        let mut url = self
            .client
            .endpoint(&["_db", database, "_api", "document", collection])?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(wait_for_sync) = options.wait_for_sync {
                query.append_pair("waitForSync", &wait_for_sync.to_string());
            }
            if let Some(return_new) = options.return_new {
                query.append_pair("returnNew", &return_new.to_string());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        let document = stringify_fields(fields);
        self.client.post_authenticated(url, &document).await
    }
}

/// Flatten every field value to its string form. Strings are taken as-is,
/// everything else becomes its JSON text (`42`, `true`, `null`, `{"a":1}`).
pub fn stringify_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), Value::String(text))
        })
        .collect()
}

use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

/// Body of `POST /arango/createDocument`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDocumentRequest {
    /// Target database; created when missing.
    #[validate(length(min = 1))]
    pub database: String,
    /// Target collection inside `database`; created when missing.
    #[validate(length(min = 1))]
    pub collection: String,
    /// Document fields. Values are stored as strings.
    pub document: Map<String, Value>,
}

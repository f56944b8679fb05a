//! Document creation endpoints.
//!
//! Both routes ensure the target database and collection exist before the
//! document is stored, and answer with ArangoDB's creation response as-is.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{Map, Value};
use service_core::error::AppError;
use validator::Validate;

use crate::{
    dtos::CreateDocumentRequest,
    services::{arango::DocumentOptions, provisioning},
    AppState,
};

/// `POST /arango/createDocument/:database/:collection` with the document
/// fields as the JSON body.
pub async fn create_document_at(
    State(state): State<AppState>,
    Path((database, collection)): Path<(String, String)>,
    Query(options): Query<DocumentOptions>,
    Json(document): Json<Map<String, Value>>,
) -> Result<Json<Value>, AppError> {
    let created =
        provisioning::create_document(&state.arango, &database, &collection, &document, options)
            .await?;

    Ok(Json(created))
}

/// `POST /arango/createDocument` with `{database, collection, document}`.
pub async fn create_document(
    State(state): State<AppState>,
    Query(options): Query<DocumentOptions>,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<Json<Value>, AppError> {
    request.validate()?;

    let created = provisioning::create_document(
        &state.arango,
        &request.database,
        &request.collection,
        &request.document,
        options,
    )
    .await?;

    Ok(Json(created))
}

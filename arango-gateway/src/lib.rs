pub mod config;
pub mod dtos;
pub mod handlers;
pub mod services;
pub mod startup;

use services::ArangoClient;

/// Shared application state. Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub arango: ArangoClient,
}

impl AppState {
    pub fn new(arango: ArangoClient) -> Self {
        Self { arango }
    }
}

pub mod arango;
pub mod metrics;
pub mod provisioning;

pub use arango::{ArangoClient, ArangoError};
pub use metrics::{get_metrics, init_metrics};

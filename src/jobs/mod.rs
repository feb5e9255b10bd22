//! Remote processing jobs started through the `job` endpoint.

use serde::{Deserialize, Serialize};

mod update;

pub use update::{UpdateJob, UpdateParams};

pub const ENDPOINT: &str = "job";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    /// Bulk user update from a file of JSON lines.
    Update,
}

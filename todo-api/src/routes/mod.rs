use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod env;
pub mod error;
pub mod health;
pub mod items;
pub mod metrics;
pub mod test_pod;

/// JSON error body shared by all endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorMessage {
    #[schema(example = "an error occurred in the api")]
    pub detail: String,
}

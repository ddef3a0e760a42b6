use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MoveMemoryParams {
    #[schemars(description = "Current memory path")]
    pub from: String,

    #[schemars(description = "New memory path. Must not already exist.")]
    pub to: String,

    #[schemars(description = "Store name. Defaults to the configured default store.")]
    pub store: Option<String>,
}

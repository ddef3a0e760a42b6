use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RemoveMemoryParams {
    #[schemars(description = "Path of the memory to delete")]
    pub path: String,

    #[schemars(description = "Store name. Defaults to the configured default store.")]
    pub store: Option<String>,
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetMemoryParams {
    #[schemars(description = "Memory path, e.g. 'project/cortex/architecture'")]
    pub path: String,

    #[schemars(description = "Return the memory even if it has expired. Defaults to false.")]
    pub include_expired: Option<bool>,

    #[schemars(description = "Store name. Defaults to the configured default store.")]
    pub store: Option<String>,
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ReindexStoreParams {
    #[schemars(description = "Store name. Defaults to the configured default store.")]
    pub store: Option<String>,
}

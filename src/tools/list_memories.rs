use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListMemoriesParams {
    #[schemars(
        description = "Category path to list, e.g. 'project/cortex'. Omit or pass '' for the root category."
    )]
    pub category: Option<String>,

    #[schemars(description = "Include expired memories. Defaults to false.")]
    pub include_expired: Option<bool>,

    #[schemars(description = "Store name. Defaults to the configured default store.")]
    pub store: Option<String>,
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PruneMemoriesParams {
    #[schemars(description = "Report what would be removed without deleting anything. Defaults to false.")]
    pub dry_run: Option<bool>,

    #[schemars(description = "Store name. Defaults to the configured default store.")]
    pub store: Option<String>,
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateMemoryParams {
    #[schemars(description = "Path of the memory to update")]
    pub path: String,

    #[schemars(description = "New Markdown body. Omit to keep the current content.")]
    pub content: Option<String>,

    #[schemars(description = "Replacement tag list. Omit to keep the current tags.")]
    pub tags: Option<Vec<String>>,

    #[schemars(description = "New expiry timestamp (RFC 3339)")]
    pub expires_at: Option<String>,

    #[schemars(description = "Remove the expiry. Takes precedence over expires_at.")]
    pub clear_expiry: Option<bool>,

    #[schemars(description = "Replacement citation list. Omit to keep the current citations.")]
    pub citations: Option<Vec<String>>,

    #[schemars(description = "Store name. Defaults to the configured default store.")]
    pub store: Option<String>,
}

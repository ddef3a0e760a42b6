use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddMemoryParams {
    #[schemars(
        description = "Memory path: slash-separated lowercase slugs, e.g. 'project/cortex/architecture'. The last segment is the memory name."
    )]
    pub path: String,

    #[schemars(description = "Markdown body of the memory")]
    pub content: String,

    #[schemars(description = "Optional tags")]
    pub tags: Option<Vec<String>>,

    #[schemars(description = "Optional expiry timestamp (RFC 3339). Expired memories are hidden and can be pruned.")]
    pub expires_at: Option<String>,

    #[schemars(description = "Optional citations (URLs or file references) backing this memory")]
    pub citations: Option<Vec<String>>,

    #[schemars(description = "Store name. Defaults to the configured default store.")]
    pub store: Option<String>,
}

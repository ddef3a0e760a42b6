use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SetCategoryDescriptionParams {
    #[schemars(description = "Category path, e.g. 'project/cortex'. The root category has no description.")]
    pub category: String,

    #[schemars(description = "Short description shown in the parent listing. Omit or pass '' to clear it.")]
    pub description: Option<String>,

    #[schemars(description = "Store name. Defaults to the configured default store.")]
    pub store: Option<String>,
}

pub mod add_memory;
pub mod get_memory;
pub mod list_memories;
pub mod move_memory;
pub mod prune_memories;
pub mod reindex_store;
pub mod remove_memory;
pub mod set_category_description;
pub mod update_memory;

use add_memory::AddMemoryParams;
use chrono::{DateTime, Utc};
use get_memory::GetMemoryParams;
use list_memories::ListMemoriesParams;
use move_memory::MoveMemoryParams;
use prune_memories::PruneMemoriesParams;
use reindex_store::ReindexStoreParams;
use remove_memory::RemoveMemoryParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use serde::Serialize;
use set_category_description::SetCategoryDescriptionParams;
use std::sync::Arc;
use update_memory::UpdateMemoryParams;

use cortex::memory::repository::{ListOptions, MemoryRepository, MemoryUpdate, NewMemory};
use cortex::path::{CategoryPath, MemoryPath};
use cortex::store::StoreRegistry;

/// The Cortex MCP tool handler. Holds the store registry and exposes all
/// MCP tools via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct CortexTools {
    tool_router: ToolRouter<Self>,
    stores: Arc<StoreRegistry>,
}

/// Render a library error as `"CODE: message"` for the client.
fn tool_error(e: cortex::Error) -> String {
    format!("{}: {e}", e.code())
}

fn parse_expiry(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, String> {
    raw.map(|s| {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| format!("INVALID_MEMORY: expires_at is not an RFC 3339 timestamp: {e}"))
    })
    .transpose()
}

impl CortexTools {
    /// Run a repository operation on the blocking pool and serialize its result.
    async fn with_repo<T, F>(&self, store: Option<String>, op: F) -> Result<String, String>
    where
        T: Serialize + Send + 'static,
        F: FnOnce(&MemoryRepository) -> cortex::Result<T> + Send + 'static,
    {
        let stores = Arc::clone(&self.stores);
        let value = tokio::task::spawn_blocking(move || {
            let repo = stores.get(store.as_deref()).map_err(tool_error)?;
            let repo = repo
                .lock()
                .map_err(|e| format!("store lock poisoned: {e}"))?;
            op(&repo).map_err(tool_error)
        })
        .await
        .map_err(|e| format!("store task failed: {e}"))??;

        serde_json::to_string(&value).map_err(|e| format!("serialization failed: {e}"))
    }
}

#[tool_router]
impl CortexTools {
    pub fn new(stores: Arc<StoreRegistry>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            stores,
        }
    }

    #[tool(description = "Create a new memory at a slash-separated path such as 'project/cortex/architecture'. Parent categories are indexed automatically.")]
    async fn add_memory(
        &self,
        Parameters(params): Parameters<AddMemoryParams>,
    ) -> Result<String, String> {
        let path = MemoryPath::parse(&params.path).map_err(tool_error)?;
        if params.content.trim().is_empty() {
            return Err("INVALID_MEMORY: content must not be empty".into());
        }
        let new = NewMemory {
            tags: params.tags.unwrap_or_default(),
            source: Some("mcp".into()),
            expires_at: parse_expiry(params.expires_at.as_deref())?,
            citations: params.citations.unwrap_or_default(),
        };

        tracing::info!(path = %path, content_len = params.content.len(), "add_memory called");
        let content = params.content;
        self.with_repo(params.store, move |repo| repo.add(&path, &content, new))
            .await
    }

    #[tool(description = "Read a memory's content and metadata by path.")]
    async fn get_memory(
        &self,
        Parameters(params): Parameters<GetMemoryParams>,
    ) -> Result<String, String> {
        let path = MemoryPath::parse(&params.path).map_err(tool_error)?;
        let include_expired = params.include_expired.unwrap_or(false);

        tracing::info!(path = %path, include_expired, "get_memory called");
        self.with_repo(params.store, move |repo| repo.get(&path, include_expired))
            .await
    }

    #[tool(description = "Update a memory's content, tags, expiry, or citations. Omitted fields are left unchanged.")]
    async fn update_memory(
        &self,
        Parameters(params): Parameters<UpdateMemoryParams>,
    ) -> Result<String, String> {
        let path = MemoryPath::parse(&params.path).map_err(tool_error)?;
        let update = MemoryUpdate {
            content: params.content,
            tags: params.tags,
            expires_at: parse_expiry(params.expires_at.as_deref())?,
            clear_expiry: params.clear_expiry.unwrap_or(false),
            citations: params.citations,
        };

        tracing::info!(path = %path, "update_memory called");
        self.with_repo(params.store, move |repo| repo.update(&path, update))
            .await
    }

    #[tool(description = "Delete a memory and remove it from the category index.")]
    async fn remove_memory(
        &self,
        Parameters(params): Parameters<RemoveMemoryParams>,
    ) -> Result<String, String> {
        let path = MemoryPath::parse(&params.path).map_err(tool_error)?;

        tracing::info!(path = %path, "remove_memory called");
        self.with_repo(params.store, move |repo| {
            repo.remove(&path)?;
            Ok(serde_json::json!({ "removed": path.to_string() }))
        })
        .await
    }

    #[tool(description = "Move a memory to a new path, updating both the old and new category indexes.")]
    async fn move_memory(
        &self,
        Parameters(params): Parameters<MoveMemoryParams>,
    ) -> Result<String, String> {
        let from = MemoryPath::parse(&params.from).map_err(tool_error)?;
        let to = MemoryPath::parse(&params.to).map_err(tool_error)?;

        tracing::info!(from = %from, to = %to, "move_memory called");
        self.with_repo(params.store, move |repo| repo.move_memory(&from, &to))
            .await
    }

    #[tool(description = "List the memories and subcategories directly inside a category, with token estimates and descriptions. Omit category for the root.")]
    async fn list_memories(
        &self,
        Parameters(params): Parameters<ListMemoriesParams>,
    ) -> Result<String, String> {
        let category =
            CategoryPath::parse(params.category.as_deref().unwrap_or("")).map_err(tool_error)?;
        let options = ListOptions {
            include_expired: params.include_expired.unwrap_or(false),
        };

        tracing::info!(category = %category, "list_memories called");
        self.with_repo(params.store, move |repo| repo.list(&category, options))
            .await
    }

    #[tool(description = "Set or clear the short description of a category. The category must already be indexed.")]
    async fn set_category_description(
        &self,
        Parameters(params): Parameters<SetCategoryDescriptionParams>,
    ) -> Result<String, String> {
        let category = CategoryPath::parse(&params.category).map_err(tool_error)?;
        let description = params.description;

        tracing::info!(category = %category, "set_category_description called");
        self.with_repo(params.store, move |repo| {
            repo.describe(&category, description.clone())?;
            Ok(serde_json::json!({
                "category": category.to_string(),
                "description": description.filter(|d| !d.trim().is_empty()),
            }))
        })
        .await
    }

    #[tool(description = "Rebuild a store's whole category index from its memory files. Returns name warnings and counts.")]
    async fn reindex_store(
        &self,
        Parameters(params): Parameters<ReindexStoreParams>,
    ) -> Result<String, String> {
        tracing::info!(store = ?params.store, "reindex_store called");
        self.with_repo(params.store, |repo| repo.reindex()).await
    }

    #[tool(description = "Delete every expired memory in a store. Use dry_run to preview.")]
    async fn prune_memories(
        &self,
        Parameters(params): Parameters<PruneMemoriesParams>,
    ) -> Result<String, String> {
        let dry_run = params.dry_run.unwrap_or(false);

        tracing::info!(dry_run, "prune_memories called");
        self.with_repo(params.store, move |repo| repo.prune(Utc::now(), dry_run))
            .await
    }
}

#[tool_handler]
impl ServerHandler for CortexTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "Cortex is a hierarchical memory store. Browse with list_memories starting \
                 from the root, read with get_memory, and save with add_memory."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_errors_carry_the_code() {
        let msg = tool_error(cortex::Error::MemoryNotFound("a/b".into()));
        assert!(msg.starts_with("MEMORY_NOT_FOUND: "), "{msg}");
    }

    #[test]
    fn expiry_parses_rfc3339() {
        let parsed = parse_expiry(Some("2030-01-02T03:04:05Z")).unwrap().unwrap();
        assert_eq!(parsed.to_rfc3339(), "2030-01-02T03:04:05+00:00");
        assert_eq!(parse_expiry(None).unwrap(), None);
        assert!(parse_expiry(Some("tomorrow")).is_err());
    }
}

//! JSON file storage implementation.
//!
//! Stores one JSON file per row in a data directory and keeps small per-row
//! meta markers (version + updated_at) next to them.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use agencyops_core::{
    Category, Client, PedFilter, PedItem, PedItemId, StepId, TeamMember, TodoId, UserId,
    UserTodo, Work, WorkFilter, WorkId, WorkStep,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use super::{Storage, Result};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const KINDS: [&str; 7] = ["works", "steps", "ped", "todos", "categories", "clients", "members"];

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
    pending: Arc<Mutex<bool>>,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the row and meta
    /// directories if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        for kind in KINDS {
            fs::create_dir_all(root.join(kind)).await?;
            fs::create_dir_all(root.join("meta").join(kind)).await?;
        }

        Ok(Self {
            root,
            pending: Arc::new(Mutex::new(false)),
        })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn row_path(&self, kind: &str, id: &str) -> PathBuf {
        self.root.join(kind).join(format!("{}.json", id))
    }

    fn meta_path(&self, kind: &str, id: &str) -> PathBuf {
        self.root.join("meta").join(kind).join(format!("{}.meta.json", id))
    }

    async fn set_pending(&self) {
        *self.pending.lock().await = true;
    }

    /// Whether writes happened since the last commit or rollback.
    pub async fn is_pending(&self) -> bool {
        *self.pending.lock().await
    }

    /// Read and increment per-row version, return new version.
    async fn bump_version(&self, kind: &str, id: &str) -> Result<u64> {
        let path = self.meta_path(kind, id);
        let mut version = 0u64;
        if let Ok(s) = fs::read_to_string(&path).await {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&s) {
                if let Some(v) = json.get("version").and_then(|v| v.as_u64()) {
                    version = v;
                }
            }
        }
        version += 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(&path, serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }

    async fn save_row<T: Serialize>(&self, kind: &str, id: &str, row: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(row)?;
        fs::write(self.row_path(kind, id), json.as_bytes()).await?;

        let version = self.bump_version(kind, id).await?;
        debug!("Saved {}/{} (v{})", kind, id, version);

        self.set_pending().await;
        Ok(())
    }

    async fn delete_row(&self, kind: &str, id: &str) -> Result<()> {
        remove_if_exists(&self.row_path(kind, id)).await?;
        remove_if_exists(&self.meta_path(kind, id)).await?;
        self.set_pending().await;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_work(&mut self, work: &Work) -> Result<()> {
        self.save_row("works", &work.id.to_string(), work).await
    }

    async fn load_work(&self, id: WorkId) -> Result<Option<Work>> {
        read_json(&self.row_path("works", &id.to_string())).await
    }

    async fn list_works(&self, filter: &WorkFilter) -> Result<Vec<Work>> {
        let all: Vec<Work> = list_dir(&self.root.join("works")).await?;
        Ok(all.into_iter().filter(|w| filter.matches(w)).collect())
    }

    async fn delete_work(&mut self, id: WorkId) -> Result<()> {
        for step in self.list_steps(id).await? {
            self.delete_row("steps", &step.id.to_string()).await?;
        }
        self.delete_row("works", &id.to_string()).await
    }

    async fn save_step(&mut self, step: &WorkStep) -> Result<()> {
        self.save_row("steps", &step.id.to_string(), step).await
    }

    async fn load_step(&self, id: StepId) -> Result<Option<WorkStep>> {
        read_json(&self.row_path("steps", &id.to_string())).await
    }

    async fn list_steps(&self, work_id: WorkId) -> Result<Vec<WorkStep>> {
        let all: Vec<WorkStep> = list_dir(&self.root.join("steps")).await?;
        Ok(all.into_iter().filter(|s| s.work_id == work_id).collect())
    }

    async fn delete_step(&mut self, id: StepId) -> Result<()> {
        self.delete_row("steps", &id.to_string()).await
    }

    async fn save_ped_item(&mut self, item: &PedItem) -> Result<()> {
        self.save_row("ped", &item.id.to_string(), item).await
    }

    async fn load_ped_item(&self, id: PedItemId) -> Result<Option<PedItem>> {
        read_json(&self.row_path("ped", &id.to_string())).await
    }

    async fn list_ped_items(&self, filter: &PedFilter) -> Result<Vec<PedItem>> {
        let all: Vec<PedItem> = list_dir(&self.root.join("ped")).await?;
        Ok(all.into_iter().filter(|i| filter.matches(i)).collect())
    }

    async fn delete_ped_item(&mut self, id: PedItemId) -> Result<()> {
        self.delete_row("ped", &id.to_string()).await
    }

    async fn save_todo(&mut self, todo: &UserTodo) -> Result<()> {
        self.save_row("todos", &todo.id.to_string(), todo).await
    }

    async fn load_todo(&self, id: TodoId) -> Result<Option<UserTodo>> {
        read_json(&self.row_path("todos", &id.to_string())).await
    }

    async fn list_todos(&self, user_id: UserId) -> Result<Vec<UserTodo>> {
        let all: Vec<UserTodo> = list_dir(&self.root.join("todos")).await?;
        Ok(all.into_iter().filter(|t| t.user_id == user_id).collect())
    }

    async fn delete_todo(&mut self, id: TodoId) -> Result<()> {
        self.delete_row("todos", &id.to_string()).await
    }

    async fn save_category(&mut self, category: &Category) -> Result<()> {
        self.save_row("categories", &category.id.to_string(), category).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        list_dir(&self.root.join("categories")).await
    }

    async fn save_client(&mut self, client: &Client) -> Result<()> {
        self.save_row("clients", &client.id.to_string(), client).await
    }

    async fn list_clients(&self) -> Result<Vec<Client>> {
        list_dir(&self.root.join("clients")).await
    }

    async fn save_member(&mut self, member: &TeamMember) -> Result<()> {
        self.save_row("members", &member.id.to_string(), member).await
    }

    async fn list_members(&self) -> Result<Vec<TeamMember>> {
        list_dir(&self.root.join("members")).await
    }

    async fn commit(&mut self, message: &str) -> Result<()> {
        // Rows are written through; commit only clears pending state.
        debug!("Commit: {}", message);
        *self.pending.lock().await = false;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        *self.pending.lock().await = false;
        Ok(())
    }
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Read every row of a directory.
///
/// A row that fails to parse aborts the listing: aggregations must never run
/// over a partial row set.
async fn list_dir<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&path).await {
            Ok(Some(item)) => items.push(item),
            // Deleted between read_dir and read
            Ok(None) => {}
            Err(e) => {
                warn!("Unreadable row {}: {}", path.display(), e);
                return Err(e);
            }
        }
    }
    Ok(items)
}

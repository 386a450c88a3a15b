use panelboard_core::AppConfig;
use panelboard_domain::{ViewId, ViewSession};
use panelboard_persistence::{BookmarkTree, JsonFileStore, LocalTabHub};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Handles shared by every view opened during one invocation.
pub struct CliContext {
    pub store: Arc<JsonFileStore>,
    pub tabs: Arc<LocalTabHub>,
    pub config: AppConfig,
    bookmarks_path: Option<PathBuf>,
}

impl CliContext {
    pub fn new(file_path: &Path, bookmarks_path: Option<PathBuf>) -> Self {
        Self {
            store: Arc::new(JsonFileStore::new(file_path)),
            tabs: Arc::new(LocalTabHub::new()),
            config: AppConfig::load(),
            bookmarks_path,
        }
    }

    pub async fn open(&self, view: ViewId) -> anyhow::Result<ViewSession> {
        let session = ViewSession::open(
            view,
            self.store.clone(),
            self.tabs.clone(),
            self.config.clone(),
        )
        .await?;
        Ok(session)
    }

    pub fn bookmarks_path(&self) -> anyhow::Result<&Path> {
        self.bookmarks_path
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("--bookmarks <TREE> is required for this command"))
    }

    pub async fn load_bookmarks(&self) -> anyhow::Result<BookmarkTree> {
        Ok(BookmarkTree::load(self.bookmarks_path()?).await?)
    }

    pub async fn save_bookmarks(&self, tree: &BookmarkTree) -> anyhow::Result<()> {
        tree.save(self.bookmarks_path()?).await?;
        Ok(())
    }
}

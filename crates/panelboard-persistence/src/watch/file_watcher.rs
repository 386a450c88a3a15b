use crate::traits::{ChangeDetector, ChangeEvent};
use notify::{RecursiveMode, Watcher};
use panelboard_core::{PanelboardError, PanelboardResult};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::Mutex;

/// Watches the data file of a `JsonFileStore` for writes by other processes.
///
/// The parent directory is watched, since atomic saves replace the file by
/// rename rather than modifying it in place.
pub struct FileWatcher {
    tx: broadcast::Sender<ChangeEvent>,
    task_handle: Arc<Mutex<Option<tokio::task::JoinHandle<()>>>>,
    watching: Arc<AtomicBool>,
}

impl FileWatcher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            tx,
            task_handle: Arc::new(Mutex::new(None)),
            watching: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for FileWatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn is_write(kind: &notify::EventKind) -> bool {
    matches!(
        kind,
        notify::EventKind::Create(_) | notify::EventKind::Modify(_)
    )
}

#[async_trait::async_trait]
impl ChangeDetector for FileWatcher {
    async fn start_watching(&self, path: PathBuf) -> PanelboardResult<()> {
        // Match the absolute paths the OS reports
        let watch_path = tokio::fs::canonicalize(&path).await?;
        let parent = watch_path
            .parent()
            .map(|p| p.to_path_buf())
            .ok_or_else(|| {
                PanelboardError::Internal(format!("{} has no parent directory", path.display()))
            })?;

        let tx = self.tx.clone();
        let watching = self.watching.clone();
        let handle = tokio::spawn(async move {
            let target = watch_path.clone();
            let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
                match res {
                    Ok(event) => {
                        if is_write(&event.kind) && event.paths.iter().any(|p| p == &target) {
                            let _ = tx.send(ChangeEvent::for_path(target.clone()));
                        }
                    }
                    Err(e) => tracing::warn!("File watcher error: {}", e),
                }
            });

            match watcher {
                Ok(mut watcher) => {
                    if let Err(e) = watcher.watch(&parent, RecursiveMode::NonRecursive) {
                        tracing::error!("Failed to watch directory: {}", e);
                        watching.store(false, Ordering::SeqCst);
                        return;
                    }
                    tracing::info!("Started watching {}", watch_path.display());
                    // The watcher stops when dropped
                    std::future::pending::<()>().await;
                }
                Err(e) => {
                    tracing::error!("Failed to create watcher: {}", e);
                    watching.store(false, Ordering::SeqCst);
                }
            }
        });

        self.watching.store(true, Ordering::SeqCst);
        let mut guard = self.task_handle.lock().await;
        if let Some(previous) = guard.replace(handle) {
            previous.abort();
        }
        Ok(())
    }

    async fn stop_watching(&self) -> PanelboardResult<()> {
        let mut guard = self.task_handle.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
            tracing::info!("Stopped file watching");
        }
        self.watching.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    fn is_watching(&self) -> bool {
        self.watching.load(Ordering::SeqCst)
    }
}

use crate::context::CliContext;
use crate::output;
use panelboard_core::{Loggable, TabSignal};
use panelboard_domain::{StartupPlan, ViewId};
use panelboard_persistence::{ChangeDetector, FileWatcher};
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;

pub async fn handle_swap(ctx: &CliContext, view: ViewId, with: ViewId) -> anyhow::Result<()> {
    let mut session = ctx.open(view).await?;
    let outcome = session.swap_with(with).await?;
    output::output_with_notices(outcome, session.get_logs());
    Ok(())
}

pub async fn handle_import_folders(ctx: &CliContext, view: ViewId) -> anyhow::Result<()> {
    let tree = ctx.load_bookmarks().await?;
    let mut session = ctx.open(view).await?;
    let summary = session.import_bookmark_folders(&tree).await?;
    let data = json!({
        "view": summary.view,
        "added": summary.added,
        "message": summary.message(),
    });
    output::output_with_notices(data, session.get_logs());
    Ok(())
}

pub async fn handle_startup(ctx: &CliContext, view: ViewId) -> anyhow::Result<()> {
    let session = ctx.open(view).await?;
    output::output_success(StartupPlan::from_settings(session.settings()));
    Ok(())
}

/// Keep `view` open and print it again after every external write.
pub async fn handle_watch(ctx: &CliContext, view: ViewId) -> anyhow::Result<()> {
    let mut session = ctx.open(view).await?;
    if !ctx.store.exists().await {
        session.save().await?;
    }

    let watcher = FileWatcher::new();
    let mut rx = watcher.subscribe();
    watcher
        .start_watching(ctx.store.path().to_path_buf())
        .await?;
    output::output_list(session.panels().to_vec());

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(_) | Err(RecvError::Lagged(_)) => {
                    session.handle_signal(TabSignal::Reload).await?;
                    output::output_list(session.panels().to_vec());
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    watcher.stop_watching().await?;
    Ok(())
}

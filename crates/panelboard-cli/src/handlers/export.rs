use crate::cli::{ExportArgs, ImportArgs, SettingsAction};
use crate::context::CliContext;
use crate::output;
use panelboard_core::{BookmarkProvider, Loggable};
use panelboard_domain::{ViewExport, ViewExporter, ViewId};
use serde_json::json;

pub async fn handle_export(ctx: &CliContext, view: ViewId, args: ExportArgs) -> anyhow::Result<()> {
    let session = ctx.open(view).await?;
    let backup = session.export().await?;
    let document = backup.to_json_string()?;

    let path = match (args.output, args.dir) {
        (Some(path), _) => path,
        (None, Some(dir)) => dir.join(ViewExporter::export_filename(
            view,
            chrono::Local::now().date_naive(),
        )),
        (None, None) => {
            println!("{}", document);
            return Ok(());
        }
    };
    tokio::fs::write(&path, document)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
    output::output_success(json!({
        "path": path.display().to_string(),
        "panels": backup.panels.len(),
        "images": backup.images.len(),
    }));
    Ok(())
}

pub async fn handle_import(ctx: &CliContext, view: ViewId, args: ImportArgs) -> anyhow::Result<()> {
    let data = tokio::fs::read_to_string(&args.input)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", args.input.display(), e))?;
    let backup = ViewExport::from_json_str(view, &data)?;

    let tree = match ctx.bookmarks_path() {
        Ok(_) => Some(ctx.load_bookmarks().await?),
        Err(_) => None,
    };
    let mut session = ctx.open(view).await?;
    let summary = session
        .import(backup, tree.as_ref().map(|t| t as &dyn BookmarkProvider))
        .await?;
    output::output_with_notices(summary, session.get_logs());
    Ok(())
}

pub async fn handle_settings(
    ctx: &CliContext,
    view: ViewId,
    action: SettingsAction,
) -> anyhow::Result<()> {
    match action {
        SettingsAction::Show => {
            let session = ctx.open(view).await?;
            output::output_success(session.settings());
        }
    }
    Ok(())
}

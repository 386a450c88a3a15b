mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("PANELBOARD_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "panelboard", &mut std::io::stdout());
        return Ok(());
    }

    let Some(file_path) = cli.file else {
        output::output_error("--file is required (or set PANELBOARD_FILE)");
    };
    let ctx = CliContext::new(&file_path, cli.bookmarks);
    let view = cli.view;

    let result = match cli.command {
        Commands::Panel(panel_cmd) => handlers::panel::handle(&ctx, view, panel_cmd.action).await,
        Commands::Card(card_cmd) => handlers::card::handle(&ctx, view, card_cmd.action).await,
        Commands::Swap { with } => handlers::view::handle_swap(&ctx, view, with).await,
        Commands::ImportFolders => handlers::view::handle_import_folders(&ctx, view).await,
        Commands::Bookmarks(bookmarks_cmd) => {
            handlers::bookmarks::handle(&ctx, view, bookmarks_cmd.action).await
        }
        Commands::Export(args) => handlers::export::handle_export(&ctx, view, args).await,
        Commands::Import(args) => handlers::export::handle_import(&ctx, view, args).await,
        Commands::Settings(settings_cmd) => {
            handlers::export::handle_settings(&ctx, view, settings_cmd.action).await
        }
        Commands::Startup => handlers::view::handle_startup(&ctx, view).await,
        Commands::Session => handlers::session::handle(&ctx, view).await,
        Commands::Watch => handlers::view::handle_watch(&ctx, view).await,
        Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = result {
        output::output_error(&format!("{:#}", e));
    }
    Ok(())
}

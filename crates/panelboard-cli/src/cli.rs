use clap::{Args, Parser, Subcommand};
use panelboard_core::PanelPosition;
use panelboard_domain::ViewId;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "panelboard")]
#[command(about = "A three-view organizer of note and bookmark panels", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the panelboard data file (or set PANELBOARD_FILE env var)
    #[arg(short, long, value_name = "FILE", env = "PANELBOARD_FILE")]
    pub file: Option<PathBuf>,

    /// View to operate on
    #[arg(short, long, global = true, default_value = "A")]
    pub view: ViewId,

    /// Bookmark tree file used by bookmark operations
    #[arg(long, global = true, value_name = "TREE", env = "PANELBOARD_BOOKMARKS")]
    pub bookmarks: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Panel operations
    Panel(PanelCommand),
    /// Card operations
    Card(CardCommand),
    /// Exchange the panel lists of this view and another
    Swap {
        #[arg(long)]
        with: ViewId,
    },
    /// Add a panel for every bookmark folder that holds links
    ImportFolders,
    /// Bookmark tree operations
    Bookmarks(BookmarksCommand),
    /// Export this view as a backup document
    Export(ExportArgs),
    /// Replace this view with a backup document
    Import(ImportArgs),
    /// Settings shared by all views
    Settings(SettingsCommand),
    /// Show which views open at launch
    Startup,
    /// Apply editing commands read from stdin, one per line
    Session,
    /// Print the view again whenever the data file changes
    Watch,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct PanelCommand {
    #[command(subcommand)]
    pub action: PanelAction,
}

#[derive(Subcommand)]
pub enum PanelAction {
    /// Add a panel
    Add {
        #[arg(long)]
        title: String,
        /// Show a bookmark folder instead of notes
        #[arg(long)]
        folder_id: Option<String>,
        #[arg(long)]
        position: Option<PanelPosition>,
    },
    /// List panels of the view
    List,
    /// Delete a panel
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Rename a panel
    Rename {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
    },
    /// Move a panel within the view
    Reorder {
        #[arg(long)]
        id: String,
        #[arg(long)]
        index: usize,
    },
    /// Send a panel to another view
    Move {
        #[arg(long)]
        id: String,
        #[arg(long)]
        to: ViewId,
        #[arg(long)]
        position: Option<PanelPosition>,
    },
}

#[derive(Args)]
pub struct CardCommand {
    #[command(subcommand)]
    pub action: CardAction,
}

#[derive(Subcommand)]
pub enum CardAction {
    /// Add a card to a notes panel
    Add {
        #[arg(long)]
        panel_id: String,
        #[arg(long, conflicts_with = "image")]
        text: Option<String>,
        /// data: uri of a pasted image
        #[arg(long)]
        image: Option<String>,
    },
    /// List cards, optionally of one panel
    List {
        #[arg(long)]
        panel_id: Option<String>,
    },
    /// Delete a card
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Replace a card's text
    Edit {
        #[arg(long)]
        id: String,
        #[arg(long)]
        text: String,
    },
    /// Move a card to a panel position
    Move {
        #[arg(long)]
        id: String,
        #[arg(long)]
        panel_id: String,
        #[arg(long)]
        index: usize,
    },
}

#[derive(Args)]
pub struct BookmarksCommand {
    #[command(subcommand)]
    pub action: BookmarksAction,
}

#[derive(Subcommand)]
pub enum BookmarksAction {
    /// Sort the sidebar folder (or the bookmarks bar) by title
    Sort,
    /// Rename a folder and every panel showing it
    Rename {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
    },
}

#[derive(Args)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Write to startpage-backup-<view>-<date>.json in this directory
    #[arg(long, conflicts_with = "output")]
    pub dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    #[arg(long)]
    pub input: PathBuf,
}

#[derive(Args)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub action: SettingsAction,
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the shared settings record
    Show,
}

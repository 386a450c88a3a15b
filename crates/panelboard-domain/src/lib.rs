pub mod bookmarks;
pub mod bucket;
pub mod bulk_import;
pub mod capture;
pub mod card;
pub mod commands;
pub mod export;
pub mod history;
pub mod navigation;
pub mod panel;
pub mod registry;
pub mod relocation;
pub mod session;
pub mod settings;
pub mod view;

pub use bookmarks::{sort_bookmarks, sync_folder_title, SortOptions, BOOKMARK_BAR_ID};
pub use bulk_import::{folders_with_bookmarks, import_bookmark_folders, FolderImportSummary};
pub use capture::{DragContext, EditCapture, FieldBaselines, FieldRef};
pub use card::{Card, CardId, LOCAL_IMAGE_MARKER, PLACEHOLDER_TEXT};
pub use commands::{Command, CommandContext, Reversible};
pub use export::{ImportSummary, ViewExport, ViewExporter, ViewImporter};
pub use history::{HistoryManager, DEFAULT_HISTORY_DEPTH};
pub use navigation::{navigate_to_view, Navigation, StartupPlan};
pub use panel::{Panel, PanelId, PanelKind};
pub use registry::{CardLocation, PanelRegistry};
pub use relocation::{RelocationOutcome, Relocator};
pub use session::{ViewSession, DEFAULT_PANEL_TITLE};
pub use settings::{BookmarkSortOrder, Settings, Theme};
pub use view::{ViewId, SETTINGS_KEY};

pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod traits;

pub use config::{AppConfig, PanelPosition};
pub use error::PanelboardError;
pub use logging::{LogEntry, Loggable, NoticeLevel};
pub use result::PanelboardResult;
pub use traits::{
    BookmarkFolder, BookmarkNode, BookmarkProvider, KeyValueStore, TabController, TabHandle,
    TabSignal,
};

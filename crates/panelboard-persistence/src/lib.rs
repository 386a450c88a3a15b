pub mod bookmarks;
pub mod store;
pub mod tabs;
pub mod traits;
pub mod watch;

pub use bookmarks::*;
pub use store::*;
pub use tabs::*;
pub use traits::*;
pub use watch::*;

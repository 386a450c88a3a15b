pub mod bookmarks;
pub mod card;
pub mod export;
pub mod panel;
pub mod session;
pub mod view;

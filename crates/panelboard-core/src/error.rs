use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelboardError {
    /// Rejected before any I/O; nothing was mutated.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Bookmark error: {0}")]
    Bookmark(String),

    #[error("Tab error: {0}")]
    Tab(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PanelboardError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

use crate::error::PanelboardError;

pub type PanelboardResult<T> = Result<T, PanelboardError>;

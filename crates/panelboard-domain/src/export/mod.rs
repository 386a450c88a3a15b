//! View backup and restore.
//!
//! A backup holds one view's panel list under its bucket key, the shared
//! settings, and every locally stored image keyed by card id.

pub mod exporter;
pub mod importer;
pub mod models;

pub use exporter::ViewExporter;
pub use importer::{ImportSummary, ViewImporter};
pub use models::ViewExport;

//! dif-common: Shared records, taxonomies, errors and configuration used across all DIF crates.

pub mod error;
pub mod records;
pub mod relations;
pub mod actions;
pub mod trials;
pub mod target;
pub mod config;
pub mod de;

// Re-export commonly used types
pub use error::{DifError, Result};
pub use records::{DruggableRecord, InteractorRecord, Row};
pub use relations::{EdgeCategory, RelationFilter};
pub use actions::DrugAction;
pub use target::TargetName;
pub use config::DifConfig;

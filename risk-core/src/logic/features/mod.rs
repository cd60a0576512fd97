//! Features Module - Feature schema and typed records
//!
//! `layout` is the single source of truth for feature names and order;
//! `record` holds the typed `Record`/`Batch` produced by validation.

pub mod layout;
pub mod record;

// Re-export common types
pub use layout::{
    feature_description, feature_index, feature_name, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT,
    REQUIRED_COLUMNS,
};
pub use record::{Batch, FeatureRow, Record};

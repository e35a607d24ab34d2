//! Dynamic field rendering
//!
//! One descriptor, two renderers:
//! - edit.rs: editable widget dispatch with per-instance validation state
//! - view.rs: pure read-only fragment resolution and its renderer

pub mod edit;
pub mod view;

pub use edit::DynamicFieldEdit;
pub use view::{view_fragment, DynamicFieldView, ViewFragment};

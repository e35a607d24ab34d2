//! Content browsing and editing over the configured types.

pub mod api;
pub mod summary;
pub mod ui;

//! Account settings page
//!
//! Simplified MVVM pattern implementation:
//! - view.rs: Pure UI component
//! - view_model.rs: UI state and command handling

pub mod view;
pub mod view_model;

pub use view::SettingsPage;
pub use view_model::SettingsViewModel;

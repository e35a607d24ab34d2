//! Account management: client-side validation, settings form state, the
//! account API, and the settings page built on top of them.

pub mod api;
pub mod settings_form;
pub mod ui;
pub mod validators;

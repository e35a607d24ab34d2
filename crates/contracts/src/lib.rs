//! Shared contracts between frontend and backend
//!
//! Everything that crosses the wire lives here: the field-type registry and
//! field values, the constraint validator both sides run, content-type
//! configuration, and the user account DTOs.

pub mod api;
pub mod config;
pub mod content;
pub mod system;

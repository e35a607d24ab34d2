//! System domain: user accounts and permission checks

pub mod permissions;
pub mod users;

pub mod handlers;
pub mod initialization;
pub mod users;

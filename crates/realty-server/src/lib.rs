pub mod app_state;
pub mod args;
pub mod error;
pub mod handlers;
pub mod router;

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod routes;

pub use crate::config::Config;
pub use routes::AppState;

//! HTTP API handlers for patt-api

pub mod admin;
pub mod auth;
pub mod health;
pub mod report;
pub mod sessions;
pub mod users;

pub use admin::{list_all_sessions, list_users};
pub use auth::CurrentUser;
pub use health::health_routes;
pub use report::download_report;
pub use sessions::{get_performance, submit_performance};
pub use users::{login, read_me, register_user};

//! Database access layer shared across PATT crates

pub mod init;
pub mod models;

pub use init::{create_schema, init_database};
pub use models::{Role, User};

//! # PATT Common Library
//!
//! Shared code for the Piper Alpha Training Tracker:
//! - Curriculum catalog (chapter and status vocabulary)
//! - Session record model and the submission normalizer
//! - Statistics derivation and PDF report synthesis
//! - Configuration loading
//! - Database initialization and models
//! - Password and access-token helpers

pub mod auth;
pub mod config;
pub mod curriculum;
pub mod db;
pub mod error;
pub mod normalize;
pub mod record;
pub mod report;
pub mod stats;
pub mod time;

pub use curriculum::{Chapter, ChapterStatus};
pub use error::{Error, Result};
pub use normalize::{normalize_chapters, NormalizeError, RawChapter};
pub use record::{ChapterResult, SessionRecord};
pub use stats::{derive, DerivedStats};

//! # Makeup Exam Toolkit
//!
//! A lookup client, roster uploader and backing REST service for a school's
//! make-up exam ("補考") schedule.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (ExamRecord, QueryState, etc.)
//! - [`client`]: HTTP clients for the student lookup API and the admin endpoints
//! - [`roster`]: Workbook parsing for the make-up exam roster
//! - [`server`]: The REST service backing the lookup page
//! - [`ui`]: Terminal rendering of query states
//! - [`config`]: Configuration management

pub mod client;
pub mod config;
pub mod models;
pub mod roster;
pub mod server;
pub mod ui;

// Re-export commonly used types
pub use models::{ExamRecord, QueryState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

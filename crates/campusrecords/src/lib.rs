//! `campusrecords` - Student and course records served over HTTP
//!
//! This library provides the JSON-backed data store, the record types it
//! holds, and the axum web front end that renders them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;
pub mod web;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Course, RecordKey, Student, StudentFields, StudentUpdate};
pub use store::{DataStore, StoreStats};

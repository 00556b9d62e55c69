//! Internal library crate for hdls.
//!
//! The shipped application is the `hdls` binary (`src/main.rs`).
//!
//! This library exists to share code between targets (binary, tests) and to keep modules organized.
//! This API is only used to build the `hdls` binary and is not considered a library for external use.

pub mod config;
pub mod core;
pub mod error;
pub mod remote;
pub mod session;
pub mod utils;

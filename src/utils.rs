//! Miscellaneous utility functions for hdls.
//!
//! - [cli]: the clap argument parser.
//! - [helpers]: remote path helpers (normalize, join, parent, home directory, glob detection).
//! - [logging]: env_logger setup driven by `-v` and `RUST_LOG`.

pub mod cli;
pub mod helpers;
pub mod logging;

pub use helpers::{
    REMOTE_HOME_ROOT, get_home, has_glob, join_path, leaf_name, normalize_path, parent_path,
    remote_home, resolve_path,
};

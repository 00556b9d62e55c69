//! Helpers for hdls.
//!
//! Remote paths are plain `/`-separated strings, independent of the local platform, so the
//! helpers here work on `&str` and never on [std::path::Path]:
//! - Lexical normalization, joining and parent lookup
//! - The remote home directory of a user
//! - Glob detection for path arguments
//!
//! [get_home] is the one helper about the local machine; it is used to locate the config file.

use std::path::PathBuf;

/// Prefix of every user's home directory on the remote filesystem.
pub const REMOTE_HOME_ROOT: &str = "/user";

/// Resolves `.` and `..` components and collapses repeated slashes.
///
/// The result is always absolute; `..` above the root stays at the root.
pub fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for comp in path.split('/') {
        match comp {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            c => parts.push(c),
        }
    }
    let mut out = String::with_capacity(path.len() + 1);
    for part in &parts {
        out.push('/');
        out.push_str(part);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Joins a child name onto a directory path without doubling the separator.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{}{}", parent, name)
    } else {
        format!("{}/{}", parent, name)
    }
}

/// The parent of an absolute path. The parent of `/` is `/`.
pub fn parent_path(path: &str) -> String {
    normalize_path(&join_path(path, ".."))
}

/// The last component of a path, or `/` for the root.
pub fn leaf_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Makes `raw` absolute against `home` and normalizes it.
pub fn resolve_path(home: &str, raw: &str) -> String {
    if raw.starts_with('/') {
        normalize_path(raw)
    } else {
        normalize_path(&join_path(home, raw))
    }
}

/// The remote home directory of `user`, e.g. `/user/alice`.
pub fn remote_home(user: &str) -> String {
    join_path(REMOTE_HOME_ROOT, user)
}

/// True when the string contains glob metacharacters.
#[inline]
pub fn has_glob(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Local home directory, used for the config file location.
pub fn get_home() -> Option<PathBuf> {
    dirs::home_dir()
}

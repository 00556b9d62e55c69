//! WebHDFS response payloads.
//!
//! Deserialized straight from the gateway's JSON and converted into [EntryRecord]s, so that a
//! record from `GETFILESTATUS` and one from `LISTSTATUS_BATCH` carry exactly the same fields.

use crate::core::EntryRecord;
use crate::error::{Error, Result};

use chrono::DateTime;
use serde::Deserialize;

const STICKY_BIT: u32 = 0o1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileKind {
    File,
    Directory,
    Symlink,
}

/// One `FileStatus` object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    /// Leaf name; empty for `GETFILESTATUS`.
    #[serde(default)]
    pub path_suffix: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    /// Octal permission bits, e.g. `"755"` or `"1777"`.
    pub permission: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub length: u64,
    /// Milliseconds since the epoch.
    #[serde(default)]
    pub modification_time: i64,
}

impl FileStatus {
    /// Converts into an [EntryRecord]. `fallback_name` is used when the payload has no
    /// path suffix, which is the case for a status of the path itself.
    pub fn into_record(self, fallback_name: &str) -> Result<EntryRecord> {
        let bits = u32::from_str_radix(&self.permission, 8).map_err(|_| {
            Error::io(format!(
                "invalid permission {:?} for {}",
                self.permission, fallback_name
            ))
        })?;
        let name = if self.path_suffix.is_empty() {
            fallback_name.to_string()
        } else {
            self.path_suffix
        };
        let modified = DateTime::from_timestamp_millis(self.modification_time).unwrap_or_default();

        Ok(EntryRecord::new(
            name,
            self.kind == FileKind::Directory,
            format_mode(self.kind, bits),
            self.owner,
            self.group,
            self.length,
            modified,
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileStatusResponse {
    pub file_status: FileStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListingResponse {
    pub directory_listing: DirectoryListing,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryListing {
    pub partial_listing: PartialListing,
    #[serde(default)]
    pub remaining_entries: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartialListing {
    pub file_statuses: FileStatuses,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileStatuses {
    #[serde(default)]
    pub file_status: Vec<FileStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteExceptionResponse {
    pub remote_exception: RemoteException,
}

/// Error body returned by the gateway with a non-2xx status.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteException {
    pub exception: String,
    #[serde(default)]
    pub java_class_name: String,
    #[serde(default)]
    pub message: String,
}

/// Formats the entry type and permission bits in the unix `ls` style, e.g. `drwxr-xr-x`.
/// The sticky bit shows as `t` (or `T` without others-execute) in the last position.
pub fn format_mode(kind: FileKind, mode: u32) -> String {
    let first = match kind {
        FileKind::Directory => 'd',
        FileKind::Symlink => 'l',
        FileKind::File => '-',
    };
    let mut chars = [first, '-', '-', '-', '-', '-', '-', '-', '-', '-'];
    let shifts = [6, 3, 0];
    for (i, &shift) in shifts.iter().enumerate() {
        let base = 1 + i * 3;
        if (mode >> (shift + 2)) & 1u32 != 0 {
            chars[base] = 'r';
        }
        if (mode >> (shift + 1)) & 1u32 != 0 {
            chars[base + 1] = 'w';
        }
        if (mode >> shift) & 1u32 != 0 {
            chars[base + 2] = 'x';
        }
    }
    if mode & STICKY_BIT != 0 {
        chars[9] = if chars[9] == 'x' { 't' } else { 'T' };
    }
    chars.iter().collect()
}

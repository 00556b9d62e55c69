//! The normalized view of one remote filesystem entry.
//!
//! Provides the [EntryRecord] struct which is used throughout hdls.
//! Every client fills the same shape, whether the record comes from a metadata probe
//! or from a directory page.

use chrono::{DateTime, Utc};

/// Represents a single remote entry.
/// Holds the leaf name, type, permission string, ownership, size and modification time.
/// Created by a [RemoteFileSystemClient](crate::remote::RemoteFileSystemClient), immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    name: Box<str>,
    is_dir: bool,
    mode: String,
    owner: String,
    group: String,
    size: u64,
    modified: DateTime<Utc>,
}

impl EntryRecord {
    pub fn new(
        name: impl Into<Box<str>>,
        is_dir: bool,
        mode: impl Into<String>,
        owner: impl Into<String>,
        group: impl Into<String>,
        size: u64,
        modified: DateTime<Utc>,
    ) -> Self {
        EntryRecord {
            name: name.into(),
            is_dir,
            mode: mode.into(),
            owner: owner.into(),
            group: group.into(),
            size,
            modified,
        }
    }

    // Accessors

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Dotfiles are hidden, as on unix.
    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    #[inline]
    pub fn mode(&self) -> &str {
        &self.mode
    }

    #[inline]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[inline]
    pub fn group(&self) -> &str {
        &self.group
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn modified(&self) -> &DateTime<Utc> {
        &self.modified
    }
}

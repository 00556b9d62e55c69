//! The collaborator interface between the listing engine and a remote filesystem.
//!
//! The engine only ever talks to a [RemoteFileSystemClient]. Every call blocks until the
//! remote side answers or fails.

use crate::core::EntryRecord;
use crate::error::Result;

/// Metadata and directory access on one remote filesystem.
pub trait RemoteFileSystemClient {
    /// Probes a single path.
    ///
    /// Fails with a [PathError](crate::error::PathError) when the path does not exist or
    /// cannot be accessed, and with [Error::Io](crate::error::Error::Io) on transport failure.
    fn stat(&self, path: &str) -> Result<EntryRecord>;

    /// Opens a directory for paged reading.
    ///
    /// Fails with a not-a-directory [PathError](crate::error::PathError) when `path` is a file.
    fn open_directory<'a>(&'a self, path: &str) -> Result<Box<dyn DirectoryStream + 'a>>;
}

/// A cursor over one remote directory.
///
/// The sequence is finite and cannot be restarted. Exhaustion is reported through the
/// returned flag, never through an error.
pub trait DirectoryStream {
    /// Reads at most `max` further entries.
    /// # Returns
    /// The entries in the order the remote side lists them, and whether the stream is exhausted.
    fn read_next(&mut self, max: usize) -> Result<(Vec<EntryRecord>, bool)>;
}

//! Paged reading of remote directories.
//!
//! [DirectoryPager] owns a [DirectoryStream] and yields its entries in batches of at most
//! [BATCH_SIZE], so a listing of any size is held in memory one batch at a time and output
//! can start before the whole directory has been fetched.

use crate::core::EntryRecord;
use crate::error::Result;
use crate::remote::{DirectoryStream, RemoteFileSystemClient};

/// Number of entries requested per batch.
pub const BATCH_SIZE: usize = 100;

pub struct DirectoryPager<'a> {
    path: String,
    stream: Box<dyn DirectoryStream + 'a>,
    batch_size: usize,
    batches: usize,
    done: bool,
}

impl<'a> DirectoryPager<'a> {
    /// Opens `path` with the default batch size.
    pub fn open(client: &'a dyn RemoteFileSystemClient, path: &str) -> Result<Self> {
        Self::with_batch_size(client, path, BATCH_SIZE)
    }

    pub fn with_batch_size(
        client: &'a dyn RemoteFileSystemClient,
        path: &str,
        batch_size: usize,
    ) -> Result<Self> {
        let stream = client.open_directory(path)?;
        Ok(Self {
            path: path.to_string(),
            stream,
            batch_size: batch_size.max(1),
            batches: 0,
            done: false,
        })
    }

    /// Reads the next batch.
    /// # Returns
    /// The batch in stream order and whether the stream is exhausted. Once done, further
    /// calls return an empty batch without touching the stream.
    pub fn next_batch(&mut self) -> Result<(Vec<EntryRecord>, bool)> {
        if self.done {
            return Ok((Vec::new(), true));
        }
        let (batch, exhausted) = match self.stream.read_next(self.batch_size) {
            Ok(r) => r,
            Err(e) => {
                self.done = true;
                return Err(e);
            }
        };
        self.done = exhausted;
        if !batch.is_empty() {
            self.batches += 1;
            log::trace!(
                "{}: batch {} with {} entries",
                self.path,
                self.batches,
                batch.len()
            );
        }
        Ok((batch, exhausted))
    }
}

/// Yields only non-empty batches; an empty directory yields nothing.
impl Iterator for DirectoryPager<'_> {
    type Item = Result<Vec<EntryRecord>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.next_batch() {
                Ok((batch, _)) if batch.is_empty() => continue,
                Ok((batch, _)) => return Some(Ok(batch)),
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::remote::MemoryFs;

    fn fs_with(count: usize) -> MemoryFs {
        let mut fs = MemoryFs::new();
        fs.add_dir("/big");
        for i in 0..count {
            fs.add_file(&format!("/big/f{:03}", i), i as u64);
        }
        fs
    }

    #[test]
    fn batches_are_bounded() -> Result<()> {
        let fs = fs_with(250);
        let sizes: Vec<usize> = DirectoryPager::open(&fs, "/big")?
            .map(|b| b.map(|b| b.len()))
            .collect::<Result<_>>()?;
        assert_eq!(sizes, [100, 100, 50]);
        Ok(())
    }

    #[test]
    fn empty_directory_yields_no_batches() -> Result<()> {
        let mut fs = MemoryFs::new();
        fs.add_dir("/empty");
        let mut pager = DirectoryPager::open(&fs, "/empty")?;
        assert!(pager.next().is_none());
        assert_eq!(pager.next_batch()?, (Vec::new(), true));
        Ok(())
    }

    #[test]
    fn open_rejects_files_and_missing_paths() {
        let mut fs = MemoryFs::new();
        fs.add_file("/a.txt", 3);
        assert!(matches!(
            DirectoryPager::open(&fs, "/a.txt"),
            Err(Error::Path(_))
        ));
        assert!(matches!(
            DirectoryPager::open(&fs, "/nope"),
            Err(Error::Path(_))
        ));
    }

    #[test]
    fn mid_stream_failure_stops_the_pager() -> Result<()> {
        let mut fs = fs_with(150);
        fs.fail_listing_after("/big", 1);
        let mut pager = DirectoryPager::open(&fs, "/big")?;
        assert!(matches!(pager.next(), Some(Ok(ref b)) if b.len() == 100));
        assert!(matches!(pager.next(), Some(Err(Error::Io(_)))));
        assert!(pager.next().is_none());
        Ok(())
    }
}

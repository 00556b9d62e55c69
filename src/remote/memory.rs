//! An in-memory remote filesystem.
//!
//! [MemoryFs] implements [RemoteFileSystemClient] over a map of records. Children keep their
//! insertion order, the way a remote stream keeps its own order. It counts remote calls, can cap
//! the number of entries one read returns, and can fail a listing part-way through.

use crate::core::EntryRecord;
use crate::error::{Error, PathError, Result};
use crate::remote::{DirectoryStream, RemoteFileSystemClient};
use crate::utils::{leaf_name, normalize_path, parent_path};

use chrono::{DateTime, TimeZone, Utc};

use std::cell::Cell;
use std::collections::HashMap;

#[derive(Debug)]
pub struct MemoryFs {
    records: HashMap<String, EntryRecord>,
    children: HashMap<String, Vec<String>>,
    failures: HashMap<String, usize>,
    page_size: usize,
    modified: DateTime<Utc>,
    stat_calls: Cell<usize>,
    read_calls: Cell<usize>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// An empty filesystem holding only `/`.
    pub fn new() -> Self {
        let modified = Utc
            .with_ymd_and_hms(2026, 3, 4, 12, 30, 0)
            .single()
            .unwrap_or_default();
        let mut fs = Self {
            records: HashMap::new(),
            children: HashMap::new(),
            failures: HashMap::new(),
            page_size: usize::MAX,
            modified,
            stat_calls: Cell::new(0),
            read_calls: Cell::new(0),
        };
        fs.records.insert(
            "/".to_string(),
            EntryRecord::new("/", true, "drwxr-xr-x", "hdfs", "supergroup", 0, modified),
        );
        fs.children.insert("/".to_string(), Vec::new());
        fs
    }

    /// Caps how many entries a single read returns, like a server-side listing limit.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Modification time given to entries added afterwards.
    pub fn set_modified(&mut self, modified: DateTime<Utc>) {
        self.modified = modified;
    }

    pub fn add_dir(&mut self, path: &str) {
        let path = normalize_path(path);
        let record = EntryRecord::new(
            leaf_name(&path),
            true,
            "drwxr-xr-x",
            "alice",
            "staff",
            0,
            self.modified,
        );
        self.insert(&path, record);
    }

    pub fn add_file(&mut self, path: &str, size: u64) {
        let path = normalize_path(path);
        let record = EntryRecord::new(
            leaf_name(&path),
            false,
            "-rw-r--r--",
            "alice",
            "staff",
            size,
            self.modified,
        );
        self.insert(&path, record);
    }

    /// Inserts a record at `path`, creating missing parent directories.
    pub fn insert(&mut self, path: &str, record: EntryRecord) {
        let path = normalize_path(path);
        if path == "/" {
            return;
        }
        let parent = parent_path(&path);
        if !self.records.contains_key(&parent) {
            self.add_dir(&parent);
        }
        if record.is_dir() {
            self.children.entry(path.clone()).or_default();
        }
        if self.records.insert(path.clone(), record).is_none() {
            self.children
                .entry(parent)
                .or_default()
                .push(leaf_name(&path).to_string());
        }
    }

    /// Makes listing `path` fail with a transport error after `reads` successful reads.
    pub fn fail_listing_after(&mut self, path: &str, reads: usize) {
        self.failures.insert(normalize_path(path), reads);
    }

    #[inline]
    pub fn stat_calls(&self) -> usize {
        self.stat_calls.get()
    }

    #[inline]
    pub fn read_calls(&self) -> usize {
        self.read_calls.get()
    }
}

impl RemoteFileSystemClient for MemoryFs {
    fn stat(&self, path: &str) -> Result<EntryRecord> {
        self.stat_calls.set(self.stat_calls.get() + 1);
        self.records
            .get(&normalize_path(path))
            .cloned()
            .ok_or_else(|| PathError::not_found("stat", path).into())
    }

    fn open_directory<'a>(&'a self, path: &str) -> Result<Box<dyn DirectoryStream + 'a>> {
        let key = normalize_path(path);
        let record = self
            .records
            .get(&key)
            .ok_or_else(|| PathError::not_found("open", path))?;
        if !record.is_dir() {
            return Err(PathError::not_a_directory("open", path).into());
        }

        let entries = self
            .children
            .get(&key)
            .map(|names| {
                names
                    .iter()
                    .filter_map(|n| {
                        self.records
                            .get(&format!("{}/{}", key.trim_end_matches('/'), n))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(Box::new(MemoryStream {
            path: key.clone(),
            entries,
            pos: 0,
            reads: 0,
            fail_after: self.failures.get(&key).copied(),
            page_size: self.page_size,
            read_calls: &self.read_calls,
        }))
    }
}

struct MemoryStream<'a> {
    path: String,
    entries: Vec<EntryRecord>,
    pos: usize,
    reads: usize,
    fail_after: Option<usize>,
    page_size: usize,
    read_calls: &'a Cell<usize>,
}

impl DirectoryStream for MemoryStream<'_> {
    fn read_next(&mut self, max: usize) -> Result<(Vec<EntryRecord>, bool)> {
        self.read_calls.set(self.read_calls.get() + 1);
        if self.fail_after == Some(self.reads) {
            return Err(Error::io(format!("readdir {}: connection reset", self.path)));
        }
        self.reads += 1;

        let take = max.min(self.page_size);
        let end = self.entries.len().min(self.pos.saturating_add(take));
        let batch = self.entries[self.pos..end].to_vec();
        self.pos = end;
        Ok((batch, self.pos >= self.entries.len()))
    }
}

//! Splits path arguments into explicit files and directories to expand.
//!
//! Each argument is probed once with a metadata request. Any failed probe aborts the whole
//! command before a single record is rendered.

use crate::core::EntryRecord;
use crate::error::Result;
use crate::remote::RemoteFileSystemClient;

/// A remote path given on the command line.
///
/// `display` is the text the user typed (used in plain output and headers), `path` the
/// resolved absolute path used for remote calls and JSON names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathArgument {
    display: String,
    path: String,
}

impl PathArgument {
    pub fn new(display: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            path: path.into(),
        }
    }

    /// An argument whose display text is its absolute path.
    pub fn absolute(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            display: path.clone(),
            path,
        }
    }

    #[inline]
    pub fn display(&self) -> &str {
        &self.display
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// The two buckets, each in argument order.
#[derive(Debug, Default)]
pub struct Classified {
    pub files: Vec<(PathArgument, EntryRecord)>,
    pub dirs: Vec<PathArgument>,
}

pub struct ArgumentClassifier<'a> {
    client: &'a dyn RemoteFileSystemClient,
    home: &'a str,
}

impl<'a> ArgumentClassifier<'a> {
    pub fn new(client: &'a dyn RemoteFileSystemClient, home: &'a str) -> Self {
        Self { client, home }
    }

    /// Probes every argument; an empty list means the user's home directory.
    pub fn classify(&self, args: Vec<PathArgument>) -> Result<Classified> {
        let args = if args.is_empty() {
            vec![PathArgument::absolute(self.home)]
        } else {
            args
        };

        let mut out = Classified {
            files: Vec::with_capacity(args.len()),
            dirs: Vec::with_capacity(args.len()),
        };
        for arg in args {
            let record = self.client.stat(arg.path())?;
            if record.is_dir() {
                out.dirs.push(arg);
            } else {
                out.files.push((arg, record));
            }
        }
        log::debug!(
            "classified {} file(s), {} dir(s)",
            out.files.len(),
            out.dirs.len()
        );
        Ok(out)
    }
}

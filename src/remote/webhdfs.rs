//! Blocking WebHDFS client.
//!
//! Implements [RemoteFileSystemClient] over the namenode REST gateway:
//! `GETFILESTATUS` for probes and `LISTSTATUS_BATCH` (cursor: `startAfter`) for directory pages.
//!
//! With several namenode addresses the client fails over: a standby namenode or a transport
//! failure moves on to the next address, and the one that answered is tried first afterwards.

use crate::core::EntryRecord;
use crate::error::{Error, PathError, Result};
use crate::remote::status::{
    FileStatusResponse, ListingResponse, RemoteException, RemoteExceptionResponse,
};
use crate::remote::{DirectoryStream, RemoteFileSystemClient};
use crate::utils::leaf_name;

use serde::de::DeserializeOwned;
use ureq::Agent;
use url::Url;

use std::cell::Cell;
use std::collections::VecDeque;
use std::time::Duration;

/// REST prefix of every WebHDFS call.
const API_PREFIX: &str = "/webhdfs/v1";

pub struct WebHdfsClient {
    agent: Agent,
    namenodes: Vec<String>,
    active: Cell<usize>,
    user: Option<String>,
}

/// How a non-2xx answer is handled.
#[derive(Debug)]
enum Failure {
    /// Try the next namenode.
    Standby(String),
    Fatal(Error),
}

impl WebHdfsClient {
    /// `namenodes` are base URLs such as `http://nn1:9870`; `user` goes out as `user.name`.
    pub fn new(namenodes: Vec<String>, user: Option<String>, timeout: Duration) -> Result<Self> {
        if namenodes.is_empty() {
            return Err(Error::config("no namenode address to connect to"));
        }
        for nn in &namenodes {
            Url::parse(nn)
                .map_err(|e| Error::config(format!("invalid namenode address {}: {}", nn, e)))?;
        }
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Ok(Self {
            agent: Agent::new_with_config(config),
            namenodes,
            active: Cell::new(0),
            user,
        })
    }

    #[inline]
    pub fn namenodes(&self) -> &[String] {
        &self.namenodes
    }

    /// The address that answered last.
    pub fn active_namenode(&self) -> &str {
        &self.namenodes[self.active.get() % self.namenodes.len()]
    }

    fn request_url(&self, base: &str, op: &str, path: &str, extra: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(base)
            .map_err(|e| Error::config(format!("invalid namenode address {}: {}", base, e)))?;
        url.set_path(API_PREFIX);
        {
            // Segments are percent-encoded; a `%` in a name is literal.
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::config(format!("namenode address {} cannot carry a path", base))
            })?;
            let mut parts = path.split('/').filter(|s| !s.is_empty()).peekable();
            if parts.peek().is_none() {
                segments.push("");
            }
            segments.extend(parts);
        }
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("op", op);
            if let Some(user) = &self.user {
                query.append_pair("user.name", user);
            }
            for (k, v) in extra {
                query.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Issues one GET, failing over across namenodes.
    /// `label` names the operation in error messages (`stat`, `open`, `readdir`).
    fn get_json<T: DeserializeOwned>(
        &self,
        label: &'static str,
        op: &str,
        path: &str,
        extra: &[(&str, &str)],
    ) -> Result<T> {
        let count = self.namenodes.len();
        let start = self.active.get();
        let mut last_err = None;

        for attempt in 0..count {
            let idx = (start + attempt) % count;
            let base = &self.namenodes[idx];
            let url = self.request_url(base, op, path, extra)?;
            log::trace!("GET {}", url);

            let mut response = match self.agent.get(url.as_str()).call() {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("namenode {} unreachable: {}", base, e);
                    last_err = Some(Error::io(format!("{} {}: {}", label, path, e)));
                    continue;
                }
            };

            let status = response.status().as_u16();
            if (200..300).contains(&status) {
                if idx != start {
                    log::info!("failed over to namenode {}", base);
                }
                self.active.set(idx);
                return response.body_mut().read_json::<T>().map_err(|e| {
                    Error::io(format!("{} {}: invalid response: {}", label, path, e))
                });
            }

            let exception = response
                .body_mut()
                .read_json::<RemoteExceptionResponse>()
                .ok()
                .map(|r| r.remote_exception);
            match classify_failure(label, path, status, exception) {
                Failure::Standby(msg) => {
                    log::debug!("namenode {} is standby: {}", base, msg);
                    last_err = Some(Error::io(format!("{} {}: {}", label, path, msg)));
                }
                Failure::Fatal(e) => {
                    self.active.set(idx);
                    return Err(e);
                }
            }
        }
        Err(last_err
            .unwrap_or_else(|| Error::io(format!("{} {}: no namenode answered", label, path))))
    }

    fn list_page(&self, path: &str, start_after: Option<&str>) -> Result<ListingResponse> {
        match start_after {
            Some(cursor) => {
                self.get_json("readdir", "LISTSTATUS_BATCH", path, &[("startAfter", cursor)])
            }
            None => self.get_json("readdir", "LISTSTATUS_BATCH", path, &[]),
        }
    }
}

/// Maps an error status and its RemoteException body onto the error taxonomy.
fn classify_failure(
    label: &'static str,
    path: &str,
    status: u16,
    exception: Option<RemoteException>,
) -> Failure {
    let name = exception.as_ref().map(|e| e.exception.as_str()).unwrap_or("");
    let message = exception
        .as_ref()
        .map(|e| e.message.as_str())
        .filter(|m| !m.is_empty())
        .unwrap_or("request failed");

    match (name, status) {
        ("StandbyException", _) | ("RetriableException", _) => {
            Failure::Standby(format!("{}: {}", name, message))
        }
        ("FileNotFoundException", _) | (_, 404) => {
            Failure::Fatal(PathError::not_found(label, path).into())
        }
        ("AccessControlException", _) | ("SecurityException", 403) => {
            Failure::Fatal(PathError::permission_denied(label, path).into())
        }
        (_, 401) => Failure::Fatal(Error::auth(format!("{} {}: {}", label, path, message))),
        ("", status) => Failure::Fatal(Error::io(format!(
            "{} {}: HTTP {}: {}",
            label, path, status, message
        ))),
        (name, _) => Failure::Fatal(Error::io(format!(
            "{} {}: {}: {}",
            label, path, name, message
        ))),
    }
}

impl RemoteFileSystemClient for WebHdfsClient {
    fn stat(&self, path: &str) -> Result<EntryRecord> {
        let resp: FileStatusResponse = self.get_json("stat", "GETFILESTATUS", path, &[])?;
        resp.file_status.into_record(leaf_name(path))
    }

    fn open_directory<'a>(&'a self, path: &str) -> Result<Box<dyn DirectoryStream + 'a>> {
        let record = match self.stat(path) {
            Ok(r) => r,
            Err(Error::Path(mut e)) => {
                e.op = "open";
                return Err(e.into());
            }
            Err(e) => return Err(e),
        };
        if !record.is_dir() {
            return Err(PathError::not_a_directory("open", path).into());
        }
        Ok(Box::new(WebHdfsStream {
            client: self,
            path: path.to_string(),
            buffer: VecDeque::new(),
            start_after: None,
            more: true,
        }))
    }
}

/// Re-slices server pages into batches of the caller's size.
struct WebHdfsStream<'a> {
    client: &'a WebHdfsClient,
    path: String,
    buffer: VecDeque<EntryRecord>,
    start_after: Option<String>,
    more: bool,
}

impl WebHdfsStream<'_> {
    fn fetch_page(&mut self) -> Result<()> {
        let page = self
            .client
            .list_page(&self.path, self.start_after.as_deref())?
            .directory_listing;
        let statuses = page.partial_listing.file_statuses.file_status;
        log::debug!(
            "{}: page of {} entries, {} remaining",
            self.path,
            statuses.len(),
            page.remaining_entries
        );

        self.more = page.remaining_entries > 0 && !statuses.is_empty();
        if let Some(last) = statuses.last() {
            self.start_after = Some(last.path_suffix.clone());
        }
        for status in statuses {
            self.buffer.push_back(status.into_record("")?);
        }
        Ok(())
    }
}

impl DirectoryStream for WebHdfsStream<'_> {
    fn read_next(&mut self, max: usize) -> Result<(Vec<EntryRecord>, bool)> {
        if self.buffer.is_empty() && self.more {
            self.fetch_page()?;
        }
        let take = max.min(self.buffer.len());
        let batch: Vec<EntryRecord> = self.buffer.drain(..take).collect();
        Ok((batch, self.buffer.is_empty() && !self.more))
    }
}

//! Turns raw command-line strings into [PathArgument]s.
//!
//! Arguments may be plain paths (absolute, or relative to the remote home directory), URLs
//! naming the namenode (`webhdfs://`, `swebhdfs://`, `hdfs://`), or glob patterns that are
//! expanded against remote listings.

use crate::config::hadoop::{DEFAULT_HTTPS_PORT, DEFAULT_HTTP_PORT};
use crate::core::classify::PathArgument;
use crate::core::pager::DirectoryPager;
use crate::error::{Error, Result};
use crate::remote::RemoteFileSystemClient;
use crate::utils::{has_glob, join_path, resolve_path};

use glob_match::glob_match;
use url::Url;

/// A command-line argument before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArgument {
    /// Base URL of the namenode named by a URL argument, e.g. `http://nn1:9870`.
    pub namenode: Option<String>,
    pub path: String,
    pub display: String,
}

impl RawArgument {
    pub fn parse(raw: &str) -> Result<Self> {
        let Some((scheme, rest)) = raw.split_once("://") else {
            return Ok(Self {
                namenode: None,
                path: raw.to_string(),
                display: raw.to_string(),
            });
        };

        let url = Url::parse(raw)
            .map_err(|e| Error::config(format!("invalid path {}: {}", raw, e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| Error::config(format!("no namenode host in {}", raw)))?;
        let (http_scheme, port) = match scheme {
            "webhdfs" => ("http", url.port().unwrap_or(DEFAULT_HTTP_PORT)),
            "swebhdfs" => ("https", url.port().unwrap_or(DEFAULT_HTTPS_PORT)),
            // The RPC port is of no use to the HTTP gateway.
            "hdfs" => ("http", DEFAULT_HTTP_PORT),
            other => {
                return Err(Error::config(format!(
                    "unsupported scheme {}:// in {}",
                    other, raw
                )));
            }
        };

        let path = match rest.find('/') {
            Some(i) => rest[i..].to_string(),
            None => "/".to_string(),
        };
        Ok(Self {
            namenode: Some(format!("{}://{}:{}", http_scheme, host, port)),
            display: path.clone(),
            path,
        })
    }
}

/// The single namenode named by URL arguments, if any.
pub fn namenode_override(args: &[RawArgument]) -> Result<Option<String>> {
    let mut found: Option<&str> = None;
    for nn in args.iter().filter_map(|a| a.namenode.as_deref()) {
        match found {
            Some(prev) if prev != nn => {
                return Err(Error::config(format!(
                    "multiple namenodes specified: {} and {}",
                    prev, nn
                )));
            }
            _ => found = Some(nn),
        }
    }
    Ok(found.map(str::to_string))
}

/// Resolves every argument against `home` and expands globs, keeping argument order.
/// A pattern without matches is kept as written, so probing it reports the missing path.
pub fn resolve_arguments(
    client: &dyn RemoteFileSystemClient,
    home: &str,
    raw: Vec<RawArgument>,
) -> Result<Vec<PathArgument>> {
    let mut out = Vec::with_capacity(raw.len());
    for arg in raw {
        let absolute = resolve_path(home, &arg.path);
        if !has_glob(&absolute) {
            out.push(PathArgument::new(arg.display, absolute));
            continue;
        }
        let matches = expand_glob(client, &absolute)?;
        log::debug!("{} matched {} path(s)", absolute, matches.len());
        if matches.is_empty() {
            out.push(PathArgument::new(arg.display, absolute));
        } else {
            out.extend(matches.into_iter().map(PathArgument::absolute));
        }
    }
    Ok(out)
}

/// Expands an absolute pattern one component at a time. Matches come in listing order.
pub fn expand_glob(client: &dyn RemoteFileSystemClient, pattern: &str) -> Result<Vec<String>> {
    let mut prefixes = vec!["/".to_string()];
    for comp in pattern.split('/').filter(|c| !c.is_empty()) {
        if !has_glob(comp) {
            for p in prefixes.iter_mut() {
                *p = join_path(p, comp);
            }
            continue;
        }

        let mut next = Vec::new();
        for prefix in &prefixes {
            let pager = match DirectoryPager::open(client, prefix) {
                Ok(p) => p,
                // Literal prefixes that are missing or files simply match nothing.
                Err(Error::Path(_)) => continue,
                Err(e) => return Err(e),
            };
            for batch in pager {
                for entry in batch? {
                    if component_matches(comp, entry.name()) {
                        next.push(join_path(prefix, entry.name()));
                    }
                }
            }
        }
        prefixes = next;
        if prefixes.is_empty() {
            break;
        }
    }
    Ok(prefixes)
}

/// Hidden names only match patterns that start with a dot, as in a shell.
fn component_matches(pattern: &str, name: &str) -> bool {
    if name.starts_with('.') && !pattern.starts_with('.') {
        return false;
    }
    glob_match(pattern, name)
}

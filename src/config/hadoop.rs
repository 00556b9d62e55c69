//! Hadoop site configuration (`core-site.xml`, `hdfs-site.xml`).
//!
//! Used as the last fallback for finding namenode HTTP addresses when neither the command
//! line, `HADOOP_NAMENODE` nor hdls.toml names one.

use crate::error::{Error, Result};

use serde::Deserialize;
use url::Url;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Default namenode HTTP port (Hadoop 3).
pub const DEFAULT_HTTP_PORT: u16 = 9870;
/// Default namenode HTTPS port (Hadoop 3).
pub const DEFAULT_HTTPS_PORT: u16 = 9871;

const SITE_FILES: [&str; 2] = ["core-site.xml", "hdfs-site.xml"];

#[derive(Debug, Deserialize)]
struct XmlConfiguration {
    #[serde(rename = "property", default)]
    properties: Vec<XmlProperty>,
}

#[derive(Debug, Deserialize)]
struct XmlProperty {
    name: String,
    #[serde(default)]
    value: String,
}

/// Properties merged from the site files of one configuration directory.
#[derive(Debug, Default)]
pub struct SiteConfig {
    props: HashMap<String, String>,
}

impl SiteConfig {
    /// Reads the site files in `dir`. Later files override earlier ones.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut site = SiteConfig::default();
        let mut found = 0;
        for name in SITE_FILES {
            let path = dir.join(name);
            if !path.exists() {
                continue;
            }
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::config(format!("reading {}: {}", path.display(), e)))?;
            site.merge_xml(&content)
                .map_err(|e| Error::config(format!("parsing {}: {}", path.display(), e)))?;
            found += 1;
        }
        if found == 0 {
            return Err(Error::config(format!(
                "no core-site.xml or hdfs-site.xml in {}",
                dir.display()
            )));
        }
        log::debug!("loaded {} site properties from {}", site.props.len(), dir.display());
        Ok(site)
    }

    pub fn merge_xml(&mut self, xml: &str) -> std::result::Result<(), quick_xml::DeError> {
        let conf: XmlConfiguration = quick_xml::de::from_str(xml)?;
        for p in conf.properties {
            self.props.insert(p.name.trim().to_string(), p.value.trim().to_string());
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.props.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// Namenode base URLs, HA namenodes of the first nameservice first.
    pub fn namenode_http_addresses(&self) -> Vec<String> {
        let https = self
            .get("dfs.http.policy")
            .is_some_and(|p| p.eq_ignore_ascii_case("HTTPS_ONLY"));
        let (key, scheme, port) = if https {
            ("dfs.namenode.https-address", "https", DEFAULT_HTTPS_PORT)
        } else {
            ("dfs.namenode.http-address", "http", DEFAULT_HTTP_PORT)
        };
        let with_scheme = |addr: &str| format!("{}://{}", scheme, addr);

        if let Some(ns) = self
            .get("dfs.nameservices")
            .and_then(|v| v.split(',').map(str::trim).find(|s| !s.is_empty()))
        {
            if let Some(nns) = self.get(&format!("dfs.ha.namenodes.{}", ns)) {
                let addrs: Vec<String> = nns
                    .split(',')
                    .map(str::trim)
                    .filter(|nn| !nn.is_empty())
                    .filter_map(|nn| self.get(&format!("{}.{}.{}", key, ns, nn)))
                    .map(with_scheme)
                    .collect();
                if !addrs.is_empty() {
                    return addrs;
                }
            }
            if let Some(addr) = self.get(&format!("{}.{}", key, ns)) {
                return vec![with_scheme(addr)];
            }
        }

        // The wildcard bind address says nothing about where to connect.
        if let Some(addr) = self.get(key).filter(|a| !a.starts_with("0.0.0.0")) {
            return vec![with_scheme(addr)];
        }

        self.get("fs.defaultFS")
            .and_then(|fs| Url::parse(fs).ok())
            .filter(|url| url.scheme() == "hdfs")
            .and_then(|url| url.host_str().map(|h| format!("{}://{}:{}", scheme, h, port)))
            .into_iter()
            .collect()
    }
}

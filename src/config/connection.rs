//! The connection and kerberos settings for hdls.
//!
//! This module defines the [Connection] and [Kerberos] structs deserialized from the
//! `[connection]` and `[kerberos]` tables of hdls.toml, and the [InternalConnection] that the
//! session bootstrap works with once environment overrides are applied.

use serde::Deserialize;

use std::path::PathBuf;
use std::time::Duration;

/// Default kerberos configuration path.
pub const DEFAULT_KRB5_CONF: &str = "/etc/krb5.conf";
/// Default namenode service name.
pub const DEFAULT_SERVICE_NAME: &str = "nn";
/// Default timeout for one remote call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Connection {
    /// Comma-separated namenode HTTP addresses.
    namenode: Option<String>,
    conf_dir: Option<PathBuf>,
    user: Option<String>,
    timeout_secs: u64,
}

impl Default for Connection {
    fn default() -> Self {
        Connection {
            namenode: None,
            conf_dir: None,
            user: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Kerberos {
    keytab: Option<PathBuf>,
    krb5_conf: PathBuf,
    service_name: String,
}

impl Default for Kerberos {
    fn default() -> Self {
        Kerberos {
            keytab: None,
            krb5_conf: PathBuf::from(DEFAULT_KRB5_CONF),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalConnection {
    namenodes: Vec<String>,
    conf_dir: Option<PathBuf>,
    user: Option<String>,
    timeout: Duration,
    keytab: Option<PathBuf>,
    krb5_conf: PathBuf,
    service_name: String,
}

impl From<(Connection, Kerberos)> for InternalConnection {
    fn from((c, k): (Connection, Kerberos)) -> Self {
        Self {
            namenodes: c.namenode.as_deref().map(split_addresses).unwrap_or_default(),
            conf_dir: c.conf_dir,
            user: c.user.filter(|u| !u.is_empty()),
            timeout: Duration::from_secs(c.timeout_secs.max(1)),
            keytab: k.keytab,
            krb5_conf: k.krb5_conf,
            service_name: k.service_name,
        }
    }
}

impl Default for InternalConnection {
    fn default() -> Self {
        Self::from((Connection::default(), Kerberos::default()))
    }
}

impl InternalConnection {
    /// Applies the `HADOOP_*` environment variables over the file values.
    /// Empty variables count as unset.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("HADOOP_NAMENODE") {
            self.namenodes = split_addresses(&v);
        }
        if let Some(v) = var("HADOOP_CONF_DIR") {
            self.conf_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = var("HADOOP_USER_NAME") {
            self.user = Some(v);
        }
        if let Some(v) = var("HADOOP_KEYTAB") {
            self.keytab = Some(PathBuf::from(v));
        }
        if let Some(v) = var("HADOOP_KRB_CONF") {
            self.krb5_conf = PathBuf::from(v);
        }
        if let Some(v) = var("HADOOP_SNAME") {
            self.service_name = v;
        }
        self
    }

    // Getters

    #[inline]
    pub fn namenodes(&self) -> &[String] {
        &self.namenodes
    }

    #[inline]
    pub fn conf_dir(&self) -> Option<&PathBuf> {
        self.conf_dir.as_ref()
    }

    #[inline]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[inline]
    pub fn keytab(&self) -> Option<&PathBuf> {
        self.keytab.as_ref()
    }

    #[inline]
    pub fn krb5_conf(&self) -> &PathBuf {
        &self.krb5_conf
    }

    #[inline]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

/// Splits a comma-separated address list into base URLs.
/// Bare `host:port` entries get `http://`.
pub fn split_addresses(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(normalize_address)
        .collect()
}

pub fn normalize_address(addr: &str) -> String {
    let addr = addr.trim().trim_end_matches('/');
    if addr.contains("://") {
        addr.to_string()
    } else {
        format!("http://{}", addr)
    }
}

//! Session bootstrap.
//!
//! A [SessionProvider] builds the one [Session] of an invocation on first use:
//! it picks the namenode addresses, reads the keytab principal when one is configured and
//! settles the effective user. Later calls hand out the same session.

pub mod keytab;

use crate::config::{InternalConnection, SiteConfig};
use crate::error::{Error, Result};
use crate::remote::WebHdfsClient;
use crate::utils::remote_home;
use keytab::Principal;

use once_cell::unsync::OnceCell;
use url::Url;

use std::fs;

/// Keytab identity of a session. No ticket is requested; the principal only names the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    principal: Principal,
    service_principal: String,
}

impl Credentials {
    #[inline]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    #[inline]
    pub fn service_principal(&self) -> &str {
        &self.service_principal
    }
}

/// A connection to the namenode(s), acting as one user.
pub struct Session {
    client: WebHdfsClient,
    user: String,
    home: String,
    credentials: Option<Credentials>,
}

impl Session {
    // Accessors

    #[inline]
    pub fn client(&self) -> &WebHdfsClient {
        &self.client
    }

    #[inline]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// `/user/<name>`.
    #[inline]
    pub fn home(&self) -> &str {
        &self.home
    }

    #[inline]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

pub struct SessionProvider<'a> {
    connection: &'a InternalConnection,
    env: EnvLookup,
    session: OnceCell<Session>,
}

impl<'a> SessionProvider<'a> {
    pub fn new(connection: &'a InternalConnection) -> Self {
        Self::with_env(connection, |name| std::env::var(name).ok())
    }

    /// Reads the user fallbacks (`USER`, `LOGNAME`) through `lookup`.
    pub fn with_env<F>(connection: &'a InternalConnection, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        Self {
            connection,
            env: Box::new(lookup),
            session: OnceCell::new(),
        }
    }

    /// Returns the session, creating it on the first call.
    /// `namenode` is an address named on the command line and takes precedence over
    /// every configured one. It is only consulted by the creating call.
    pub fn get_or_create(&self, namenode: Option<&str>) -> Result<&Session> {
        self.session.get_or_try_init(|| self.create(namenode))
    }

    fn create(&self, namenode: Option<&str>) -> Result<Session> {
        let addresses = self.resolve_addresses(namenode)?;
        log::debug!("namenode addresses: {}", addresses.join(", "));

        let credentials = self.login(&addresses[0])?;
        let user = match &credentials {
            Some(c) => c.principal().primary().to_string(),
            None => self.effective_user()?,
        };
        log::debug!("effective user {}", user);

        let client = WebHdfsClient::new(addresses, Some(user.clone()), self.connection.timeout())?;
        Ok(Session {
            client,
            home: remote_home(&user),
            user,
            credentials,
        })
    }

    /// Command line, then `HADOOP_NAMENODE` or the config file, then the site files
    /// of the configured conf dir.
    pub fn resolve_addresses(&self, namenode: Option<&str>) -> Result<Vec<String>> {
        if let Some(nn) = namenode {
            return Ok(vec![nn.to_string()]);
        }
        if !self.connection.namenodes().is_empty() {
            return Ok(self.connection.namenodes().to_vec());
        }
        if let Some(dir) = self.connection.conf_dir() {
            let addresses = SiteConfig::load(dir)?.namenode_http_addresses();
            if !addresses.is_empty() {
                return Ok(addresses);
            }
            return Err(Error::config(format!(
                "no namenode address in site files under {}",
                dir.display()
            )));
        }
        Err(Error::config(
            "no namenode address: set HADOOP_NAMENODE or HADOOP_CONF_DIR",
        ))
    }

    fn login(&self, namenode: &str) -> Result<Option<Credentials>> {
        let Some(keytab) = self.connection.keytab() else {
            return Ok(None);
        };
        let krb5 = self.connection.krb5_conf();
        fs::read_to_string(krb5)
            .map_err(|e| Error::auth(format!("reading {}: {}", krb5.display(), e)))?;

        let principal = keytab::read_first_principal(keytab)?;
        let host = Url::parse(namenode)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();
        let credentials = Credentials {
            principal,
            service_principal: format!("{}/{}", self.connection.service_name(), host),
        };
        log::info!(
            "using keytab principal {} (service {})",
            credentials.principal,
            credentials.service_principal
        );
        Ok(Some(credentials))
    }

    fn effective_user(&self) -> Result<String> {
        if let Some(user) = self.connection.user() {
            return Ok(user.to_string());
        }
        ["USER", "LOGNAME"]
            .into_iter()
            .filter_map(|name| (self.env)(name))
            .find(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                Error::config("cannot determine user: set HADOOP_USER_NAME or USER")
            })
    }
}

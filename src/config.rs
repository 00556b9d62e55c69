//! Configuration for hdls.
//!
//! - [load]: the hdls.toml file ([Config], [RawConfig]) and its default location.
//! - [connection]: the `[connection]` and `[kerberos]` tables and the `HADOOP_*` environment overrides.
//! - [hadoop]: Hadoop site XML files, the fallback for namenode addresses.

pub mod connection;
pub mod hadoop;
pub mod load;

pub use connection::InternalConnection;
pub use hadoop::SiteConfig;
pub use load::{Config, RawConfig};

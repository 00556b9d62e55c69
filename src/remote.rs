//! Remote filesystem access for hdls.
//!
//! - [client]: the [RemoteFileSystemClient] and [DirectoryStream] traits the listing engine uses.
//! - [webhdfs]: the blocking WebHDFS implementation with namenode failover.
//! - [status]: WebHDFS `FileStatus` payloads and their conversion into [EntryRecord](crate::core::EntryRecord).
//! - [memory]: an in-memory filesystem with call counting, used by the test suites.

pub mod client;
pub mod memory;
pub mod status;
pub mod webhdfs;

pub use client::{DirectoryStream, RemoteFileSystemClient};
pub use memory::MemoryFs;
pub use webhdfs::WebHdfsClient;

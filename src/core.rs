//! The listing-and-formatting engine of hdls.
//!
//! This module contains every piece between the command line and the output stream:
//! - [entry]: the [EntryRecord] every remote client produces.
//! - [resolve]: URL arguments, relative paths and glob expansion (see [RawArgument]).
//! - [classify]: splitting arguments into explicit files and directories ([ArgumentClassifier]).
//! - [pager]: batched directory reads ([DirectoryPager]).
//! - [formatter]: the hidden-entry filter and the shared size, date and JSON formatting.
//! - [align]: the column aligner of the long format.
//! - [render]: output framing, JSON envelope and flush-on-drop ([Renderer]).
//! - [listing]: the orchestrator tying it together ([Listing]).
//!
//! Nothing in here knows about WebHDFS; remote access goes through
//! [RemoteFileSystemClient](crate::remote::RemoteFileSystemClient).

pub mod align;
pub mod classify;
pub mod entry;
pub mod formatter;
pub mod listing;
pub mod pager;
pub mod render;
pub mod resolve;

pub use align::ColumnAligner;
pub use classify::{ArgumentClassifier, Classified, PathArgument};
pub use entry::EntryRecord;
pub use formatter::{EntryFilter, format_file_size, format_file_time};
pub use listing::{ListOptions, Listing};
pub use pager::{BATCH_SIZE, DirectoryPager};
pub use render::{RenderOptions, Renderer};
pub use resolve::{RawArgument, namenode_override, resolve_arguments};

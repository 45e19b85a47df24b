//! `groupstack_core` composes layered configuration groups into a single file
//! tree and writes it to a destination directory.
//!
//! A group is a directory of files, `<config>/<name>/`, with an optional
//! manifest next to it, `<config>/<name>.json`, that lists included groups and
//! template parameters:
//!
//! ```json
//! {
//!   "include": { "base": {}, "lib": { "version": "2" } },
//!   "params": { "host": "example.org" }
//! }
//! ```
//!
//! ## Processing Pipeline
//!
//! ```text
//! <name>.json + <name>/
//!   → Config loader (manifest: includes + params, empty when absent)
//!   → Directory scanner (directory / binary / text entries of one group)
//!   → Group tree (children loaded per include entry with edge overrides)
//!   → File merger (children in declared order, then the group's own files)
//!   → Materializer (render, diff against existing output, write, chmod)
//! ```
//!
//! ## Precedence
//!
//! - A group's own files outrank everything its children contribute.
//! - Later `include` entries outrank earlier ones.
//! - Text files accumulate: each contributing group adds a segment and the
//!   segments are rendered and joined with a newline, least specific first.
//! - Directories and binary files replace whatever was collected before.
//!
//! ## Templates
//!
//! Text segments are rendered with [`minijinja`](https://docs.rs/minijinja)
//! using `<%= name %>` expressions against the parameters of the group that
//! owns the file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use groupstack_core::Builder;
//!
//! let builder = Builder::new("/etc/groupstack");
//! builder.synchronize_config(Some("https://example.org/config.git"));
//!
//! let report = builder.build("/srv/app", "web").unwrap();
//! if !report.is_ok() {
//!     eprintln!("{} file(s) failed", report.errors.len());
//! }
//! ```

pub use builder::*;
pub use config::GroupManifest;
pub use config::ManifestOutcome;
pub use config::Params;
pub use diff::*;
pub use error::*;
pub use group::*;
pub use materialize::*;
pub use merge::*;
pub use render::*;
pub use scanner::*;
pub use sync::*;

mod builder;
pub mod config;
mod diff;
#[allow(unused_assignments)]
mod error;
pub mod fs_mode;
mod group;
mod materialize;
mod merge;
mod render;
mod scanner;
mod sync;

#[cfg(test)]
mod __fixtures;

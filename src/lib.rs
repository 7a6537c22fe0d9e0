//! # treemerge
//!
//! Flattens a project directory into a single document.
//!
//! Every file whose name ends with an allowed extension is copied, in
//! depth-first directory order, into one output file. Each file is wrapped
//! in a fenced block with a `file:` header, and lines holding nothing but
//! an inline comment are dropped on the way.
//!
//! ## Quick Start
//!
//! ```no_run
//! use treemerge::{Config, syntax};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .root_path(".")
//!     .project_dir("my_project")
//!     .output_dir("out")
//!     .output_filename("my_project")
//!     .output_extension("md")
//!     .skip_folders(vec!["__pycache__".to_string(), ".git".to_string()])
//!     .allowed_extensions(vec![".py".to_string()])
//!     .syntax(syntax::lookup("python"))
//!     .build()?;
//!
//! treemerge::run(config)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! 1. **Walker**: visits the project depth-first, pruning skip folders
//! 2. **Filter**: selects files by name and drops comment-only lines
//! 3. **Renderer**: wraps each file in header and footer delimiters
//! 4. **Writer**: streams the result into the destination file

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod filter;
mod loader;
mod pipeline;
mod render;
mod walker;
mod writer;

pub mod syntax;

pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use filter::{is_comment_only_line, CommentFilter, PathFilter};
pub use loader::{
    ConfigLoader, ALLOWED_EXTENSIONS_FILE, PROJECT_CONFIG_FILE, SKIP_FILES_FILE,
    SKIP_FOLDERS_FILE,
};
pub use pipeline::{MergeStats, Pipeline};
pub use render::{FileRenderer, RenderedFile};
pub use syntax::CommentSyntax;
pub use walker::{DirectoryWalker, EligibleFiles, MergeStream, WalkStats};
pub use writer::{MergeWriter, WriteOutcome};

/// Runs a complete merge with the given configuration.
///
/// This is the main entry point for the library.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - Output directory cannot be created
///
/// Directory listing, file read and output write failures are logged and
/// counted in [`MergeStats`] instead.
///
/// # Examples
///
/// ```no_run
/// use treemerge::{Config, run};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config::builder()
///     .project_dir("src")
///     .allowed_extensions(vec![".rs".to_string()])
///     .build()?;
///
/// run(config)?;
/// # Ok(())
/// # }
/// ```
pub fn run(config: Config) -> Result<MergeStats> {
    Pipeline::new(config)?.run()
}

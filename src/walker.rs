use crate::{
    config::Config,
    filter::PathFilter,
    render::{FileRenderer, RenderedFile},
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, trace};
use walkdir::WalkDir;

/// Counters collected while walking and rendering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WalkStats {
    /// Subdirectories descended into
    pub directories_visited: usize,

    /// Entries pruned because their name is a skip folder
    pub directories_pruned: usize,

    /// Files rendered into the output
    pub files_merged: usize,

    /// Files left out by name or extension
    pub files_skipped: usize,

    /// Directories that could not be listed
    pub access_errors: usize,

    /// Merged files that could not be fully read
    pub read_errors: usize,

    /// Comment-only lines dropped from merged files
    pub comment_lines_dropped: usize,
}

/// Depth-first walker over the project directory.
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    project_path: PathBuf,
    filter: PathFilter,
    renderer: FileRenderer,
    sort_entries: bool,
}

impl DirectoryWalker {
    /// Creates a walker for the configured project directory.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            project_path: config.project_path(),
            filter: PathFilter::new(config),
            renderer: FileRenderer::new(config),
            sort_entries: config.sort_entries,
        }
    }

    /// Returns the directory the walk starts from.
    #[must_use]
    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// Returns a lazy sequence of the paths of every eligible file.
    #[must_use]
    pub fn eligible_files(&self) -> EligibleFiles {
        let mut walk = WalkDir::new(&self.project_path)
            .min_depth(1)
            .follow_links(true);

        if self.sort_entries {
            walk = walk.sort_by_file_name();
        }

        debug!("Walking {}", self.project_path.display());

        EligibleFiles {
            entries: walk.into_iter(),
            filter: self.filter.clone(),
            stats: WalkStats::default(),
        }
    }

    /// Returns the merged document as a lazy sequence of output chunks.
    #[must_use]
    pub fn stream(&self) -> MergeStream {
        MergeStream {
            files: self.eligible_files(),
            renderer: self.renderer.clone(),
            current: None,
        }
    }
}

/// Paths of eligible files in depth-first listing order.
///
/// Entries named in the skip folder list are pruned with their subtree.
/// Directories that cannot be listed are logged and skipped.
pub struct EligibleFiles {
    entries: walkdir::IntoIter,
    filter: PathFilter,
    stats: WalkStats,
}

impl EligibleFiles {
    /// Returns the counters gathered so far.
    #[must_use]
    pub const fn stats(&self) -> WalkStats {
        self.stats
    }

    /// Applies the name rules to a link whose target is missing.
    ///
    /// An eligible link is still handed to the renderer, which logs the
    /// failed open as a read error.
    fn dangling_entry(&mut self, path: PathBuf) -> Option<PathBuf> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.filter.is_skipped_folder(&name) {
            debug!("Skipping {}", path.display());
            self.stats.directories_pruned += 1;
            return None;
        }

        if self.filter.is_eligible_file(&name) {
            debug!("Dangling link: {}", path.display());
            return Some(path);
        }

        trace!("Not eligible: {}", path.display());
        self.stats.files_skipped += 1;
        None
    }
}

/// Returns the link path if the walk error comes from a symlink whose
/// target does not exist.
fn dangling_link(e: &walkdir::Error) -> Option<PathBuf> {
    if e.depth() == 0 || e.loop_ancestor().is_some() {
        return None;
    }

    let path = e.path()?;
    let is_link = path
        .symlink_metadata()
        .is_ok_and(|meta| meta.file_type().is_symlink());

    (is_link && path.metadata().is_err()).then(|| path.to_path_buf())
}

impl Iterator for EligibleFiles {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    if let Some(path) = dangling_link(&e) {
                        if let Some(path) = self.dangling_entry(path) {
                            return Some(path);
                        }
                        continue;
                    }
                    error!("Error accessing directory: {}", e);
                    self.stats.access_errors += 1;
                    continue;
                }
            };

            let (skipped, eligible) = {
                let name = entry.file_name().to_string_lossy();
                (
                    self.filter.is_skipped_folder(&name),
                    self.filter.is_eligible_file(&name),
                )
            };

            if skipped {
                debug!("Skipping {}", entry.path().display());
                if entry.file_type().is_dir() {
                    self.entries.skip_current_dir();
                }
                self.stats.directories_pruned += 1;
                continue;
            }

            // Directories are never rendered, even when their name matches
            // an allowed extension.
            if entry.file_type().is_dir() {
                trace!("Entering {}", entry.path().display());
                self.stats.directories_visited += 1;
                continue;
            }

            if eligible {
                return Some(entry.into_path());
            }

            trace!("Not eligible: {}", entry.path().display());
            self.stats.files_skipped += 1;
        }
    }
}

/// The merged document, produced one chunk at a time.
///
/// Holds at most one open source file.
pub struct MergeStream {
    files: EligibleFiles,
    renderer: FileRenderer,
    current: Option<RenderedFile>,
}

impl MergeStream {
    /// Returns the counters gathered so far.
    #[must_use]
    pub const fn stats(&self) -> WalkStats {
        self.files.stats
    }

    fn finish_current(&mut self) {
        if let Some(done) = self.current.take() {
            let stats = &mut self.files.stats;
            stats.files_merged += 1;
            stats.comment_lines_dropped += done.lines_dropped();
            if done.failed() {
                stats.read_errors += 1;
            }
            trace!(
                "Merged {} ({} lines kept, {} dropped)",
                done.path().display(),
                done.lines_kept(),
                done.lines_dropped()
            );
        }
    }
}

impl Iterator for MergeStream {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(current) = self.current.as_mut() {
                if let Some(chunk) = current.next() {
                    return Some(chunk);
                }
                self.finish_current();
            }

            let path = self.files.next()?;
            self.current = Some(self.renderer.render(&path));
        }
    }
}

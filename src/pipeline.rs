use crate::{
    config::Config,
    error::Result,
    walker::{DirectoryWalker, WalkStats},
    writer::{MergeWriter, WriteOutcome},
};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Statistics collected during a merge run.
#[derive(Debug, Clone, Serialize)]
pub struct MergeStats {
    /// Walk and render counters
    #[serde(flatten)]
    pub walk: WalkStats,

    /// Whether the merged document was fully written
    pub output_written: bool,

    /// Bytes written to the merged document
    pub bytes_written: u64,

    /// Merged document path
    pub output_path: String,

    /// Total execution time
    pub duration: Duration,
}

impl MergeStats {
    fn new(walk: WalkStats, outcome: WriteOutcome, output_path: String, duration: Duration) -> Self {
        Self {
            walk,
            output_written: outcome.written,
            bytes_written: outcome.bytes_written,
            output_path,
            duration,
        }
    }

    /// Returns true if any directory, file or output failure was logged.
    #[must_use]
    pub const fn had_errors(&self) -> bool {
        self.walk.access_errors > 0 || self.walk.read_errors > 0 || !self.output_written
    }
}

/// Orchestrates a merge: walk, filter, render, write.
pub struct Pipeline {
    config: Config,
    walker: DirectoryWalker,
    writer: MergeWriter,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let walker = DirectoryWalker::new(&config);
        let writer = MergeWriter::new(&config);

        Ok(Self {
            config,
            walker,
            writer,
        })
    }

    /// Runs the merge and returns statistics.
    ///
    /// In dry run mode the project is walked and every eligible file is
    /// logged, but no output is written.
    ///
    /// # Errors
    ///
    /// Returns an error only if the output directory cannot be created.
    /// Unreadable directories, unreadable files and a failing destination
    /// file are logged and reflected in the returned [`MergeStats`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use treemerge::{Config, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .project_dir("./src")
    ///     .allowed_extensions(vec![".rs".to_string()])
    ///     .build()?;
    ///
    /// let stats = Pipeline::new(config)?.run()?;
    /// println!("{} files merged", stats.walk.files_merged);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(project = %self.walker.project_path().display()))]
    pub fn run(self) -> Result<MergeStats> {
        let start_time = Instant::now();
        let output_path = self.writer.output_path().display().to_string();

        if self.config.dry_run {
            warn!("Dry run mode enabled - skipping output write");
            let walk = self.dry_run();
            return Ok(MergeStats::new(
                walk,
                WriteOutcome::default(),
                output_path,
                start_time.elapsed(),
            ));
        }

        info!("Merging {} into {}", self.walker.project_path().display(), output_path);

        let mut stream = self.walker.stream();
        let outcome = self.writer.write(stream.by_ref())?;
        let stats = MergeStats::new(stream.stats(), outcome, output_path, start_time.elapsed());

        self.log_summary(&stats);
        Ok(stats)
    }

    fn dry_run(&self) -> WalkStats {
        let project = self.walker.project_path();
        let mut files = self.walker.eligible_files();
        let mut count = 0usize;

        for path in files.by_ref() {
            let relative = pathdiff::diff_paths(&path, project).unwrap_or_else(|| path.clone());
            info!("Would merge: {}", relative.display());
            count += 1;
        }

        let walk = files.stats();
        info!(
            "Dry run complete: {} files would be merged, {} skipped",
            count, walk.files_skipped
        );
        walk
    }

    fn log_summary(&self, stats: &MergeStats) {
        let walk = &stats.walk;

        info!(
            "✓ Merged {} files ({} skipped, {} comment lines dropped) in {:.2}s",
            walk.files_merged,
            walk.files_skipped,
            walk.comment_lines_dropped,
            stats.duration.as_secs_f64()
        );

        if walk.directories_pruned > 0 {
            info!("  Pruned {} skip folders", walk.directories_pruned);
        }

        if walk.access_errors > 0 || walk.read_errors > 0 {
            warn!(
                "  {} directories could not be listed, {} files could not be read",
                walk.access_errors, walk.read_errors
            );
        }

        if !stats.output_written {
            warn!("  Output {} was not fully written", stats.output_path);
        }
    }
}

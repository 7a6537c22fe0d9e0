use crate::error::{Error, Result};
use crate::syntax::CommentSyntax;
use std::path::PathBuf;

const DEFAULT_OUTPUT_DIR: &str = "out";
const DEFAULT_OUTPUT_FILENAME: &str = "merged";
const DEFAULT_OUTPUT_EXTENSION: &str = "md";

/// Configuration for a merge run.
///
/// Use [`Config::builder()`] to construct a new configuration, or
/// [`crate::ConfigLoader`] to read one from a directory of JSON files.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Base path the project directory is resolved against
    pub root_path: PathBuf,

    /// Project directory to merge, relative to `root_path`
    pub project_dir: PathBuf,

    /// Directory the merged document is written to
    pub output_dir: PathBuf,

    /// Merged document file name, without extension
    pub output_filename: String,

    /// Merged document extension, without the leading dot
    pub output_extension: String,

    /// Directory names pruned wherever they appear
    pub skip_folders: Vec<String>,

    /// File names never merged
    pub skip_files: Vec<String>,

    /// Name suffixes a file must end with to be merged (e.g. `.py`)
    pub allowed_extensions: Vec<String>,

    /// Comment tokens of the project language
    pub syntax: CommentSyntax,

    /// Visit sibling entries in file-name order instead of listing order
    pub sort_entries: bool,

    /// Walk and filter without writing the merged document
    pub dry_run: bool,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use treemerge::Config;
    ///
    /// let config = Config::builder()
    ///     .project_dir("src")
    ///     .allowed_extensions(vec![".rs".to_string()])
    ///     .build()
    ///     .expect("valid configuration");
    ///
    /// assert!(config.output_path().ends_with("merged.md"));
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output file name or extension is empty
    /// - Inline comment marker is empty
    /// - An allowed extension is empty
    pub fn validate(&self) -> Result<()> {
        if self.output_filename.is_empty() {
            return Err(Error::config("output_filename must not be empty"));
        }

        if self.output_extension.is_empty() {
            return Err(Error::config("output_extension must not be empty"));
        }

        // An empty marker would match every line.
        if self.syntax.inline.is_empty() {
            return Err(Error::config("inline comment marker must not be empty"));
        }

        if let Some(position) = self.allowed_extensions.iter().position(String::is_empty) {
            return Err(Error::config(format!(
                "allowed_extensions[{position}] must not be empty"
            )));
        }

        if self.allowed_extensions.is_empty() {
            tracing::warn!("allowed_extensions is empty: no file will be merged");
        }

        Ok(())
    }

    /// Returns the directory the walk starts from.
    #[must_use]
    pub fn project_path(&self) -> PathBuf {
        self.root_path.join(&self.project_dir)
    }

    /// Returns the merged document path.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.output_filename, self.output_extension))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_path: PathBuf::from("."),
            project_dir: PathBuf::from("."),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            skip_folders: Vec::new(),
            skip_files: Vec::new(),
            allowed_extensions: Vec::new(),
            syntax: CommentSyntax::default(),
            sort_entries: false,
            dry_run: false,
        }
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    root_path: Option<PathBuf>,
    project_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    output_filename: Option<String>,
    output_extension: Option<String>,
    skip_folders: Vec<String>,
    skip_files: Vec<String>,
    allowed_extensions: Vec<String>,
    syntax: Option<CommentSyntax>,
    sort_entries: bool,
    dry_run: bool,
}

impl ConfigBuilder {
    /// Sets the base path the project directory is resolved against.
    #[must_use]
    pub fn root_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_path = Some(path.into());
        self
    }

    /// Sets the project directory, relative to the root path.
    #[must_use]
    pub fn project_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_dir = Some(path.into());
        self
    }

    /// Sets the output directory.
    #[must_use]
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Sets the output file name, without extension.
    #[must_use]
    pub fn output_filename(mut self, name: impl Into<String>) -> Self {
        self.output_filename = Some(name.into());
        self
    }

    /// Sets the output extension, without the leading dot.
    #[must_use]
    pub fn output_extension(mut self, ext: impl Into<String>) -> Self {
        self.output_extension = Some(ext.into());
        self
    }

    /// Sets the folder names pruned during the walk.
    #[must_use]
    pub fn skip_folders(mut self, names: Vec<String>) -> Self {
        self.skip_folders = names;
        self
    }

    /// Sets the file names never merged.
    #[must_use]
    pub fn skip_files(mut self, names: Vec<String>) -> Self {
        self.skip_files = names;
        self
    }

    /// Sets the name suffixes a file must end with to be merged.
    #[must_use]
    pub fn allowed_extensions(mut self, extensions: Vec<String>) -> Self {
        self.allowed_extensions = extensions;
        self
    }

    /// Sets the comment syntax.
    #[must_use]
    pub fn syntax(mut self, syntax: CommentSyntax) -> Self {
        self.syntax = Some(syntax);
        self
    }

    /// Enables or disables file-name ordering of sibling entries.
    #[must_use]
    pub fn sort_entries(mut self, enabled: bool) -> Self {
        self.sort_entries = enabled;
        self
    }

    /// Enables dry run mode (no output file is written).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            root_path: self.root_path.unwrap_or_else(|| PathBuf::from(".")),
            project_dir: self.project_dir.unwrap_or_else(|| PathBuf::from(".")),
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            output_filename: self
                .output_filename
                .unwrap_or_else(|| DEFAULT_OUTPUT_FILENAME.to_string()),
            output_extension: self
                .output_extension
                .unwrap_or_else(|| DEFAULT_OUTPUT_EXTENSION.to_string()),
            skip_folders: self.skip_folders,
            skip_files: self.skip_files,
            allowed_extensions: self.allowed_extensions,
            syntax: self.syntax.unwrap_or_default(),
            sort_entries: self.sort_entries,
            dry_run: self.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}

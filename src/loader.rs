//! Configuration loading from a directory of JSON files.
//!
//! The directory holds:
//!
//! - `skip_folders.json`, `skip_files.json`, `allowed_extensions.json`:
//!   arrays of strings. A missing or unparsable file counts as an empty list.
//! - `project_config.json`: an object with the string fields `root_path`,
//!   `project_dir`, `output_dir`, `output_filename`, `output_extension` and
//!   `project_language`, plus an optional boolean `sort_entries`. List
//!   fields present here take precedence over the list files.

use crate::{
    config::{Config, ConfigBuilder},
    error::{Error, Result},
    syntax,
};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File listing folder names to prune.
pub const SKIP_FOLDERS_FILE: &str = "skip_folders.json";
/// File listing file names to leave out.
pub const SKIP_FILES_FILE: &str = "skip_files.json";
/// File listing allowed name suffixes.
pub const ALLOWED_EXTENSIONS_FILE: &str = "allowed_extensions.json";
/// File holding the project settings.
pub const PROJECT_CONFIG_FILE: &str = "project_config.json";

/// Builds a [`Config`] from a configuration directory.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a loader for the given configuration directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Loads and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the project configuration is missing or
    /// unparsable, a field is missing or has the wrong type, or the
    /// resulting configuration fails validation.
    pub fn load(&self) -> Result<Config> {
        self.builder()?.build()
    }

    /// Loads the configuration into a builder so callers can override fields.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigLoader::load`], except validation, which happens on
    /// [`ConfigBuilder::build`].
    pub fn builder(&self) -> Result<ConfigBuilder> {
        let project = self.project_config()?;

        let skip_folders = self.list_field(&project, "skip_folders", SKIP_FOLDERS_FILE)?;
        let skip_files = self.list_field(&project, "skip_files", SKIP_FILES_FILE)?;
        let allowed_extensions =
            self.list_field(&project, "allowed_extensions", ALLOWED_EXTENSIONS_FILE)?;

        let root_path = required_string(&project, "root_path")?;
        let project_dir = required_string(&project, "project_dir")?;
        let output_dir = required_string(&project, "output_dir")?;
        let output_filename = required_string(&project, "output_filename")?;
        let output_extension = required_string(&project, "output_extension")?;
        let language = required_string(&project, "project_language")?;
        let sort_entries = optional_bool(&project, "sort_entries")?.unwrap_or(false);

        debug!(
            "Loaded configuration from {} (language '{}')",
            self.dir.display(),
            language
        );

        Ok(Config::builder()
            .root_path(root_path)
            .project_dir(project_dir)
            .output_dir(output_dir)
            .output_filename(output_filename)
            .output_extension(output_extension)
            .skip_folders(skip_folders)
            .skip_files(skip_files)
            .allowed_extensions(allowed_extensions)
            .syntax(syntax::lookup(&language))
            .sort_entries(sort_entries))
    }

    fn project_config(&self) -> Result<Map<String, Value>> {
        let path = self.dir.join(PROJECT_CONFIG_FILE);
        let content = fs::read_to_string(&path).map_err(|e| {
            Error::config(format!(
                "cannot read project configuration '{}': {}",
                path.display(),
                e
            ))
        })?;

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::config_type(
                "project_config",
                "an object",
                describe(&other),
            )),
        }
    }

    fn list_field(
        &self,
        project: &Map<String, Value>,
        field: &str,
        file: &str,
    ) -> Result<Vec<String>> {
        match project.get(field) {
            Some(value) => string_list(field, Some(value)),
            None => string_list(field, read_json(&self.dir.join(file)).as_ref()),
        }
    }
}

fn read_json(path: &Path) -> Option<Value> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Error loading JSON file {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Error loading JSON file {}: {}", path.display(), e);
            None
        }
    }
}

fn string_list(field: &str, value: Option<&Value>) -> Result<Vec<String>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };

    let Value::Array(items) = value else {
        return Err(Error::config_type(
            field,
            "an array of strings",
            describe(value),
        ));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(Error::config_type(
                format!("{field}[{index}]"),
                "a string",
                describe(other),
            )),
        })
        .collect()
}

fn required_string(map: &Map<String, Value>, field: &str) -> Result<String> {
    match map.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(Error::config_type(field, "a string", describe(other))),
        None => Err(Error::missing_field(field)),
    }
}

fn optional_bool(map: &Map<String, Value>, field: &str) -> Result<Option<bool>> {
    match map.get(field) {
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::Null) | None => Ok(None),
        Some(other) => Err(Error::config_type(field, "a boolean", describe(other))),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
    .to_string()
}

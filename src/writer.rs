use crate::{
    config::Config,
    error::{Error, Result},
};
use serde::Serialize;
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, error, info};

/// Result of writing the merged document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WriteOutcome {
    /// Whether every chunk was written and flushed
    pub written: bool,

    /// Bytes handed to the output file before completion or failure
    pub bytes_written: u64,
}

/// Writes the merged document to its single destination file.
#[derive(Debug, Clone)]
pub struct MergeWriter {
    output_dir: PathBuf,
    output_path: PathBuf,
}

impl MergeWriter {
    /// Creates a new writer from configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            output_path: config.output_path(),
        }
    }

    /// Returns the destination file path.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Writes every chunk, in order, to the destination file.
    ///
    /// The destination is created or truncated. Failures to open, write or
    /// flush it are logged and reported through [`WriteOutcome::written`].
    ///
    /// # Errors
    ///
    /// Returns an error only if the output directory cannot be created.
    pub fn write<I>(&self, chunks: I) -> Result<WriteOutcome>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        fs::create_dir_all(&self.output_dir).map_err(|e| Error::io(&self.output_dir, e))?;

        let file = match fs::File::create(&self.output_path) {
            Ok(file) => file,
            Err(e) => {
                error!("Error writing to file {}: {}", self.output_path.display(), e);
                return Ok(WriteOutcome::default());
            }
        };

        debug!("Writing merged output to {}", self.output_path.display());

        let mut out = BufWriter::new(file);
        let mut bytes_written = 0u64;

        for chunk in chunks {
            let chunk = chunk.as_ref();
            if let Err(e) = out.write_all(chunk.as_bytes()) {
                error!("Error writing to file {}: {}", self.output_path.display(), e);
                return Ok(WriteOutcome {
                    written: false,
                    bytes_written,
                });
            }
            bytes_written += chunk.len() as u64;
        }

        if let Err(e) = out.flush() {
            error!("Error writing to file {}: {}", self.output_path.display(), e);
            return Ok(WriteOutcome {
                written: false,
                bytes_written,
            });
        }

        info!(
            "Wrote {} bytes to {}",
            bytes_written,
            self.output_path.display()
        );

        Ok(WriteOutcome {
            written: true,
            bytes_written,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn create_test_config(output_dir: &Path) -> Config {
        Config::builder()
            .output_dir(output_dir)
            .output_filename("merged")
            .output_extension("txt")
            .build()
            .unwrap()
    }

    #[test]
    fn test_writer_creates_nested_output_directory() {
        let temp = assert_fs::TempDir::new().unwrap();
        let output_dir = temp.child("a/b/c");

        let writer = MergeWriter::new(&create_test_config(output_dir.path()));
        let outcome = writer.write(["one\n", "two\n"]).unwrap();

        assert!(outcome.written);
        assert_eq!(outcome.bytes_written, 8);
        output_dir.child("merged.txt").assert("one\ntwo\n");
    }

    #[test]
    fn test_writer_truncates_existing_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let existing = temp.child("merged.txt");
        existing.write_str("stale content that is longer").unwrap();

        let writer = MergeWriter::new(&create_test_config(temp.path()));
        writer.write(vec!["fresh".to_string()]).unwrap();

        existing.assert("fresh");
    }

    #[test]
    fn test_writer_empty_stream_creates_empty_file() {
        let temp = assert_fs::TempDir::new().unwrap();

        let writer = MergeWriter::new(&create_test_config(temp.path()));
        let outcome = writer.write(Vec::<String>::new()).unwrap();

        assert!(outcome.written);
        assert_eq!(outcome.bytes_written, 0);
        temp.child("merged.txt").assert("");
    }

    #[test]
    fn test_unopenable_destination_is_logged_not_raised() {
        let temp = assert_fs::TempDir::new().unwrap();
        // A directory where the output file should go.
        temp.child("merged.txt").create_dir_all().unwrap();

        let writer = MergeWriter::new(&create_test_config(temp.path()));
        let outcome = writer.write(["content"]).unwrap();

        assert!(!outcome.written);
        assert_eq!(outcome.bytes_written, 0);
    }

    #[test]
    fn test_output_directory_failure_is_fatal() {
        let temp = assert_fs::TempDir::new().unwrap();
        let blocker = temp.child("blocker");
        blocker.write_str("not a directory").unwrap();

        let writer = MergeWriter::new(&create_test_config(&blocker.path().join("out")));
        let err = writer.write(["content"]).unwrap_err();

        assert!(err.is_io());
    }
}

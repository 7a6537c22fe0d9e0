use crate::{config::Config, filter::CommentFilter};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{error, trace};

const FENCE: &str = "```";
const FOOTER: &str = "\n```\n\n";
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Renders eligible files as fenced, comment-stripped blocks.
#[derive(Debug, Clone)]
pub struct FileRenderer {
    block_open: String,
    block_close: String,
    comments: CommentFilter,
}

impl FileRenderer {
    /// Creates a renderer from the configuration's comment syntax.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            block_open: config.syntax.block_open.clone(),
            block_close: config.syntax.block_close.clone(),
            comments: CommentFilter::new(config.syntax.inline.clone()),
        }
    }

    /// Returns a lazy rendering of the file at `path`.
    ///
    /// The file is not opened until the first content line is pulled.
    #[must_use]
    pub fn render(&self, path: &Path) -> RenderedFile {
        trace!("Rendering file: {}", path.display());

        RenderedFile {
            path: path.to_path_buf(),
            header: Some(self.header(path)),
            comments: self.comments.clone(),
            reader: None,
            stage: Stage::Header,
            failed: false,
            lines_kept: 0,
            lines_dropped: 0,
        }
    }

    fn header(&self, path: &Path) -> String {
        format!(
            "{FENCE}\n{}\nfile: {}\n{}\n",
            self.block_open,
            path.display(),
            self.block_close
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Header,
    Body,
    Done,
}

/// Output chunks for one file: header, filtered lines, footer.
///
/// A file that cannot be opened or read ends its content early; the footer
/// is still emitted so the fence stays balanced.
#[derive(Debug)]
pub struct RenderedFile {
    path: PathBuf,
    header: Option<String>,
    comments: CommentFilter,
    reader: Option<BufReader<File>>,
    stage: Stage,
    failed: bool,
    lines_kept: usize,
    lines_dropped: usize,
}

impl RenderedFile {
    /// Returns the path being rendered.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if opening or reading the file failed.
    #[must_use]
    pub const fn failed(&self) -> bool {
        self.failed
    }

    /// Number of content lines emitted so far.
    #[must_use]
    pub const fn lines_kept(&self) -> usize {
        self.lines_kept
    }

    /// Number of comment-only lines dropped so far.
    #[must_use]
    pub const fn lines_dropped(&self) -> usize {
        self.lines_dropped
    }

    fn next_line(&mut self) -> Option<String> {
        if self.reader.is_none() {
            match File::open(&self.path) {
                Ok(file) => {
                    self.reader = Some(BufReader::with_capacity(READ_BUFFER_SIZE, file));
                }
                Err(e) => {
                    self.fail(&e);
                    return None;
                }
            }
        }

        loop {
            let mut line = String::new();
            let result = match self.reader.as_mut() {
                Some(reader) => reader.read_line(&mut line),
                None => return None,
            };

            match result {
                Ok(0) => {
                    self.reader = None;
                    return None;
                }
                Ok(_) if self.comments.is_comment_only_line(&line) => {
                    self.lines_dropped += 1;
                }
                Ok(_) => {
                    self.lines_kept += 1;
                    return Some(line);
                }
                Err(e) => {
                    self.reader = None;
                    self.fail(&e);
                    return None;
                }
            }
        }
    }

    fn fail(&mut self, e: &std::io::Error) {
        error!("Error reading file {}: {}", self.path.display(), e);
        self.failed = true;
    }
}

impl Iterator for RenderedFile {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match self.stage {
            Stage::Header => {
                self.stage = Stage::Body;
                self.header.take()
            }
            Stage::Body => {
                if let Some(line) = self.next_line() {
                    return Some(line);
                }
                self.stage = Stage::Done;
                Some(FOOTER.to_string())
            }
            Stage::Done => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::CommentSyntax;
    use assert_fs::prelude::*;

    fn python_renderer() -> FileRenderer {
        let config = Config::builder()
            .syntax(CommentSyntax::new("\"\"\"", "\"\"\"", "#"))
            .build()
            .unwrap();
        FileRenderer::new(&config)
    }

    #[test]
    fn test_render_wraps_content() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("a.py");
        file.write_str("x = 1\n# comment\ny = 2\n").unwrap();

        let rendered: String = python_renderer().render(file.path()).collect();

        let expected = format!(
            "```\n\"\"\"\nfile: {}\n\"\"\"\nx = 1\ny = 2\n\n```\n\n",
            file.path().display()
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_yields_header_lines_footer() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("b.py");
        file.write_str("a\n  # dropped\nb").unwrap();

        let mut rendered = python_renderer().render(file.path());
        let chunks: Vec<String> = rendered.by_ref().collect();

        assert_eq!(chunks.len(), 4);
        assert!(chunks[0].starts_with("```\n"));
        assert_eq!(chunks[1], "a\n");
        assert_eq!(chunks[2], "b");
        assert_eq!(chunks[3], "\n```\n\n");
        assert_eq!(rendered.lines_kept(), 2);
        assert_eq!(rendered.lines_dropped(), 1);
        assert!(!rendered.failed());
    }

    #[test]
    fn test_render_preserves_crlf() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("win.py");
        file.write_str("a = 1\r\n# note\r\nb = 2\r\n").unwrap();

        let rendered: Vec<String> = python_renderer().render(file.path()).collect();

        assert_eq!(rendered[1], "a = 1\r\n");
        assert_eq!(rendered[2], "b = 2\r\n");
    }

    #[test]
    fn test_render_empty_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("empty.py");
        file.touch().unwrap();

        let rendered: Vec<String> = python_renderer().render(file.path()).collect();

        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[1], FOOTER);
    }

    #[test]
    fn test_render_missing_file_keeps_header_and_footer() {
        let temp = assert_fs::TempDir::new().unwrap();
        let missing = temp.path().join("gone.py");

        let mut rendered = python_renderer().render(&missing);
        let chunks: Vec<String> = rendered.by_ref().collect();

        assert!(rendered.failed());
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].contains("gone.py"));
        assert_eq!(chunks[1], FOOTER);
    }

    #[test]
    fn test_render_stops_at_invalid_utf8() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("mixed.py");
        let mut bytes = b"ok = True\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"never = 1\n");
        file.write_binary(&bytes).unwrap();

        let mut rendered = python_renderer().render(file.path());
        let chunks: Vec<String> = rendered.by_ref().collect();

        assert!(rendered.failed());
        assert_eq!(chunks[1], "ok = True\n");
        assert_eq!(chunks.last().map(String::as_str), Some(FOOTER));
        assert!(!chunks.iter().any(|c| c.contains("never")));
    }

    #[test]
    fn test_file_opened_lazily() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("late.py");

        let mut rendered = python_renderer().render(file.path());
        let header = rendered.next().unwrap();
        assert!(header.contains("late.py"));

        // Created after the header was produced.
        file.write_str("late = 1\n").unwrap();
        assert_eq!(rendered.next().as_deref(), Some("late = 1\n"));
    }
}

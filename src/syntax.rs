//! Comment syntax lookup by project language.
//!
//! Maps a language identifier to the block comment pair used around the
//! synthetic `file:` header and to the inline marker used to drop
//! comment-only lines.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Comment tokens for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentSyntax {
    /// Opening token of a block comment (e.g. `/*`)
    pub block_open: String,
    /// Closing token of a block comment (e.g. `*/`)
    pub block_close: String,
    /// Inline comment marker (e.g. `//`)
    pub inline: String,
}

impl CommentSyntax {
    /// Creates a syntax from its three tokens.
    #[must_use]
    pub fn new(
        block_open: impl Into<String>,
        block_close: impl Into<String>,
        inline: impl Into<String>,
    ) -> Self {
        Self {
            block_open: block_open.into(),
            block_close: block_close.into(),
            inline: inline.into(),
        }
    }

    /// C-style syntax (`/* */`, `//`), the fallback for unknown languages.
    #[must_use]
    pub fn c_style() -> Self {
        DEFAULT_SYNTAX.into()
    }
}

impl Default for CommentSyntax {
    fn default() -> Self {
        Self::c_style()
    }
}

#[derive(Debug, Clone, Copy)]
struct SyntaxEntry {
    block_open: &'static str,
    block_close: &'static str,
    inline: &'static str,
}

impl From<SyntaxEntry> for CommentSyntax {
    fn from(entry: SyntaxEntry) -> Self {
        Self::new(entry.block_open, entry.block_close, entry.inline)
    }
}

const DEFAULT_SYNTAX: SyntaxEntry = SyntaxEntry {
    block_open: "/*",
    block_close: "*/",
    inline: "//",
};

const HASH_DOCSTRING: SyntaxEntry = SyntaxEntry {
    block_open: "\"\"\"",
    block_close: "\"\"\"",
    inline: "#",
};

const RUBY: SyntaxEntry = SyntaxEntry {
    block_open: "=begin",
    block_close: "=end",
    inline: "#",
};

const SHELL: SyntaxEntry = SyntaxEntry {
    block_open: ": '",
    block_close: "'",
    inline: "#",
};

const LUA: SyntaxEntry = SyntaxEntry {
    block_open: "--[[",
    block_close: "]]",
    inline: "--",
};

const SQL: SyntaxEntry = SyntaxEntry {
    block_open: "/*",
    block_close: "*/",
    inline: "--",
};

static SYNTAX_TABLE: Lazy<HashMap<&'static str, SyntaxEntry>> = Lazy::new(|| {
    let mut table = HashMap::new();

    for id in ["python", "py"] {
        table.insert(id, HASH_DOCSTRING);
    }
    for id in [
        "javascript", "js", "typescript", "ts", "rust", "rs", "go", "c", "cpp", "java", "kotlin",
        "kt", "swift", "csharp", "cs",
    ] {
        table.insert(id, DEFAULT_SYNTAX);
    }
    for id in ["ruby", "rb"] {
        table.insert(id, RUBY);
    }
    for id in ["shell", "sh", "bash"] {
        table.insert(id, SHELL);
    }
    table.insert("lua", LUA);
    table.insert("sql", SQL);

    table
});

/// Returns the comment syntax for a language identifier.
///
/// Matching is case-insensitive. Unknown identifiers fall back to
/// [`CommentSyntax::c_style`] and log a warning.
#[must_use]
pub fn lookup(language: &str) -> CommentSyntax {
    let key = language.trim().to_lowercase();

    if let Some(entry) = SYNTAX_TABLE.get(key.as_str()) {
        debug!("Using comment syntax for language '{}'", language);
        return (*entry).into();
    }

    warn!(
        "Unknown project language: '{}'. Final syntax may not be accurate.",
        language
    );
    CommentSyntax::c_style()
}

//! Markup dialect of a source file.

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Extensions rendered as gemtext. Anything else is Markdown.
const GEMTEXT_EXTENSIONS: &[&str] = &["gmi", "gemini"];

/// Markup dialect, selected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Line-oriented Gemini hypertext, rendered with change flags.
    Gemtext,
    /// Markdown, rendered whole by pulldown-cmark.
    Markdown,
}

impl Dialect {
    /// `.gmi` and `.gemini` (any case) are gemtext.
    pub fn from_path(path: &Path) -> Self {
        let is_gemtext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                GEMTEXT_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });

        if is_gemtext {
            Self::Gemtext
        } else {
            Self::Markdown
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gemtext => "gemtext",
            Self::Markdown => "markdown",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

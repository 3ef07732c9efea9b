//! Render orchestration for one source file.
//!
//! A [`Previewer`] reads the file, dispatches on its [`Dialect`], and keeps
//! the last successfully parsed gemtext [`Document`] as the baseline for the
//! next render.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::Dialect;
use crate::gemtext::{self, Document};
use crate::markdown::{self, MarkdownOptions};

/// A render attempt that could not read its source.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("failed to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Output of one successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub html: String,
    pub dialect: Dialect,
    /// Number of top-level blocks (gemtext only, 0 for Markdown).
    pub blocks: usize,
    /// Number of blocks flagged as changed (gemtext only).
    pub changed: usize,
}

/// Stateful renderer for a single file.
#[derive(Debug)]
pub struct Previewer {
    path: PathBuf,
    dialect: Dialect,
    markdown: MarkdownOptions,
    baseline: Option<Document>,
}

impl Previewer {
    pub fn new(path: impl Into<PathBuf>, markdown: MarkdownOptions) -> Self {
        let path = path.into();
        Self {
            dialect: Dialect::from_path(&path),
            path,
            markdown,
            baseline: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a baseline document is held for the next diff.
    pub const fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// Forget the baseline; the next render flags nothing.
    pub fn reset(&mut self) {
        self.baseline = None;
    }

    /// Read and render the file.
    ///
    /// On failure the baseline is left untouched, so the next successful
    /// render still diffs against the last good document.
    pub fn render(&mut self) -> Result<Preview, PreviewError> {
        match self.dialect {
            Dialect::Gemtext => self.render_gemtext(),
            Dialect::Markdown => self.render_markdown(),
        }
    }

    fn render_gemtext(&mut self) -> Result<Preview, PreviewError> {
        let document = File::open(&self.path)
            .and_then(|file| gemtext::parse(BufReader::new(file)))
            .map_err(|source| self.read_error(source))?;

        let rendered = gemtext::render_document(&document, self.baseline.as_ref());
        let blocks = document.len();
        self.baseline = Some(document);

        Ok(Preview {
            html: rendered.html,
            dialect: Dialect::Gemtext,
            blocks,
            changed: rendered.changed,
        })
    }

    fn render_markdown(&self) -> Result<Preview, PreviewError> {
        let bytes = std::fs::read(&self.path).map_err(|source| self.read_error(source))?;

        Ok(Preview {
            html: markdown::to_html(&String::from_utf8_lossy(&bytes), &self.markdown),
            dialect: Dialect::Markdown,
            blocks: 0,
            changed: 0,
        })
    }

    fn read_error(&self, source: io::Error) -> PreviewError {
        PreviewError::Read {
            path: self.path.clone(),
            source,
        }
    }
}

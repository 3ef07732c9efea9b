//! One-shot rendering to stdout.

use crate::{
    config::cfg,
    core::Dialect,
    gemtext::{self, Document},
    markdown::{self, MarkdownOptions},
};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

/// Render `file` once and write the HTML fragment to stdout.
///
/// For gemtext, `previous` is parsed as the baseline and changed blocks are
/// flagged. It is ignored for Markdown.
pub fn render(file: &Path, previous: Option<&Path>) -> Result<()> {
    let html = render_to_string(file, previous)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(html.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn render_to_string(file: &Path, previous: Option<&Path>) -> Result<String> {
    match Dialect::from_path(file) {
        Dialect::Gemtext => {
            let document = read_document(file)?;
            let baseline = previous.map(read_document).transpose()?;
            Ok(gemtext::render(&document, baseline.as_ref()))
        }
        Dialect::Markdown => {
            if previous.is_some() {
                crate::debug!("render"; "--previous ignored for markdown");
            }
            let bytes = std::fs::read(file)
                .with_context(|| format!("failed to read `{}`", file.display()))?;
            let options = MarkdownOptions::from(&cfg().markdown);
            Ok(markdown::to_html(&String::from_utf8_lossy(&bytes), &options))
        }
    }
}

fn read_document(path: &Path) -> Result<Document> {
    let file = File::open(path).with_context(|| format!("failed to read `{}`", path.display()))?;
    gemtext::parse(BufReader::new(file))
        .with_context(|| format!("failed to read `{}`", path.display()))
}

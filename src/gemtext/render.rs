//! Differential HTML renderer.
//!
//! Renders a [`Document`] and flags blocks that changed since a baseline.
//!
//! # Change Detection
//!
//! A single forward cursor walks the previous document. For each new block
//! the previous blocks are searched from the cursor onward; a match moves the
//! cursor to the matched block, no match flags the block as changed. The
//! cursor never moves backwards, so content moved above its old position is
//! reported as changed even when identical. Typical edits are local, and a
//! greedy linear scan keeps re-rendering cheap on every save.
//!
//! # Output
//!
//! Every block and every list item / quote line carries `data-line` with its
//! source line (used for scroll sync). Changed blocks get `class="changed"`.
//! Quote containers never carry the flag, and preformatted alt-text is not
//! rendered.

use super::{Block, BlockKind, Document, Line};
use crate::utils::html::{escape, escape_attr};

/// CSS class marking a changed block.
const CHANGED_CLASS: &str = "changed";

/// Inline link glyph placed before every link.
const LINK_ICON: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" fill="none" "#,
    r#"stroke="currentColor" stroke-width="1.5" stroke-linecap="round" class="icon" "#,
    r#"viewBox="0 0 16 16" aria-hidden="true">"#,
    r#"<path d="M6.5 9.5l3-3"/>"#,
    r#"<path d="M7 4.5l1.2-1.2a2.5 2.5 0 0 1 3.5 3.5L10.5 8"/>"#,
    r#"<path d="M9 11.5l-1.2 1.2a2.5 2.5 0 0 1-3.5-3.5L5.5 8"/>"#,
    r#"</svg>"#
);

/// Rendered markup plus the number of blocks flagged as changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    pub changed: usize,
}

/// Render `document`, flagging blocks not found in `previous`.
pub fn render(document: &Document, previous: Option<&Document>) -> String {
    render_document(document, previous).html
}

/// Render `document` and report how many blocks were flagged.
pub fn render_document(document: &Document, previous: Option<&Document>) -> Rendered {
    let flags = diff(document, previous);
    let changed = flags.iter().filter(|&&c| c).count();

    let mut html = String::new();
    for (block, changed) in document.iter().zip(flags) {
        write_block(&mut html, block, changed);
        html.push('\n');
    }

    Rendered { html, changed }
}

/// Classify each block of `document` as changed (`true`) or unchanged.
///
/// Without a baseline nothing is changed. Whitespace-only paragraphs are
/// never changed.
pub fn diff(document: &Document, previous: Option<&Document>) -> Vec<bool> {
    let Some(previous) = previous else {
        return vec![false; document.len()];
    };

    let baseline = previous.blocks();
    let mut cursor = 0;

    document
        .iter()
        .map(|block| {
            if block.is_blank() {
                return false;
            }
            match baseline[cursor..].iter().position(|old| old == block) {
                Some(offset) => {
                    cursor += offset;
                    false
                }
                None => true,
            }
        })
        .collect()
}

// =============================================================================
// Block writers
// =============================================================================

fn write_block(out: &mut String, block: &Block, changed: bool) {
    match &block.kind {
        BlockKind::Paragraph(text) => {
            open_tag(out, "p", block.line, changed);
            out.push_str(&escape(text));
            close_tag(out, "p");
        }
        BlockKind::Link { url, label } => {
            open_tag(out, "div", block.line, changed);
            out.push_str(LINK_ICON);
            out.push(' ');
            out.push_str("<a href=\"");
            out.push_str(&escape_attr(url));
            out.push_str("\">");
            let text = if label.is_empty() { url } else { label };
            out.push_str(&escape(text));
            out.push_str("</a>");
            close_tag(out, "div");
        }
        BlockKind::Heading { level, text } => {
            let tag = heading_tag(*level);
            open_tag(out, tag, block.line, changed);
            out.push_str(&escape(text));
            close_tag(out, tag);
        }
        BlockKind::List(items) => {
            open_tag(out, "ul", block.line, changed);
            write_lines(out, "li", items);
            close_tag(out, "ul");
        }
        BlockKind::Quote(lines) => {
            open_tag(out, "blockquote", block.line, false);
            write_lines(out, "p", lines);
            close_tag(out, "blockquote");
        }
        BlockKind::Preformatted { lines, .. } => {
            open_tag(out, "pre", block.line, changed);
            for line in lines {
                out.push_str(&line.text);
                out.push('\n');
            }
            close_tag(out, "pre");
        }
    }
}

/// Escaped line elements, each anchored at its own source line.
fn write_lines(out: &mut String, tag: &str, lines: &[Line]) {
    for line in lines {
        open_tag(out, tag, line.line, false);
        out.push_str(&escape(&line.text));
        close_tag(out, tag);
    }
}

fn open_tag(out: &mut String, tag: &str, line: usize, changed: bool) {
    out.push('<');
    out.push_str(tag);
    out.push_str(" data-line=\"");
    out.push_str(&line.to_string());
    out.push('"');
    if changed {
        out.push_str(" class=\"");
        out.push_str(CHANGED_CLASS);
        out.push('"');
    }
    out.push('>');
}

fn close_tag(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn heading_tag(level: u8) -> &'static str {
    match level {
        1 => "h1",
        2 => "h2",
        _ => "h3",
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemtext::parse_str;

    const SAMPLE: &str = "\
# Notes

Intro <with> & markup
=> gemini://example.org Example
=> /plain
* one
* <two>
> quoted \"line\"
> second
```rust
let x = a < b && c > d;
```
## Done
";

    #[test]
    fn test_first_render_marks_nothing() {
        let doc = parse_str(SAMPLE);
        let rendered = render_document(&doc, None);
        assert_eq!(rendered.changed, 0);
        assert!(!rendered.html.contains("class=\"changed\""));
    }

    #[test]
    fn test_render_is_idempotent() {
        let doc = parse_str(SAMPLE);
        assert_eq!(render(&doc, None), render(&doc, None));
    }

    #[test]
    fn test_same_document_has_no_changes() {
        let old = parse_str(SAMPLE);
        let new = parse_str(SAMPLE);
        let rendered = render_document(&new, Some(&old));
        assert_eq!(rendered.changed, 0);
        assert_eq!(rendered.html, render(&new, None));
    }

    #[test]
    fn test_blank_paragraph_never_changed() {
        let old = parse_str("a\n");
        let new = parse_str("   \n\t\n");
        assert_eq!(diff(&new, Some(&old)), vec![false, false]);
    }

    #[test]
    fn test_edited_block_is_flagged() {
        let old = parse_str("# Title\nfirst\nsecond\n");
        let new = parse_str("# Title\nfirst edited\nsecond\n");
        assert_eq!(diff(&new, Some(&old)), vec![false, true, false]);

        let html = render(&new, Some(&old));
        assert!(html.contains("<p data-line=\"2\" class=\"changed\">first edited</p>"));
        assert!(html.contains("<p data-line=\"3\">second</p>"));
    }

    #[test]
    fn test_inserted_block_is_flagged() {
        let old = parse_str("a\nb\n");
        let new = parse_str("a\nnew\nb\n");
        assert_eq!(diff(&new, Some(&old)), vec![false, true, false]);
    }

    #[test]
    fn test_reorder_reports_false_positive() {
        let old = parse_str("A\nB\n");
        let new = parse_str("B\nA\n");
        assert_eq!(diff(&new, Some(&old)), vec![false, true]);
    }

    #[test]
    fn test_cursor_stays_on_match() {
        // The cursor rests on the matched block, so it can match again.
        let old = parse_str("A\nB\n");
        let new = parse_str("A\nA\nB\n");
        assert_eq!(diff(&new, Some(&old)), vec![false, false, false]);
    }

    #[test]
    fn test_moved_line_number_is_not_a_change() {
        let old = parse_str("# Head\ntext\n");
        let new = parse_str("\n\n# Head\ntext\n");
        let rendered = render_document(&new, Some(&old));
        assert_eq!(rendered.changed, 0);
        assert!(rendered.html.contains("<h1 data-line=\"3\">Head</h1>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render(&parse_str(SAMPLE), None);
        assert!(html.contains("<p data-line=\"3\">Intro &lt;with&gt; &amp; markup</p>"));
        assert!(html.contains("<li data-line=\"7\">&lt;two&gt;</li>"));
        assert!(html.contains("<p data-line=\"8\">&gt; quoted &quot;line&quot;</p>"));
    }

    #[test]
    fn test_preformatted_is_verbatim_and_hides_alt() {
        let html = render(&parse_str("```alt\nraw <b>text</b>\n```\n"), None);
        assert_eq!(html, "<pre data-line=\"1\">raw <b>text</b>\n</pre>\n");
        assert!(!html.contains("alt"));
    }

    #[test]
    fn test_link_shape() {
        let html = render(&parse_str("=> https://a.example/?q=1&r=2 Go \"there\"\n"), None);
        assert!(html.starts_with("<div data-line=\"1\"><svg"));
        assert!(html.contains("</svg> <a href=\"https://a.example/?q=1&amp;r=2\">Go &quot;there&quot;</a></div>"));
    }

    #[test]
    fn test_link_without_label_shows_url() {
        let html = render(&parse_str("=> /plain\n"), None);
        assert!(html.contains("<a href=\"/plain\">/plain</a>"));
    }

    #[test]
    fn test_list_shape() {
        let html = render(&parse_str("* one\n* two\n"), None);
        assert_eq!(
            html,
            "<ul data-line=\"1\"><li data-line=\"1\">one</li><li data-line=\"2\">two</li></ul>\n"
        );
    }

    #[test]
    fn test_changed_list_flags_container_only() {
        let old = parse_str("* one\n");
        let new = parse_str("* one\n* two\n");
        let html = render(&new, Some(&old));
        assert!(html.starts_with("<ul data-line=\"1\" class=\"changed\"><li data-line=\"1\">one</li>"));
    }

    #[test]
    fn test_changed_quote_container_is_not_flagged() {
        let old = parse_str("> old\n");
        let new = parse_str("> new\n");
        let rendered = render_document(&new, Some(&old));

        assert_eq!(rendered.changed, 1);
        assert_eq!(
            rendered.html,
            "<blockquote data-line=\"1\"><p data-line=\"1\">&gt; new</p></blockquote>\n"
        );
    }

    #[test]
    fn test_heading_levels_render() {
        let html = render(&parse_str("# a\n## b\n### c\n"), None);
        assert!(html.contains("<h1 data-line=\"1\">a</h1>"));
        assert!(html.contains("<h2 data-line=\"2\">b</h2>"));
        assert!(html.contains("<h3 data-line=\"3\">c</h3>"));
    }

    #[test]
    fn test_every_block_ends_with_newline() {
        let doc = parse_str(SAMPLE);
        let html = render(&doc, None);
        assert_eq!(html.matches('\n').count(), doc.len() + 1); // + the pre content line
    }
}

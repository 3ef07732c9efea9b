//! Line-oriented gemtext parser.
//!
//! Every line matches exactly one rule, so parsing never fails on content.
//! The only error is an upstream read failure.
//!
//! Rules outside a preformatted run, in priority order:
//!
//! | Prefix        | Result                                   |
//! |---------------|------------------------------------------|
//! | `>`           | quote line (continues an open quote)     |
//! | `* `          | list item (continues an open list)       |
//! | `# ` .. `### `| heading, level = marker count            |
//! | `=> `         | link, `url [label]`                      |
//! | `` ``` ``     | opens a preformatted run, rest is alt    |
//! | anything else | paragraph, kept verbatim                 |

use std::io::{self, BufRead};

use super::{Block, BlockKind, Document, Line};

const QUOTE_MARKER: &str = ">";
const LIST_MARKER: &str = "* ";
const LINK_MARKER: &str = "=> ";
const PRE_TOGGLE: &str = "```";
const HEADING_MARKERS: [(&str, u8); 3] = [("# ", 1), ("## ", 2), ("### ", 3)];

/// Parse gemtext from a reader.
///
/// Reads the content to completion. Read failures are returned unmodified;
/// bytes that are not valid UTF-8 become U+FFFD.
pub fn parse<R: BufRead>(mut reader: R) -> io::Result<Document> {
    let mut scanner = Scanner::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        scanner.push_line(strip_line_ending(&String::from_utf8_lossy(&buf)));
    }

    Ok(scanner.finish())
}

/// Parse gemtext already held in memory.
pub fn parse_str(text: &str) -> Document {
    let mut scanner = Scanner::new();
    for line in text.split_inclusive('\n') {
        scanner.push_line(strip_line_ending(line));
    }
    scanner.finish()
}

/// Drop a trailing `\n` and then a trailing `\r`.
fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

// =============================================================================
// Scanner
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Preformatted,
}

/// Per-call scan state. The most recent block (`blocks.last()`) is the
/// only block a line can continue.
struct Scanner {
    blocks: Vec<Block>,
    line: usize,
    mode: Mode,
}

impl Scanner {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            line: 0,
            mode: Mode::Normal,
        }
    }

    fn finish(self) -> Document {
        Document::from_blocks(self.blocks)
    }

    fn push_line(&mut self, text: &str) {
        self.line += 1;
        match self.mode {
            Mode::Preformatted => self.push_preformatted(text),
            Mode::Normal => self.push_normal(text),
        }
    }

    fn push_preformatted(&mut self, text: &str) {
        if text.starts_with(PRE_TOGGLE) {
            // The closing line's trailing text is discarded.
            self.mode = Mode::Normal;
            return;
        }

        let line = Line::new(self.line, text);
        match self.open_kind() {
            Some(BlockKind::Preformatted { lines, .. }) => lines.push(line),
            _ => self.open(BlockKind::Preformatted {
                alt: String::new(),
                lines: vec![line],
            }),
        }
    }

    fn push_normal(&mut self, text: &str) {
        let line = self.line;

        if text.starts_with(QUOTE_MARKER) {
            let quoted = Line::new(line, text);
            match self.open_kind() {
                Some(BlockKind::Quote(lines)) => lines.push(quoted),
                _ => self.open(BlockKind::Quote(vec![quoted])),
            }
        } else if let Some(rest) = text.strip_prefix(LIST_MARKER) {
            let item = Line::new(line, rest.trim_start());
            match self.open_kind() {
                Some(BlockKind::List(items)) => items.push(item),
                _ => self.open(BlockKind::List(vec![item])),
            }
        } else if let Some((level, rest)) = heading(text) {
            self.open(BlockKind::Heading {
                level,
                text: rest.trim().to_string(),
            });
        } else if let Some(rest) = text.strip_prefix(LINK_MARKER) {
            let (url, label) = split_link(rest);
            self.open(BlockKind::Link {
                url: url.to_string(),
                label: label.to_string(),
            });
        } else if let Some(alt) = text.strip_prefix(PRE_TOGGLE) {
            self.mode = Mode::Preformatted;
            self.open(BlockKind::Preformatted {
                alt: alt.to_string(),
                lines: Vec::new(),
            });
        } else {
            self.open(BlockKind::Paragraph(text.to_string()));
        }
    }

    /// The block a continuation line would extend.
    fn open_kind(&mut self) -> Option<&mut BlockKind> {
        self.blocks.last_mut().map(|block| &mut block.kind)
    }

    /// Start a new block at the current line.
    fn open(&mut self, kind: BlockKind) {
        self.blocks.push(Block::new(self.line, kind));
    }
}

/// Match `# `, `## ` or `### ` and return the level and the remainder.
fn heading(text: &str) -> Option<(u8, &str)> {
    HEADING_MARKERS
        .iter()
        .find_map(|&(marker, level)| text.strip_prefix(marker).map(|rest| (level, rest)))
}

/// Split a link body into URL and label at the first whitespace run.
fn split_link(rest: &str) -> (&str, &str) {
    let rest = rest.trim();
    match rest.find(char::is_whitespace) {
        Some(i) => (&rest[..i], rest[i..].trim_start()),
        None => (rest, ""),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(doc: &Document) -> Vec<&BlockKind> {
        doc.iter().map(|b| &b.kind).collect()
    }

    fn lines(doc: &Document) -> Vec<usize> {
        doc.iter().map(|b| b.line).collect()
    }

    #[test]
    fn test_heading_paragraphs_and_link() {
        let doc = parse_str("# Title\n\nSome text\n=> https://example.com My Link\n");

        assert_eq!(doc.len(), 4);
        assert_eq!(lines(&doc), vec![1, 2, 3, 4]);
        assert!(matches!(
            &doc.blocks()[0].kind,
            BlockKind::Heading { level: 1, text } if text == "Title"
        ));
        assert!(matches!(&doc.blocks()[1].kind, BlockKind::Paragraph(t) if t.is_empty()));
        assert!(matches!(&doc.blocks()[2].kind, BlockKind::Paragraph(t) if t == "Some text"));
        assert!(matches!(
            &doc.blocks()[3].kind,
            BlockKind::Link { url, label } if url == "https://example.com" && label == "My Link"
        ));
    }

    #[test]
    fn test_list_items_continue() {
        let doc = parse_str("* one\n* two\n");

        assert_eq!(doc.len(), 1);
        let BlockKind::List(items) = &doc.blocks()[0].kind else {
            panic!("expected list, got {:?}", doc.blocks()[0].kind);
        };
        let texts: Vec<_> = items.iter().map(|i| (i.line, i.text.as_str())).collect();
        assert_eq!(texts, vec![(1, "one"), (2, "two")]);
    }

    #[test]
    fn test_list_item_trims_leading_space() {
        let doc = parse_str("*    spaced  \n");
        let BlockKind::List(items) = &doc.blocks()[0].kind else {
            panic!("expected list");
        };
        assert_eq!(items[0].text, "spaced  ");
    }

    #[test]
    fn test_list_marker_requires_space() {
        let doc = parse_str("*bold*\n");
        assert!(matches!(&doc.blocks()[0].kind, BlockKind::Paragraph(t) if t == "*bold*"));
    }

    #[test]
    fn test_preformatted_block() {
        let doc = parse_str("```alt\nraw <b>text</b>\n```\n");

        assert_eq!(doc.len(), 1);
        let BlockKind::Preformatted { alt, lines } = &doc.blocks()[0].kind else {
            panic!("expected preformatted");
        };
        assert_eq!(alt, "alt");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "raw <b>text</b>");
        assert_eq!(lines[0].line, 2);
    }

    #[test]
    fn test_preformatted_keeps_markup_lines_verbatim() {
        let doc = parse_str("```\n# not a heading\n* not a list\n=> not a link\n```trailing\nafter\n");

        assert_eq!(doc.len(), 2);
        let BlockKind::Preformatted { alt, lines } = &doc.blocks()[0].kind else {
            panic!("expected preformatted");
        };
        assert!(alt.is_empty());
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["# not a heading", "* not a list", "=> not a link"]);
        assert!(matches!(&doc.blocks()[1].kind, BlockKind::Paragraph(t) if t == "after"));
        assert_eq!(doc.blocks()[1].line, 6);
    }

    #[test]
    fn test_unterminated_preformatted_runs_to_end() {
        let doc = parse_str("```\nline one\nline two");
        let BlockKind::Preformatted { lines, .. } = &doc.blocks()[0].kind else {
            panic!("expected preformatted");
        };
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_four_markers_fall_through_to_paragraph() {
        let doc = parse_str("####\n#### deep\n#no-space\n");
        for block in &doc {
            assert!(matches!(block.kind, BlockKind::Paragraph(_)), "{:?}", block.kind);
        }
    }

    #[test]
    fn test_heading_levels() {
        let doc = parse_str("# one\n## two\n###   three  \n");
        let levels: Vec<_> = doc
            .iter()
            .map(|b| match &b.kind {
                BlockKind::Heading { level, text } => (*level, text.as_str()),
                other => panic!("expected heading, got {other:?}"),
            })
            .collect();
        assert_eq!(levels, vec![(1, "one"), (2, "two"), (3, "three")]);
    }

    #[test]
    fn test_headings_never_continue() {
        let doc = parse_str("# a\n# a\n");
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_link_without_label() {
        let doc = parse_str("=>   gemini://example.org/   \n");
        assert!(matches!(
            &doc.blocks()[0].kind,
            BlockKind::Link { url, label } if url == "gemini://example.org/" && label.is_empty()
        ));
    }

    #[test]
    fn test_link_label_after_whitespace_run() {
        let doc = parse_str("=> /docs \t  The  Docs \n");
        assert!(matches!(
            &doc.blocks()[0].kind,
            BlockKind::Link { url, label } if url == "/docs" && label == "The  Docs"
        ));
    }

    #[test]
    fn test_link_marker_requires_space() {
        let doc = parse_str("=>/nowhere\n");
        assert!(matches!(doc.blocks()[0].kind, BlockKind::Paragraph(_)));
    }

    #[test]
    fn test_quote_keeps_marker_and_continues() {
        let doc = parse_str("> first\n>second\nplain\n> third\n");

        assert_eq!(doc.len(), 3);
        let BlockKind::Quote(lines) = &doc.blocks()[0].kind else {
            panic!("expected quote");
        };
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["> first", ">second"]);
        assert_eq!(doc.blocks()[2].line, 4);
    }

    #[test]
    fn test_paragraph_ends_list_run() {
        let doc = parse_str("* a\ntext\n* b\n");
        assert_eq!(doc.len(), 3);
        assert_eq!(lines(&doc), vec![1, 2, 3]);
    }

    #[test]
    fn test_list_after_quote_starts_new_block() {
        let doc = parse_str("> q\n* item\n");
        let names: Vec<_> = kinds(&doc).iter().map(|k| k.name()).collect();
        assert_eq!(names, vec!["quote", "list"]);
    }

    #[test]
    fn test_list_after_preformatted_starts_new_block() {
        let doc = parse_str("```\ncode\n```\n* item\n");
        let names: Vec<_> = kinds(&doc).iter().map(|k| k.name()).collect();
        assert_eq!(names, vec!["preformatted", "list"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let unix = parse_str("# Title\n* a\n* b\n");
        let dos = parse_str("# Title\r\n* a\r\n* b\r\n");
        assert_eq!(unix, dos);
        assert_eq!(lines(&unix), lines(&dos));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_str("").is_empty());
    }

    #[test]
    fn test_trailing_newline_adds_no_line() {
        assert_eq!(parse_str("a\n").len(), 1);
        assert_eq!(parse_str("a").len(), 1);
        assert_eq!(parse_str("a\n\n").len(), 2);
    }

    #[test]
    fn test_reader_matches_str() {
        let text = "# T\n> q\n> r\n```x\n  <pre>\n```\n=> a b\nend";
        let from_reader = parse(text.as_bytes()).unwrap();
        let from_str = parse_str(text);
        assert_eq!(from_reader, from_str);
        assert_eq!(lines(&from_reader), lines(&from_str));
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let bytes: &[u8] = b"# Title\ncaf\xe9\n";
        let doc = parse(bytes).unwrap();
        assert_eq!(doc.len(), 2);
        assert!(matches!(
            &doc.blocks()[1].kind,
            BlockKind::Paragraph(text) if text == "caf\u{fffd}"
        ));
    }

    struct FailingReader;

    impl io::Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn test_reader_error_is_surfaced() {
        let err = parse(io::BufReader::new(FailingReader)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_line_numbers_increase_and_count_bounded() {
        let inputs = [
            "",
            "\n\n\n",
            "* a\n* b\n> c\n> d\n```\ne\n```\n# f\n=> g h\n",
            "```\n```\n```\n",
            "> only\n> quotes\n>\n",
            "mixed\r\n* list\r\n\r\n### h\r\n",
        ];

        for input in inputs {
            let doc = parse_str(input);
            let line_count = input.split_inclusive('\n').count();
            assert!(doc.len() <= line_count, "too many blocks for {input:?}");
            assert!(
                lines(&doc).windows(2).all(|w| w[0] < w[1]),
                "line numbers not increasing for {input:?}"
            );
        }
    }
}

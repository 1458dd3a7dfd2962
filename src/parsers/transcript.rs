//! Recovers headered script entries from exported conversation text.
//!
//! An entry starts with a three-line header:
//!
//! ```text
//! --------------------      (20 dashes)
//! identifier.txt
//! ********************      (20 stars)
//! ```
//!
//! and runs until the next header-open line, an 80-dash reply separator, or the end
//! of input.

use crate::model::entry::{SourceLocation, TranscriptEntry};
use crate::model::script::split_lines;

pub const HEADER_OPEN: &str = "--------------------";
pub const HEADER_CLOSE: &str = "********************";
pub const SEPARATOR: &str =
    "--------------------------------------------------------------------------------";

/// Right-trimmed view over the transcript lines.
struct Cursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(lines: &'a [String]) -> Self {
        Cursor {
            lines: lines.iter().map(|l| l.trim_end()).collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn ahead(&self, n: usize) -> Option<&'a str> {
        self.lines.get(self.pos + n).copied()
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Identifier if a full header starts at the cursor.
    fn header(&self) -> Option<&'a str> {
        if self.peek()? != HEADER_OPEN || self.ahead(2)? != HEADER_CLOSE {
            return None;
        }
        self.ahead(1)
    }
}

enum State {
    Scanning,
    InEntry(TranscriptEntry),
}

pub fn parse_entries(text: &str) -> Vec<TranscriptEntry> {
    parse_entries_from(None, text)
}

/// Like [`parse_entries`], tagging each entry with the transcript it came from.
pub fn parse_entries_from(transcript: Option<&str>, text: &str) -> Vec<TranscriptEntry> {
    let lines = split_lines(text);
    let mut cursor = Cursor::new(&lines);
    let mut entries = Vec::new();
    let mut state = State::Scanning;

    while let Some(line) = cursor.peek() {
        state = match state {
            State::Scanning => {
                if let Some(identifier) = cursor.header() {
                    let location = SourceLocation {
                        transcript: transcript.map(str::to_string),
                        header_line: cursor.pos + 1,
                    };
                    cursor.advance(3);
                    State::InEntry(TranscriptEntry {
                        identifier: identifier.to_string(),
                        lines: Vec::new(),
                        location,
                    })
                } else {
                    // separators, preamble and near-miss headers
                    cursor.advance(1);
                    State::Scanning
                }
            }
            State::InEntry(mut entry) => {
                if line == HEADER_OPEN || line == SEPARATOR {
                    // not consumed: re-examined while scanning
                    entries.push(entry);
                    State::Scanning
                } else {
                    entry.lines.push(line.to_string());
                    cursor.advance(1);
                    State::InEntry(entry)
                }
            }
        };
    }

    if let State::InEntry(entry) = state {
        entries.push(entry);
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(id: &str) -> String {
        format!("{HEADER_OPEN}\n{id}\n{HEADER_CLOSE}\n")
    }

    #[test]
    fn single_entry_terminated_by_header_open() {
        let text =
        "--------------------\nfoo.txt\n********************\nhello\nworld\n--------------------\n";
        let entries = parse_entries(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].identifier, "foo.txt");
        assert_eq!(entries[0].lines, vec!["hello", "world"]);
        assert_eq!(entries[0].location.header_line, 1);
    }

    #[test]
    fn lone_header_open_is_not_a_header() {
        assert!(parse_entries("--------------------\n").is_empty());
        assert!(parse_entries("--------------------\nfoo.txt\nbar\n").is_empty());
    }

    #[test]
    fn separator_ends_entry_and_is_skipped() {
        let text = format!(
            "preamble\n{}a\n{SEPARATOR}\nchatter\n{}b\n",
            header("one.txt"),
            header("two.txt")
        );
        let entries = parse_entries(&text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].lines, vec!["a"]);
        assert_eq!(entries[1].identifier, "two.txt");
        assert_eq!(entries[1].lines, vec!["b"]);
        assert_eq!(entries[1].location.header_line, 8);
    }

    #[test]
    fn separator_is_never_a_header_open() {
        let text = format!("{SEPARATOR}\nfoo.txt\n{HEADER_CLOSE}\nx\n");
        assert!(parse_entries(&text).is_empty());
    }

    #[test]
    fn back_to_back_headers_and_duplicates_in_document_order() {
        let text = format!("{}{}x\n{}y\n", header("a.txt"), header("b.txt"), header("a.txt"));
        let entries = parse_entries(&text);
        let ids: Vec<_> = entries.iter().map(|e| e.identifier.as_str()).collect();
        assert_eq!(ids, vec!["a.txt", "b.txt", "a.txt"]);
        assert!(entries[0].lines.is_empty());
        assert_eq!(entries[2].lines, vec!["y"]);
    }

    #[test]
    fn content_and_identifier_are_right_trimmed() {
        let text = format!("{HEADER_OPEN}  \nname.txt \r\n{HEADER_CLOSE}\n  keep lead  \n\n");
        let entries = parse_entries_from(Some("export.json"), &text);
        assert_eq!(entries[0].identifier, "name.txt");
        assert_eq!(entries[0].lines, vec!["  keep lead", ""]);
        assert_eq!(entries[0].location.to_string(), "export.json:1");
    }
}

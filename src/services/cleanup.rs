//! Normalizes translated scripts toward the current marker convention.
//!
//! Only whitespace, quotes, brackets and the source marker are touched; the words
//! themselves are never changed.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde::Serialize;

use crate::errors::CodecError;
use crate::model::script::split_lines;
use crate::services::encoding::{self, TextEncoding};

static BRACKETED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>\s*)(?:「(?P<a>[^「」]*)」|『(?P<b>[^『』]*)』)$")
        .expect("invalid bracket regex")
});

static JAPANESE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Hiragana}\p{Katakana}\p{Han}]").expect("invalid japanese regex")
});

#[derive(Debug, Clone, Copy)]
pub struct CleanupOptions {
    /// Rewrite a leading ASCII `#` to `＃`
    pub convert_legacy_marker: bool,
    /// Rewrite fully bracketed lines that contain no Japanese to `"…"`
    pub convert_brackets: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        CleanupOptions {
            convert_legacy_marker: true,
            convert_brackets: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CleanupResult {
    pub lines: Vec<String>,
    pub changed: usize,
}

pub fn cleanup_line(line: &str, opts: CleanupOptions) -> String {
    let mut out = line.trim_end().replace(['“', '”'], "\"");

    if opts.convert_brackets {
        let quoted = BRACKETED.captures(&out).and_then(|caps| {
            let inner = caps.name("a").or_else(|| caps.name("b")).map_or("", |m| m.as_str());
            if JAPANESE.is_match(inner) {
                return None;
            }
            let indent = caps.name("indent").map_or("", |m| m.as_str());
            Some(format!("{indent}\"{inner}\""))
        });
        if let Some(quoted) = quoted {
            out = quoted;
        }
    }

    if opts.convert_legacy_marker {
        let body = out.trim_start();
        if let Some(name) = body.strip_prefix('#') {
            let indent = &out[..out.len() - body.len()];
            out = format!("{indent}＃{name}");
        }
    }

    out
}

pub fn cleanup_lines<S: AsRef<str>>(lines: &[S], opts: CleanupOptions) -> CleanupResult {
    let mut changed = 0;
    let lines = lines
        .iter()
        .map(|l| {
            let cleaned = cleanup_line(l.as_ref(), opts);
            if cleaned != l.as_ref() {
                changed += 1;
            }
            cleaned
        })
        .collect();

    CleanupResult { lines, changed }
}

/// Cleans text line by line. Line endings come out as LF; a final newline is kept.
pub fn cleanup_text(text: &str, opts: CleanupOptions) -> (String, usize) {
    let result = cleanup_lines(&split_lines(text), opts);
    let mut out = result.lines.join("\n");
    if text.ends_with('\n') {
        out.push('\n');
    }
    (out, result.changed)
}

#[derive(Debug)]
pub struct CleanedBytes {
    pub bytes: Vec<u8>,
    pub encoding: TextEncoding,
    pub changed: usize,
}

/// Detects the encoding, cleans, and re-encodes in the same encoding.
pub fn cleanup_bytes(bytes: &[u8], opts: CleanupOptions) -> Result<CleanedBytes, CodecError> {
    let encoding = encoding::detect_encoding(bytes);
    let text = encoding::decode(bytes, encoding)?;
    let (cleaned, changed) = cleanup_text(&text, opts);
    debug!("cleanup: {changed} line(s) changed ({})", encoding.label());

    Ok(CleanedBytes {
        bytes: encoding::encode(&cleaned, encoding)?,
        encoding,
        changed,
    })
}

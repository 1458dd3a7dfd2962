use serde::{Deserialize, Serialize};

use crate::errors::CodecError;
use crate::services::encoding::{self, TextEncoding};
use crate::services::orientation;

/// Which side of a bilingual pair a line comes from.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    Original,
    Translated,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A decoded script. Built once from raw bytes and never mutated afterwards.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScriptFile {
    pub identifier: String,
    pub lines: Vec<String>,
    pub dialect: Dialect,
    pub orientation: Orientation,
    pub encoding: TextEncoding,
}

impl ScriptFile {
    /// Decodes `bytes` strictly in `encoding`. Orientation is taken from the raw bytes
    /// before decoding.
    pub fn from_bytes(
        identifier: impl Into<String>,
        bytes: &[u8],
        encoding: TextEncoding,
        dialect: Dialect,
    ) -> Result<Self, CodecError> {
        let orientation = if orientation::is_vertical(bytes) {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };

        let text = encoding::decode(bytes, encoding)?;

        Ok(ScriptFile {
            identifier: identifier.into(),
            lines: split_lines(&text),
            dialect,
            orientation,
            encoding,
        })
    }

    pub fn is_vertical(&self) -> bool {
        self.orientation == Orientation::Vertical
    }
}

/// Splits decoded text into lines at `\n`.
///
/// One trailing empty segment is dropped, so `"a\nb\n"` yields two lines and `""`
/// yields none. A single `\r` directly before a `\n` is removed.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n')
        .map(|l| match l.strip_suffix('\n') {
            Some(body) => body.strip_suffix('\r').unwrap_or(body),
            None => l,
        })
        .map(str::to_string)
        .collect()
}

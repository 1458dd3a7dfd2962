use serde::{Deserialize, Serialize};

/// A script fragment recovered from a transcript.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub identifier: String,

    #[serde(default)]
    pub lines: Vec<String>,

    #[serde(default)]
    pub location: SourceLocation,
}

/// Where an entry header was found. Only used for diagnostics.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SourceLocation {
    #[serde(default)]
    pub transcript: Option<String>,

    /// 1-based line number of the header-open line
    #[serde(default)]
    pub header_line: usize,
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.transcript {
            Some(t) => write!(f, "{}:{}", t, self.header_line),
            None => write!(f, "line {}", self.header_line),
        }
    }
}

impl TranscriptEntry {
    /// Content joined back into a script body, newline-terminated.
    pub fn body(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

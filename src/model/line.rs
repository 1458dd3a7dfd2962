use serde::{Deserialize, Serialize};

/// Structural role of one script line, with the payload extracted for that role.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum LineType {
    /// Speaker name following the source marker
    SpeechSource(String),
    /// Text between the content delimiters
    SpeechContent(String),
    /// The raw line
    Normal(String),
}

/// Payload-free discriminant of [`LineType`], used when only roles are compared.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    SpeechSource,
    SpeechContent,
    Normal,
}

impl LineType {
    pub fn kind(&self) -> LineKind {
        match self {
            LineType::SpeechSource(_) => LineKind::SpeechSource,
            LineType::SpeechContent(_) => LineKind::SpeechContent,
            LineType::Normal(_) => LineKind::Normal,
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, LineType::Normal(_))
    }
}

//! Error types shared by the codec, the corpus pipeline and the protocol layer.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the byte/text codec. Never papered over with replacement characters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Input bytes are not a valid sequence in the declared encoding
    #[error("malformed {encoding} byte sequence at offset {offset}")]
    Malformed {
        encoding: &'static str,
        /// Byte offset of the first malformed sequence
        offset: usize,
    },

    /// A character has no representation in the target encoding
    #[error("character {character:?} cannot be encoded as {encoding}")]
    Unmappable {
        encoding: &'static str,
        character: char,
    },
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("speaker registry error: {0}")]
    Speaker(String),

    #[error("invalid entry identifier: {0:?}")]
    InvalidIdentifier(String),
}

impl CoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

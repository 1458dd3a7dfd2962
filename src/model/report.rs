use serde::{Deserialize, Serialize};

use super::line::LineKind;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MismatchKind {
    TypeMismatch {
        original: LineKind,
        translated: LineKind,
    },
    SpeakerNameMismatch {
        expected: String,
        actual: String,
    },
    UnknownSpeaker {
        speaker: String,
    },
    LineCountMismatch {
        original: usize,
        translated: usize,
        /// 1-based index of the first differently-classified line in the shared prefix
        first_divergence: Option<usize>,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// 1-based line number
    pub line: usize,
    #[serde(flatten)]
    pub kind: MismatchKind,
    pub original_text: String,
    pub translated_text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub line_count_ok: bool,
    pub mismatches: Vec<Mismatch>,
    pub skipped_as_untranslated: bool,
}

impl ValidationReport {
    pub fn untranslated() -> Self {
        ValidationReport {
            line_count_ok: true,
            mismatches: Vec::new(),
            skipped_as_untranslated: true,
        }
    }

    pub fn passed(&self) -> bool {
        !self.skipped_as_untranslated && self.line_count_ok && self.mismatches.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Passed,
    Mismatched { report: ValidationReport },
    Untranslated,
    MissingOriginal,
    MissingTranslation,
    CodecFailure { message: String },
    ReadFailure { message: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub identifier: String,
    #[serde(flatten)]
    pub status: FileStatus,
}

/// Per-file outcomes of a corpus run, sorted by identifier.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CorpusSummary {
    pub files: Vec<FileOutcome>,
    pub passed: usize,
    pub mismatched: usize,
    pub skipped: usize,
    pub codec_failures: usize,
    pub read_failures: usize,
}

impl CorpusSummary {
    pub fn from_outcomes(mut files: Vec<FileOutcome>) -> Self {
        files.sort_by(|a, b| a.identifier.cmp(&b.identifier));

        let mut summary = CorpusSummary::default();
        for f in &files {
            match f.status {
                FileStatus::Passed => summary.passed += 1,
                FileStatus::Mismatched { .. } => summary.mismatched += 1,
                FileStatus::CodecFailure { .. } => summary.codec_failures += 1,
                FileStatus::ReadFailure { .. } => summary.read_failures += 1,
                FileStatus::Untranslated
                | FileStatus::MissingOriginal
                | FileStatus::MissingTranslation => summary.skipped += 1,
            }
        }
        summary.files = files;
        summary
    }

    /// Whether the run should end with a non-zero status.
    pub fn has_failures(&self) -> bool {
        self.mismatched > 0 || self.codec_failures > 0 || self.read_failures > 0
    }
}

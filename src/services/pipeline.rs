use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::errors::{CoreError, CoreResult};
use crate::model::config::CheckConfig;
use crate::model::report::{CorpusSummary, FileOutcome, FileStatus};
use crate::model::script::{Dialect, ScriptFile};
use crate::parsers::classifier::Classifier;
use crate::services::encoding::{self, TextEncoding};
use crate::services::speakers::SpeakerRegistry;
use crate::services::validate::{ValidateOptions, Validator};

/// Everything a run needs besides the files themselves.
pub struct CheckContext {
    pub config: CheckConfig,
    pub classifier: Classifier,
    pub speakers: SpeakerRegistry,
}

impl CheckContext {
    pub fn new(config: CheckConfig) -> CoreResult<Self> {
        let speakers = config.speaker_registry()?;
        let classifier = Classifier::new(config.translated_marker);
        Ok(CheckContext {
            config,
            classifier,
            speakers,
        })
    }

    fn translated_encoding(&self, bytes: &[u8]) -> TextEncoding {
        self.config
            .translated_encoding
            .unwrap_or_else(|| encoding::detect_encoding(bytes))
    }

    /// Decodes and validates one original/translated pair.
    pub fn check_pair(&self, identifier: &str, original: &[u8], translated: &[u8]) -> FileOutcome {
        let status = match self.decode_pair(identifier, original, translated) {
            Ok((a, b)) => self.check_scripts(&a, &b),
            Err(e) => {
                warn!("{identifier}: {e}");
                FileStatus::CodecFailure {
                    message: e.to_string(),
                }
            }
        };

        FileOutcome {
            identifier: identifier.to_string(),
            status,
        }
    }

    fn decode_pair(
        &self,
        identifier: &str,
        original: &[u8],
        translated: &[u8],
    ) -> CoreResult<(ScriptFile, ScriptFile)> {
        let a = ScriptFile::from_bytes(
            identifier,
            original,
            TextEncoding::ShiftJis,
            Dialect::Original,
        )?;
        let b = ScriptFile::from_bytes(
            identifier,
            translated,
            self.translated_encoding(translated),
            Dialect::Translated,
        )?;
        Ok((a, b))
    }

    pub fn check_scripts(&self, original: &ScriptFile, translated: &ScriptFile) -> FileStatus {
        let options = ValidateOptions {
            trim: self.config.trim.resolve(original.is_vertical()),
            diagnostic: self.config.diagnostic,
        };
        debug!(
            "{}: {} vs {} lines, trim={}, translated as {}",
            original.identifier,
            original.lines.len(),
            translated.lines.len(),
            options.trim,
            translated.encoding.label()
        );

        let report = Validator::new(&self.classifier, &self.speakers, options)
            .validate(&original.lines, &translated.lines);

        if report.skipped_as_untranslated {
            info!("{}: not translated yet, skipped", original.identifier);
            FileStatus::Untranslated
        } else if report.passed() {
            FileStatus::Passed
        } else {
            FileStatus::Mismatched { report }
        }
    }
}

/// Regular files directly inside `dir`, keyed by file name.
pub fn list_scripts(dir: &Path) -> CoreResult<BTreeMap<String, PathBuf>> {
    let mut out = BTreeMap::new();

    for entry in fs::read_dir(dir).map_err(|e| CoreError::io(dir, e))? {
        let entry = entry.map_err(|e| CoreError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
            out.insert(name.to_string(), path.clone());
        }
    }

    Ok(out)
}

/// Validates every translated file against its same-named original.
///
/// Per-file problems become outcomes; only unreadable directories abort the run.
pub fn validate_corpus(
    original_dir: &Path,
    translated_dir: &Path,
    ctx: &CheckContext,
) -> CoreResult<CorpusSummary> {
    let originals = list_scripts(original_dir)?;
    let translations = list_scripts(translated_dir)?;

    let mut outcomes = Vec::with_capacity(translations.len());

    for (name, translated_path) in &translations {
        let Some(original_path) = originals.get(name) else {
            warn!("{name}: no original counterpart");
            outcomes.push(FileOutcome {
                identifier: name.clone(),
                status: FileStatus::MissingOriginal,
            });
            continue;
        };

        let outcome = match (fs::read(original_path), fs::read(translated_path)) {
            (Ok(a), Ok(b)) => ctx.check_pair(name, &a, &b),
            (Err(e), _) | (_, Err(e)) => {
                warn!("{name}: {e}");
                FileOutcome {
                    identifier: name.clone(),
                    status: FileStatus::ReadFailure {
                        message: e.to_string(),
                    },
                }
            }
        };
        outcomes.push(outcome);
    }

    for name in originals.keys().filter(|n| !translations.contains_key(*n)) {
        debug!("{name}: no translation yet");
        outcomes.push(FileOutcome {
            identifier: name.clone(),
            status: FileStatus::MissingTranslation,
        });
    }

    let summary = CorpusSummary::from_outcomes(outcomes);
    info!(
        "{} passed, {} mismatched, {} skipped, {} codec failures",
        summary.passed, summary.mismatched, summary.skipped, summary.codec_failures
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::TrimMode;

    fn ctx(trim: TrimMode) -> CheckContext {
        let mut config = CheckConfig {
            trim,
            ..CheckConfig::default()
        };
        config.speakers.insert("主人公".into(), "Protagonist".into());
        CheckContext::new(config).unwrap()
    }

    fn sjis(text: &str) -> Vec<u8> {
        encoding::encode(text, TextEncoding::ShiftJis).unwrap()
    }

    #[test]
    fn utf8_translation_of_sjis_original_passes() {
        let outcome = ctx(TrimMode::Auto).check_pair(
            "a.txt",
            &sjis("＃主人公\n「やあ」\n"),
            "＃Protagonist\n\"Hi\"\n".as_bytes(),
        );
        assert_eq!(outcome.status, FileStatus::Passed);
    }

    #[test]
    fn vertical_original_enables_trim_in_auto_mode() {
        let original = sjis("\u{3000}＃主人公\n\u{3000}「やあ」\n");
        let translated = "＃Protagonist\n\"Hi\"\n".as_bytes();

        let auto = ctx(TrimMode::Auto).check_pair("v.txt", &original, translated);
        assert_eq!(auto.status, FileStatus::Passed);

        let never = ctx(TrimMode::Never).check_pair("v.txt", &original, translated);
        assert!(matches!(never.status, FileStatus::Mismatched { .. }));
    }

    #[test]
    fn malformed_original_is_a_codec_failure() {
        let outcome = ctx(TrimMode::Auto).check_pair("bad.txt", &[0x82, b'\n'], b"x\n");
        assert!(matches!(outcome.status, FileStatus::CodecFailure { .. }));
    }
}

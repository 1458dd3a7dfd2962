use log::debug;

use crate::model::line::{LineKind, LineType};
use crate::model::report::{Mismatch, MismatchKind, ValidationReport};
use crate::model::script::Dialect;
use crate::parsers::classifier::Classifier;
use crate::services::speakers::SpeakerRegistry;

#[derive(Debug, Clone, Copy)]
pub struct ValidateOptions {
    /// Strip surrounding whitespace on both sides before classifying
    pub trim: bool,
    /// Attach the first differently-classified line to a line-count mismatch
    pub diagnostic: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        ValidateOptions {
            trim: false,
            diagnostic: true,
        }
    }
}

/// Aligns an original script with its translation line by line.
pub struct Validator<'a> {
    classifier: &'a Classifier,
    speakers: &'a SpeakerRegistry,
    options: ValidateOptions,
}

impl<'a> Validator<'a> {
    pub fn new(
        classifier: &'a Classifier,
        speakers: &'a SpeakerRegistry,
        options: ValidateOptions,
    ) -> Self {
        Validator {
            classifier,
            speakers,
            options,
        }
    }

    fn original(&self, line: &str) -> LineType {
        self.classifier.classify(line, Dialect::Original, self.options.trim)
    }

    fn translated(&self, line: &str) -> LineType {
        self.classifier.classify(line, Dialect::Translated, self.options.trim)
    }

    /// A translation that still only carries original-dialect markers.
    ///
    /// A line is evidence for one dialect only when the other dialect reads it as
    /// normal text. A source line both dialects accept (e.g. `＃name`) counts as
    /// translated once its name is no longer an original speaker name.
    pub fn is_untranslated<S: AsRef<str>>(&self, translated: &[S]) -> bool {
        let mut original_evidence = false;

        for line in translated {
            let line = line.as_ref();
            let as_original = self.original(line);
            let as_translated = self.translated(line);

            match (&as_original, &as_translated) {
                (LineType::SpeechSource(name), LineType::SpeechSource(_)) => {
                    if self.speakers.canonical(name).is_none() {
                        return false;
                    }
                    original_evidence = true;
                }
                _ => match (as_original.is_normal(), as_translated.is_normal()) {
                    (true, false) => return false,
                    (false, true) => original_evidence = true,
                    _ => {}
                },
            }
        }

        original_evidence
    }

    pub fn validate<A, B>(&self, original: &[A], translated: &[B]) -> ValidationReport
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        if self.is_untranslated(translated) {
            debug!("translation carries no translated markers, skipping");
            return ValidationReport::untranslated();
        }

        if original.len() != translated.len() {
            return ValidationReport {
                line_count_ok: false,
                mismatches: vec![self.line_count_mismatch(original, translated)],
                skipped_as_untranslated: false,
            };
        }

        let mismatches = original
            .iter()
            .zip(translated)
            .enumerate()
            .flat_map(|(i, (a, b))| self.compare_line(i + 1, a.as_ref(), b.as_ref()))
            .collect();

        ValidationReport {
            line_count_ok: true,
            mismatches,
            skipped_as_untranslated: false,
        }
    }

    fn line_count_mismatch<A, B>(&self, original: &[A], translated: &[B]) -> Mismatch
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let first_divergence = if self.options.diagnostic {
            original
                .iter()
                .zip(translated)
                .position(|(a, b)| {
                    self.original(a.as_ref()).kind() != self.translated(b.as_ref()).kind()
                })
                .map(|i| i + 1)
        } else {
            None
        };

        let line = first_divergence.unwrap_or(original.len().min(translated.len()) + 1);
        let text_at = |lines: &[&str]| lines.get(line - 1).map(|s| s.to_string());
        let a: Vec<&str> = original.iter().map(AsRef::as_ref).collect();
        let b: Vec<&str> = translated.iter().map(AsRef::as_ref).collect();

        Mismatch {
            line,
            kind: MismatchKind::LineCountMismatch {
                original: original.len(),
                translated: translated.len(),
                first_divergence,
            },
            original_text: text_at(&a[..]).unwrap_or_default(),
            translated_text: text_at(&b[..]).unwrap_or_default(),
        }
    }

    fn compare_line(&self, line: usize, a: &str, b: &str) -> Option<Mismatch> {
        let kind = match (self.original(a), self.translated(b)) {
            (LineType::SpeechSource(name), LineType::SpeechSource(actual)) => {
                match self.speakers.canonical(&name) {
                    None => MismatchKind::UnknownSpeaker { speaker: name },
                    Some(expected) if expected != actual => MismatchKind::SpeakerNameMismatch {
                        expected: expected.to_string(),
                        actual,
                    },
                    Some(_) => return None,
                }
            }
            (ta, tb) if ta.kind() != tb.kind() => MismatchKind::TypeMismatch {
                original: ta.kind(),
                translated: tb.kind(),
            },
            _ => return None,
        };

        Some(Mismatch {
            line,
            kind,
            original_text: a.to_string(),
            translated_text: b.to_string(),
        })
    }
}

/// Role sequence of a script, handy for reporting where two files drift apart.
pub fn kinds<S: AsRef<str>>(
    classifier: &Classifier,
    lines: &[S],
    dialect: Dialect,
    trim: bool,
) -> Vec<LineKind> {
    lines
        .iter()
        .map(|l| classifier.classify(l.as_ref(), dialect, trim).kind())
        .collect()
}

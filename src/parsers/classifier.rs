use crate::model::config::MarkerConvention;
use crate::model::line::LineType;
use crate::model::script::Dialect;

/// Lexical markers that identify structural lines in one dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectMarkers {
    pub source_prefixes: Vec<String>,
    /// (open, close) pairs; a line must open and close with the same pair
    pub content_delimiters: Vec<(String, String)>,
}

impl DialectMarkers {
    pub fn original() -> Self {
        DialectMarkers {
            source_prefixes: vec!["＃".into()],
            content_delimiters: vec![("「".into(), "」".into()), ("『".into(), "』".into())],
        }
    }

    pub fn translated(convention: MarkerConvention) -> Self {
        DialectMarkers {
            source_prefixes: vec![convention.marker().into()],
            content_delimiters: vec![("\"".into(), "\"".into())],
        }
    }

    pub fn classify(&self, line: &str, trim: bool) -> LineType {
        let text = if trim { line.trim() } else { line };

        for prefix in &self.source_prefixes {
            if let Some(name) = text.strip_prefix(prefix.as_str()) {
                return LineType::SpeechSource(name.to_string());
            }
        }

        for (open, close) in &self.content_delimiters {
            if let Some(inner) = enclosed(text, open, close) {
                return LineType::SpeechContent(inner.to_string());
            }
        }

        LineType::Normal(text.to_string())
    }
}

/// Inner text if `text` opens with `open` and closes with `close` as two distinct
/// delimiters, so a lone `"` is not a quoted line.
fn enclosed<'a>(text: &'a str, open: &str, close: &str) -> Option<&'a str> {
    text.strip_prefix(open)?.strip_suffix(close)
}

/// Marker sets for both dialects of one corpus snapshot.
#[derive(Debug, Clone)]
pub struct Classifier {
    original: DialectMarkers,
    translated: DialectMarkers,
}

impl Classifier {
    pub fn new(convention: MarkerConvention) -> Self {
        Classifier {
            original: DialectMarkers::original(),
            translated: DialectMarkers::translated(convention),
        }
    }

    pub fn markers(&self, dialect: Dialect) -> &DialectMarkers {
        match dialect {
            Dialect::Original => &self.original,
            Dialect::Translated => &self.translated,
        }
    }

    pub fn classify(&self, line: &str, dialect: Dialect, trim: bool) -> LineType {
        self.markers(dialect).classify(line, trim)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::new(MarkerConvention::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::line::LineKind;

    fn original(line: &str) -> LineType {
        Classifier::default().classify(line, Dialect::Original, false)
    }

    fn translated(line: &str) -> LineType {
        Classifier::default().classify(line, Dialect::Translated, false)
    }

    #[test]
    fn original_source_marker() {
        assert_eq!(original("＃主人公"), LineType::SpeechSource("主人公".into()));
        assert!(original("#主人公").is_normal());
    }

    #[test]
    fn original_brackets_must_balance_per_style() {
        assert_eq!(original("「こんにちは」"), LineType::SpeechContent("こんにちは".into()));
        assert_eq!(original("『夢』"), LineType::SpeechContent("夢".into()));
        assert!(original("「こんにちは』").is_normal());
        assert!(original("『こんにちは」").is_normal());
        assert_eq!(original("「」"), LineType::SpeechContent(String::new()));
    }

    #[test]
    fn translated_quotes() {
        assert_eq!(translated("\"Hello\""), LineType::SpeechContent("Hello".into()));
        assert_eq!(translated("\"\""), LineType::SpeechContent(String::new()));
        assert!(translated("『Hello』").is_normal());
        assert!(translated("\"unterminated").is_normal());
    }

    #[test]
    fn degenerate_lines_are_normal() {
        assert!(translated("").is_normal());
        assert!(translated("\"").is_normal());
        assert!(original("「").is_normal());
    }

    #[test]
    fn translated_marker_is_configurable() {
        let legacy = Classifier::new(MarkerConvention::Ascii);
        assert_eq!(
            legacy.classify("#Hero", Dialect::Translated, false),
            LineType::SpeechSource("Hero".into())
        );
        assert!(legacy.classify("＃Hero", Dialect::Translated, false).is_normal());
        assert_eq!(translated("＃Hero"), LineType::SpeechSource("Hero".into()));
    }

    #[test]
    fn trim_strips_structural_indentation() {
        let c = Classifier::default();
        let line = "\u{3000}「はい」 ";
        assert!(c.classify(line, Dialect::Original, false).is_normal());
        assert_eq!(
            c.classify(line, Dialect::Original, true),
            LineType::SpeechContent("はい".into())
        );
    }

    #[test]
    fn classification_is_repeatable() {
        let c = Classifier::default();
        for line in ["＃誰", "「a」", "text", ""] {
            let a = c.classify(line, Dialect::Original, true);
            let b = c.classify(line, Dialect::Original, true);
            assert_eq!(a, b);
        }
        assert_eq!(original("x").kind(), LineKind::Normal);
    }
}

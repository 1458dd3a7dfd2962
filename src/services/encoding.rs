use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::{DecoderResult, Encoding, SHIFT_JIS, UTF_8};
use serde::{Deserialize, Serialize};

use crate::errors::CodecError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Encodings that occur in the corpus.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    /// Legacy double-byte encoding of the original scripts
    #[serde(alias = "shift-jis", alias = "sjis", alias = "cp932")]
    ShiftJis,
    #[serde(alias = "utf-8")]
    Utf8,
}

impl TextEncoding {
    pub fn label(self) -> &'static str {
        self.encoding().name()
    }

    fn encoding(self) -> &'static Encoding {
        match self {
            TextEncoding::ShiftJis => SHIFT_JIS,
            TextEncoding::Utf8 => UTF_8,
        }
    }
}

/// Decodes `bytes` without replacement. A UTF-8 BOM is skipped when decoding UTF-8.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> Result<String, CodecError> {
    let bytes = match encoding {
        TextEncoding::Utf8 => bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes),
        TextEncoding::ShiftJis => bytes,
    };

    let enc = encoding.encoding();
    match enc.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => Ok(text.into_owned()),
        None => Err(CodecError::Malformed {
            encoding: enc.name(),
            offset: malformed_offset(enc, bytes),
        }),
    }
}

/// Encodes `text`, failing on the first character the target cannot represent.
pub fn encode(text: &str, encoding: TextEncoding) -> Result<Vec<u8>, CodecError> {
    let enc = encoding.encoding();
    let (bytes, _, had_unmappable) = enc.encode(text);

    if had_unmappable {
        let character = text
            .chars()
            .find(|c| {
                let mut buf = [0u8; 4];
                enc.encode(c.encode_utf8(&mut buf)).2
            })
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        return Err(CodecError::Unmappable {
            encoding: enc.name(),
            character,
        });
    }

    Ok(match bytes {
        Cow::Borrowed(b) => b.to_vec(),
        Cow::Owned(b) => b,
    })
}

fn malformed_offset(enc: &'static Encoding, bytes: &[u8]) -> usize {
    let mut decoder = enc.new_decoder_without_bom_handling();
    let capacity = decoder
        .max_utf8_buffer_length_without_replacement(bytes.len())
        .unwrap_or(bytes.len() * 3);
    let mut out = String::with_capacity(capacity);

    let (result, read) = decoder.decode_to_string_without_replacement(bytes, &mut out, true);
    match result {
        DecoderResult::Malformed(bad, extra) => read - bad as usize - extra as usize,
        _ => read,
    }
}

/// Decides between the two corpus encodings from byte structure.
///
/// Order: UTF-8 BOM, valid UTF-8 containing multi-byte sequences, well-formed
/// Shift_JIS lead/trail pairs, then chardetng. Pure ASCII is reported as UTF-8.
pub fn detect_encoding(bytes: &[u8]) -> TextEncoding {
    if bytes.starts_with(UTF8_BOM) {
        return TextEncoding::Utf8;
    }

    if std::str::from_utf8(bytes).is_ok() {
        return TextEncoding::Utf8;
    }

    if is_shift_jis_structured(bytes) {
        return TextEncoding::ShiftJis;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    if detector.guess(None, true) == UTF_8 {
        TextEncoding::Utf8
    } else {
        TextEncoding::ShiftJis
    }
}

fn is_sjis_lead(b: u8) -> bool {
    matches!(b, 0x81..=0x9F | 0xE0..=0xFC)
}

fn is_sjis_trail(b: u8) -> bool {
    matches!(b, 0x40..=0x7E | 0x80..=0xFC)
}

/// Every non-ASCII byte is either half-width katakana or part of a lead/trail pair.
fn is_shift_jis_structured(bytes: &[u8]) -> bool {
    let mut i = 0;
    let mut pairs = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        if b < 0x80 || (0xA1..=0xDF).contains(&b) {
            i += 1;
        } else if is_sjis_lead(b) && bytes.get(i + 1).copied().is_some_and(is_sjis_trail) {
            pairs += 1;
            i += 2;
        } else {
            return false;
        }
    }

    pairs > 0
}

#[derive(Debug, Serialize)]
pub struct EncodingCandidate {
    pub name: String,
    pub confidence: f32,
}

#[derive(Debug, Serialize)]
pub struct EncodingDetectionResult {
    pub best: String,
    pub confidence: f32,
    pub encoding: TextEncoding,
    pub candidates: Vec<EncodingCandidate>,
}

/// Labelled detection result with alias candidates, for reporting.
pub fn detection_report(bytes: &[u8]) -> EncodingDetectionResult {
    let encoding = detect_encoding(bytes);

    if bytes.starts_with(UTF8_BOM) {
        return EncodingDetectionResult {
            best: "utf-8-sig".into(),
            confidence: 0.99,
            encoding,
            candidates: vec![
                EncodingCandidate {
                    name: "utf-8-sig".into(),
                    confidence: 0.99,
                },
                EncodingCandidate {
                    name: "utf-8".into(),
                    confidence: 0.90,
                },
            ],
        };
    }

    let best = encoding.label().to_lowercase();
    let confidence = estimate_confidence(bytes, encoding);

    let mut candidates = vec![EncodingCandidate {
        name: best.clone(),
        confidence,
    }];

    match encoding {
        TextEncoding::ShiftJis => {
            candidates.push(EncodingCandidate {
                name: "windows-31j".into(),
                confidence: (confidence - 0.03).max(0.0),
            });
            candidates.push(EncodingCandidate {
                name: "cp932".into(),
                confidence: (confidence - 0.05).max(0.0),
            });
        }
        TextEncoding::Utf8 => {
            candidates.push(EncodingCandidate {
                name: "utf-8-sig".into(),
                confidence: (confidence - 0.20).max(0.0),
            });
        }
    }

    EncodingDetectionResult {
        best,
        confidence,
        encoding,
        candidates,
    }
}

fn estimate_confidence(bytes: &[u8], encoding: TextEncoding) -> f32 {
    let text = match decode(bytes, encoding) {
        Ok(t) => t,
        Err(_) => return 0.35,
    };

    let len = text.len();
    if len < 64 {
        0.55
    } else if len < 512 {
        0.70
    } else if len < 4096 {
        0.82
    } else {
        0.90
    }
}

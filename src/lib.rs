//! Structural integrity checks for bilingual visual-novel script corpora.
//!
//! Original scripts are Shift_JIS files whose lines fall into three roles: speaker
//! lines (`＃name`), bracketed speech (`「…」`/`『…』`) and everything else. A
//! translation must keep the same line count and the same role on every line, with
//! speaker names drawn from a fixed registry.

pub mod errors;
pub mod model;
pub mod parsers;
pub mod protocol;
pub mod services;

pub use errors::{CodecError, CoreError, CoreResult};
pub use model::line::{LineKind, LineType};
pub use model::script::{split_lines, Dialect, Orientation, ScriptFile};
pub use parsers::classifier::Classifier;
pub use parsers::transcript::parse_entries;
pub use services::encoding::{decode, detect_encoding, encode, TextEncoding};
pub use services::orientation::is_vertical;
pub use services::speakers::SpeakerRegistry;
pub use services::validate::{ValidateOptions, Validator};

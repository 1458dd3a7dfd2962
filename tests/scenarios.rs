//! End-to-end behaviour of the core checks on small hand-written scripts.

use taiyaku_core::model::report::MismatchKind;
use taiyaku_core::{
    decode, encode, is_vertical, parse_entries, Classifier, Dialect, LineKind, LineType,
    SpeakerRegistry, TextEncoding, ValidateOptions, Validator,
};

fn speakers() -> SpeakerRegistry {
    SpeakerRegistry::from_pairs([("主人公", "Protagonist")]).unwrap()
}

#[test]
fn header_match_yields_one_entry() {
    let text =
        "--------------------\nfoo.txt\n********************\nhello\nworld\n--------------------\n";
    let entries = parse_entries(text);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].identifier, "foo.txt");
    assert_eq!(entries[0].lines, vec!["hello", "world"]);
}

#[test]
fn lone_dash_line_is_not_a_header() {
    assert!(parse_entries("--------------------\n").is_empty());
}

#[test]
fn n_headers_give_n_entries_in_order() {
    let ids = ["03.txt", "01.txt", "02.txt"];
    let mut text = String::from("assistant reply\n");
    for id in ids {
        text.push_str(&format!(
            "--------------------\n{id}\n********************\n＃主人公\n「{id}」\n"
        ));
    }
    let entries = parse_entries(&text);
    let got: Vec<_> = entries.iter().map(|e| e.identifier.as_str()).collect();
    assert_eq!(got, ids);
    assert!(entries.iter().all(|e| e.lines.len() == 2));
}

#[test]
fn speaker_name_checked_against_registry() {
    let classifier = Classifier::default();
    let speakers = speakers();
    let v = Validator::new(&classifier, &speakers, ValidateOptions::default());

    assert_eq!(
        classifier.classify("＃主人公", Dialect::Original, false),
        LineType::SpeechSource("主人公".into())
    );

    let ok = v.validate(&["＃主人公", "「はい」"], &["＃Protagonist", "\"Yes\""]);
    assert!(ok.passed());

    let bad = v.validate(&["＃主人公", "「はい」"], &["＃Hero", "\"Yes\""]);
    assert_eq!(
        bad.mismatches[0].kind,
        MismatchKind::SpeakerNameMismatch {
            expected: "Protagonist".into(),
            actual: "Hero".into()
        }
    );
}

#[test]
fn mismatched_bracket_styles_are_a_type_mismatch() {
    let classifier = Classifier::default();
    let speakers = speakers();
    let v = Validator::new(&classifier, &speakers, ValidateOptions::default());

    assert_eq!(
        classifier.classify("「こんにちは」", Dialect::Original, false).kind(),
        LineKind::SpeechContent
    );
    assert!(classifier.classify("『Hello』", Dialect::Translated, false).is_normal());

    let report = v.validate(&["「こんにちは」", "「またね」"], &["『Hello』", "\"Bye\""]);
    assert_eq!(report.mismatches.len(), 1);
    assert_eq!(
        report.mismatches[0].kind,
        MismatchKind::TypeMismatch {
            original: LineKind::SpeechContent,
            translated: LineKind::Normal
        }
    );
}

#[test]
fn vertical_detection_on_raw_bytes() {
    let space_line = encode("\u{3000}あ\n", TextEncoding::ShiftJis).unwrap();
    let two = [space_line.clone(), space_line.clone()].concat();
    assert!(is_vertical(&two));

    let three = [two, b"ascii line\n".to_vec()].concat();
    assert!(!is_vertical(&three));
}

#[test]
fn untranslated_translation_is_skipped() {
    let classifier = Classifier::default();
    let speakers = speakers();
    let v = Validator::new(&classifier, &speakers, ValidateOptions::default());

    let report = v.validate(&["＃主人公", "「まだ」"], &["＃主人公", "「まだ」"]);
    assert!(report.skipped_as_untranslated);
    assert!(report.mismatches.is_empty());
}

#[test]
fn identical_classifications_never_mismatch() {
    let classifier = Classifier::default();
    let speakers = speakers();
    let options = ValidateOptions {
        trim: true,
        diagnostic: true,
    };
    let v = Validator::new(&classifier, &speakers, options);

    let original = ["＃主人公", "「一」", "『二』", "地の文", "", "\u{3000}「三」"];
    let translated = ["＃Protagonist", "\"One\"", "\"Two\"", "Narration", "", "\"Three\""];
    assert!(v.validate(&original, &translated).passed());
}

#[test]
fn shift_jis_round_trip_of_supported_characters() {
    let text = "＃#「」『』\u{3000}ABCxyz0189\"(),.!?\n地の文、です。\n";
    let bytes = encode(text, TextEncoding::ShiftJis).unwrap();
    assert_eq!(decode(&bytes, TextEncoding::ShiftJis).unwrap(), text);
}

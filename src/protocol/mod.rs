use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::errors::{CoreError, CoreResult};
use crate::model::config::{CheckConfig, MarkerConvention};
use crate::model::script::Dialect;
use crate::parsers::classifier::Classifier;
use crate::parsers::transcript;
use crate::services::cleanup::{self, CleanupOptions};
use crate::services::encoding::{self, TextEncoding};
use crate::services::export::{self, write_atomic};
use crate::services::pipeline::{self, CheckContext};
use crate::services::{orientation, validate};

mod command;
use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn get_str<'a>(payload: &'a Value, key: &str) -> &'a str {
    payload.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn get_bool(payload: &Value, key: &str, default: bool) -> bool {
    payload.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

fn required_path(payload: &Value, key: &str) -> Result<PathBuf, String> {
    let s = get_str(payload, key);
    if s.is_empty() {
        return Err(format!("payload.{key} is required"));
    }
    Ok(PathBuf::from(s))
}

fn read_file(path: &Path) -> CoreResult<Vec<u8>> {
    fs::read(path).map_err(|e| CoreError::io(path, e))
}

fn parse_field<T: serde::de::DeserializeOwned>(
    payload: &Value,
    key: &str,
) -> Result<Option<T>, String> {
    match payload.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| format!("invalid payload.{key}: {e}")),
    }
}

/// `payload.config` (inline) wins over `payload.config_path`; defaults otherwise.
fn config_from_payload(payload: &Value) -> Result<CheckConfig, String> {
    if let Some(cfg) = parse_field::<CheckConfig>(payload, "config")? {
        return Ok(cfg);
    }
    match get_str(payload, "config_path") {
        "" => Ok(CheckConfig::default()),
        path => CheckConfig::load(Path::new(path)).map_err(|e| e.to_string()),
    }
}

fn json_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(json!({}))
}

pub fn handle(input: &str) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(_) => {
            return json!({
                "status": "error",
                "message": "invalid json"
            })
            .to_string();
        }
    };

    let id = get_id(&req);
    let payload = get_payload(&req);

    let result = match Command::from(get_cmd(&req)) {
        Command::Ping => Ok(json!({ "message": "taiyaku-core alive" })),
        Command::DetectEncoding => detect_encoding(payload),
        Command::ParseTranscript => parse_transcript(payload),
        Command::ClassifyLine => classify_line(payload),
        Command::ClassifyLines => classify_lines(payload),
        Command::CheckOrientation => check_orientation(payload),
        Command::ValidatePair => validate_pair(payload),
        Command::ValidateCorpus => validate_corpus(payload),
        Command::CleanupFile => cleanup_file(payload),
        Command::ExportEntries => export_entries(payload),
        Command::Unknown => Err("unknown command".to_string()),
    };

    match result {
        Ok(v) => ok(id, v),
        Err(e) => err(id, e),
    }
}

fn detect_encoding(payload: &Value) -> Result<Value, String> {
    let path = required_path(payload, "path")?;
    let bytes = read_file(&path).map_err(|e| e.to_string())?;
    Ok(json_value(&encoding::detection_report(&bytes)))
}

fn parse_transcript(payload: &Value) -> Result<Value, String> {
    let (name, text) = match get_str(payload, "path") {
        "" => (None, get_str(payload, "text").to_string()),
        path => {
            let bytes = read_file(Path::new(path)).map_err(|e| e.to_string())?;
            let text = encoding::decode(&bytes, encoding::detect_encoding(&bytes))
                .map_err(|e| e.to_string())?;
            (Some(path), text)
        }
    };

    let entries = transcript::parse_entries_from(name, &text);
    Ok(json!({ "entries": entries }))
}

fn classifier_for(payload: &Value) -> Result<(Classifier, Dialect, bool), String> {
    let convention =
        parse_field::<MarkerConvention>(payload, "translated_marker")?.unwrap_or_default();
    let dialect = parse_field::<Dialect>(payload, "dialect")?.unwrap_or(Dialect::Original);
    let trim = get_bool(payload, "trim", false);
    Ok((Classifier::new(convention), dialect, trim))
}

fn classify_line(payload: &Value) -> Result<Value, String> {
    let (classifier, dialect, trim) = classifier_for(payload)?;
    let line_type = classifier.classify(get_str(payload, "line"), dialect, trim);
    Ok(json!({ "line_type": line_type }))
}

fn classify_lines(payload: &Value) -> Result<Value, String> {
    let (classifier, dialect, trim) = classifier_for(payload)?;
    let lines: Vec<String> = parse_field(payload, "lines")?
        .ok_or_else(|| "payload.lines must be an array".to_string())?;
    Ok(json!({ "kinds": validate::kinds(&classifier, &lines, dialect, trim) }))
}

fn check_orientation(payload: &Value) -> Result<Value, String> {
    let path = required_path(payload, "path")?;
    let bytes = read_file(&path).map_err(|e| e.to_string())?;
    Ok(json!({ "vertical": orientation::is_vertical(&bytes) }))
}

fn validate_pair(payload: &Value) -> Result<Value, String> {
    let original = required_path(payload, "original_path")?;
    let translated = required_path(payload, "translated_path")?;
    let ctx = CheckContext::new(config_from_payload(payload)?).map_err(|e| e.to_string())?;

    let a = read_file(&original).map_err(|e| e.to_string())?;
    let b = read_file(&translated).map_err(|e| e.to_string())?;
    let identifier = translated
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(json!({ "outcome": ctx.check_pair(&identifier, &a, &b) }))
}

fn validate_corpus(payload: &Value) -> Result<Value, String> {
    let original_dir = required_path(payload, "original_dir")?;
    let translated_dir = required_path(payload, "translated_dir")?;
    let ctx = CheckContext::new(config_from_payload(payload)?).map_err(|e| e.to_string())?;

    let summary = pipeline::validate_corpus(&original_dir, &translated_dir, &ctx)
        .map_err(|e| e.to_string())?;
    let failed = summary.has_failures();
    Ok(json!({ "summary": summary, "failed": failed }))
}

fn cleanup_file(payload: &Value) -> Result<Value, String> {
    let path = required_path(payload, "path")?;
    let opts = CleanupOptions {
        convert_legacy_marker: get_bool(payload, "convert_legacy_marker", true),
        convert_brackets: get_bool(payload, "convert_brackets", true),
    };

    let bytes = read_file(&path).map_err(|e| e.to_string())?;
    let cleaned = cleanup::cleanup_bytes(&bytes, opts).map_err(|e| e.to_string())?;

    let write = get_bool(payload, "write", false);
    if write && cleaned.changed > 0 {
        write_atomic(&path, &cleaned.bytes).map_err(|e| e.to_string())?;
    }

    Ok(json!({
        "changed": cleaned.changed,
        "encoding": cleaned.encoding,
        "written": write && cleaned.changed > 0,
    }))
}

fn export_entries(payload: &Value) -> Result<Value, String> {
    let transcripts: Vec<PathBuf> = parse_field(payload, "transcripts")?
        .ok_or_else(|| "payload.transcripts must be an array".to_string())?;
    let out_dir = required_path(payload, "out_dir")?;
    let encoding =
        parse_field::<TextEncoding>(payload, "encoding")?.unwrap_or(TextEncoding::ShiftJis);

    let report = export::export_transcripts(&transcripts, &out_dir, encoding)
        .map_err(|e| e.to_string())?;
    Ok(json!({ "report": report }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(req: Value) -> Value {
        serde_json::from_str(&handle(&req.to_string())).unwrap()
    }

    #[test]
    fn ping_and_unknown() {
        let resp = call(json!({ "id": 1, "cmd": "ping" }));
        assert_eq!(resp["status"], "ok");
        assert_eq!(resp["id"], 1);

        let resp = call(json!({ "id": 2, "cmd": "nope" }));
        assert_eq!(resp["status"], "error");
        assert_eq!(resp["message"], "unknown command");
    }

    #[test]
    fn invalid_json_is_reported() {
        let resp: Value = serde_json::from_str(&handle("{not json")).unwrap();
        assert_eq!(resp["message"], "invalid json");
    }

    #[test]
    fn classify_line_reports_type_and_payload() {
        let resp = call(json!({
            "cmd": "classify_line",
            "payload": { "line": "#Hero", "dialect": "translated", "translated_marker": "ascii" }
        }));
        assert_eq!(resp["payload"]["line_type"]["type"], "speech_source");
        assert_eq!(resp["payload"]["line_type"]["payload"], "Hero");
    }

    #[test]
    fn parse_transcript_from_text() {
        let text = "--------------------\nfoo.txt\n********************\nhello\n";
        let resp = call(json!({ "cmd": "parse_transcript", "payload": { "text": text } }));
        assert_eq!(resp["payload"]["entries"][0]["identifier"], "foo.txt");
    }

    #[test]
    fn missing_path_is_an_error() {
        let resp = call(json!({ "cmd": "check_orientation", "payload": {} }));
        assert_eq!(resp["message"], "payload.path is required");
    }
}

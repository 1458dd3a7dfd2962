use std::fs;
use std::path::{Component, Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use crate::errors::{CoreError, CoreResult};
use crate::model::entry::TranscriptEntry;
use crate::parsers::transcript;
use crate::services::encoding::{self, TextEncoding};
use crate::services::registry::EntryRegistry;

#[derive(Debug, Serialize, Default)]
pub struct ExportReport {
    pub written: Vec<String>,
    pub duplicates: usize,
    pub failed: Vec<ExportFailure>,
}

#[derive(Debug, Serialize)]
pub struct ExportFailure {
    pub identifier: String,
    pub message: String,
}

/// Tokenizes every transcript, keeps the first occurrence of each identifier and
/// writes one file per entry into `out_dir`.
pub fn export_transcripts(
    transcripts: &[PathBuf],
    out_dir: &Path,
    encoding: TextEncoding,
) -> CoreResult<ExportReport> {
    let mut registry = EntryRegistry::new();

    for path in transcripts {
        let bytes = fs::read(path).map_err(|e| CoreError::io(path, e))?;
        let text = encoding::decode(&bytes, encoding::detect_encoding(&bytes))?;
        let name = path.to_string_lossy();
        registry.extend(transcript::parse_entries_from(Some(name.as_ref()), &text));
    }

    let duplicates = registry.duplicates();
    let mut report = export_entries(&registry.into_entries(), out_dir, encoding)?;
    report.duplicates = duplicates;
    Ok(report)
}

/// Writes entries as individual files. Per-entry failures are collected; only a
/// missing or unwritable output directory aborts.
pub fn export_entries(
    entries: &[TranscriptEntry],
    out_dir: &Path,
    encoding: TextEncoding,
) -> CoreResult<ExportReport> {
    fs::create_dir_all(out_dir).map_err(|e| CoreError::io(out_dir, e))?;

    let mut report = ExportReport::default();

    for entry in entries {
        match write_entry(entry, out_dir, encoding) {
            Ok(()) => report.written.push(entry.identifier.clone()),
            Err(e) => {
                warn!("skipping {} from {}: {e}", entry.identifier, entry.location);
                report.failed.push(ExportFailure {
                    identifier: entry.identifier.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        "exported {} entries to {} ({} failed)",
        report.written.len(),
        out_dir.display(),
        report.failed.len()
    );
    Ok(report)
}

fn write_entry(entry: &TranscriptEntry, out_dir: &Path, encoding: TextEncoding) -> CoreResult<()> {
    let name = safe_file_name(&entry.identifier)?;
    let bytes = encoding::encode(&entry.body(), encoding)?;
    write_atomic(&out_dir.join(name), &bytes)
}

/// Identifiers become bare file names: no directories, no parent references.
fn safe_file_name(identifier: &str) -> CoreResult<&str> {
    let mut components = Path::new(identifier).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None)
            if !identifier.contains(['/', '\\']) && !identifier.trim().is_empty() =>
        {
            Ok(identifier)
        }
        _ => Err(CoreError::InvalidIdentifier(identifier.to_string())),
    }
}

pub fn write_atomic(path: &Path, bytes: &[u8]) -> CoreResult<()> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
    }

    fs::write(&tmp, bytes).map_err(|e| CoreError::io(&tmp, e))?;

    if path.exists() {
        fs::remove_file(path).map_err(|e| CoreError::io(path, e))?;
    }

    fs::rename(&tmp, path).map_err(|e| CoreError::io(path, e))?;

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "entry".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::SourceLocation;

    fn entry(id: &str, lines: &[&str]) -> TranscriptEntry {
        TranscriptEntry {
            identifier: id.into(),
            lines: lines.iter().map(|s| s.to_string()).collect(),
            location: SourceLocation::default(),
        }
    }

    #[test]
    fn rejects_path_like_identifiers() {
        assert!(safe_file_name("a.txt").is_ok());
        assert!(safe_file_name("../a.txt").is_err());
        assert!(safe_file_name("dir/a.txt").is_err());
        assert!(safe_file_name("dir\\a.txt").is_err());
        assert!(safe_file_name("..").is_err());
        assert!(safe_file_name("").is_err());
    }

    #[test]
    fn writes_entries_in_requested_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let entries = [entry("a.txt", &["＃主人公", "「やあ」"]), entry("../x", &["no"])];

        let report = export_entries(&entries, dir.path(), TextEncoding::ShiftJis).unwrap();
        assert_eq!(report.written, vec!["a.txt"]);
        assert_eq!(report.failed.len(), 1);

        let bytes = fs::read(dir.path().join("a.txt")).unwrap();
        assert_eq!(&bytes[..2], &[0x81, 0x94]);
        assert_eq!(
            encoding::decode(&bytes, TextEncoding::ShiftJis).unwrap(),
            "＃主人公\n「やあ」\n"
        );
        assert!(!dir.path().join("a.txt.tmp").exists());
    }

    #[test]
    fn unencodable_entry_is_a_per_entry_failure() {
        let dir = tempfile::tempdir().unwrap();
        let report =
            export_entries(&[entry("e.txt", &["😀"])], dir.path(), TextEncoding::ShiftJis)
                .unwrap();
        assert!(report.written.is_empty());
        assert_eq!(report.failed[0].identifier, "e.txt");
    }
}

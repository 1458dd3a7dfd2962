#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    DetectEncoding,
    ParseTranscript,
    ClassifyLine,
    ClassifyLines,
    CheckOrientation,
    ValidatePair,
    ValidateCorpus,
    CleanupFile,
    ExportEntries,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "detect_encoding" | "encoding.detect" => Command::DetectEncoding,
            "parse_transcript" => Command::ParseTranscript,
            "classify_line" => Command::ClassifyLine,
            "classify_lines" => Command::ClassifyLines,
            "check_orientation" => Command::CheckOrientation,
            "validate_pair" => Command::ValidatePair,
            "validate_corpus" => Command::ValidateCorpus,
            "cleanup_file" => Command::CleanupFile,
            "export_entries" => Command::ExportEntries,
            _ => Command::Unknown,
        }
    }
}

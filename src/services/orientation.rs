//! Layout detection on raw Shift_JIS bytes.

/// Shared lead byte of the two vertical-layout line prefixes.
const VERTICAL_LEAD: u8 = 0x81;
/// Trail bytes: fullwidth space (U+3000) and opening corner bracket (U+300C).
const VERTICAL_TRAILS: [u8; 2] = [0x40, 0x75];

/// True iff the buffer has at least one non-empty line and every non-empty line
/// starts with a fullwidth space or `「` in Shift_JIS.
///
/// Lines split on LF; a CR immediately before the LF is not part of the line.
pub fn is_vertical(bytes: &[u8]) -> bool {
    let mut saw_line = false;

    for raw in bytes.split_inclusive(|&b| b == b'\n') {
        let line = match raw.strip_suffix(b"\n") {
            Some(body) => body.strip_suffix(b"\r").unwrap_or(body),
            None => raw,
        };
        if line.is_empty() {
            continue;
        }

        saw_line = true;
        if !has_vertical_prefix(line) {
            return false;
        }
    }

    saw_line
}

fn has_vertical_prefix(line: &[u8]) -> bool {
    matches!(line, [VERTICAL_LEAD, trail, ..] if VERTICAL_TRAILS.contains(trail))
}

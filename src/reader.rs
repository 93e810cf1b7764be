use std::path::Path;

/// Decodes raw file bytes, preferring UTF-8.
///
/// The sales feed is exported by tools with inconsistent encodings, so the
/// reader tries `utf-8`, then `latin-1`/`cp1252`. Latin-1 decoding is total
/// (every byte maps to a code point), so the fallback always succeeds.
#[must_use]
pub fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => encoding_rs::mem::decode_latin1(bytes).into_owned(),
    }
}

/// Splits decoded text into data lines: the first line is a header and is
/// discarded, blank lines are skipped, and each remaining line is trimmed.
#[must_use]
pub fn data_lines(text: &str) -> Vec<String> {
    text.lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Reads the raw data lines of the sales feed at `path`.
///
/// A missing or unreadable file is a recoverable condition: it is logged
/// and an empty list is returned, leaving the early-return decision to the
/// caller.
#[must_use]
pub fn read_sales_data(path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();
    match std::fs::read(path) {
        Ok(bytes) => data_lines(&decode(&bytes)),
        Err(err) => {
            log::error!("Failed to read {}: {}", path.display(), err);
            Vec::new()
        }
    }
}

use std::{borrow::Cow, path::Path};

use csv::{ReaderBuilder, StringRecord};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::debug;

use crate::error::{LoadError, LoadResult};

/// Header and raw records of one csv file, before any typing.
#[derive(Debug)]
pub struct RawFrame {
    pub header: StringRecord,
    pub records: Vec<StringRecord>,
}

impl RawFrame {
    /// Line number of the record at `idx`, falling back to the header-relative
    /// position when the reader did not track one.
    pub fn line_of(&self, idx: usize) -> u64 {
        self.records[idx]
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2)
    }
}

/// Decodes the file contents. A BOM picks the encoding; otherwise UTF-8 is tried
/// first and Windows-1252 is used when the bytes are not valid UTF-8.
pub fn decode_source(bytes: &[u8]) -> Cow<'_, str> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    let body = &bytes[bom_len..];
    if encoding == UTF_8 {
        match std::str::from_utf8(body) {
            Ok(text) => Cow::Borrowed(text),
            Err(_) => {
                debug!("source is not valid utf-8, decoding as windows-1252");
                WINDOWS_1252.decode_without_bom_handling(body).0
            }
        }
    } else {
        encoding.decode_without_bom_handling(body).0
    }
}

/// Gives blank header fields the name `Unnamed: <idx>`, as a pandas index
/// export leaves the first header cell empty.
fn name_columns(header: &StringRecord) -> StringRecord {
    header
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            if name.trim().is_empty() {
                Cow::Owned(format!("Unnamed: {}", idx))
            } else {
                Cow::Borrowed(name)
            }
        })
        .collect()
}

pub fn parse_records(text: &str, delimiter: u8, path: &Path) -> LoadResult<RawFrame> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(text.as_bytes());
    let header = name_columns(rdr.headers().map_err(|e| LoadError::csv(path, e))?);
    let mut records = Vec::new();
    for result in rdr.records() {
        records.push(result.map_err(|e| LoadError::csv(path, e))?);
    }
    Ok(RawFrame { header, records })
}

pub fn read_csv_file(path: &Path, delimiter: u8) -> LoadResult<RawFrame> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::io(path, e))?;
    let text = decode_source(&bytes);
    parse_records(&text, delimiter, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_strips_utf8_bom() {
        let bytes = b"\xEF\xBB\xBFid,name\n1,Monet\n";
        assert_eq!(decode_source(bytes), "id,name\n1,Monet\n");
    }

    #[test]
    fn test_decode_falls_back_to_windows_1252() {
        // "Musée" with a latin-1 e-acute.
        let bytes = b"name\nMus\xE9e\n";
        assert_eq!(decode_source(bytes), "name\nMusée\n");
    }

    #[test]
    fn test_parse_records() {
        let data = "id,name,nationality\n1,Claude Monet,French\n2,\"Vincent van Gogh\",Dutch\n";
        let frame = parse_records(data, b',', Path::new("artist.csv")).unwrap();
        assert_eq!(
            frame.header.iter().collect::<Vec<_>>(),
            vec!["id", "name", "nationality"]
        );
        assert_eq!(frame.records.len(), 2);
        assert_eq!(&frame.records[1][1], "Vincent van Gogh");
        assert_eq!(frame.line_of(1), 3);
    }

    #[test]
    fn test_parse_records_names_blank_headers() {
        let data = ",id,  ,name\n0,1,x,Monet\n";
        let frame = parse_records(data, b',', Path::new("artist.csv")).unwrap();
        assert_eq!(
            frame.header.iter().collect::<Vec<_>>(),
            vec!["Unnamed: 0", "id", "Unnamed: 2", "name"]
        );
    }

    #[test]
    fn test_parse_records_rejects_ragged_rows() {
        let data = "id,name\n1,Monet\n2\n";
        let err = parse_records(data, b',', Path::new("artist.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_csv_file(&dir.path().join("artist.csv"), b',').unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use flate2::read::GzDecoder;
use thiserror::Error;

use crate::utils::validation::check_record_limit;

/// One catalog row: column name -> raw cell text
pub type RawRecord = HashMap<String, String>;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Too many records: {0} exceeds maximum")]
    TooManyRecords(usize),
}

/// Parse a CSV file into raw records.
///
/// Files ending in `.gz` are decompressed first.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read or decompressed, or
/// other parse errors if the content is invalid.
pub fn parse_csv_file(path: &Path) -> Result<Vec<RawRecord>, ParseError> {
    let is_gzip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

    let content = if is_gzip {
        let file = std::fs::File::open(path)?;
        let mut decoder = GzDecoder::new(file);
        let mut content = String::new();
        decoder.read_to_string(&mut content)?;
        content
    } else {
        std::fs::read_to_string(path)?
    };

    let delimiter = if is_tab_separated(path) { b'\t' } else { b',' };
    parse_csv_text(&content, delimiter)
}

/// Tab is the delimiter for `.tsv` and `.tsv.gz`, comma for everything else
fn is_tab_separated(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    name.ends_with(".tsv") || name.ends_with(".tsv.gz")
}

/// Parse delimited text with a header row into raw records.
///
/// Fields may be quoted. A leading byte order mark is ignored, as are blank
/// lines and lines starting with `#`. Header names are trimmed and lowercased;
/// cell values are trimmed. Rows shorter than the header are padded with empty
/// cells.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if there is no header, a header column
/// is blank or repeated, or a row has more fields than the header, or
/// `ParseError::TooManyRecords` if the limit is exceeded.
pub fn parse_csv_text(text: &str, delimiter: u8) -> Result<Vec<RawRecord>, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(text.as_bytes());

    let mut header: Option<Vec<String>> = None;
    let mut records = Vec::new();

    for row in reader.records() {
        let row = row?;
        // Whitespace-only lines come through as a single empty field
        if row.iter().all(str::is_empty) {
            continue;
        }

        let line_num = row.position().map_or(0, csv::Position::line);

        if header.is_none() {
            header = Some(parse_header(&row, line_num)?);
            continue;
        }
        let columns = header.as_deref().unwrap_or_default();

        if row.len() > columns.len() {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has {} fields but the header has {}",
                row.len(),
                columns.len()
            )));
        }

        // Check record limit for DOS protection
        if check_record_limit(records.len()).is_some() {
            return Err(ParseError::TooManyRecords(records.len()));
        }

        let record: RawRecord = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let value = row.get(idx).unwrap_or_default();
                (column.clone(), value.to_string())
            })
            .collect();
        records.push(record);
    }

    if header.is_none() {
        return Err(ParseError::InvalidFormat(
            "No header row found".to_string(),
        ));
    }

    Ok(records)
}

fn parse_header(row: &StringRecord, line_num: u64) -> Result<Vec<String>, ParseError> {
    let mut columns: Vec<String> = Vec::with_capacity(row.len());

    for field in row {
        let column = field.to_lowercase();
        if column.is_empty() {
            return Err(ParseError::InvalidFormat(format!(
                "Header on line {line_num} has a blank column name"
            )));
        }
        if columns.contains(&column) {
            return Err(ParseError::InvalidFormat(format!(
                "Header on line {line_num} repeats column '{column}'"
            )));
        }
        columns.push(column);
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_csv_text() {
        let csv = r"name,start,start_uncertainty,end,end_uncertainty,rank,part_of,source
Holocene,0.0117,,0,,epoch,Quaternary,ICS2020
Jurassic,201.3,0.2,145.0,,period,Mesozoic,ICS2020
";

        let records = parse_csv_text(csv, b',').unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "Holocene");
        assert_eq!(records[0]["start_uncertainty"], "");
        assert_eq!(records[1]["part_of"], "Mesozoic");
    }

    #[test]
    fn test_parse_tsv_text() {
        let tsv = "Name\tStart\tEnd\nEocene\t56.0\t33.9\n";
        let records = parse_csv_text(tsv, b'\t').unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "Eocene");
        assert_eq!(records[0]["end"], "33.9");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let csv = "name,start,end\nHadean,4600\n";
        let records = parse_csv_text(csv, b',').unwrap();
        assert_eq!(records[0]["start"], "4600");
        assert_eq!(records[0]["end"], "");
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let csv = "name,start\nHadean,4600,4000\n";
        let err = parse_csv_text(csv, b',').unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(msg) if msg.contains("Line 2")));
    }

    #[test]
    fn test_comments_before_header() {
        let csv = r"# International Chronostratigraphic Chart
# ages in Ma

name,start
Holocene,0.0117
";
        let records = parse_csv_text(csv, b',').unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "Holocene");
    }

    #[test]
    fn test_header_only_is_empty() {
        let records = parse_csv_text("name,start\n", b',').unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_header_is_error() {
        assert!(matches!(
            parse_csv_text("# nothing here\n\n", b','),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_repeated_header_column() {
        assert!(matches!(
            parse_csv_text("name,start,name\n", b','),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_gzip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intervals.csv.gz");

        let file = std::fs::File::create(&path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        encoder
            .write_all(b"name,start,end\nMiocene,23.03,5.333\n")
            .unwrap();
        encoder.finish().unwrap();

        let records = parse_csv_file(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "Miocene");
    }

    #[test]
    fn test_parse_tsv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intervals.tsv");
        std::fs::write(&path, "name\tstart\nPliocene\t5.333\n").unwrap();

        let records = parse_csv_file(&path).unwrap();
        assert_eq!(records[0]["start"], "5.333");
    }

    #[test]
    fn test_quoted_fields() {
        let csv = "name,start,end\n\"Holocene\",0.0117,\"0\"\n";
        let records = parse_csv_text(csv, b',').unwrap();
        assert_eq!(records[0]["name"], "Holocene");
        assert_eq!(records[0]["end"], "0");
    }

    #[test]
    fn test_quoted_field_with_delimiter() {
        let csv = "name,start,end,source\nMeghalayan,0.0042,0,\"Walker et al., 2018\"\n";
        let records = parse_csv_text(csv, b',').unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["source"], "Walker et al., 2018");
        assert_eq!(records[0]["end"], "0");
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let csv = "\u{feff}name,start\nHolocene,0.0117\n";
        let records = parse_csv_text(csv, b',').unwrap();
        assert_eq!(records[0]["name"], "Holocene");
        assert_eq!(records[0]["start"], "0.0117");
    }

    #[test]
    fn test_whitespace_only_lines_are_skipped() {
        let csv = "name,start\n   \nHolocene,0.0117\n";
        let records = parse_csv_text(csv, b',').unwrap();
        assert_eq!(records.len(), 1);
    }
}

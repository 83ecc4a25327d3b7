// ============================================================
// Layer 4 — CSV Loader
// ============================================================
// Reads the training CSV into an ordered Vec<Row>.
//
// Expected file layout:
//
//   question,context[,any other columns...]
//   "Thời hiệu khởi kiện là bao lâu?","Điều 184. Thời hiệu khởi kiện..."
//   ...
//
// Column order does not matter and extra columns are ignored;
// `question` and `context` are located by header name.
// The csv crate validates UTF-8 on every field, which matters
// here because the corpus is Vietnamese legal text.

use csv::{ReaderBuilder, StringRecord};
use std::{
    fs::File,
    io::Read,
    path::PathBuf,
};

use crate::domain::error::{PrepareError, PrepareResult};
use crate::domain::row::Row;
use crate::domain::traits::RowSource;

pub const QUESTION_COLUMN: &str = "question";
pub const CONTEXT_COLUMN: &str = "context";

/// Loads (question, context) rows from a comma-separated file.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RowSource for CsvLoader {
    fn load_rows(&self) -> PrepareResult<Vec<Row>> {
        if !self.path.exists() {
            return Err(PrepareError::NotFound { path: self.path.clone() });
        }

        let file = File::open(&self.path)?;
        let rows = read_rows(file)?;

        tracing::info!("Loaded {} rows from '{}'", rows.len(), self.path.display());
        Ok(rows)
    }
}

/// Parse CSV text from any reader. Fails on the first bad record:
/// a half-loaded dataset would silently shift every identifier.
pub fn read_rows<R: Read>(input: R) -> PrepareResult<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| PrepareError::malformed(format!("cannot read header row: {e}")))?
        .clone();

    let question_col = column_index(&headers, QUESTION_COLUMN)?;
    let context_col  = column_index(&headers, CONTEXT_COLUMN)?;

    let mut rows = Vec::new();

    for (i, record) in reader.records().enumerate() {
        // Line numbers are 1-based and the header occupies line 1
        let line = i + 2;
        let record = record
            .map_err(|e| PrepareError::malformed(format!("record at line {line}: {e}")))?;

        let field = |col: usize, name: &str| {
            record.get(col).map(str::to_string).ok_or_else(|| {
                PrepareError::malformed(format!("record at line {line} has no '{name}' field"))
            })
        };

        rows.push(Row {
            question: field(question_col, QUESTION_COLUMN)?,
            context:  field(context_col, CONTEXT_COLUMN)?,
        });
    }

    if rows.is_empty() {
        return Err(PrepareError::malformed("input contains no data rows"));
    }

    tracing::debug!("Parsed {} CSV records", rows.len());
    Ok(rows)
}

/// Locate a column by header name, tolerating surrounding
/// whitespace and a UTF-8 byte order mark on the first header.
fn column_index(headers: &StringRecord, name: &str) -> PrepareResult<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{FEFF}').trim() == name)
        .ok_or_else(|| {
            let found: Vec<&str> = headers.iter().collect();
            PrepareError::malformed(format!(
                "required column '{name}' is missing (found: {found:?})"
            ))
        })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_rows_in_file_order() {
        let csv  = "question,context\nQ1,C1\nQ2,C1\nQ3,C2\n";
        let rows = read_rows(csv.as_bytes()).unwrap();

        assert_eq!(
            rows,
            vec![Row::new("Q1", "C1"), Row::new("Q2", "C1"), Row::new("Q3", "C2")]
        );
    }

    #[test]
    fn test_column_order_and_extra_columns() {
        let csv  = "id,context,source,question\n7,C1,law.docx,Q1\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows, vec![Row::new("Q1", "C1")]);
    }

    #[test]
    fn test_quoted_fields_with_commas_and_newlines() {
        let csv  = "question,context\n\"Điều 1, khoản 2?\",\"Dòng một\nDòng hai\"\n";
        let rows = read_rows(csv.as_bytes()).unwrap();

        assert_eq!(rows[0].question, "Điều 1, khoản 2?");
        assert_eq!(rows[0].context, "Dòng một\nDòng hai");
    }

    #[test]
    fn test_byte_order_mark_on_header() {
        let csv  = "\u{FEFF}question,context\nQ,C\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_missing_column_is_malformed() {
        let err = read_rows("question,answer\nQ,A\n".as_bytes()).unwrap_err();
        assert!(matches!(err, PrepareError::MalformedInput { .. }));
        assert!(err.to_string().contains("context"));
    }

    #[test]
    fn test_header_only_is_malformed() {
        let err = read_rows("question,context\n".as_bytes()).unwrap_err();
        assert!(matches!(err, PrepareError::MalformedInput { .. }));
    }

    #[test]
    fn test_empty_file_is_malformed() {
        let err = read_rows("".as_bytes()).unwrap_err();
        assert!(matches!(err, PrepareError::MalformedInput { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let mut bytes = b"question,context\nQ,".to_vec();
        bytes.extend_from_slice(&[0xFF, 0xFE, b'\n']);

        let err = read_rows(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, PrepareError::MalformedInput { .. }));
    }

    #[test]
    fn test_ragged_record_is_malformed() {
        let err = read_rows("question,context\nQ1,C1\nQ2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, PrepareError::MalformedInput { .. }));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let loader = CsvLoader::new("definitely/not/here.csv");
        let err    = loader.load_rows().unwrap_err();
        assert!(matches!(err, PrepareError::NotFound { .. }));
    }

    #[test]
    fn test_loads_from_disk() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "question,context")?;
        writeln!(file, "Hợp đồng là gì?,Hợp đồng là sự thỏa thuận")?;
        file.flush()?;

        let rows = CsvLoader::new(file.path()).load_rows()?;
        assert_eq!(rows, vec![Row::new("Hợp đồng là gì?", "Hợp đồng là sự thỏa thuận")]);
        Ok(())
    }
}

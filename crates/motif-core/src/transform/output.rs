use crate::domain::{MotifError, MotifResult, ResultTable};
use std::fs;
use std::path::Path;

/// Grammar for one program's text report.
pub trait OutputTransformer: Send + Sync {
    fn grammar(&self) -> &'static str;

    fn parse(&self, raw: &str) -> MotifResult<ResultTable>;

    fn parse_file(&self, path: &Path) -> MotifResult<ResultTable> {
        let raw = fs::read_to_string(path).map_err(|source| {
            MotifError::io_system(
                "IO.OUTPUT_READ",
                format!(
                    "failed to read {} output '{}': {}",
                    self.grammar(),
                    path.display(),
                    source
                ),
            )
        })?;
        self.parse(&raw)
    }
}

pub(crate) fn no_records(grammar: &str, raw: &str) -> MotifError {
    MotifError::output_parse(
        "PARSE.NO_RECORDS",
        format!("{} output holds no result records", grammar),
        raw,
    )
}

pub(crate) fn malformed_line(grammar: &str, line_number: usize, line: &str, raw: &str) -> MotifError {
    MotifError::output_parse(
        "PARSE.MALFORMED_RECORD",
        format!(
            "{} output line {} does not match the record grammar: '{}'",
            grammar,
            line_number,
            line.trim_end()
        ),
        raw,
    )
}

/// Rejects an empty table so callers never receive a silent zero-row result.
pub(crate) fn require_rows(grammar: &str, table: ResultTable, raw: &str) -> MotifResult<ResultTable> {
    if table.is_empty() {
        return Err(no_records(grammar, raw));
    }
    tracing::debug!(grammar, rows = table.len(), "parsed counter output");
    Ok(table)
}

use crate::domain::{MotifResult, Record, ResultTable};
use crate::parser::Cursor;
use crate::transform::OutputTransformer;
use crate::transform::output::{malformed_line, no_records, require_rows};

const GRAMMAR: &str = "mfinder";

/// Motif table of mfinder's `_OUT.txt` report.
///
/// Rows follow the `MOTIF ... NREAL` header and read
/// `id nreal mean+-sd zscore pval uniq creal`. Columns use the same names as
/// the NetMODE table where the statistic is the same.
#[derive(Debug, Clone, Copy, Default)]
pub struct MfinderOutput;

impl OutputTransformer for MfinderOutput {
    fn grammar(&self) -> &'static str {
        GRAMMAR
    }

    fn parse(&self, raw: &str) -> MotifResult<ResultTable> {
        let mut lines = raw.lines().enumerate();
        if !lines
            .by_ref()
            .any(|(_, line)| line.contains("MOTIF") && line.contains("NREAL"))
        {
            return Err(no_records(GRAMMAR, raw));
        }

        let mut table = ResultTable::new();
        for (index, line) in lines {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !trimmed.starts_with(|character: char| character.is_ascii_digit()) {
                if table.is_empty() {
                    continue;
                }
                break;
            }
            let record =
                parse_record(trimmed).ok_or_else(|| malformed_line(GRAMMAR, index + 1, line, raw))?;
            table.push(record)?;
        }
        require_rows(GRAMMAR, table, raw)
    }
}

fn parse_record(line: &str) -> Option<Record> {
    let mut cursor = Cursor::new(line);
    let motif_id = cursor.integer()?;
    let nreal = cursor.integer()?;
    let random_mean = cursor.number()?;
    cursor.expect("+-")?;
    let random_sd = cursor.number()?;
    let zscore = cursor.number()?;
    let pvalue = cursor.number()?;
    let uniq = cursor.integer()?;
    let creal = cursor.number()?;
    if !cursor.is_at_end() {
        return None;
    }

    Some(
        Record::new()
            .with("motif_id", motif_id)
            .with("freq", nreal)
            .with("ave_rand_freq", random_mean.as_f64())
            .with("ave_rand_freq_sd", random_sd.as_f64())
            .with("f-ZScore", zscore.as_f64())
            .with("f-pValue", pvalue.as_f64())
            .with("uniq", uniq)
            .with("conc", creal.as_f64()),
    )
}

use crate::common::AdjacencyMatrix;
use crate::domain::{MotifResult, Record, ResultTable};
use crate::parser::{Cursor, Numeric};
use crate::transform::OutputTransformer;
use crate::transform::output::{malformed_line, require_rows};

const GRAMMAR: &str = "NetMODE";
const ADJACENCY_GRAMMAR: &str = "NetMODE adjacency listing";

/// Z-score table NetMODE prints on stdout, one `gID:` line per motif.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetModeOutput;

impl OutputTransformer for NetModeOutput {
    fn grammar(&self) -> &'static str {
        GRAMMAR
    }

    fn parse(&self, raw: &str) -> MotifResult<ResultTable> {
        let mut table = ResultTable::new();
        for (index, line) in raw.lines().enumerate() {
            if !line.trim_start().starts_with("gID") {
                continue;
            }
            let record =
                parse_record(line).ok_or_else(|| malformed_line(GRAMMAR, index + 1, line, raw))?;
            table.push(record)?;
        }
        require_rows(GRAMMAR, table, raw)
    }
}

fn parse_record(line: &str) -> Option<Record> {
    let mut cursor = Cursor::new(line);
    let gid = cursor.labeled_number("gID")?.as_i64()?;
    let freq = cursor.labeled_number("freq")?.as_i64()?;
    let (ave_rand_freq, ave_rand_freq_sd) = cursor.grouped_field("ave_rand_freq")?;
    let conc = cursor.labeled_number("conc")?;
    let (ave_rand_conc, ave_rand_conc_sd) = cursor.grouped_field("ave_rand_conc")?;
    let f_zscore = cursor.labeled_number("f-ZScore")?;
    let f_pvalue = cursor.labeled_number("f-pValue")?;
    let c_zscore = cursor.labeled_number("c-ZScore")?;
    let c_pvalue = cursor.labeled_number("c-pValue")?;
    if !cursor.is_at_end() {
        return None;
    }

    Some(
        Record::new()
            .with("gID", gid)
            .with("freq", freq)
            .with("ave_rand_freq", ave_rand_freq.as_f64())
            .with("ave_rand_freq_sd", ave_rand_freq_sd.as_f64())
            .with("conc", conc.as_f64())
            .with("ave_rand_conc", ave_rand_conc.as_f64())
            .with("ave_rand_conc_sd", ave_rand_conc_sd.as_f64())
            .with("f-ZScore", f_zscore.as_f64())
            .with("f-pValue", f_pvalue.as_f64())
            .with("c-ZScore", c_zscore.as_f64())
            .with("c-pValue", c_pvalue.as_f64()),
    )
}

/// The `adjMat.txt` listing NetMODE writes next to its stdout table.
///
/// Each entry is `graphID = N` followed by the motif's adjacency rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetModeAdjacencyListing;

impl OutputTransformer for NetModeAdjacencyListing {
    fn grammar(&self) -> &'static str {
        ADJACENCY_GRAMMAR
    }

    fn parse(&self, raw: &str) -> MotifResult<ResultTable> {
        let mut table = ResultTable::new();
        let mut lines = raw.lines().enumerate().peekable();
        while let Some((index, line)) = lines.next() {
            if !line.trim_start().starts_with("graphID") {
                continue;
            }
            let malformed = || malformed_line(ADJACENCY_GRAMMAR, index + 1, line, raw);
            let mut cursor = Cursor::new(line);
            let graph_id = cursor
                .expect("graphID")
                .and_then(|_| cursor.expect("="))
                .and_then(|_| cursor.number())
                .and_then(Numeric::as_i64)
                .ok_or_else(malformed)?;

            let mut rows = Vec::new();
            while let Some(&(_, next)) = lines.peek() {
                let candidate = next.trim();
                if candidate.starts_with("graphID") {
                    break;
                }
                if candidate.is_empty() {
                    lines.next();
                    if rows.is_empty() {
                        continue;
                    }
                    break;
                }
                if !candidate.bytes().all(|byte| matches!(byte, b'0' | b'1')) {
                    return Err(malformed());
                }
                rows.push(candidate);
                lines.next();
            }

            let matrix = AdjacencyMatrix::from_rows(&rows).map_err(|_| malformed())?;
            table.push(
                Record::new()
                    .with("graphID", graph_id)
                    .with("motif_id", matrix.motif_id() as i64)
                    .with("motif_size", matrix.size() as i64),
            )?;
        }
        require_rows(ADJACENCY_GRAMMAR, table, raw)
    }
}

use crate::common::AdjacencyMatrix;
use crate::domain::{MotifResult, Record, ResultTable};
use crate::parser::{Cursor, Numeric, split_fields};
use crate::transform::OutputTransformer;
use crate::transform::output::{malformed_line, require_rows};

const GRAMMAR: &str = "fanmod";

/// Result overview of a fanmod CSV report.
///
/// A record starts with `ID,bits,freq%`, optionally followed by
/// `mean%,sd,z,p` when random networks were generated. The remaining rows
/// of the adjacency matrix follow as `,bits` fields, usually one per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanmodOutput;

struct PendingRecord<'a> {
    line_number: usize,
    line: &'a str,
    record: Record,
    adjacency: Vec<&'a str>,
}

impl OutputTransformer for FanmodOutput {
    fn grammar(&self) -> &'static str {
        GRAMMAR
    }

    fn parse(&self, raw: &str) -> MotifResult<ResultTable> {
        let lines = raw.lines().enumerate().collect::<Vec<_>>();
        let start = lines
            .iter()
            .position(|(_, line)| line.trim_start().starts_with("ID,"))
            .map_or(0, |header| header + 1);

        let mut table = ResultTable::new();
        let mut pending: Option<PendingRecord<'_>> = None;
        for &(index, line) in &lines[start..] {
            let trimmed = line.trim();
            let malformed = || malformed_line(GRAMMAR, index + 1, line, raw);
            if let Some(continuation) = trimmed.strip_prefix(',') {
                let current = pending.as_mut().ok_or_else(malformed)?;
                for field in split_fields(continuation, ',') {
                    if field.is_empty() {
                        continue;
                    }
                    current.adjacency.push(bit_field(field).ok_or_else(malformed)?);
                }
                continue;
            }
            if !trimmed.starts_with(|character: char| character.is_ascii_digit()) {
                continue;
            }
            if let Some(previous) = pending.take() {
                finish(previous, &mut table, raw)?;
            }
            let (record, adjacency) = parse_record(trimmed).ok_or_else(malformed)?;
            pending = Some(PendingRecord {
                line_number: index + 1,
                line,
                record,
                adjacency,
            });
        }
        if let Some(last) = pending {
            finish(last, &mut table, raw)?;
        }
        require_rows(GRAMMAR, table, raw)
    }
}

fn parse_record(line: &str) -> Option<(Record, Vec<&str>)> {
    let fields = split_fields(line, ',');
    let mut fields = fields.into_iter().filter(|field| !field.is_empty()).peekable();

    let id = numeric_field(fields.next()?)?.0.as_i64()?;
    let mut adjacency = vec![bit_field(fields.next()?)?];
    let (frequency, frequency_is_percent) = numeric_field(fields.next()?)?;
    if !frequency_is_percent {
        return None;
    }
    let mut record = Record::new()
        .with("ID", id)
        .with("Frequency", frequency.as_f64());

    let has_statistics = fields
        .peek()
        .and_then(|field| numeric_field(field))
        .is_some_and(|(_, is_percent)| is_percent);
    if has_statistics {
        let (mean, _) = numeric_field(fields.next()?)?;
        let (deviation, _) = numeric_field(fields.next()?)?;
        let (zscore, _) = numeric_field(fields.next()?)?;
        let (pvalue, _) = numeric_field(fields.next()?)?;
        record = record
            .with("Mean_Freq", mean.as_f64())
            .with("Standard_Dev", deviation.as_f64())
            .with("Z_Score", zscore.as_f64())
            .with("p_Value", pvalue);
    }

    for field in fields {
        adjacency.push(bit_field(field)?);
    }
    Some((record, adjacency))
}

fn finish(pending: PendingRecord<'_>, table: &mut ResultTable, raw: &str) -> MotifResult<()> {
    if AdjacencyMatrix::from_rows(&pending.adjacency).is_err() {
        return Err(malformed_line(GRAMMAR, pending.line_number, pending.line, raw));
    }
    table.push(pending.record)
}

fn numeric_field(field: &str) -> Option<(Numeric, bool)> {
    let mut cursor = Cursor::new(field);
    let value = cursor.percent_number()?;
    cursor.is_at_end().then_some(value)
}

fn bit_field(field: &str) -> Option<&str> {
    let mut cursor = Cursor::new(field);
    let bits = cursor.bits()?;
    cursor.is_at_end().then_some(bits)
}

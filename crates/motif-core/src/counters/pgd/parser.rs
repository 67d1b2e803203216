use crate::domain::{MotifResult, Record, ResultTable};
use crate::parser::Cursor;
use crate::transform::OutputTransformer;
use crate::transform::output::require_rows;

const GRAMMAR: &str = "pgd";
const BLOCK_DELIMITER: &str =
    "************************************************************";
const SECTION_DIVIDER: &str = "----------------------------------------";

/// pgd graphlet name, motif id and motif size.
const GRAPHLETS: [(&str, i64, i64); 17] = [
    ("total_4_clique", 31710, 4),
    ("total_4_chordcycle", 23390, 4),
    ("total_4_tailed_tris", 4958, 4),
    ("total_4_cycle", 23130, 4),
    ("total_3_star", 30856, 4),
    ("total_4_path", 23112, 4),
    ("total_4_tri", 22796, 4),
    ("total_4_2star", 22536, 4),
    ("total_4_2edge", 18450, 4),
    ("total_4_1edge", 18432, 4),
    ("total_4_indep", 0, 4),
    ("total_3_tris", 238, 3),
    ("total_2_star", 78, 3),
    ("total_3_1edge", 160, 3),
    ("total_3_indep", 0, 3),
    ("total_2_1edge", 60, 2),
    ("total_2_indep", 0, 2),
];

/// Motif id and size for a pgd graphlet counter name.
pub fn graphlet_motif(name: &str) -> Option<(i64, i64)> {
    GRAPHLETS
        .iter()
        .find(|(graphlet, _, _)| *graphlet == name)
        .map(|&(_, motif_id, motif_size)| (motif_id, motif_size))
}

/// Graphlet count section of a pgd report.
///
/// pgd prints several star-delimited blocks. The counts are the first block
/// in which every entry is a known graphlet.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgdOutput;

impl OutputTransformer for PgdOutput {
    fn grammar(&self) -> &'static str {
        GRAMMAR
    }

    fn parse(&self, raw: &str) -> MotifResult<ResultTable> {
        let lines = raw.lines().map(str::trim).collect::<Vec<_>>();
        let delimiters = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| **line == BLOCK_DELIMITER)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        let mut table = ResultTable::new();
        for bounds in delimiters.windows(2) {
            let Some(entries) = graphlet_block(&lines[bounds[0] + 1..bounds[1]]) else {
                continue;
            };
            for (motif_id, motif_size, count) in entries {
                table.push(
                    Record::new()
                        .with("motif_id", motif_id)
                        .with("motif_size", motif_size)
                        .with("count", count),
                )?;
            }
            break;
        }
        require_rows(GRAMMAR, table, raw)
    }
}

fn graphlet_block(lines: &[&str]) -> Option<Vec<(i64, i64, i64)>> {
    let mut entries = Vec::new();
    for line in lines {
        if line.is_empty() || *line == SECTION_DIVIDER {
            continue;
        }
        let (name, count) = line.split_once('=')?;
        let (motif_id, motif_size) = graphlet_motif(name.trim())?;
        let mut cursor = Cursor::new(count);
        let count = cursor.integer()?;
        if !cursor.is_at_end() {
            return None;
        }
        entries.push((motif_id, motif_size, count));
    }
    (!entries.is_empty()).then_some(entries)
}

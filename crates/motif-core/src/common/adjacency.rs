//! Motif identifier codec.
//!
//! A motif on `k` nodes is identified by its `k x k` adjacency matrix read
//! row-major as a binary number of `k * k` digits, most significant first.

use crate::domain::{MotifError, MotifResult};
use std::fmt::{Display, Formatter};

pub const MAX_MOTIF_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdjacencyMatrix {
    size: usize,
    cells: Vec<bool>,
}

impl AdjacencyMatrix {
    pub fn from_motif_id(motif_id: u64, size: usize) -> MotifResult<Self> {
        validate_size(size)?;
        let width = size * size;
        if width < 64 && motif_id >> width != 0 {
            return Err(MotifError::parameter(
                "PARAM.MOTIF_ID_RANGE",
                format!(
                    "motif id {} does not fit a {}x{} adjacency matrix",
                    motif_id, size, size
                ),
            ));
        }
        let cells = (0..width)
            .map(|index| (motif_id >> (width - 1 - index)) & 1 == 1)
            .collect();
        Ok(Self { size, cells })
    }

    /// Decodes a row-major bit string whose length is a perfect square.
    pub fn from_bit_string(bits: &str) -> MotifResult<Self> {
        let width = bits.len();
        let size = (1..=MAX_MOTIF_SIZE)
            .find(|candidate| candidate * candidate == width)
            .ok_or_else(|| {
                MotifError::parameter(
                    "PARAM.ADJACENCY_SHAPE",
                    format!(
                        "bit string '{}' of length {} is not a square matrix of at most {} nodes",
                        bits, width, MAX_MOTIF_SIZE
                    ),
                )
            })?;
        let cells = bits
            .chars()
            .map(|bit| match bit {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(MotifError::parameter(
                    "PARAM.ADJACENCY_BIT",
                    format!("adjacency bit string '{}' holds '{}'", bits, other),
                )),
            })
            .collect::<MotifResult<Vec<_>>>()?;
        Ok(Self { size, cells })
    }

    /// Joins matrix rows such as `["011", "101", "110"]` and decodes them.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> MotifResult<Self> {
        let joined = rows.iter().map(AsRef::as_ref).collect::<String>();
        let matrix = Self::from_bit_string(&joined)?;
        if matrix.size != rows.len() || rows.iter().any(|row| row.as_ref().len() != rows.len()) {
            let listed = rows.iter().map(AsRef::as_ref).collect::<Vec<_>>();
            return Err(MotifError::parameter(
                "PARAM.ADJACENCY_SHAPE",
                format!(
                    "adjacency rows [{}] do not form a square matrix",
                    listed.join(", ")
                ),
            ));
        }
        Ok(matrix)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn motif_id(&self) -> u64 {
        self.cells
            .iter()
            .fold(0_u64, |id, cell| (id << 1) | u64::from(*cell))
    }

    pub fn get(&self, row: usize, column: usize) -> bool {
        row < self.size && column < self.size && self.cells[row * self.size + column]
    }

    pub fn row(&self, row: usize) -> Option<&[bool]> {
        if row >= self.size {
            return None;
        }
        self.cells.get(row * self.size..(row + 1) * self.size)
    }

    pub fn edges(&self) -> Vec<(usize, usize)> {
        (0..self.size)
            .flat_map(|row| (0..self.size).map(move |column| (row, column)))
            .filter(|(row, column)| self.get(*row, *column))
            .collect()
    }

    pub fn to_bit_string(&self) -> String {
        self.cells
            .iter()
            .map(|cell| if *cell { '1' } else { '0' })
            .collect()
    }
}

impl Display for AdjacencyMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in (0..self.size).filter_map(|row| self.row(row)) {
            let line = row
                .iter()
                .map(|cell| if *cell { "1" } else { "0" })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

fn validate_size(size: usize) -> MotifResult<()> {
    if size == 0 || size > MAX_MOTIF_SIZE {
        return Err(MotifError::parameter(
            "PARAM.MOTIF_SIZE",
            format!(
                "motif size {} is outside the supported range 1..={}",
                size, MAX_MOTIF_SIZE
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::AdjacencyMatrix;

    #[test]
    fn triangle_id_decodes_to_symmetric_matrix() {
        let matrix = AdjacencyMatrix::from_motif_id(238, 3).expect("238 should fit k=3");
        assert_eq!(matrix.to_bit_string(), "011101110");
        assert_eq!(matrix.to_string(), "0 1 1\n1 0 1\n1 1 0\n");
        assert_eq!(matrix.edges().len(), 6);
    }

    #[test]
    fn every_three_node_id_round_trips() {
        for motif_id in 0..(1_u64 << 9) {
            let matrix = AdjacencyMatrix::from_motif_id(motif_id, 3).expect("id should fit");
            let decoded = AdjacencyMatrix::from_bit_string(&matrix.to_bit_string())
                .expect("bits should decode");
            assert_eq!(decoded.motif_id(), motif_id);
        }
    }

    #[test]
    fn feed_forward_loop_matches_row_major_encoding() {
        let matrix = AdjacencyMatrix::from_rows(&["011", "001", "000"]).expect("rows should decode");
        assert_eq!(matrix.motif_id(), 0b011_001_000);
        assert!(matrix.get(0, 2));
        assert!(!matrix.get(2, 0));
        assert!(!matrix.get(3, 0));
    }

    #[test]
    fn rows_outside_the_matrix_are_absent() {
        let matrix = AdjacencyMatrix::from_motif_id(238, 3).expect("238 should fit k=3");
        assert_eq!(matrix.row(2), Some(&[true, true, false][..]));
        assert_eq!(matrix.row(3), None);
        assert_eq!(matrix.row(usize::MAX / 2), None);
    }

    #[test]
    fn eight_node_ids_use_the_full_word() {
        let matrix = AdjacencyMatrix::from_motif_id(u64::MAX, 8).expect("k=8 should fit u64");
        assert_eq!(matrix.motif_id(), u64::MAX);
    }

    #[test]
    fn oversized_ids_and_shapes_are_rejected() {
        let error = AdjacencyMatrix::from_motif_id(512, 3).expect_err("512 needs ten bits");
        assert_eq!(error.placeholder(), "PARAM.MOTIF_ID_RANGE");

        let matrix = AdjacencyMatrix::from_bit_string("0110").expect("2x2 is square");
        assert_eq!(matrix.size(), 2);

        let error = AdjacencyMatrix::from_bit_string("01101").expect_err("5 bits is not square");
        assert_eq!(error.placeholder(), "PARAM.ADJACENCY_SHAPE");

        let error = AdjacencyMatrix::from_rows(&["0110", "10"]).expect_err("ragged rows");
        assert_eq!(error.placeholder(), "PARAM.ADJACENCY_SHAPE");

        let error = AdjacencyMatrix::from_motif_id(1, 9).expect_err("k=9 overflows");
        assert_eq!(error.placeholder(), "PARAM.MOTIF_SIZE");
    }
}

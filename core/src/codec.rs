//! Compact pattern encoding: one byte per cell, `row * 3 + col`.
//!
//! Every byte is in `0..=8`, so the encoded form is a plain ASCII string and
//! survives any storage that can hold UTF-8. The empty pattern encodes to the
//! empty string.

use alloc::string::String;

use crate::{Cell, CellSeq, Result};

pub fn pattern_to_string(cells: &[Cell]) -> String {
    let mut out = String::with_capacity(cells.len());
    for cell in cells {
        out.push(cell.index() as char);
    }
    out
}

/// Inverse of [`pattern_to_string`]. Any byte outside `0..=8` (including
/// multi-byte UTF-8 sequences) yields `PatternError::InvalidEncoding`.
pub fn string_to_pattern(encoded: &str) -> Result<CellSeq> {
    let mut cells = CellSeq::new();
    for byte in encoded.bytes() {
        cells.push(Cell::from_index(byte)?);
    }
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PatternError;

    fn cells(indices: &[u8]) -> CellSeq {
        indices
            .iter()
            .map(|&index| Cell::from_index(index).unwrap())
            .collect()
    }

    #[test]
    fn encodes_cells_as_index_bytes() {
        let encoded = pattern_to_string(&cells(&[4, 5]));

        assert_eq!(encoded.as_bytes(), &[4, 5]);
    }

    #[test]
    fn empty_pattern_encodes_to_empty_string() {
        assert_eq!(pattern_to_string(&[]), "");
        assert_eq!(string_to_pattern("").unwrap(), CellSeq::new());
    }

    #[test]
    fn round_trips_every_full_row_major_pattern_prefix() {
        for len in 0..=8 {
            let pattern = cells(&(0..=len).collect::<alloc::vec::Vec<u8>>());
            let decoded = string_to_pattern(&pattern_to_string(&pattern)).unwrap();

            assert_eq!(decoded, pattern);
        }
    }

    #[test]
    fn rejects_bytes_outside_the_grid() {
        let encoded = String::from("\u{9}");

        assert_eq!(string_to_pattern(&encoded), Err(PatternError::InvalidEncoding));
        assert_eq!(string_to_pattern("ä"), Err(PatternError::InvalidEncoding));
    }
}

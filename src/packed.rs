// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! 2-bit packed storage for ternary matrices.
//!
//! Each byte holds 4 weights, least significant pair first:
//!
//! ```text
//! code | weight
//! -----+-------
//! 0b00 |   0
//! 0b01 |  +1
//! 0b10 |  -1
//! 0b11 | invalid
//! ```
//!
//! Rows are padded to a whole byte, so a `rows x cols` matrix takes
//! `rows * cols.div_ceil(4)` bytes. Padding bits are ignored on load.

use crate::error::{checked_len, Result, TernaryError};
use crate::matrix::TernaryMatrix;
use crate::trit::Trit;

const TRITS_PER_BYTE: usize = 4;

/// Number of bytes needed to pack a `rows x cols` matrix.
///
/// # Errors
///
/// Returns `TernaryError::ShapeOverflow` if the byte count overflows `usize`.
pub fn packed_len(rows: usize, cols: usize) -> Result<usize> {
    checked_len(rows, cols.div_ceil(TRITS_PER_BYTE))
}

const fn encode(trit: Trit) -> u8 {
    match trit {
        Trit::Z => 0b00,
        Trit::P => 0b01,
        Trit::N => 0b10,
    }
}

impl TernaryMatrix {
    /// Pack to 2-bit byte format for storage/transmission.
    ///
    /// # Examples
    ///
    /// ```
    /// use trit_matmul::TernaryMatrix;
    ///
    /// let w = TernaryMatrix::from_i8(&[1, -1, 0, 1, -1], 1, 5).unwrap();
    /// assert_eq!(w.to_packed_bytes(), vec![0b01_00_10_01, 0b10]);
    /// ```
    #[must_use]
    pub fn to_packed_bytes(&self) -> Vec<u8> {
        let (rows, cols) = self.shape();
        let packed_cols = cols.div_ceil(TRITS_PER_BYTE);
        let mut bytes = vec![0u8; rows * packed_cols];

        if packed_cols == 0 {
            return bytes;
        }

        for (row, out) in bytes.chunks_exact_mut(packed_cols).enumerate() {
            for (col, &trit) in self.row(row).iter().enumerate() {
                out[col / TRITS_PER_BYTE] |= encode(trit) << ((col % TRITS_PER_BYTE) * 2);
            }
        }

        bytes
    }

    /// Unpack from 2-bit byte format.
    ///
    /// # Errors
    ///
    /// - `TernaryError::InvalidDimension` if `bytes.len()` does not match the shape
    /// - `TernaryError::InvalidWeight` on a `0b11` code; `value` is the raw
    ///   code and `index` the flat weight offset
    pub fn from_packed_bytes(bytes: &[u8], rows: usize, cols: usize) -> Result<Self> {
        let expected = packed_len(rows, cols)?;
        if bytes.len() != expected {
            return Err(TernaryError::InvalidDimension {
                operand: "packed bytes",
                expected,
                actual: bytes.len(),
            });
        }

        let packed_cols = cols.div_ceil(TRITS_PER_BYTE);
        if packed_cols == 0 {
            return TernaryMatrix::from_trits(Vec::new(), rows, cols);
        }

        let mut weights = Vec::with_capacity(checked_len(rows, cols)?);

        // bounded by the input length, not by the declared row count
        for (row, row_bytes) in bytes.chunks_exact(packed_cols).enumerate() {
            for col in 0..cols {
                let code = (row_bytes[col / TRITS_PER_BYTE] >> ((col % TRITS_PER_BYTE) * 2)) & 0b11;
                let trit = match code {
                    0b00 => Trit::Z,
                    0b01 => Trit::P,
                    0b10 => Trit::N,
                    _ => {
                        return Err(TernaryError::InvalidWeight {
                            value: i32::from(code),
                            index: row * cols + col,
                        })
                    }
                };
                weights.push(trit);
            }
        }

        TernaryMatrix::from_trits(weights, rows, cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_len() {
        assert_eq!(packed_len(2, 4).unwrap(), 2);
        assert_eq!(packed_len(2, 5).unwrap(), 4);
        assert_eq!(packed_len(3, 0).unwrap(), 0);
        assert_eq!(packed_len(0, 9).unwrap(), 0);
    }

    #[test]
    fn test_packed_bytes_roundtrip() {
        let values = vec![1i8, 0, -1, 1, -1, 0, 1, -1, 0, 0];
        let w = TernaryMatrix::from_i8(&values, 2, 5).unwrap();

        let bytes = w.to_packed_bytes();
        assert_eq!(bytes.len(), 4);

        let back = TernaryMatrix::from_packed_bytes(&bytes, 2, 5).unwrap();
        assert_eq!(back.to_i8(), values);
    }

    #[test]
    fn test_random_matrix_roundtrip() {
        let w = TernaryMatrix::random(17, 23, 99);
        let back = TernaryMatrix::from_packed_bytes(&w.to_packed_bytes(), 17, 23).unwrap();
        assert_eq!(w, back);
    }

    #[test]
    fn test_rejects_invalid_code() {
        // second weight of row 0 is 0b11
        let bytes = [0b0000_1101u8, 0b0000_0000];
        let err = TernaryMatrix::from_packed_bytes(&bytes, 2, 2).unwrap_err();
        assert!(matches!(
            err,
            TernaryError::InvalidWeight { value: 3, index: 1 }
        ));
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = TernaryMatrix::from_packed_bytes(&[0u8; 3], 2, 5).unwrap_err();
        assert!(matches!(
            err,
            TernaryError::InvalidDimension {
                expected: 4,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_padding_bits_ignored() {
        // cols = 1: only the low pair is a weight
        let w = TernaryMatrix::from_packed_bytes(&[0b1111_1101], 1, 1).unwrap();
        assert_eq!(w.get(0, 0), Trit::P);
    }

    #[test]
    fn test_zero_column_matrix() {
        let w = TernaryMatrix::new(4, 0);
        assert!(w.to_packed_bytes().is_empty());
        let back = TernaryMatrix::from_packed_bytes(&[], 4, 0).unwrap();
        assert_eq!(back.shape(), (4, 0));
    }

    #[test]
    fn test_zero_column_matrix_huge_row_count() {
        let start = std::time::Instant::now();
        let w = TernaryMatrix::from_packed_bytes(&[], 1usize << 40, 0).unwrap();
        assert_eq!(w.shape(), (1usize << 40, 0));
        assert!(w.is_empty());
        assert!(start.elapsed() < std::time::Duration::from_secs(1));

        // the same declared shape with stray bytes is still rejected
        assert!(matches!(
            TernaryMatrix::from_packed_bytes(&[0u8], 1usize << 40, 0),
            Err(TernaryError::InvalidDimension { .. })
        ));
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Dense row-major ternary weight matrix.
//!
//! A [`TernaryMatrix`] of shape `K x N` stores its weights in one contiguous
//! `Vec<Trit>`; element `(k, n)` lives at offset `k * cols + n`. Rows are
//! handed to the kernels as slices so the inner loop walks memory linearly.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{checked_len, Result, TernaryError};
use crate::trit::Trit;

/// A `rows x cols` matrix of ternary weights.
///
/// # Examples
///
/// ```
/// use trit_matmul::{TernaryMatrix, Trit};
///
/// let mut w = TernaryMatrix::new(2, 3);
/// assert_eq!(w.count_nonzero(), 0);
///
/// w.set(1, 2, Trit::N);
/// assert_eq!(w.get(1, 2), Trit::N);
/// assert_eq!(w.row(1), &[Trit::Z, Trit::Z, Trit::N]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTernaryMatrix")]
pub struct TernaryMatrix {
    rows: usize,
    cols: usize,
    weights: Vec<Trit>,
}

/// Unchecked wire form; validated on the way into [`TernaryMatrix`].
#[derive(Deserialize)]
struct RawTernaryMatrix {
    rows: usize,
    cols: usize,
    weights: Vec<i8>,
}

impl TryFrom<RawTernaryMatrix> for TernaryMatrix {
    type Error = TernaryError;

    fn try_from(raw: RawTernaryMatrix) -> Result<Self> {
        TernaryMatrix::from_i8(&raw.weights, raw.rows, raw.cols)
    }
}

impl TernaryMatrix {
    /// Create a zero-filled matrix.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        let len = rows
            .checked_mul(cols)
            .unwrap_or_else(|| panic!("shape {rows}x{cols} overflows usize"));
        Self {
            rows,
            cols,
            weights: vec![Trit::Z; len],
        }
    }

    /// Create a matrix from row-major trits.
    ///
    /// # Errors
    ///
    /// Returns `TernaryError::InvalidDimension` if `weights.len() != rows * cols`.
    pub fn from_trits(weights: Vec<Trit>, rows: usize, cols: usize) -> Result<Self> {
        let expected = checked_len(rows, cols)?;
        if weights.len() != expected {
            return Err(TernaryError::InvalidDimension {
                operand: "weights",
                expected,
                actual: weights.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            weights,
        })
    }

    /// Create a matrix from raw row-major `i8` values.
    ///
    /// This is the entry point for weights coming from outside the crate,
    /// so every value is checked.
    ///
    /// # Errors
    ///
    /// - `TernaryError::InvalidDimension` if `values.len() != rows * cols`
    /// - `TernaryError::InvalidWeight` for the first value outside {-1, 0, +1}
    ///
    /// # Examples
    ///
    /// ```
    /// use trit_matmul::{TernaryError, TernaryMatrix};
    ///
    /// let w = TernaryMatrix::from_i8(&[1, 0, -1, 1], 2, 2).unwrap();
    /// assert_eq!(w.count_nonzero(), 3);
    ///
    /// let err = TernaryMatrix::from_i8(&[1, 0, 2, 1], 2, 2).unwrap_err();
    /// assert!(matches!(err, TernaryError::InvalidWeight { value: 2, index: 2 }));
    /// ```
    pub fn from_i8(values: &[i8], rows: usize, cols: usize) -> Result<Self> {
        let expected = checked_len(rows, cols)?;
        if values.len() != expected {
            return Err(TernaryError::InvalidDimension {
                operand: "weights",
                expected,
                actual: values.len(),
            });
        }

        let weights = values
            .iter()
            .enumerate()
            .map(|(index, &v)| {
                Trit::try_from(v).map_err(|_| TernaryError::InvalidWeight {
                    value: i32::from(v),
                    index,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rows,
            cols,
            weights,
        })
    }

    /// Create a matrix filled from a seeded generator.
    #[must_use]
    pub fn random(rows: usize, cols: usize, seed: u64) -> Self {
        let mut matrix = Self::new(rows, cols);
        matrix.randomize_with_seed(seed);
        matrix
    }

    /// Overwrite every weight with a uniform draw from {-1, 0, +1}.
    ///
    /// Uses a fresh, non-deterministic source on every call. Use
    /// [`randomize_with_seed`](Self::randomize_with_seed) when the result
    /// must be reproducible.
    pub fn randomize(&mut self) {
        self.randomize_with_rng(&mut rand::thread_rng());
    }

    /// Overwrite every weight from a `ChaCha8` stream seeded with `seed`.
    ///
    /// # Examples
    ///
    /// ```
    /// use trit_matmul::TernaryMatrix;
    ///
    /// let mut a = TernaryMatrix::new(8, 8);
    /// let mut b = TernaryMatrix::new(8, 8);
    /// a.randomize_with_seed(42);
    /// b.randomize_with_seed(42);
    /// assert_eq!(a, b);
    /// ```
    pub fn randomize_with_seed(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.randomize_with_rng(&mut rng);
    }

    /// Overwrite every weight using the given generator.
    pub fn randomize_with_rng<R: Rng>(&mut self, rng: &mut R) {
        for w in &mut self.weights {
            *w = Trit::ALL[rng.gen_range(0..3)];
        }
    }

    /// Number of rows (`K`).
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (`N`).
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of weights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True if the matrix holds no weights.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weight at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows` or `col >= cols`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Trit {
        self.weights[self.offset(row, col)]
    }

    /// Set the weight at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows` or `col >= cols`.
    pub fn set(&mut self, row: usize, col: usize, trit: Trit) {
        let idx = self.offset(row, col);
        self.weights[idx] = trit;
    }

    /// Row `row` as a contiguous slice of `cols` weights.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[Trit] {
        assert!(row < self.rows, "row {row} out of bounds for {} rows", self.rows);
        let start = row * self.cols;
        &self.weights[start..start + self.cols]
    }

    /// All weights in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[Trit] {
        &self.weights
    }

    /// All weights as raw `i8` values in row-major order.
    #[must_use]
    pub fn to_i8(&self) -> Vec<i8> {
        self.weights.iter().map(|t| t.value()).collect()
    }

    /// Count non-zero weights.
    #[must_use]
    pub fn count_nonzero(&self) -> usize {
        self.weights.iter().filter(|t| !t.is_zero()).count()
    }

    /// Count `+1` weights.
    #[must_use]
    pub fn count_positive(&self) -> usize {
        self.weights.iter().filter(|t| t.is_positive()).count()
    }

    /// Count `-1` weights.
    #[must_use]
    pub fn count_negative(&self) -> usize {
        self.weights.iter().filter(|t| t.is_negative()).count()
    }

    /// Fraction of zero weights; 0.0 for an empty matrix.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn sparsity(&self) -> f32 {
        if self.weights.is_empty() {
            return 0.0;
        }
        1.0 - self.count_nonzero() as f32 / self.weights.len() as f32
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for shape {}x{}",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }
}

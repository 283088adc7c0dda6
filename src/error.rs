// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Error types for trit-matmul.

use thiserror::Error;

/// Result type alias for trit-matmul operations.
pub type Result<T> = std::result::Result<T, TernaryError>;

/// Errors that can occur while building ternary matrices or running kernels.
#[derive(Debug, Error)]
pub enum TernaryError {
    /// An operand does not match the declared matrix shape.
    #[error("invalid dimension for {operand}: expected {expected}, got {actual}")]
    InvalidDimension {
        /// Which operand failed the check (`"activations"`, `"weight rows"`, ...).
        operand: &'static str,
        /// Extent implied by the declared shape.
        expected: usize,
        /// Extent actually supplied.
        actual: usize,
    },

    /// A raw weight value outside {-1, 0, +1}.
    #[error("invalid ternary weight {value} at index {index} (expected -1, 0, or +1)")]
    InvalidWeight {
        /// The offending raw value (or raw 2-bit code for packed data).
        value: i32,
        /// Flat row-major index of the weight.
        index: usize,
    },

    /// A single value outside {-1, 0, +1}, with no buffer position.
    #[error("invalid trit value {value} (expected -1, 0, or +1)")]
    InvalidTrit {
        /// The offending value.
        value: i32,
    },

    /// `rows * cols` does not fit in `usize`.
    #[error("shape {rows}x{cols} overflows usize")]
    ShapeOverflow {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Non-finite or otherwise unusable floating point input.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error while reading or writing configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Compute `rows * cols`, failing with [`TernaryError::ShapeOverflow`].
pub(crate) fn checked_len(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols)
        .ok_or(TernaryError::ShapeOverflow { rows, cols })
}

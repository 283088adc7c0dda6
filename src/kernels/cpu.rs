// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Scalar CPU kernel.
//!
//! The reference implementation: loops run `m`, then `k`, then `n`, so each
//! activation `A[m,k]` is read once and swept across row `k` of the weights.
//! A zero activation skips that sweep entirely when the sparsity shortcut
//! is on.

use crate::kernels::{check_shapes, MatmulBackend};
use crate::{Result, TernaryMatrix, Trit};

/// Single-threaded reference backend.
#[derive(Debug, Clone)]
pub struct ScalarBackend {
    skip_zero_activations: bool,
}

impl ScalarBackend {
    /// Create a scalar backend.
    ///
    /// # Arguments
    ///
    /// * `skip_zero_activations` - Skip the column sweep for zero activations
    #[must_use]
    pub fn new(skip_zero_activations: bool) -> Self {
        Self {
            skip_zero_activations,
        }
    }

    /// Whether the zero-activation shortcut is on.
    #[must_use]
    pub fn skips_zero_activations(&self) -> bool {
        self.skip_zero_activations
    }
}

impl Default for ScalarBackend {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MatmulBackend for ScalarBackend {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn matmul(
        &self,
        a: &[i8],
        b: &TernaryMatrix,
        m: usize,
        k: usize,
        n: usize,
        c: &mut [i32],
    ) -> Result<()> {
        check_shapes(a, b, m, k, n, c)?;
        tracing::trace!(m, k, n, backend = self.name(), "ternary matmul");

        // an empty C has nothing to write, whatever m is
        if n == 0 {
            return Ok(());
        }

        for (row, c_row) in c.chunks_exact_mut(n).enumerate() {
            accumulate_row(
                &a[row * k..(row + 1) * k],
                b,
                c_row,
                self.skip_zero_activations,
            );
        }

        Ok(())
    }
}

/// Compute one output row: `c_row[n] = Σ_k f(a_row[k], b[k, n])`.
///
/// `c_row` is zeroed first. Shapes are assumed checked by the caller:
/// `a_row.len() == b.rows()` and `c_row.len() == b.cols()`.
#[inline]
pub(crate) fn accumulate_row(a_row: &[i8], b: &TernaryMatrix, c_row: &mut [i32], skip_zero: bool) {
    c_row.fill(0);

    for (k, &a_val) in a_row.iter().enumerate() {
        if skip_zero && a_val == 0 {
            continue;
        }

        let x = i32::from(a_val);
        for (acc, &w) in c_row.iter_mut().zip(b.row(k)) {
            match w {
                Trit::P => *acc += x,
                Trit::N => *acc -= x,
                Trit::Z => {}
            }
        }
    }
}

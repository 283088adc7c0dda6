// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Row-parallel CPU kernel.
//!
//! Each output row `C[m, ..]` depends only on row `m` of `A` and all of `B`,
//! so rows are handed to rayon workers as disjoint `&mut` chunks of `C`.
//! No locking is needed and the integer sums match the scalar kernel
//! exactly.
//!
//! Without the `parallel` feature this backend runs the scalar loop.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::kernels::cpu::accumulate_row;
use crate::kernels::{check_shapes, MatmulBackend};
use crate::{Result, TernaryMatrix};

/// Backend that computes output rows on the rayon thread pool.
#[derive(Debug, Clone)]
pub struct ParallelBackend {
    skip_zero_activations: bool,
}

impl ParallelBackend {
    /// Create a row-parallel backend.
    #[must_use]
    pub fn new(skip_zero_activations: bool) -> Self {
        Self {
            skip_zero_activations,
        }
    }

    /// True if rayon support was compiled in.
    #[must_use]
    pub const fn is_parallel(&self) -> bool {
        cfg!(feature = "parallel")
    }
}

impl Default for ParallelBackend {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MatmulBackend for ParallelBackend {
    fn name(&self) -> &'static str {
        if self.is_parallel() {
            "parallel"
        } else {
            "scalar"
        }
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

        // chunks of size 0 are not allowed; an empty C has nothing to write
        if n == 0 {
            return Ok(());
        }

        let skip = self.skip_zero_activations;

        #[cfg(feature = "parallel")]
        c.par_chunks_mut(n).enumerate().for_each(|(row, c_row)| {
            accumulate_row(&a[row * k..(row + 1) * k], b, c_row, skip);
        });

        #[cfg(not(feature = "parallel"))]
        for (row, c_row) in c.chunks_mut(n).enumerate() {
            accumulate_row(&a[row * k..(row + 1) * k], b, c_row, skip);
        }

        Ok(())
    }
}

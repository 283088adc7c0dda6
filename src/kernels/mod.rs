// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Ternary matrix multiply kernels.
//!
//! Computes `C = A · B` where `A` is an `M x K` buffer of INT8 activations,
//! `B` is a `K x N` [`TernaryMatrix`] and `C` is an `M x N` buffer of `i32`
//! accumulators. Every contribution is an add, a subtract or a skip; the
//! kernels never multiply.
//!
//! # Architecture
//!
//! ```text
//! +-------------------+
//! |   MatmulBackend   |  <- Trait shared by all kernels
//! +-------------------+
//!          |
//!    +-----+------+
//!    |            |
//!    v            v
//! +--------+  +----------+
//! | Scalar |  | Parallel |
//! +--------+  +----------+
//!    \            /
//!     v          v
//!   accumulate_row (one output row)
//! ```
//!
//! Both backends share one row kernel, so their results are bit-identical.
//!
//! # Usage
//!
//! ```rust
//! use trit_matmul::{ternary_matmul, TernaryMatrix};
//!
//! // A = [3, -2], B = [[+1], [-1]]
//! let b = TernaryMatrix::from_i8(&[1, -1], 2, 1).unwrap();
//! let mut c = [0i32; 1];
//! ternary_matmul(&[3, -2], &b, 1, 2, 1, &mut c).unwrap();
//! assert_eq!(c, [5]);
//! ```

pub mod cpu;
pub mod parallel;

use crate::config::{BackendPreference, KernelConfig};
use crate::error::{checked_len, Result, TernaryError};
use crate::matrix::TernaryMatrix;

pub use cpu::ScalarBackend;
pub use parallel::ParallelBackend;

/// Backend-agnostic trait for the ternary matrix multiply.
///
/// # Contract
///
/// Implementations must check every shape with [`check_shapes`] before
/// writing to `c`, reset all of `c` to zero, and produce
/// `C[m,n] = Σ_k f(A[m,k], B[k,n])` with `f` adding on `+1`, subtracting on
/// `-1` and skipping on `0`.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across threads.
pub trait MatmulBackend: Send + Sync {
    /// Returns the backend name for debugging/logging.
    fn name(&self) -> &'static str;

    /// Compute `c = a · b` for an `m x k` activation buffer.
    ///
    /// # Errors
    ///
    /// Returns `TernaryError::InvalidDimension` (or `ShapeOverflow`) when
    /// `a`, `b` or `c` disagree with `m`, `k`, `n`. `c` is untouched then.
    fn matmul(
        &self,
        a: &[i8],
        b: &TernaryMatrix,
        m: usize,
        k: usize,
        n: usize,
        c: &mut [i32],
    ) -> Result<()>;
}

/// Dynamic backend dispatcher.
///
/// Wraps any `MatmulBackend` implementation for dynamic dispatch.
pub struct DynamicBackend {
    inner: Box<dyn MatmulBackend>,
}

impl DynamicBackend {
    /// Create a new dynamic backend from a concrete implementation.
    pub fn new<B: MatmulBackend + 'static>(backend: B) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    /// Get the underlying backend reference.
    #[must_use]
    pub fn inner(&self) -> &dyn MatmulBackend {
        &*self.inner
    }
}

impl std::fmt::Debug for DynamicBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicBackend")
            .field("name", &self.inner.name())
            .finish()
    }
}

impl MatmulBackend for DynamicBackend {
    fn name(&self) -> &'static str {
        self.inner.name()
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
        self.inner.matmul(a, b, m, k, n, c)
    }
}

/// Get the backend named by the configuration.
///
/// `Auto` resolves to the parallel backend; use [`get_backend_for_size`]
/// to take the problem height into account.
#[must_use]
pub fn get_backend(config: &KernelConfig) -> DynamicBackend {
    let skip = config.skip_zero_activations;
    let backend = match config.backend {
        BackendPreference::Scalar => DynamicBackend::new(ScalarBackend::new(skip)),
        BackendPreference::Parallel | BackendPreference::Auto => {
            DynamicBackend::new(ParallelBackend::new(skip))
        }
    };
    tracing::debug!(
        preference = ?config.backend,
        backend = backend.name(),
        "selected matmul backend"
    );
    backend
}

/// Get a backend appropriate for an `m`-row problem.
///
/// With `Auto`, problems shorter than `parallel_threshold` rows stay on the
/// scalar kernel.
#[must_use]
pub fn get_backend_for_size(config: &KernelConfig, m: usize) -> DynamicBackend {
    if config.backend == BackendPreference::Auto && m < config.parallel_threshold {
        return DynamicBackend::new(ScalarBackend::new(config.skip_zero_activations));
    }

    get_backend(config)
}

/// Check every operand against the declared `m x k` and `k x n` shapes.
///
/// # Errors
///
/// Returns `TernaryError::InvalidDimension` naming the first operand that
/// disagrees, or `TernaryError::ShapeOverflow` if a product overflows.
pub fn check_shapes(
    a: &[i8],
    b: &TernaryMatrix,
    m: usize,
    k: usize,
    n: usize,
    c: &[i32],
) -> Result<()> {
    let checks = [
        ("activations", checked_len(m, k)?, a.len()),
        ("weight rows", k, b.rows()),
        ("weight cols", n, b.cols()),
        ("output", checked_len(m, n)?, c.len()),
    ];

    for (operand, expected, actual) in checks {
        if expected != actual {
            tracing::debug!(operand, expected, actual, "rejecting matmul operands");
            return Err(TernaryError::InvalidDimension {
                operand,
                expected,
                actual,
            });
        }
    }

    Ok(())
}

/// Compute `c = a · b` with the scalar reference kernel.
///
/// `c` is reset to zero first; its previous contents never leak into the
/// result.
///
/// # Errors
///
/// Returns `TernaryError::InvalidDimension` if `a.len() != m*k`,
/// `b` is not `k x n`, or `c.len() != m*n`.
pub fn ternary_matmul(
    a: &[i8],
    b: &TernaryMatrix,
    m: usize,
    k: usize,
    n: usize,
    c: &mut [i32],
) -> Result<()> {
    ScalarBackend::default().matmul(a, b, m, k, n, c)
}

/// Compute `c = a · b` with the backend chosen by `config`.
///
/// # Errors
///
/// Same as [`ternary_matmul`].
pub fn ternary_matmul_with(
    config: &KernelConfig,
    a: &[i8],
    b: &TernaryMatrix,
    m: usize,
    k: usize,
    n: usize,
    c: &mut [i32],
) -> Result<()> {
    get_backend_for_size(config, m).matmul(a, b, m, k, n, c)
}

/// Compute `a · b` into a freshly allocated `m x n` buffer.
///
/// # Errors
///
/// Same as [`ternary_matmul`].
pub fn ternary_matmul_alloc(
    a: &[i8],
    b: &TernaryMatrix,
    m: usize,
    k: usize,
    n: usize,
) -> Result<Vec<i32>> {
    let mut c = vec![0i32; checked_len(m, n)?];
    ternary_matmul(a, b, m, k, n, &mut c)?;
    Ok(c)
}

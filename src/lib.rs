// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Multiplication-free INT8 x ternary matrix multiply.
//!
//! This crate computes `C = A · B` where `A` holds quantized 8-bit
//! activations, `B` holds weights restricted to {-1, 0, +1} and `C`
//! accumulates in `i32`. Every contribution to an output cell is an add, a
//! subtract or a skip: the compute primitive behind BitNet b1.58 style
//! inference.
//!
//! # Features
//!
//! - **Core Types**: [`Trit`], [`TernaryMatrix`] (dense, row-major)
//! - **Kernels**: scalar reference and row-parallel backends behind [`MatmulBackend`]
//! - **Sparsity Shortcut**: zero activations skip their whole weight row
//! - **Packed Storage**: 2 bits per weight for loading and saving
//! - **Quantization**: AbsMax INT8 activations, AbsMean ternary weights, [`BitLinear`]
//!
//! # Quick Start
//!
//! ```rust
//! use trit_matmul::{ternary_matmul, TernaryMatrix};
//!
//! // B is K x N = 2 x 2
//! let b = TernaryMatrix::from_i8(&[1, -1, 0, 1], 2, 2).unwrap();
//!
//! // A is M x K = 1 x 2
//! let a = [2i8, 3];
//! let mut c = [0i32; 2];
//!
//! ternary_matmul(&a, &b, 1, 2, 2, &mut c).unwrap();
//! assert_eq!(c, [2, -2 + 3]);
//! ```
//!
//! # Layout
//!
//! All buffers are flat and row-major:
//!
//! ```text
//! A[m, k] = a[m * K + k]      (M x K, i8)
//! B[k, n] = b.row(k)[n]       (K x N, Trit)
//! C[m, n] = c[m * N + n]      (M x N, i32)
//! ```
//!
//! # Feature Flags
//!
//! - `default`: `parallel`
//! - `parallel`: row-parallel kernel via rayon

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::many_single_char_names)] // m, k, n, a, b, c

pub mod config;
mod error;
pub mod kernels;
mod layer;
mod matrix;
mod packed;
pub mod quantize;
mod trit;

pub use config::{BackendPreference, DemoConfig, KernelConfig};
pub use error::{Result, TernaryError};
pub use kernels::{
    check_shapes, get_backend, get_backend_for_size, ternary_matmul, ternary_matmul_alloc,
    ternary_matmul_with, DynamicBackend, MatmulBackend, ParallelBackend, ScalarBackend,
};
pub use layer::BitLinear;
pub use matrix::TernaryMatrix;
pub use packed::packed_len;
pub use quantize::{QuantizedActivations, QuantizedWeights};
pub use trit::Trit;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use trit_matmul::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{BackendPreference, KernelConfig};
    pub use crate::kernels::{
        get_backend, ternary_matmul, ternary_matmul_alloc, MatmulBackend,
    };
    pub use crate::layer::BitLinear;
    pub use crate::matrix::TernaryMatrix;
    pub use crate::trit::Trit;
    pub use crate::{Result, TernaryError};
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! BitNet b1.58 quantization.
//!
//! ## Activation Quantization (AbsMax, per row)
//!
//! ```text
//! gamma = max(|x|)             (at least eps)
//! x_q   = round(x * 127 / gamma) clamped to [-128, 127]
//! x     ≈ x_q * gamma / 127
//! ```
//!
//! ## Weight Quantization (AbsMean, per tensor)
//!
//! ```text
//! gamma = mean(|W|)            (at least eps)
//! W_q   = round(W / gamma) clamped to {-1, 0, +1}
//! W     ≈ W_q * gamma
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{checked_len, Result, TernaryError};
use crate::matrix::TernaryMatrix;
use crate::trit::Trit;

/// Largest magnitude of the INT8 grid used for scaling.
pub const INT8_MAX: f32 = 127.0;

/// Default epsilon floor for scale computation.
pub const DEFAULT_EPS: f32 = 1e-6;

/// INT8 activations with per-row scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizedActivations {
    /// Quantized values, row-major `rows x cols`.
    pub data: Vec<i8>,
    /// One scale per row: `x ≈ q * scale`.
    pub scales: Vec<f32>,
    /// Number of rows (tokens).
    pub rows: usize,
    /// Number of columns (features).
    pub cols: usize,
}

impl QuantizedActivations {
    /// Row `row` of quantized values.
    #[must_use]
    pub fn row(&self, row: usize) -> &[i8] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }
}

/// Ternary weights with a single AbsMean scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizedWeights {
    /// Ternary values.
    pub matrix: TernaryMatrix,
    /// Tensor scale: `w ≈ trit * scale`.
    pub scale: f32,
}

impl QuantizedWeights {
    /// Dequantize back to `f32`, row-major.
    #[must_use]
    pub fn dequantize(&self) -> Vec<f32> {
        self.matrix
            .as_slice()
            .iter()
            .map(|&t| f32::from(t.value()) * self.scale)
            .collect()
    }
}

fn check_eps(eps: f32) -> Result<()> {
    if eps.is_finite() && eps > 0.0 {
        Ok(())
    } else {
        Err(TernaryError::InvalidConfig(format!("eps must be > 0, got {eps}")))
    }
}

fn check_input(values: &[f32], rows: usize, cols: usize, operand: &'static str) -> Result<()> {
    let expected = checked_len(rows, cols)?;
    if values.len() != expected {
        return Err(TernaryError::InvalidDimension {
            operand,
            expected,
            actual: values.len(),
        });
    }
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(TernaryError::InvalidValue(format!(
            "non-finite {operand} value {} at index {i}",
            values[i]
        )));
    }
    Ok(())
}

/// Quantize activations to INT8 using per-row AbsMax scaling.
///
/// # Errors
///
/// - `TernaryError::InvalidDimension` if `x.len() != rows * cols`
/// - `TernaryError::InvalidValue` on NaN or infinite input
/// - `TernaryError::InvalidConfig` if `eps <= 0`
///
/// # Examples
///
/// ```
/// use trit_matmul::quantize::quantize_activations;
///
/// let q = quantize_activations(&[0.5, -1.0, 0.25], 1, 3, 1e-6).unwrap();
/// assert_eq!(q.data, vec![64, -127, 32]);
/// assert!((q.scales[0] - 1.0 / 127.0).abs() < 1e-9);
/// ```
pub fn quantize_activations(
    x: &[f32],
    rows: usize,
    cols: usize,
    eps: f32,
) -> Result<QuantizedActivations> {
    check_eps(eps)?;
    check_input(x, rows, cols, "activations")?;

    let mut data = Vec::with_capacity(x.len());
    let mut scales = Vec::with_capacity(rows);

    // rows * cols == 0 is possible with rows > 0; chunks_exact needs cols > 0
    if cols == 0 {
        scales.resize(rows, eps / INT8_MAX);
    } else {
        for row in x.chunks_exact(cols) {
            let gamma = row.iter().map(|v| v.abs()).fold(0.0f32, f32::max).max(eps);
            let inv = INT8_MAX / gamma;
            data.extend(
                row.iter()
                    .map(|&v| (v * inv).round().clamp(-128.0, INT8_MAX) as i8),
            );
            scales.push(gamma / INT8_MAX);
        }
    }

    Ok(QuantizedActivations {
        data,
        scales,
        rows,
        cols,
    })
}

/// Dequantize INT8 activations back to `f32`, row-major.
#[must_use]
pub fn dequantize_activations(q: &QuantizedActivations) -> Vec<f32> {
    let mut out = Vec::with_capacity(q.data.len());
    for (row, &scale) in q.scales.iter().enumerate() {
        out.extend(q.row(row).iter().map(|&v| f32::from(v) * scale));
    }
    out
}

/// Quantize a `rows x cols` weight matrix to ternary using AbsMean scaling.
///
/// # Errors
///
/// - `TernaryError::InvalidDimension` if `w.len() != rows * cols`
/// - `TernaryError::InvalidValue` on NaN or infinite input
/// - `TernaryError::InvalidConfig` if `eps <= 0`
///
/// # Examples
///
/// ```
/// use trit_matmul::quantize::quantize_weights_absmean;
///
/// // mean(|w|) = 0.5
/// let q = quantize_weights_absmean(&[0.9, -0.6, 0.1, -0.4], 2, 2, 1e-6).unwrap();
/// assert_eq!(q.matrix.to_i8(), vec![1, -1, 0, -1]);
/// assert!((q.scale - 0.5).abs() < 1e-6);
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn quantize_weights_absmean(
    w: &[f32],
    rows: usize,
    cols: usize,
    eps: f32,
) -> Result<QuantizedWeights> {
    check_eps(eps)?;
    check_input(w, rows, cols, "weights")?;

    let gamma = if w.is_empty() {
        eps
    } else {
        (w.iter().map(|v| v.abs()).sum::<f32>() / w.len() as f32).max(eps)
    };

    let trits = w
        .iter()
        .map(|&v| match (v / gamma).round().clamp(-1.0, 1.0) {
            q if q > 0.0 => Trit::P,
            q if q < 0.0 => Trit::N,
            _ => Trit::Z,
        })
        .collect();

    Ok(QuantizedWeights {
        matrix: TernaryMatrix::from_trits(trits, rows, cols)?,
        scale: gamma,
    })
}

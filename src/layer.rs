// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! BitLinear layer: a linear layer with ternary weights and INT8 activations.

use crate::config::KernelConfig;
use crate::error::{checked_len, Result, TernaryError};
use crate::kernels::ternary_matmul_with;
use crate::packed::packed_len;
use crate::quantize::{
    quantize_activations, quantize_weights_absmean, QuantizedWeights, DEFAULT_EPS,
};

/// BitLinear layer with ternary weights and INT8 activations.
///
/// Weights are stored `[in_features, out_features]` row-major, the `K x N`
/// layout the kernels consume. A forward pass:
///
/// 1. quantizes each input row with AbsMax to INT8,
/// 2. runs the multiplication-free ternary matmul into `i32`,
/// 3. rescales by `act_scale[row] * weight_scale`.
///
/// # Example
///
/// ```
/// use trit_matmul::BitLinear;
///
/// // 2 inputs -> 1 output, weights [[1.0], [-1.0]]
/// let layer = BitLinear::from_weight(&[1.0, -1.0], 2, 1).unwrap();
/// let y = layer.forward(&[3.0, 1.0], 1).unwrap();
/// assert!((y[0] - 2.0).abs() < 0.05);
/// ```
#[derive(Debug, Clone)]
pub struct BitLinear {
    weight: QuantizedWeights,
    eps: f32,
    kernel: KernelConfig,
}

impl BitLinear {
    /// Create a layer by AbsMean-quantizing `[in_features, out_features]` weights.
    ///
    /// # Errors
    ///
    /// Returns error if `weight` has the wrong length or non-finite values.
    pub fn from_weight(weight: &[f32], in_features: usize, out_features: usize) -> Result<Self> {
        let weight = quantize_weights_absmean(weight, in_features, out_features, DEFAULT_EPS)?;
        Ok(Self::from_quantized(weight))
    }

    /// Create a layer from already-quantized weights.
    #[must_use]
    pub fn from_quantized(weight: QuantizedWeights) -> Self {
        Self {
            weight,
            eps: DEFAULT_EPS,
            kernel: KernelConfig::default(),
        }
    }

    /// Set the epsilon used for activation scaling.
    ///
    /// # Errors
    ///
    /// Returns error if `eps` is not a positive finite number.
    pub fn with_eps(mut self, eps: f32) -> Result<Self> {
        if !(eps.is_finite() && eps > 0.0) {
            return Err(TernaryError::InvalidConfig(format!(
                "eps must be > 0, got {eps}"
            )));
        }
        self.eps = eps;
        Ok(self)
    }

    /// Set the kernel configuration used by [`forward`](Self::forward).
    #[must_use]
    pub fn with_kernel_config(mut self, kernel: KernelConfig) -> Self {
        self.kernel = kernel;
        self
    }

    /// Input dimension (`K`).
    #[must_use]
    pub fn in_features(&self) -> usize {
        self.weight.matrix.rows()
    }

    /// Output dimension (`N`).
    #[must_use]
    pub fn out_features(&self) -> usize {
        self.weight.matrix.cols()
    }

    /// Quantized weights.
    #[must_use]
    pub fn weight(&self) -> &QuantizedWeights {
        &self.weight
    }

    /// Fraction of zero weights.
    #[must_use]
    pub fn sparsity(&self) -> f32 {
        self.weight.matrix.sparsity()
    }

    /// `f32` weight bytes over packed weight bytes plus the scale.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compression_ratio(&self) -> f32 {
        let (rows, cols) = self.weight.matrix.shape();
        let dense = rows * cols * std::mem::size_of::<f32>();
        let packed = packed_len(rows, cols).unwrap_or(usize::MAX) + std::mem::size_of::<f32>();
        dense as f32 / packed as f32
    }

    /// Run the layer on `batch` rows of `in_features` inputs.
    ///
    /// Returns `batch x out_features` outputs, row-major.
    ///
    /// # Errors
    ///
    /// Returns error if `x.len() != batch * in_features` or `x` holds
    /// non-finite values.
    #[allow(clippy::cast_precision_loss)]
    pub fn forward(&self, x: &[f32], batch: usize) -> Result<Vec<f32>> {
        let (k, n) = self.weight.matrix.shape();
        let q = quantize_activations(x, batch, k, self.eps)?;

        let mut acc = vec![0i32; checked_len(batch, n)?];
        ternary_matmul_with(&self.kernel, &q.data, &self.weight.matrix, batch, k, n, &mut acc)?;

        let mut out = Vec::with_capacity(acc.len());
        if n > 0 {
            for (row, &act_scale) in acc.chunks_exact(n).zip(&q.scales) {
                let scale = act_scale * self.weight.scale;
                out.extend(row.iter().map(|&v| v as f32 * scale));
            }
        }
        Ok(out)
    }
}

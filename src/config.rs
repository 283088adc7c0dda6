// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Kernel and demo configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TernaryError};

/// Backend preference for kernel execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendPreference {
    /// Parallel for tall problems, scalar otherwise.
    #[default]
    Auto,
    /// Single-threaded reference kernel.
    Scalar,
    /// Row-parallel kernel (falls back to scalar without the `parallel` feature).
    Parallel,
}

/// Configuration for the ternary matmul kernels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Preferred backend.
    pub backend: BackendPreference,

    /// Skip the inner column loop when an activation is zero.
    /// Does not change results.
    pub skip_zero_activations: bool,

    /// Minimum number of output rows (`M`) before `Auto` goes parallel.
    pub parallel_threshold: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            backend: BackendPreference::Auto,
            skip_zero_activations: true,
            parallel_threshold: 16,
        }
    }
}

impl KernelConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the scalar reference kernel.
    #[must_use]
    pub fn scalar() -> Self {
        Self {
            backend: BackendPreference::Scalar,
            ..Default::default()
        }
    }

    /// Force the row-parallel kernel.
    #[must_use]
    pub fn parallel() -> Self {
        Self {
            backend: BackendPreference::Parallel,
            ..Default::default()
        }
    }

    /// Set the backend preference.
    #[must_use]
    pub const fn with_backend(mut self, backend: BackendPreference) -> Self {
        self.backend = backend;
        self
    }

    /// Enable or disable the zero-activation shortcut.
    #[must_use]
    pub const fn with_skip_zero_activations(mut self, enabled: bool) -> Self {
        self.skip_zero_activations = enabled;
        self
    }

    /// Set the row threshold for automatic parallel dispatch.
    #[must_use]
    pub const fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if `parallel_threshold` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.parallel_threshold == 0 {
            return Err(TernaryError::InvalidConfig(
                "parallel_threshold must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the `trit-matmul run` demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Activation rows (batch / tokens).
    pub m: usize,
    /// Input dimension.
    pub k: usize,
    /// Output dimension.
    pub n: usize,
    /// Seed for weight generation; unseeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Kernel settings.
    #[serde(default)]
    pub kernel: KernelConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            m: 1,
            k: 256,
            n: 256,
            seed: None,
            kernel: KernelConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the write fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the shape overflows or the kernel config is invalid.
    pub fn validate(&self) -> Result<()> {
        crate::error::checked_len(self.m, self.k)?;
        crate::error::checked_len(self.k, self.n)?;
        crate::error::checked_len(self.m, self.n)?;
        self.kernel.validate()
    }
}

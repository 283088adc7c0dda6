// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Ternary weight values {-1, 0, +1}.
//!
//! A [`Trit`] is the only thing a ternary weight matrix stores:
//! - `N` (Negative): the activation is subtracted
//! - `Z` (Zero): the activation is skipped
//! - `P` (Positive): the activation is added

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;

use crate::error::{Result, TernaryError};

/// A ternary weight with values {-1, 0, +1}.
///
/// | Variant | Symbol | Value |
/// |---------|--------|-------|
/// | `N`     | `-`    | -1    |
/// | `Z`     | `0`    |  0    |
/// | `P`     | `+`    | +1    |
///
/// # Examples
///
/// ```
/// use trit_matmul::Trit;
///
/// assert_eq!(Trit::N.value(), -1);
/// assert_eq!(Trit::Z.value(), 0);
/// assert_eq!(Trit::P.value(), 1);
/// assert_eq!(Trit::P.apply(-7), -7);
/// assert_eq!(Trit::N.apply(-7), 7);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
#[repr(i8)]
pub enum Trit {
    /// Negative weight (-1).
    N = -1,
    /// Zero weight (0).
    #[default]
    Z = 0,
    /// Positive weight (+1).
    P = 1,
}

impl Trit {
    /// All three values, in ascending order.
    pub const ALL: [Trit; 3] = [Trit::N, Trit::Z, Trit::P];

    /// Create a trit from an integer value.
    ///
    /// # Errors
    ///
    /// Returns `TernaryError::InvalidTrit` if value is not -1, 0, or +1.
    /// Loaders that convert whole buffers report `InvalidWeight` with the
    /// flat index instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use trit_matmul::Trit;
    ///
    /// assert_eq!(Trit::from_value(-1).unwrap(), Trit::N);
    /// assert!(Trit::from_value(2).is_err());
    /// ```
    pub const fn from_value(value: i32) -> Result<Self> {
        match value {
            -1 => Ok(Trit::N),
            0 => Ok(Trit::Z),
            1 => Ok(Trit::P),
            _ => Err(TernaryError::InvalidTrit { value }),
        }
    }

    /// Get the integer value of the trit.
    #[must_use]
    pub const fn value(self) -> i8 {
        self as i8
    }

    /// Check if the trit is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        matches!(self, Trit::Z)
    }

    /// Check if the trit is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(self, Trit::P)
    }

    /// Check if the trit is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        matches!(self, Trit::N)
    }

    /// Contribution of activation `x` under this weight, without multiplying.
    #[inline]
    #[must_use]
    pub const fn apply(self, x: i32) -> i32 {
        match self {
            Trit::P => x,
            Trit::N => -x,
            Trit::Z => 0,
        }
    }
}

impl Neg for Trit {
    type Output = Trit;

    fn neg(self) -> Self::Output {
        match self {
            Trit::N => Trit::P,
            Trit::Z => Trit::Z,
            Trit::P => Trit::N,
        }
    }
}

impl fmt::Display for Trit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trit::N => write!(f, "-"),
            Trit::Z => write!(f, "0"),
            Trit::P => write!(f, "+"),
        }
    }
}

impl TryFrom<i8> for Trit {
    type Error = TernaryError;

    fn try_from(value: i8) -> Result<Self> {
        Trit::from_value(i32::from(value))
    }
}

impl TryFrom<i32> for Trit {
    type Error = TernaryError;

    fn try_from(value: i32) -> Result<Self> {
        Trit::from_value(value)
    }
}

impl From<Trit> for i8 {
    fn from(trit: Trit) -> Self {
        trit.value()
    }
}

impl From<Trit> for i32 {
    fn from(trit: Trit) -> Self {
        i32::from(trit.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trit_from_value() {
        assert_eq!(Trit::from_value(-1).unwrap(), Trit::N);
        assert_eq!(Trit::from_value(0).unwrap(), Trit::Z);
        assert_eq!(Trit::from_value(1).unwrap(), Trit::P);
        assert!(matches!(
            Trit::from_value(2),
            Err(TernaryError::InvalidTrit { value: 2 })
        ));
        assert!(matches!(
            Trit::try_from(-2i8),
            Err(TernaryError::InvalidTrit { value: -2 })
        ));
        assert!(matches!(
            Trit::try_from(i8::MIN),
            Err(TernaryError::InvalidTrit { value: -128 })
        ));
    }

    #[test]
    fn test_trit_default_is_zero() {
        assert_eq!(Trit::default(), Trit::Z);
    }

    #[test]
    fn test_trit_apply() {
        for x in [-128, -1, 0, 1, 127] {
            assert_eq!(Trit::P.apply(x), x);
            assert_eq!(Trit::N.apply(x), -x);
            assert_eq!(Trit::Z.apply(x), 0);
        }
    }

    #[test]
    fn test_trit_negation() {
        assert_eq!(-Trit::N, Trit::P);
        assert_eq!(-Trit::Z, Trit::Z);
        assert_eq!(-Trit::P, Trit::N);
    }

    #[test]
    fn test_trit_display() {
        let s: String = Trit::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(s, "-0+");
    }

    #[test]
    fn test_trit_serde_uses_integers() {
        let yaml = serde_yaml::to_string(&vec![Trit::N, Trit::Z, Trit::P]).unwrap();
        let back: Vec<Trit> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, vec![Trit::N, Trit::Z, Trit::P]);

        assert!(serde_yaml::from_str::<Trit>("3").is_err());
    }

    #[test]
    fn test_trit_predicates() {
        assert!(Trit::Z.is_zero());
        assert!(Trit::P.is_positive());
        assert!(Trit::N.is_negative());
        assert!(!Trit::N.is_positive());
        assert!(!Trit::P.is_zero());
    }
}

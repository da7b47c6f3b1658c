//! TRUTH token amounts.
//!
//! Amounts are represented as fixed-point integers (u128) to avoid floating-point errors.
//! The smallest unit is 1 raw; one whole TRUTH is [`TRUTH_UNIT`] raw.
//! Rates throughout the engine are basis points over [`BPS_DENOMINATOR`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::TruthError;

/// Raw units per whole TRUTH token.
pub const TRUTH_UNIT: u128 = 1_000_000;

/// Basis-point denominator (10_000 bps = 100%).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// TRUTH amount: the platform token staked on and rewarded for verification.
///
/// Internally stored as raw units (u128) for precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TruthAmount(u128);

impl TruthAmount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Amount from whole TRUTH tokens.
    pub const fn from_truth(tokens: u128) -> Self {
        Self(tokens * TRUTH_UNIT)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    /// Whole tokens, truncating any fractional raw units.
    pub fn whole_truth(&self) -> u128 {
        self.0 / TRUTH_UNIT
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Multiply by a basis-point rate, flooring to a raw unit.
    pub fn mul_bps(self, bps: u32) -> Self {
        Self(self.0.saturating_mul(bps as u128) / BPS_DENOMINATOR)
    }

    /// `self * numerator / denominator`, floored; zero when `denominator` is zero.
    pub fn mul_div(self, numerator: Self, denominator: Self) -> Self {
        self.0
            .saturating_mul(numerator.0)
            .checked_div(denominator.0)
            .map(Self)
            .unwrap_or(Self::ZERO)
    }

    /// Round down to a whole number of TRUTH.
    pub fn floor_to_unit(self) -> Self {
        Self(self.0 - self.0 % TRUTH_UNIT)
    }
}

impl Add for TruthAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TruthAmount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for TruthAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a TruthAmount> for TruthAmount {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for TruthAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frac = self.0 % TRUTH_UNIT;
        if frac == 0 {
            write!(f, "{} TRUTH", self.whole_truth())
        } else {
            let digits = format!("{:06}", frac);
            write!(f, "{}.{} TRUTH", self.whole_truth(), digits.trim_end_matches('0'))
        }
    }
}

/// Parses decimal TRUTH amounts such as `"25"` or `"12.5"` (at most six decimals).
impl FromStr for TruthAmount {
    type Err = TruthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TruthError::InvalidAmount(s.to_string());
        let s = s.trim().trim_end_matches("TRUTH").trim();
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() || frac.len() > 6 {
            return Err(invalid());
        }
        let whole: u128 = whole.parse().map_err(|_| invalid())?;
        let frac_raw: u128 = if frac.is_empty() {
            0
        } else {
            format!("{:0<6}", frac).parse().map_err(|_| invalid())?
        };
        whole
            .checked_mul(TRUTH_UNIT)
            .and_then(|w| w.checked_add(frac_raw))
            .map(Self)
            .ok_or_else(invalid)
    }
}

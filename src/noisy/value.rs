// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! A scalar value carrying a standard error, with a noisy total-ordering
//! comparison.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default sigma level: the confidence interval half-width is
/// `SIGMA_LEVEL * error`.
const DEFAULT_SIGMA_LEVEL: f64 = 2.0;

static SIGMA_LEVEL_BITS: AtomicU64 = AtomicU64::new(0);

fn sigma_bits_to_f64(bits: u64) -> f64 {
    f64::from_bits(bits)
}

/// Process-wide confidence multiplier used by every [`NoisyValue`]
/// comparison. Read with `Ordering::Relaxed`: staleness across threads is
/// acceptable for a tunable that changes rarely, if ever, during a run.
pub fn sigma_level() -> f64 {
    let bits = SIGMA_LEVEL_BITS.load(Ordering::Relaxed);
    if bits == 0 {
        DEFAULT_SIGMA_LEVEL
    } else {
        sigma_bits_to_f64(bits)
    }
}

/// Sets the process-wide sigma level. A non-positive value restores the
/// compiled default (2.0) instead of being stored verbatim.
pub fn set_sigma_level(level: f64) {
    let level = if level > 0.0 { level } else { DEFAULT_SIGMA_LEVEL };
    SIGMA_LEVEL_BITS.store(level.to_bits(), Ordering::Relaxed);
}

/// A value with an associated standard error, compared against other noisy
/// values (or plain scalars) via confidence-interval overlap rather than
/// bitwise equality.
///
/// `value` and `error` are plain `f64` fields; `error` is interpreted as one
/// standard deviation and is expected to be non-negative, though this type
/// does not enforce it (the caller is in the best position to know whether a
/// negative error is a bug).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoisyValue {
    pub value: f64,
    pub error: f64,
}

impl NoisyValue {
    /// Builds a noisy value from a value and its standard error.
    pub fn new(value: f64, error: f64) -> Self {
        NoisyValue { value, error }
    }

    pub fn set(&mut self, value: f64, error: f64) {
        self.value = value;
        self.error = error;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn error(&self) -> f64 {
        self.error
    }

    /// Upper bound of the confidence interval, `value + sigma_level * error`.
    pub fn upper_bound(&self) -> f64 {
        self.value + sigma_level() * self.error
    }

    /// Lower bound of the confidence interval, `value - sigma_level * error`.
    pub fn lower_bound(&self) -> f64 {
        self.value - sigma_level() * self.error
    }

    /// Noisy less-than: the intervals do not overlap and this one is lower.
    pub fn noisy_lt(&self, other: &NoisyValue) -> bool {
        self.upper_bound() < other.lower_bound()
    }

    /// Noisy greater-than: the intervals do not overlap and this one is higher.
    pub fn noisy_gt(&self, other: &NoisyValue) -> bool {
        self.lower_bound() > other.upper_bound()
    }

    /// Noisy equality: the confidence intervals overlap.
    pub fn noisy_eq(&self, other: &NoisyValue) -> bool {
        !self.noisy_lt(other) && !self.noisy_gt(other)
    }

    pub fn noisy_le(&self, other: &NoisyValue) -> bool {
        self.noisy_lt(other) || self.noisy_eq(other)
    }

    pub fn noisy_ge(&self, other: &NoisyValue) -> bool {
        self.noisy_gt(other) || self.noisy_eq(other)
    }

    /// Noisy comparison against a plain scalar: `x < s` iff `x.ub < s`.
    pub fn scalar_lt(&self, s: f64) -> bool {
        self.upper_bound() < s
    }

    /// `x > s` iff `x.lb > s`.
    pub fn scalar_gt(&self, s: f64) -> bool {
        self.lower_bound() > s
    }

    /// `x == s` iff `x.lb <= s <= x.ub`.
    pub fn scalar_eq(&self, s: f64) -> bool {
        self.lower_bound() <= s && s <= self.upper_bound()
    }
}

impl Default for NoisyValue {
    fn default() -> Self {
        NoisyValue { value: 0.0, error: 0.0 }
    }
}

impl fmt::Display for NoisyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} +- {}", self.value, self.error)
    }
}

// --- scalar arithmetic: shifts value only ---

impl std::ops::Add<f64> for NoisyValue {
    type Output = NoisyValue;
    fn add(self, rhs: f64) -> NoisyValue {
        NoisyValue::new(self.value + rhs, self.error)
    }
}

impl std::ops::Sub<f64> for NoisyValue {
    type Output = NoisyValue;
    fn sub(self, rhs: f64) -> NoisyValue {
        NoisyValue::new(self.value - rhs, self.error)
    }
}

// --- scalar scale/divide: scale both fields by |s| ---

impl std::ops::Mul<f64> for NoisyValue {
    type Output = NoisyValue;
    fn mul(self, rhs: f64) -> NoisyValue {
        NoisyValue::new(self.value * rhs, self.error * rhs.abs())
    }
}

impl std::ops::Div<f64> for NoisyValue {
    type Output = NoisyValue;
    fn div(self, rhs: f64) -> NoisyValue {
        NoisyValue::new(self.value / rhs, self.error / rhs.abs())
    }
}

// --- noisy arithmetic: sum values, combine errors in quadrature ---
// Multiplication of two noisy values is intentionally not implemented: it
// would require covariance information this type does not track.

impl std::ops::Add for NoisyValue {
    type Output = NoisyValue;
    fn add(self, rhs: NoisyValue) -> NoisyValue {
        NoisyValue::new(
            self.value + rhs.value,
            (self.error * self.error + rhs.error * rhs.error).sqrt(),
        )
    }
}

impl std::ops::Sub for NoisyValue {
    type Output = NoisyValue;
    fn sub(self, rhs: NoisyValue) -> NoisyValue {
        NoisyValue::new(
            self.value - rhs.value,
            (self.error * self.error + rhs.error * rhs.error).sqrt(),
        )
    }
}

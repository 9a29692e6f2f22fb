use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

const SCALE: i64 = 100;

/// Largest magnitude accepted at ingestion, in hundredths (10^13 units).
///
/// Plain `i64` arithmetic stays exact for sums of up to about 9,000 such
/// values, far beyond any candidate set the traceback builds.
pub const MAX_HUNDREDTHS: i64 = 1_000_000_000_000_000;

/// A decimal quantity with two fractional places.
///
/// Stored as a signed count of hundredths so that sums and equality tests
/// are exact. Raw floating values are rounded once, half to even on their
/// exact binary value, when they enter the system through
/// [`Quantity::from_f64`]. Magnitudes are capped at [`MAX_HUNDREDTHS`].
///
/// Serialized as a JSON number (`12.5`), displayed with two places (`12.50`).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub struct Quantity(i64);

impl Quantity {
    /// The zero quantity.
    pub const ZERO: Self = Self(0);

    /// Create from an exact count of hundredths.
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    /// Round a raw floating value to two decimal places.
    ///
    /// Ties are broken half to even on the exact binary value, so `0.125`
    /// becomes `0.12` and `2.675` (stored just below the tie) becomes `2.67`.
    pub fn from_f64(value: f64) -> Result<Self, TypeError> {
        if !value.is_finite() {
            return Err(TypeError::InvalidQuantity(value.to_string()));
        }
        let out_of_range = || TypeError::QuantityOutOfRange(value.to_string());
        let exact = Decimal::from_f64_retain(value).ok_or_else(out_of_range)?;
        let hundredths = exact
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
            .checked_mul(Decimal::from(SCALE))
            .and_then(|d| d.to_i64())
            .filter(|h| h.abs() <= MAX_HUNDREDTHS)
            .ok_or_else(out_of_range)?;
        Ok(Self(hundredths))
    }

    /// The exact count of hundredths.
    pub fn hundredths(self) -> i64 {
        self.0
    }

    /// Lossy conversion back to floating point.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Quantity> for Quantity {
    fn sum<I: Iterator<Item = &'a Quantity>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Quantity> for f64 {
    fn from(q: Quantity) -> f64 {
        q.to_f64()
    }
}

impl TryFrom<f64> for Quantity {
    type Error = TypeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_f64(value)
    }
}

impl FromStr for Quantity {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| TypeError::InvalidQuantity(s.to_string()))?;
        Self::from_f64(value)
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quantity({self})")
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / SCALE as u64, abs % SCALE as u64)
    }
}

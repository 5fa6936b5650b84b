//! Whole-peso price representation.
//!
//! The store keeps `precio` as an integer number field, but records created
//! before the field was made integer-only (or edited by hand) may carry
//! floats, strings or nothing at all. Deserialization is therefore lenient:
//! anything that is not a non-negative finite number reads as zero.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A price in whole currency units (Chilean pesos).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// Zero price, also used for unparsable values.
    pub const ZERO: Self = Self(0);

    /// Create a price from whole currency units.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Get the amount in whole currency units.
    #[must_use]
    pub const fn amount(self) -> u64 {
        self.0
    }

    /// Interpret an arbitrary JSON value the way the storefront always has:
    /// numbers and numeric strings are read, everything else is zero.
    #[must_use]
    pub fn from_json_lenient(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().map(truncate_non_negative))
                .map_or(Self::ZERO, Self),
            serde_json::Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map_or(Self::ZERO, |f| Self(truncate_non_negative(f))),
            _ => Self::ZERO,
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)] // clamped before the cast
fn truncate_non_negative(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.trunc().min(u64::MAX as f64) as u64
    } else {
        0
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_json_lenient(&value))
    }
}

/// Formats as `$35.000` (dot as thousands separator).
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        write!(f, "${grouped}")
    }
}

//! Token amounts.
//!
//! Amounts are carried as raw base units (`u64`: lamports for SOL, base units
//! for SPL tokens). Conversion from user-entered decimal text goes through
//! `rust_decimal` fixed-point arithmetic and never through `f64`, so the
//! smallest transferable unit is never rounded away.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// Decimal places of the native asset.
pub const SOL_DECIMALS: u8 = 9;

/// Lamports in one SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Largest scale `rust_decimal` can represent.
const MAX_SCALE: u8 = 28;

/// Convert a decimal string such as `"1.25"` into raw base units.
///
/// Rejects zero, negative values, input with more fractional digits than
/// `decimals`, and values that do not fit into `u64`.
pub fn parse_ui_amount(input: &str, decimals: u8) -> Result<u64, TypesError> {
    let trimmed = input.trim();
    if decimals > MAX_SCALE {
        return Err(TypesError::InvalidAmount(format!(
            "unsupported precision: {decimals} decimals"
        )));
    }

    let value = Decimal::from_str_exact(trimmed)
        .map_err(|e| TypesError::InvalidAmount(format!("{trimmed}: {e}")))?
        .normalize();

    if value.is_sign_negative() || value.is_zero() {
        return Err(TypesError::InvalidAmount(format!(
            "{trimmed}: amount must be greater than zero"
        )));
    }
    if value.scale() > u32::from(decimals) {
        return Err(TypesError::InvalidAmount(format!(
            "{trimmed}: more than {decimals} decimal places"
        )));
    }

    let mut scaled = value;
    scaled.rescale(u32::from(decimals));
    if scaled.scale() != u32::from(decimals) {
        return Err(TypesError::InvalidAmount(format!("{trimmed}: amount too large")));
    }

    u64::try_from(scaled.mantissa())
        .map_err(|_| TypesError::InvalidAmount(format!("{trimmed}: amount too large")))
}

/// A balance in raw units together with the asset's decimal places.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub raw: u64,
    pub decimals: u8,
}

impl Balance {
    pub fn new(raw: u64, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn zero(decimals: u8) -> Self {
        Self { raw: 0, decimals }
    }

    pub fn lamports(raw: u64) -> Self {
        Self::new(raw, SOL_DECIMALS)
    }

    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Exact decimal rendering with every fractional digit, e.g. `1.500000000`.
    pub fn ui_amount_string(&self) -> String {
        match Decimal::try_from_i128_with_scale(i128::from(self.raw), u32::from(self.decimals)) {
            Ok(d) => d.to_string(),
            Err(_) => self.raw.to_string(),
        }
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ui_amount_string())
    }
}

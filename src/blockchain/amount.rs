// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fixed-precision token amounts and display conversion.

use std::cmp::Ordering;
use std::fmt;

use alloy::primitives::U256;

use crate::error::PipelineError;

/// Largest precision whose scale factor (10^decimals) fits in a `U256`.
pub const MAX_DECIMALS: u8 = 77;

/// A raw on-chain integer amount together with the token's precision.
///
/// Two amounts are only comparable when they share the same precision;
/// `partial_cmp` returns `None` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenAmount {
    raw: U256,
    decimals: u8,
}

impl TokenAmount {
    pub const fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub const fn zero(decimals: u8) -> Self {
        Self::new(U256::ZERO, decimals)
    }

    /// Parse a human-readable amount (e.g. "0.1") at the given precision.
    pub fn from_display(amount: &str, decimals: u8) -> Result<Self, PipelineError> {
        Ok(Self::new(to_raw(amount, decimals)?, decimals))
    }

    pub const fn raw(&self) -> U256 {
        self.raw
    }

    pub const fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Full-precision human-readable form.
    pub fn to_display(&self) -> String {
        to_display(self.raw, self.decimals)
    }

    /// Compare two amounts, refusing mixed precision.
    pub fn checked_cmp(&self, other: &Self) -> Result<Ordering, PipelineError> {
        self.partial_cmp(other).ok_or_else(|| {
            PipelineError::InvalidAmount(format!(
                "cannot compare amounts with {} and {} decimals",
                self.decimals, other.decimals
            ))
        })
    }
}

impl PartialOrd for TokenAmount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.decimals != other.decimals {
            return None;
        }
        Some(self.raw.cmp(&other.raw))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display())
    }
}

/// `10^decimals`, or `None` once it no longer fits in a `U256`. Past that
/// point every representable raw amount is purely fractional.
fn scale(decimals: u8) -> Option<U256> {
    (decimals <= MAX_DECIMALS).then(|| U256::from(10u64).pow(U256::from(decimals)))
}

/// Format a raw amount with `decimals` places, keeping every significant digit.
///
/// Trailing zeros of the fractional part are dropped, so the output of this
/// function parses back to the same raw value with [`to_raw`] for any `u8`
/// precision.
pub fn to_display(raw: U256, decimals: u8) -> String {
    if raw.is_zero() {
        return "0".to_string();
    }

    let (whole, remainder) = match scale(decimals) {
        Some(divisor) => (raw / divisor, raw % divisor),
        None => (U256::ZERO, raw),
    };

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        format!("{}.{}", whole, trimmed)
    }
}

/// Parse a human-readable amount into its raw integer form.
///
/// Accepts `"1"`, `"1.5"`, `".5"` and `"1."`. Signs, exponents, separators and
/// more fractional digits than `decimals` are rejected.
pub fn to_raw(display: &str, decimals: u8) -> Result<U256, PipelineError> {
    let amount = display.trim();
    if amount.is_empty() {
        return Err(PipelineError::InvalidAmount("amount is empty".to_string()));
    }
    if amount.starts_with('-') {
        return Err(PipelineError::InvalidAmount(format!(
            "amount must not be negative: {amount}"
        )));
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };

    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(PipelineError::InvalidAmount(format!(
            "not a decimal number: {amount}"
        )));
    }
    if fraction.len() > decimals as usize {
        return Err(PipelineError::InvalidAmount(format!(
            "too many decimal places in {amount} (max {decimals})"
        )));
    }

    let overflow = || PipelineError::InvalidAmount(format!("amount overflows: {amount}"));

    let whole = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10).map_err(|_| overflow())?
    };
    let fraction = if fraction.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{:0<width$}", fraction, width = decimals as usize);
        U256::from_str_radix(&padded, 10).map_err(|_| overflow())?
    };

    let whole = match scale(decimals) {
        Some(multiplier) => whole.checked_mul(multiplier),
        None if whole.is_zero() => Some(U256::ZERO),
        None => None,
    };
    whole
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(overflow)
}

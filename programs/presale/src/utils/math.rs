//! Checked fixed-point arithmetic shared by the sale engine.
//! - USD amounts are base units of the USD-pegged payment assets.
//! - Stage prices are USD cents per whole payout token.
//! - Token amounts are payout-mint base units.
//! All intermediates are u128; overflow is reported, never wrapped.

use crate::constants::{CENTS_PER_USD, PERCENT_DENOMINATOR};
use crate::error::SaleError;

/// Decimal scale of the payment assets and the payout token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceScale {
    pub usd_decimals: u8,
    pub payout_decimals: u8,
}

impl PriceScale {
    pub fn new(usd_decimals: u8, payout_decimals: u8) -> Self {
        Self {
            usd_decimals,
            payout_decimals,
        }
    }

    /// Payout base units bought by `usd` at `price_cents` per whole token (floored).
    pub fn usd_to_tokens(&self, usd: u64, price_cents: u64) -> Result<u64, SaleError> {
        if price_cents == 0 {
            return Err(SaleError::InvalidConfiguration);
        }
        let num = (usd as u128)
            .checked_mul(CENTS_PER_USD as u128)
            .ok_or(SaleError::MathOverflow)?
            .checked_mul(pow10(self.payout_decimals)?)
            .ok_or(SaleError::MathOverflow)?;
        let den = (price_cents as u128)
            .checked_mul(pow10(self.usd_decimals)?)
            .ok_or(SaleError::MathOverflow)?;
        to_u64(num / den)
    }

    /// USD base units needed to buy exactly `tokens` at `price_cents` (rounded up).
    pub fn tokens_to_usd_ceil(&self, tokens: u64, price_cents: u64) -> Result<u64, SaleError> {
        let num = (tokens as u128)
            .checked_mul(price_cents as u128)
            .ok_or(SaleError::MathOverflow)?
            .checked_mul(pow10(self.usd_decimals)?)
            .ok_or(SaleError::MathOverflow)?;
        let den = (CENTS_PER_USD as u128)
            .checked_mul(pow10(self.payout_decimals)?)
            .ok_or(SaleError::MathOverflow)?;
        to_u64(ceil_div(num, den))
    }
}

/// `amount * percent / 100`, floored.
pub fn percent_of(amount: u64, percent: u16) -> Result<u64, SaleError> {
    mul_div_floor(amount, percent as u64, PERCENT_DENOMINATOR)
}

/// `a * b / c`, floored, computed in u128.
pub fn mul_div_floor(a: u64, b: u64, c: u64) -> Result<u64, SaleError> {
    if c == 0 {
        return Err(SaleError::MathOverflow);
    }
    let v = (a as u128)
        .checked_mul(b as u128)
        .ok_or(SaleError::MathOverflow)?
        / (c as u128);
    to_u64(v)
}

fn ceil_div(num: u128, den: u128) -> u128 {
    let q = num / den;
    if num % den == 0 {
        q
    } else {
        q + 1
    }
}

fn pow10(decimals: u8) -> Result<u128, SaleError> {
    10u128
        .checked_pow(decimals as u32)
        .ok_or(SaleError::MathOverflow)
}

fn to_u64(v: u128) -> Result<u64, SaleError> {
    u64::try_from(v).map_err(|_| SaleError::MathOverflow)
}

//! Program-wide constants.

use anchor_lang::prelude::Pubkey;

/// PDA seed of the sale state (`["sale", payout_mint]`).
pub const SALE_SEED: &[u8] = b"sale";

/// PDA seed of a participant record (`["participant", sale, wallet]`).
pub const PARTICIPANT_SEED: &[u8] = b"participant";

/// PDA seed of a vesting schedule (`["vesting", sale, schedule_id]`).
pub const VESTING_SEED: &[u8] = b"vesting";

/// Whole percent denominator used by bonus, reward and TGE percentages.
pub const PERCENT_DENOMINATOR: u64 = 100;

/// Stage prices are quoted in USD cents per whole payout token.
pub const CENTS_PER_USD: u64 = 100;

/// Upper bound for any configured percentage.
pub const MAX_PERCENT: u16 = 100;

/// Largest mint decimals accepted for the payout or payment assets.
pub const MAX_DECIMALS: u8 = 18;

/// Longest linear release a vesting tier may configure (ten years).
pub const MAX_VESTING_DURATION: i64 = 10 * 365 * 86_400;

/// Table size limits; they bound the sale account's allocation.
pub const MAX_ACCEPTED_ASSETS: usize = 8;
pub const MAX_STAGES: usize = 32;
pub const MAX_LEVELS: usize = 16;
pub const MAX_TIERS: usize = 16;

/// Referrer value meaning "registered without a referrer".
pub const NO_REFERRER: Pubkey = Pubkey::new_from_array([0u8; 32]);

use anchor_lang::prelude::*;

use crate::constants::{
    MAX_ACCEPTED_ASSETS, MAX_DECIMALS, MAX_LEVELS, MAX_PERCENT, MAX_STAGES, MAX_TIERS,
    MAX_VESTING_DURATION,
};
use crate::error::SaleError;
use crate::utils::math::PriceScale;

/// A priced tranche of payout-token supply. Stages activate in index order.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stage {
    /// USD cents per whole payout token.
    pub price_cents: u64,
    /// Payout base units offered by this stage.
    pub capacity: u64,
    /// Payout base units sold so far; never above `capacity`.
    pub sold: u64,
    /// Extra tokens granted on top of the base conversion, whole percent.
    pub bonus_percent: u16,
}

impl Stage {
    pub const SIZE: usize = 8 + 8 + 8 + 2;

    pub fn remaining(&self) -> u64 {
        self.capacity.saturating_sub(self.sold)
    }

    pub fn is_full(&self) -> bool {
        self.sold >= self.capacity
    }
}

/// Instruction input for one stage; `sold` always starts at zero.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageParams {
    pub price_cents: u64,
    pub capacity: u64,
    pub bonus_percent: u16,
}

/// Referral reward tier keyed by a referrer's lifetime referred sales.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DesignatedLevel {
    pub reward_percent: u16,
    /// Inclusive lower bound, USD base units.
    pub min_cumulative_sales: u64,
}

impl DesignatedLevel {
    pub const SIZE: usize = 2 + 8;
}

/// Purchase-size bracket deciding the TGE unlock and the linear remainder.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VestingTier {
    /// Inclusive bounds, USD base units.
    pub min_amount_usd: u64,
    pub max_amount_usd: u64,
    pub tge_unlock_percent: u16,
    /// Seconds over which the locked remainder releases linearly.
    pub vesting_duration: i64,
}

impl VestingTier {
    pub const SIZE: usize = 8 + 8 + 2 + 8;

    pub fn covers(&self, usd: u64) -> bool {
        self.min_amount_usd <= usd && usd <= self.max_amount_usd
    }
}

/// Everything `initialize_sale` needs besides the payout mint and admin.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SaleConfig {
    /// Operator authority (registration and KYC).
    pub operator: Pubkey,
    /// USD-pegged payment mints; all share `usd_decimals`.
    pub accepted_mints: Vec<Pubkey>,
    pub usd_decimals: u8,
    pub stages: Vec<StageParams>,
    /// Ascending by `min_cumulative_sales`.
    pub levels: Vec<DesignatedLevel>,
    /// Ascending, contiguous, inclusive ranges.
    pub tiers: Vec<VestingTier>,
    /// Split a purchase across stages instead of capping it at the active stage.
    pub span_stages: bool,
}

/// Sale state PDA: configuration registry, stage table and sale-wide totals.
#[account]
#[derive(Debug)]
pub struct Sale {
    pub admin: Pubkey,
    pub operator: Pubkey,
    pub payout_mint: Pubkey,
    pub payout_decimals: u8,
    pub usd_decimals: u8,
    pub accepted_mints: Vec<Pubkey>,
    pub stages: Vec<Stage>,
    pub levels: Vec<DesignatedLevel>,
    pub tiers: Vec<VestingTier>,
    pub span_stages: bool,
    /// Purchases are rejected while set; claims continue.
    pub paused: bool,
    /// blake3 over the stage, level and tier tables as configured.
    pub config_hash: [u8; 32],
    /// Base tokens sold across all stages (bonus excluded).
    pub total_tokens_sold: u64,
    pub total_bonus_tokens: u64,
    pub total_usd_raised: u64,
    pub total_referral_rewards: u64,
    pub total_claimed_tokens: u64,
    /// Number of vesting schedules created; also the next schedule id.
    pub schedule_count: u64,
    pub bump: u8,
}

impl Sale {
    /// Account space (discriminator included) for a given table shape.
    pub fn space(assets: usize, stages: usize, levels: usize, tiers: usize) -> usize {
        8 +
        32 + // admin
        32 + // operator
        32 + // payout_mint
        1 +  // payout_decimals
        1 +  // usd_decimals
        4 + 32 * assets +
        4 + Stage::SIZE * stages +
        4 + DesignatedLevel::SIZE * levels +
        4 + VestingTier::SIZE * tiers +
        1 +  // span_stages
        1 +  // paused
        32 + // config_hash
        8 * 6 + // totals and schedule_count
        1 // bump
    }

    pub fn space_for(config: &SaleConfig) -> usize {
        Self::space(
            config.accepted_mints.len(),
            config.stages.len(),
            config.levels.len(),
            config.tiers.len(),
        )
    }

    /// Build a validated sale. Any malformed table fails the whole construction.
    pub fn new(
        admin: Pubkey,
        payout_mint: Pubkey,
        payout_decimals: u8,
        bump: u8,
        config: SaleConfig,
    ) -> std::result::Result<Self, SaleError> {
        validate_config(&config, payout_decimals)?;

        let stages: Vec<Stage> = config
            .stages
            .iter()
            .map(|p| Stage {
                price_cents: p.price_cents,
                capacity: p.capacity,
                sold: 0,
                bonus_percent: p.bonus_percent,
            })
            .collect();
        let config_hash = fingerprint(&stages, &config.levels, &config.tiers);

        Ok(Self {
            admin,
            operator: config.operator,
            payout_mint,
            payout_decimals,
            usd_decimals: config.usd_decimals,
            accepted_mints: config.accepted_mints,
            stages,
            levels: config.levels,
            tiers: config.tiers,
            span_stages: config.span_stages,
            paused: false,
            config_hash,
            total_tokens_sold: 0,
            total_bonus_tokens: 0,
            total_usd_raised: 0,
            total_referral_rewards: 0,
            total_claimed_tokens: 0,
            schedule_count: 0,
            bump,
        })
    }

    pub fn scale(&self) -> PriceScale {
        PriceScale::new(self.usd_decimals, self.payout_decimals)
    }

    pub fn is_accepted(&self, mint: &Pubkey) -> bool {
        self.accepted_mints.iter().any(|m| m == mint)
    }

    /// A payment mint is usable only if accepted and denominated in the
    /// sale's USD decimals, so one base unit always counts as one USD unit.
    pub fn check_payment_mint(
        &self,
        mint: &Pubkey,
        decimals: u8,
    ) -> std::result::Result<(), SaleError> {
        if !self.is_accepted(mint) || decimals != self.usd_decimals {
            return Err(SaleError::AssetNotAccepted);
        }
        Ok(())
    }

    /// The vesting tier whose inclusive range contains `usd`.
    pub fn tier_for(&self, usd: u64) -> std::result::Result<&VestingTier, SaleError> {
        self.tiers
            .iter()
            .find(|t| t.covers(usd))
            .ok_or(SaleError::NoMatchingTier)
    }
}

fn validate_config(
    config: &SaleConfig,
    payout_decimals: u8,
) -> std::result::Result<(), SaleError> {
    let invalid = Err(SaleError::InvalidConfiguration);

    if config.operator == Pubkey::default()
        || config.usd_decimals > MAX_DECIMALS
        || payout_decimals > MAX_DECIMALS
    {
        return invalid;
    }

    // Accepted assets: non-empty, bounded, no default key, no duplicates.
    let mints = &config.accepted_mints;
    if mints.is_empty() || mints.len() > MAX_ACCEPTED_ASSETS {
        return invalid;
    }
    for (i, m) in mints.iter().enumerate() {
        if *m == Pubkey::default() || mints[..i].contains(m) {
            return invalid;
        }
    }

    if config.stages.is_empty() || config.stages.len() > MAX_STAGES {
        return invalid;
    }
    for s in config.stages.iter() {
        if s.price_cents == 0 || s.capacity == 0 || s.bonus_percent > MAX_PERCENT {
            return invalid;
        }
    }

    // Levels: strictly ascending thresholds so "highest level met" is unambiguous.
    if config.levels.len() > MAX_LEVELS {
        return invalid;
    }
    for (i, l) in config.levels.iter().enumerate() {
        if l.reward_percent > MAX_PERCENT {
            return invalid;
        }
        if i > 0 && l.min_cumulative_sales <= config.levels[i - 1].min_cumulative_sales {
            return invalid;
        }
    }

    // Tiers: non-empty, each well formed, consecutive ranges touch with no gap or overlap.
    if config.tiers.is_empty() || config.tiers.len() > MAX_TIERS {
        return invalid;
    }
    for (i, t) in config.tiers.iter().enumerate() {
        if t.min_amount_usd > t.max_amount_usd
            || t.tge_unlock_percent > MAX_PERCENT
            || !(0..=MAX_VESTING_DURATION).contains(&t.vesting_duration)
        {
            return invalid;
        }
        if i > 0 {
            let prev = &config.tiers[i - 1];
            match prev.max_amount_usd.checked_add(1) {
                Some(next_min) if next_min == t.min_amount_usd => {}
                _ => return invalid,
            }
        }
    }

    Ok(())
}

/// Deterministic digest of the configured tables (little-endian field order).
pub fn fingerprint(
    stages: &[Stage],
    levels: &[DesignatedLevel],
    tiers: &[VestingTier],
) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(stages.len() as u32).to_le_bytes());
    for s in stages {
        hasher.update(&s.price_cents.to_le_bytes());
        hasher.update(&s.capacity.to_le_bytes());
        hasher.update(&s.bonus_percent.to_le_bytes());
    }
    hasher.update(&(levels.len() as u32).to_le_bytes());
    for l in levels {
        hasher.update(&l.reward_percent.to_le_bytes());
        hasher.update(&l.min_cumulative_sales.to_le_bytes());
    }
    hasher.update(&(tiers.len() as u32).to_le_bytes());
    for t in tiers {
        hasher.update(&t.min_amount_usd.to_le_bytes());
        hasher.update(&t.max_amount_usd.to_le_bytes());
        hasher.update(&t.tge_unlock_percent.to_le_bytes());
        hasher.update(&t.vesting_duration.to_le_bytes());
    }
    *hasher.finalize().as_bytes()
}

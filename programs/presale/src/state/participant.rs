use anchor_lang::prelude::*;

use crate::constants::NO_REFERRER;

/// Participant PDA: registration, KYC status and referral balances.
#[account]
#[derive(Debug, Default)]
pub struct Participant {
    pub sale: Pubkey,
    pub wallet: Pubkey,
    /// Lookup link to another participant's wallet; `NO_REFERRER` when absent.
    pub referrer: Pubkey,
    pub registered: bool,
    pub kyc_verified: bool,
    /// USD base units spent by this participant.
    pub cumulative_purchased_usd: u64,
    /// USD base units bought by participants this wallet referred.
    pub cumulative_referred_sales_usd: u64,
    /// Referral rewards credited, USD base units.
    pub referral_rewards_earned_usd: u64,
    pub referral_rewards_claimed_usd: u64,
    pub purchase_count: u64,
    pub registered_at: i64,
    pub bump: u8,
}

impl Participant {
    pub const SIZE: usize =
        32 + // sale
        32 + // wallet
        32 + // referrer
        1 +  // registered
        1 +  // kyc_verified
        8 +  // cumulative_purchased_usd
        8 +  // cumulative_referred_sales_usd
        8 +  // referral_rewards_earned_usd
        8 +  // referral_rewards_claimed_usd
        8 +  // purchase_count
        8 +  // registered_at
        1;   // bump

    pub fn has_referrer(&self) -> bool {
        self.referrer != NO_REFERRER
    }

    pub fn claimable_referral_rewards(&self) -> u64 {
        self.referral_rewards_earned_usd
            .saturating_sub(self.referral_rewards_claimed_usd)
    }
}

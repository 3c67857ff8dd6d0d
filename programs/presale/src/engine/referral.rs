//! Referral reward calculator.
//!
//! A referrer's level is the highest designated level whose threshold its
//! lifetime referred-sales volume meets (thresholds are inclusive). The volume
//! is credited first, so a purchase that crosses a threshold is itself paid at
//! the higher level.

use anchor_lang::prelude::Pubkey;

use crate::error::SaleError;
use crate::state::{DesignatedLevel, Participant};
use crate::utils::math::percent_of;

/// Referral effect of one purchase, computed before anything is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferralCredit {
    pub referrer: Pubkey,
    /// Level index reached after crediting the purchase, if any.
    pub level: Option<u8>,
    /// USD base units owed to the referrer for this purchase.
    pub reward: u64,
    pub referred_sales_after: u64,
    pub rewards_earned_after: u64,
}

/// Highest level whose threshold `cumulative` meets, with its index.
pub fn level_for(levels: &[DesignatedLevel], cumulative: u64) -> Option<(usize, &DesignatedLevel)> {
    levels
        .iter()
        .enumerate()
        .rev()
        .find(|(_, l)| cumulative >= l.min_cumulative_sales)
}

pub fn preview_credit(
    levels: &[DesignatedLevel],
    referrer: &Participant,
    purchase_usd: u64,
) -> Result<ReferralCredit, SaleError> {
    let referred_sales_after = referrer
        .cumulative_referred_sales_usd
        .checked_add(purchase_usd)
        .ok_or(SaleError::MathOverflow)?;

    let (level, reward) = match level_for(levels, referred_sales_after) {
        Some((idx, l)) => (Some(idx as u8), percent_of(purchase_usd, l.reward_percent)?),
        None => (None, 0),
    };
    let rewards_earned_after = referrer
        .referral_rewards_earned_usd
        .checked_add(reward)
        .ok_or(SaleError::MathOverflow)?;

    Ok(ReferralCredit {
        referrer: referrer.wallet,
        level,
        reward,
        referred_sales_after,
        rewards_earned_after,
    })
}

pub fn apply_credit(referrer: &mut Participant, credit: &ReferralCredit) {
    referrer.cumulative_referred_sales_usd = credit.referred_sales_after;
    referrer.referral_rewards_earned_usd = credit.rewards_earned_after;
}

/// Credit `purchase_usd` to the referrer and return the reward it earns.
/// `None` stands for "no referrer" and earns nothing.
pub fn reward_for(
    levels: &[DesignatedLevel],
    referrer: Option<&mut Participant>,
    purchase_usd: u64,
) -> Result<u64, SaleError> {
    let Some(referrer) = referrer else {
        return Ok(0);
    };
    let credit = preview_credit(levels, referrer, purchase_usd)?;
    apply_credit(referrer, &credit);
    Ok(credit.reward)
}

/// Drain the referrer's unclaimed rewards, returning the USD amount to pay out.
pub fn take_rewards(referrer: &mut Participant) -> Result<u64, SaleError> {
    let amount = referrer.claimable_referral_rewards();
    if amount == 0 {
        return Err(SaleError::NothingToClaim);
    }
    referrer.referral_rewards_claimed_usd = referrer
        .referral_rewards_claimed_usd
        .checked_add(amount)
        .ok_or(SaleError::MathOverflow)?;
    Ok(amount)
}

//! Vesting ledger: TGE unlock plus linear release of the remainder.

use anchor_lang::prelude::Pubkey;

use crate::error::SaleError;
use crate::state::{VestingSchedule, VestingTier};
use crate::utils::math::{mul_div_floor, percent_of};
use crate::utils::time;

/// Build the schedule for a purchase granting `total_amount` under `tier`.
pub fn create_schedule(
    sale: Pubkey,
    owner: Pubkey,
    id: u64,
    total_amount: u64,
    tier: &VestingTier,
    now: i64,
    bump: u8,
) -> Result<VestingSchedule, SaleError> {
    if tier.vesting_duration < 0 {
        return Err(SaleError::InvalidConfiguration);
    }
    Ok(VestingSchedule {
        sale,
        owner,
        id,
        total_amount,
        unlocked_at_creation: percent_of(total_amount, tier.tge_unlock_percent)?,
        start_time: now,
        duration: tier.vesting_duration,
        claimed_amount: 0,
        bump,
    })
}

impl VestingSchedule {
    /// Total released by `now`, claimed or not.
    pub fn vested_at(&self, now: i64) -> Result<u64, SaleError> {
        if time::is_after_end(now, self.start_time, self.duration)? {
            return Ok(self.total_amount);
        }
        let locked = self
            .total_amount
            .checked_sub(self.unlocked_at_creation)
            .ok_or(SaleError::MathOverflow)?;
        // Here 0 <= elapsed < duration, so duration > 0.
        let elapsed = time::elapsed_since(now, self.start_time);
        let released = mul_div_floor(locked, elapsed, self.duration as u64)?;
        self.unlocked_at_creation
            .checked_add(released)
            .ok_or(SaleError::MathOverflow)
    }

    pub fn claimable_at(&self, now: i64) -> Result<u64, SaleError> {
        Ok(self.vested_at(now)?.saturating_sub(self.claimed_amount))
    }

    /// Release whatever has vested since the last claim to the owner.
    pub fn claim(&mut self, requester: &Pubkey, now: i64) -> Result<u64, SaleError> {
        if *requester != self.owner {
            return Err(SaleError::NotScheduleOwner);
        }
        let amount = self.claimable_at(now)?;
        if amount == 0 {
            return Err(SaleError::NothingToClaim);
        }
        self.claimed_amount = self
            .claimed_amount
            .checked_add(amount)
            .ok_or(SaleError::MathOverflow)?;
        Ok(amount)
    }
}

use anchor_lang::prelude::*;

use crate::constants::{SALE_SEED, VESTING_SEED};
use crate::state::{Sale, VestingSchedule};

pub fn emit_claim_quote(ctx: Context<EmitClaimQuote>, schedule_id: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let schedule = &ctx.accounts.vesting_schedule;

    emit!(ClaimQuote {
        schedule_id,
        owner: schedule.owner,
        total_amount: schedule.total_amount,
        vested_amount: schedule.vested_at(now)?,
        claimed_amount: schedule.claimed_amount,
        claimable: schedule.claimable_at(now)?,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(schedule_id: u64)]
pub struct EmitClaimQuote<'info> {
    #[account(seeds = [SALE_SEED, sale.payout_mint.as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, Sale>>,

    #[account(
        seeds = [VESTING_SEED, sale.key().as_ref(), &schedule_id.to_le_bytes()],
        bump = vesting_schedule.bump
    )]
    pub vesting_schedule: Account<'info, VestingSchedule>,
}

#[event]
pub struct ClaimQuote {
    pub schedule_id: u64,
    pub owner: Pubkey,
    pub total_amount: u64,
    pub vested_amount: u64,
    pub claimed_amount: u64,
    pub claimable: u64,
}

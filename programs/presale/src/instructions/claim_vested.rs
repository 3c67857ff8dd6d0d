use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::{SALE_SEED, VESTING_SEED};
use crate::error::SaleError;
use crate::state::{Sale, VestingSchedule};

pub fn claim_vested(ctx: Context<ClaimVested>, schedule_id: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let owner = ctx.accounts.owner.key();

    let amount = ctx.accounts.vesting_schedule.claim(&owner, now)?;
    require!(
        ctx.accounts.payout_vault.amount >= amount,
        SaleError::InsufficientVaultBalance
    );

    let (payout_mint, bump) = (ctx.accounts.sale.payout_mint, ctx.accounts.sale.bump);
    let signer_seeds: &[&[&[u8]]] = &[&[SALE_SEED, payout_mint.as_ref(), &[bump]]];
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.payout_vault.to_account_info(),
                to: ctx.accounts.owner_payout_account.to_account_info(),
                authority: ctx.accounts.sale.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
    )?;

    let st = &mut ctx.accounts.sale;
    st.total_claimed_tokens = st
        .total_claimed_tokens
        .checked_add(amount)
        .ok_or(SaleError::MathOverflow)?;

    let schedule = &ctx.accounts.vesting_schedule;
    emit!(VestedTokensClaimed {
        owner,
        schedule_id,
        amount,
        claimed_total: schedule.claimed_amount,
        total_amount: schedule.total_amount,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(schedule_id: u64)]
pub struct ClaimVested<'info> {
    #[account(mut, seeds = [SALE_SEED, sale.payout_mint.as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, Sale>>,

    #[account(
        mut,
        seeds = [VESTING_SEED, sale.key().as_ref(), &schedule_id.to_le_bytes()],
        bump = vesting_schedule.bump
    )]
    pub vesting_schedule: Account<'info, VestingSchedule>,

    #[account(
        mut,
        associated_token::mint = payout_mint,
        associated_token::authority = sale,
    )]
    pub payout_vault: Account<'info, TokenAccount>,

    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = payout_mint,
        associated_token::authority = owner,
    )]
    pub owner_payout_account: Account<'info, TokenAccount>,

    #[account(address = sale.payout_mint @ SaleError::InvalidTokenMint)]
    pub payout_mint: Account<'info, Mint>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

#[event]
pub struct VestedTokensClaimed {
    pub owner: Pubkey,
    pub schedule_id: u64,
    pub amount: u64,
    pub claimed_total: u64,
    pub total_amount: u64,
}

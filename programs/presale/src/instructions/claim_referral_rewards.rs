use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::{PARTICIPANT_SEED, SALE_SEED};
use crate::engine::referral;
use crate::error::SaleError;
use crate::state::{Participant, Sale};

/// Pay out accrued referral rewards (USD denominated) in one accepted stablecoin.
pub fn claim_referral_rewards(ctx: Context<ClaimReferralRewards>) -> Result<()> {
    let st = &ctx.accounts.sale;
    // Rewards are counted in USD base units and paid 1:1.
    st.check_payment_mint(
        &ctx.accounts.payment_mint.key(),
        ctx.accounts.payment_mint.decimals,
    )?;

    let amount = referral::take_rewards(&mut ctx.accounts.referrer_participant)?;
    require!(
        ctx.accounts.treasury.amount >= amount,
        SaleError::InsufficientVaultBalance
    );

    let signer_seeds: &[&[&[u8]]] = &[&[SALE_SEED, st.payout_mint.as_ref(), &[st.bump]]];
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.treasury.to_account_info(),
                to: ctx.accounts.referrer_payment_account.to_account_info(),
                authority: st.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
    )?;

    emit!(ReferralRewardsClaimed {
        referrer: ctx.accounts.referrer.key(),
        payment_mint: ctx.accounts.payment_mint.key(),
        amount,
        claimed_total: ctx.accounts.referrer_participant.referral_rewards_claimed_usd,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct ClaimReferralRewards<'info> {
    #[account(seeds = [SALE_SEED, sale.payout_mint.as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, Sale>>,

    #[account(
        mut,
        seeds = [PARTICIPANT_SEED, sale.key().as_ref(), referrer.key().as_ref()],
        bump = referrer_participant.bump
    )]
    pub referrer_participant: Account<'info, Participant>,

    pub payment_mint: Account<'info, Mint>,

    #[account(
        mut,
        associated_token::mint = payment_mint,
        associated_token::authority = sale,
    )]
    pub treasury: Account<'info, TokenAccount>,

    #[account(
        mut,
        token::mint = payment_mint,
        token::authority = referrer,
    )]
    pub referrer_payment_account: Account<'info, TokenAccount>,

    pub referrer: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct ReferralRewardsClaimed {
    pub referrer: Pubkey,
    pub payment_mint: Pubkey,
    pub amount: u64,
    pub claimed_total: u64,
}

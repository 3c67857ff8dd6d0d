use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::{PARTICIPANT_SEED, SALE_SEED, VESTING_SEED};
use crate::engine::purchase::{self, PurchaseOutcome, PurchaseRequest};
use crate::engine::StageFill;
use crate::state::{Participant, Sale, VestingSchedule};

pub fn buy_tokens(ctx: Context<BuyTokens>, payment_amount: u64) -> Result<()> {
    ctx.accounts.sale.check_payment_mint(
        &ctx.accounts.payment_mint.key(),
        ctx.accounts.payment_mint.decimals,
    )?;

    let now = Clock::get()?.unix_timestamp;
    let req = PurchaseRequest {
        sale: ctx.accounts.sale.key(),
        payment_mint: ctx.accounts.payment_mint.key(),
        payment_amount,
        now,
        schedule_bump: ctx.bumps.vesting_schedule,
    };

    let PurchaseOutcome { receipt, schedule } = purchase::buy(
        &mut ctx.accounts.sale,
        &mut ctx.accounts.buyer_participant,
        ctx.accounts.referrer_participant.as_deref_mut(),
        req,
    )?;

    // Charge only what the stages absorbed.
    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.buyer_payment_account.to_account_info(),
                to: ctx.accounts.treasury.to_account_info(),
                authority: ctx.accounts.buyer.to_account_info(),
            },
        ),
        receipt.usd_spent,
    )?;

    ctx.accounts.vesting_schedule.set_inner(schedule);

    if receipt.stage_after != receipt.stage_before {
        msg!(
            "Advanced from stage {} to stage {}",
            receipt.stage_before,
            receipt.stage_after
        );
        emit!(StageAdvanced {
            from_stage: receipt.stage_before,
            to_stage: receipt.stage_after,
        });
    }
    if ctx.accounts.sale.is_sold_out() {
        msg!("All stages sold out - sale closed");
    }

    emit!(TokensPurchased {
        buyer: receipt.buyer,
        payment_mint: receipt.payment_mint,
        usd_spent: receipt.usd_spent,
        usd_unspent: receipt.usd_unspent,
        stages_touched: receipt.stages_touched,
        base_tokens: receipt.base_tokens,
        bonus_tokens: receipt.bonus_tokens,
        total_tokens: receipt.total_tokens,
        unlocked_now: receipt.unlocked_now,
        vesting_schedule_id: receipt.vesting_schedule_id,
        referrer: receipt.referrer,
        referral_reward: receipt.referral_reward,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct BuyTokens<'info> {
    #[account(mut, seeds = [SALE_SEED, sale.payout_mint.as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, Sale>>,

    #[account(
        mut,
        seeds = [PARTICIPANT_SEED, sale.key().as_ref(), buyer.key().as_ref()],
        bump = buyer_participant.bump
    )]
    pub buyer_participant: Account<'info, Participant>,

    /// Required when the buyer has a referrer; matched in the engine.
    #[account(mut)]
    pub referrer_participant: Option<Account<'info, Participant>>,

    #[account(
        init,
        payer = buyer,
        space = 8 + VestingSchedule::SIZE,
        seeds = [VESTING_SEED, sale.key().as_ref(), &sale.schedule_count.to_le_bytes()],
        bump
    )]
    pub vesting_schedule: Account<'info, VestingSchedule>,

    pub payment_mint: Account<'info, Mint>,

    #[account(
        mut,
        token::mint = payment_mint,
        token::authority = buyer,
    )]
    pub buyer_payment_account: Account<'info, TokenAccount>,

    #[account(
        init_if_needed,
        payer = buyer,
        associated_token::mint = payment_mint,
        associated_token::authority = sale,
    )]
    pub treasury: Account<'info, TokenAccount>,

    #[account(mut)]
    pub buyer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

#[event]
pub struct TokensPurchased {
    pub buyer: Pubkey,
    pub payment_mint: Pubkey,
    pub usd_spent: u64,
    pub usd_unspent: u64,
    pub stages_touched: Vec<StageFill>,
    pub base_tokens: u64,
    pub bonus_tokens: u64,
    pub total_tokens: u64,
    pub unlocked_now: u64,
    pub vesting_schedule_id: u64,
    pub referrer: Pubkey,
    pub referral_reward: u64,
}

#[event]
pub struct StageAdvanced {
    pub from_stage: u8,
    pub to_stage: u8,
}

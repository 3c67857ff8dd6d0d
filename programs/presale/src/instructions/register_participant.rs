use anchor_lang::prelude::*;

use crate::constants::{PARTICIPANT_SEED, SALE_SEED};
use crate::engine::identity;
use crate::error::SaleError;
use crate::state::{Participant, Sale};

pub fn register_participant(
    ctx: Context<RegisterParticipant>,
    wallet: Pubkey,
    referrer: Pubkey,
) -> Result<()> {
    require_keys_eq!(
        ctx.accounts.operator.key(),
        ctx.accounts.sale.operator,
        SaleError::UnauthorizedOperator
    );

    let now = Clock::get()?.unix_timestamp;
    let sale_key = ctx.accounts.sale.key();
    let referrer_record = ctx.accounts.referrer_participant.as_deref();

    identity::register(
        &mut ctx.accounts.participant,
        sale_key,
        wallet,
        referrer,
        referrer_record,
        now,
        ctx.bumps.participant,
    )?;

    emit!(ParticipantRegistered {
        sale: sale_key,
        wallet,
        referrer,
        registered_at: now,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(wallet: Pubkey)]
pub struct RegisterParticipant<'info> {
    #[account(seeds = [SALE_SEED, sale.payout_mint.as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, Sale>>,

    // Created on first use; a second registration fails in the identity gate.
    #[account(
        init_if_needed,
        payer = operator,
        space = 8 + Participant::SIZE,
        seeds = [PARTICIPANT_SEED, sale.key().as_ref(), wallet.as_ref()],
        bump
    )]
    pub participant: Account<'info, Participant>,

    /// Required when `referrer` is set; checked against it in-handler.
    pub referrer_participant: Option<Account<'info, Participant>>,

    #[account(mut)]
    pub operator: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[event]
pub struct ParticipantRegistered {
    pub sale: Pubkey,
    pub wallet: Pubkey,
    pub referrer: Pubkey,
    pub registered_at: i64,
}

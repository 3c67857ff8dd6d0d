use anchor_lang::prelude::*;

use crate::constants::{PARTICIPANT_SEED, SALE_SEED};
use crate::engine::identity;
use crate::error::SaleError;
use crate::state::{Participant, Sale};

pub fn verify_kyc(ctx: Context<VerifyKyc>, wallet: Pubkey) -> Result<()> {
    require_keys_eq!(
        ctx.accounts.operator.key(),
        ctx.accounts.sale.operator,
        SaleError::UnauthorizedOperator
    );

    let changed = identity::verify_kyc(&mut ctx.accounts.participant)?;
    if !changed {
        msg!("KYC already verified for {}", wallet);
        return Ok(());
    }

    emit!(KycVerified {
        sale: ctx.accounts.sale.key(),
        wallet,
    });
    Ok(())
}

#[derive(Accounts)]
#[instruction(wallet: Pubkey)]
pub struct VerifyKyc<'info> {
    #[account(seeds = [SALE_SEED, sale.payout_mint.as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, Sale>>,

    #[account(
        mut,
        seeds = [PARTICIPANT_SEED, sale.key().as_ref(), wallet.as_ref()],
        bump = participant.bump
    )]
    pub participant: Account<'info, Participant>,

    pub operator: Signer<'info>,
}

#[event]
pub struct KycVerified {
    pub sale: Pubkey,
    pub wallet: Pubkey,
}

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::SALE_SEED;
use crate::error::SaleError;
use crate::state::Sale;

/// Withdraw custodied payment assets from a sale treasury.
pub fn admin_withdraw(ctx: Context<AdminWithdraw>, amount: u64) -> Result<()> {
    require!(amount > 0, SaleError::InvalidAmount);

    let st = &ctx.accounts.sale;
    require_keys_eq!(ctx.accounts.admin.key(), st.admin, SaleError::UnauthorizedAdmin);
    require!(
        st.is_accepted(&ctx.accounts.payment_mint.key()),
        SaleError::AssetNotAccepted
    );
    require_keys_eq!(
        ctx.accounts.admin_destination.mint,
        ctx.accounts.payment_mint.key(),
        SaleError::InvalidTokenMint
    );
    require_keys_eq!(
        ctx.accounts.admin_destination.owner,
        ctx.accounts.admin.key(),
        SaleError::InvalidTokenAccount
    );
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
                to: ctx.accounts.admin_destination.to_account_info(),
                authority: st.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
    )?;

    emit!(TreasuryWithdrawn {
        admin: st.admin,
        payment_mint: ctx.accounts.payment_mint.key(),
        amount,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct AdminWithdraw<'info> {
    #[account(seeds = [SALE_SEED, sale.payout_mint.as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, Sale>>,

    pub payment_mint: Account<'info, Mint>,

    #[account(
        mut,
        associated_token::mint = payment_mint,
        associated_token::authority = sale,
    )]
    pub treasury: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin_destination: Account<'info, TokenAccount>,

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct TreasuryWithdrawn {
    pub admin: Pubkey,
    pub payment_mint: Pubkey,
    pub amount: u64,
}

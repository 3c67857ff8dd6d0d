use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::SALE_SEED;
use crate::error::SaleError;
use crate::state::Sale;

pub fn fund_payout_vault(ctx: Context<FundPayoutVault>, amount: u64) -> Result<()> {
    require!(amount > 0, SaleError::InvalidAmount);

    let st = &ctx.accounts.sale;
    require_keys_eq!(ctx.accounts.admin.key(), st.admin, SaleError::UnauthorizedAdmin);
    require_keys_eq!(
        ctx.accounts.admin_token_account.mint,
        st.payout_mint,
        SaleError::InvalidTokenMint
    );
    require_keys_eq!(
        ctx.accounts.admin_token_account.owner,
        ctx.accounts.admin.key(),
        SaleError::InvalidTokenAccount
    );

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.admin_token_account.to_account_info(),
                to: ctx.accounts.payout_vault.to_account_info(),
                authority: ctx.accounts.admin.to_account_info(),
            },
        ),
        amount,
    )?;

    ctx.accounts.payout_vault.reload()?;

    emit!(PayoutVaultFunded {
        admin: st.admin,
        amount,
        vault_balance: ctx.accounts.payout_vault.amount,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct FundPayoutVault<'info> {
    #[account(seeds = [SALE_SEED, sale.payout_mint.as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, Sale>>,

    #[account(
        mut,
        associated_token::mint = payout_mint,
        associated_token::authority = sale,
    )]
    pub payout_vault: Account<'info, TokenAccount>,

    #[account(address = sale.payout_mint @ SaleError::InvalidTokenMint)]
    pub payout_mint: Account<'info, Mint>,

    #[account(mut)]
    pub admin_token_account: Account<'info, TokenAccount>,

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct PayoutVaultFunded {
    pub admin: Pubkey,
    pub amount: u64,
    pub vault_balance: u64,
}

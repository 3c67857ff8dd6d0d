use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::SALE_SEED;
use crate::state::{Sale, SaleConfig};

pub fn initialize_sale(ctx: Context<InitializeSale>, config: SaleConfig) -> Result<()> {
    let sale = Sale::new(
        ctx.accounts.admin.key(),
        ctx.accounts.payout_mint.key(),
        ctx.accounts.payout_mint.decimals,
        ctx.bumps.sale,
        config,
    )?;

    let st = &mut ctx.accounts.sale;
    st.set_inner(sale);

    msg!(
        "Sale initialized: {} stages, {} levels, {} tiers",
        st.stages.len(),
        st.levels.len(),
        st.tiers.len()
    );

    emit!(SaleInitialized {
        admin: st.admin,
        operator: st.operator,
        payout_mint: st.payout_mint,
        payout_vault: ctx.accounts.payout_vault.key(),
        accepted_mints: st.accepted_mints.clone(),
        stage_count: st.stages.len() as u8,
        span_stages: st.span_stages,
        config_hash: st.config_hash,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(config: SaleConfig)]
pub struct InitializeSale<'info> {
    #[account(
        init,
        payer = admin,
        space = Sale::space_for(&config),
        seeds = [SALE_SEED, payout_mint.key().as_ref()],
        bump
    )]
    pub sale: Box<Account<'info, Sale>>,

    #[account(
        init,
        payer = admin,
        associated_token::mint = payout_mint,
        associated_token::authority = sale,
    )]
    pub payout_vault: Account<'info, TokenAccount>,

    pub payout_mint: Account<'info, Mint>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

#[event]
pub struct SaleInitialized {
    pub admin: Pubkey,
    pub operator: Pubkey,
    pub payout_mint: Pubkey,
    pub payout_vault: Pubkey,
    pub accepted_mints: Vec<Pubkey>,
    pub stage_count: u8,
    pub span_stages: bool,
    pub config_hash: [u8; 32],
}

use anchor_lang::prelude::*;

use crate::constants::SALE_SEED;
use crate::error::SaleError;
use crate::state::Sale;

pub fn unpause_sale(ctx: Context<UnpauseSale>) -> Result<()> {
    let st = &mut ctx.accounts.sale;
    require_keys_eq!(ctx.accounts.admin.key(), st.admin, SaleError::UnauthorizedAdmin);
    require!(st.paused, SaleError::SaleNotPaused);
    st.paused = false;
    emit!(SaleUnpaused { admin: st.admin });
    Ok(())
}

#[derive(Accounts)]
pub struct UnpauseSale<'info> {
    #[account(mut, seeds = [SALE_SEED, sale.payout_mint.as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, Sale>>,
    pub admin: Signer<'info>,
}

#[event]
pub struct SaleUnpaused {
    pub admin: Pubkey,
}

use anchor_lang::prelude::*;

use crate::constants::SALE_SEED;
use crate::error::SaleError;
use crate::state::Sale;

pub fn set_operator(ctx: Context<SetOperator>, new_operator: Pubkey) -> Result<()> {
    require!(
        new_operator != Pubkey::default(),
        SaleError::InvalidConfiguration
    );

    let sale_key = ctx.accounts.sale.key();
    let st = &mut ctx.accounts.sale;
    require_keys_eq!(ctx.accounts.admin.key(), st.admin, SaleError::UnauthorizedAdmin);
    // The sale PDA cannot sign, so it can never act as operator.
    require!(new_operator != sale_key, SaleError::InvalidConfiguration);

    let old = st.operator;
    st.operator = new_operator;

    emit!(OperatorSet {
        admin: st.admin,
        old_operator: old,
        new_operator,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct SetOperator<'info> {
    #[account(mut, seeds = [SALE_SEED, sale.payout_mint.as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, Sale>>,

    pub admin: Signer<'info>,
}

#[event]
pub struct OperatorSet {
    pub admin: Pubkey,
    pub old_operator: Pubkey,
    pub new_operator: Pubkey,
}

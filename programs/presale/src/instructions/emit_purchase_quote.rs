use anchor_lang::prelude::*;

use crate::constants::SALE_SEED;
use crate::state::Sale;

/// Read-only: report what `usd_amount` buys at the active stage.
pub fn emit_purchase_quote(ctx: Context<EmitPurchaseQuote>, usd_amount: u64) -> Result<()> {
    let st = &ctx.accounts.sale;
    let stage = st.current_stage();
    let quote = st.quote(usd_amount, stage)?;
    let stage_info = &st.stages[stage];

    emit!(PurchaseQuote {
        current_stage: stage as u8,
        price_cents: stage_info.price_cents,
        bonus_percent: stage_info.bonus_percent,
        usd_amount,
        tokens: quote.tokens,
        bonus_tokens: quote.bonus_tokens,
        capacity_remaining: quote.capacity_remaining,
        sold_out: st.is_sold_out(),
        paused: st.paused,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct EmitPurchaseQuote<'info> {
    #[account(seeds = [SALE_SEED, sale.payout_mint.as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, Sale>>,
}

#[event]
pub struct PurchaseQuote {
    pub current_stage: u8,
    pub price_cents: u64,
    pub bonus_percent: u16,
    pub usd_amount: u64,
    pub tokens: u64,
    pub bonus_tokens: u64,
    pub capacity_remaining: u64,
    pub sold_out: bool,
    pub paused: bool,
}

use anchor_lang::prelude::*;

pub mod constants;
pub mod engine;
pub mod error;
pub mod instructions;
pub mod state;
pub mod utils;

use instructions::*;
use state::SaleConfig;

declare_id!("Q2Udpt5nroND7MD9JwuxwE5GybcECafWbMmuAYYjrr8");

#[program]
pub mod presale {
    use super::*;

    pub fn initialize_sale(ctx: Context<InitializeSale>, config: SaleConfig) -> Result<()> {
        instructions::initialize_sale::initialize_sale(ctx, config)
    }

    pub fn register_participant(
        ctx: Context<RegisterParticipant>,
        wallet: Pubkey,
        referrer: Pubkey,
    ) -> Result<()> {
        instructions::register_participant::register_participant(ctx, wallet, referrer)
    }

    pub fn verify_kyc(ctx: Context<VerifyKyc>, wallet: Pubkey) -> Result<()> {
        instructions::verify_kyc::verify_kyc(ctx, wallet)
    }

    pub fn buy_tokens(ctx: Context<BuyTokens>, payment_amount: u64) -> Result<()> {
        instructions::buy_tokens::buy_tokens(ctx, payment_amount)
    }

    pub fn claim_vested(ctx: Context<ClaimVested>, schedule_id: u64) -> Result<()> {
        instructions::claim_vested::claim_vested(ctx, schedule_id)
    }

    pub fn claim_referral_rewards(ctx: Context<ClaimReferralRewards>) -> Result<()> {
        instructions::claim_referral_rewards::claim_referral_rewards(ctx)
    }

    pub fn fund_payout_vault(ctx: Context<FundPayoutVault>, amount: u64) -> Result<()> {
        instructions::fund_payout_vault::fund_payout_vault(ctx, amount)
    }

    pub fn admin_withdraw(ctx: Context<AdminWithdraw>, amount: u64) -> Result<()> {
        instructions::admin_withdraw::admin_withdraw(ctx, amount)
    }

    pub fn set_operator(ctx: Context<SetOperator>, new_operator: Pubkey) -> Result<()> {
        instructions::set_operator::set_operator(ctx, new_operator)
    }

    pub fn pause_sale(ctx: Context<PauseSale>) -> Result<()> {
        instructions::pause_sale::pause_sale(ctx)
    }

    pub fn unpause_sale(ctx: Context<UnpauseSale>) -> Result<()> {
        instructions::unpause_sale::unpause_sale(ctx)
    }

    pub fn emit_purchase_quote(ctx: Context<EmitPurchaseQuote>, usd_amount: u64) -> Result<()> {
        instructions::emit_purchase_quote::emit_purchase_quote(ctx, usd_amount)
    }

    pub fn emit_claim_quote(ctx: Context<EmitClaimQuote>, schedule_id: u64) -> Result<()> {
        instructions::emit_claim_quote::emit_claim_quote(ctx, schedule_id)
    }
}

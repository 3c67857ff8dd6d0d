pub mod initialize_sale;
pub mod register_participant;
pub mod verify_kyc;
pub mod buy_tokens;
pub mod claim_vested;
pub mod claim_referral_rewards;
pub mod fund_payout_vault;
pub mod admin_withdraw;
pub mod set_operator;
pub mod pause_sale;
pub mod unpause_sale;
pub mod emit_purchase_quote;
pub mod emit_claim_quote;

pub use initialize_sale::*;
pub use register_participant::*;
pub use verify_kyc::*;
pub use buy_tokens::*;
pub use claim_vested::*;
pub use claim_referral_rewards::*;
pub use fund_payout_vault::*;
pub use admin_withdraw::*;
pub use set_operator::*;
pub use pause_sale::*;
pub use unpause_sale::*;
pub use emit_purchase_quote::*;
pub use emit_claim_quote::*;

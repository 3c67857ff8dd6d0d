//! Deterministic sale engine.
//!
//! Every operation here is a pure function of the state records it is given
//! plus an explicit `now`; instruction handlers only load accounts, call in,
//! and move tokens. Operations validate and compute before they mutate, so a
//! returned error leaves every record exactly as it was.

pub mod identity;
pub mod purchase;
pub mod referral;
pub mod stage_ledger;
pub mod vesting;

pub use purchase::{PurchaseOutcome, PurchaseReceipt, PurchaseRequest};
pub use stage_ledger::{SalePlan, StageFill, StageQuote};

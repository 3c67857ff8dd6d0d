use anchor_lang::prelude::*;

/// Vesting schedule PDA, one per purchase. Fully claimed is terminal; it is never closed.
#[account]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct VestingSchedule {
    pub sale: Pubkey,
    /// Buyer; the only wallet allowed to claim.
    pub owner: Pubkey,
    pub id: u64,
    /// Payout base units granted by the purchase (bonus included).
    pub total_amount: u64,
    /// Portion released at creation (TGE unlock).
    pub unlocked_at_creation: u64,
    /// Unix seconds, UTC.
    pub start_time: i64,
    /// Seconds over which the remainder releases linearly.
    pub duration: i64,
    /// Monotonic; never above `total_amount`.
    pub claimed_amount: u64,
    pub bump: u8,
}

impl VestingSchedule {
    pub const SIZE: usize =
        32 + // sale
        32 + // owner
        8 +  // id
        8 +  // total_amount
        8 +  // unlocked_at_creation
        8 +  // start_time
        8 +  // duration
        8 +  // claimed_amount
        1;   // bump

    pub fn is_fully_claimed(&self) -> bool {
        self.claimed_amount >= self.total_amount
    }
}

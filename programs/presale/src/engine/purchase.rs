//! Purchase engine: eligibility, stage allocation, vesting and referral credit
//! applied as one unit.

use anchor_lang::prelude::Pubkey;

use crate::constants::NO_REFERRER;
use crate::engine::identity;
use crate::engine::referral::{self, ReferralCredit};
use crate::engine::stage_ledger::StageFill;
use crate::engine::vesting;
use crate::error::SaleError;
use crate::state::{Participant, Sale, VestingSchedule};

/// Caller-supplied inputs of one purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PurchaseRequest {
    /// Sale account address, recorded on the new schedule.
    pub sale: Pubkey,
    pub payment_mint: Pubkey,
    /// Base units of `payment_mint` offered; USD-pegged, converted 1:1.
    pub payment_amount: u64,
    pub now: i64,
    pub schedule_bump: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub buyer: Pubkey,
    pub payment_mint: Pubkey,
    /// USD consumed; the only amount the buyer is charged.
    pub usd_spent: u64,
    /// Offered USD left over once every stage was full.
    pub usd_unspent: u64,
    pub stages_touched: Vec<StageFill>,
    pub base_tokens: u64,
    pub bonus_tokens: u64,
    pub total_tokens: u64,
    pub unlocked_now: u64,
    pub vesting_schedule_id: u64,
    pub stage_before: u8,
    pub stage_after: u8,
    pub referrer: Pubkey,
    pub referral_reward: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseOutcome {
    pub receipt: PurchaseReceipt,
    pub schedule: VestingSchedule,
}

/// Execute a purchase for `buyer`.
///
/// `referrer` must be the buyer's referrer record when the buyer has one and
/// `None` otherwise. Nothing is written unless every step succeeds.
pub fn buy(
    sale: &mut Sale,
    buyer: &mut Participant,
    referrer: Option<&mut Participant>,
    req: PurchaseRequest,
) -> Result<PurchaseOutcome, SaleError> {
    if sale.paused {
        return Err(SaleError::SalePaused);
    }
    if !sale.is_accepted(&req.payment_mint) {
        return Err(SaleError::AssetNotAccepted);
    }
    if !identity::is_purchase_eligible(buyer) {
        return Err(SaleError::NotEligible);
    }
    if req.payment_amount == 0 {
        return Err(SaleError::InvalidAmount);
    }
    match (buyer.has_referrer(), referrer.as_deref()) {
        (true, Some(r)) if r.wallet == buyer.referrer && r.sale == buyer.sale => {}
        (false, None) => {}
        _ => return Err(SaleError::ReferrerAccountMismatch),
    }

    // Stablecoins are USD-pegged: one base unit is one USD base unit.
    let usd = req.payment_amount;

    let stage_before = sale.current_stage();
    let plan = sale.plan_sale(usd)?;
    let tier = *sale.tier_for(plan.usd_spent)?;

    let total_tokens = plan
        .tokens
        .checked_add(plan.bonus_tokens)
        .ok_or(SaleError::MathOverflow)?;
    let schedule_id = sale.schedule_count;
    let schedule = vesting::create_schedule(
        req.sale,
        buyer.wallet,
        schedule_id,
        total_tokens,
        &tier,
        req.now,
        req.schedule_bump,
    )?;

    let credit: Option<ReferralCredit> = match referrer.as_deref() {
        Some(r) => Some(referral::preview_credit(&sale.levels, r, plan.usd_spent)?),
        None => None,
    };
    let referral_reward = credit.map(|c| c.reward).unwrap_or(0);

    let purchased_after = buyer
        .cumulative_purchased_usd
        .checked_add(plan.usd_spent)
        .ok_or(SaleError::MathOverflow)?;
    let purchase_count_after = buyer
        .purchase_count
        .checked_add(1)
        .ok_or(SaleError::MathOverflow)?;
    let tokens_sold_after = sale
        .total_tokens_sold
        .checked_add(plan.tokens)
        .ok_or(SaleError::MathOverflow)?;
    let bonus_after = sale
        .total_bonus_tokens
        .checked_add(plan.bonus_tokens)
        .ok_or(SaleError::MathOverflow)?;
    let raised_after = sale
        .total_usd_raised
        .checked_add(plan.usd_spent)
        .ok_or(SaleError::MathOverflow)?;
    let rewards_after = sale
        .total_referral_rewards
        .checked_add(referral_reward)
        .ok_or(SaleError::MathOverflow)?;
    let schedule_count_after = schedule_id
        .checked_add(1)
        .ok_or(SaleError::MathOverflow)?;

    // Everything below is infallible.
    sale.apply_sale(&plan);
    sale.total_tokens_sold = tokens_sold_after;
    sale.total_bonus_tokens = bonus_after;
    sale.total_usd_raised = raised_after;
    sale.total_referral_rewards = rewards_after;
    sale.schedule_count = schedule_count_after;

    buyer.cumulative_purchased_usd = purchased_after;
    buyer.purchase_count = purchase_count_after;

    if let (Some(r), Some(c)) = (referrer, credit.as_ref()) {
        referral::apply_credit(r, c);
    }

    let receipt = PurchaseReceipt {
        buyer: buyer.wallet,
        payment_mint: req.payment_mint,
        usd_spent: plan.usd_spent,
        usd_unspent: usd - plan.usd_spent,
        stages_touched: plan.fills,
        base_tokens: plan.tokens,
        bonus_tokens: plan.bonus_tokens,
        total_tokens,
        unlocked_now: schedule.unlocked_at_creation,
        vesting_schedule_id: schedule_id,
        stage_before: stage_before as u8,
        stage_after: sale.current_stage() as u8,
        referrer: if buyer.has_referrer() { buyer.referrer } else { NO_REFERRER },
        referral_reward,
    };

    Ok(PurchaseOutcome { receipt, schedule })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::*;
    use crate::engine::identity;
    use crate::state::{DesignatedLevel, StageParams, VestingTier};

    fn request(f: &Fixture, usd: u64, now: i64) -> PurchaseRequest {
        PurchaseRequest {
            sale: f.sale_key,
            payment_mint: f.usdt,
            payment_amount: usd,
            now,
            schedule_bump: 250,
        }
    }

    fn pay(
        f: &mut Fixture,
        buyer: &mut Participant,
        referrer: Option<&mut Participant>,
        usd: u64,
    ) -> Result<PurchaseOutcome, SaleError> {
        let req = request(f, usd, T0);
        buy(&mut f.sale, buyer, referrer, req)
    }

    #[test]
    fn stage_advance_scenario() {
        let mut f = two_stage_fixture();
        let mut buyer = verified(f.sale_key, None);

        let r = pay(&mut f, &mut buyer, None, 5 * USD).unwrap();
        assert_eq!(r.receipt.stage_after, 0);
        assert_eq!(f.sale.stages[0].sold, 5 * TOKEN);

        // Crossing stage 0's boundary: the excess carries into stage 1.
        let r = pay(&mut f, &mut buyer, None, 100 * USD).unwrap();
        assert_eq!(f.sale.stages[0].sold, 100 * TOKEN);
        assert_eq!(f.sale.stages[1].sold, 5 * TOKEN);
        assert_eq!(f.sale.current_stage(), 1);
        assert_eq!(r.receipt.stages_touched.len(), 2);
        assert_eq!(r.receipt.stage_before, 0);
        assert_eq!(r.receipt.stage_after, 1);

        // Final purchase sells out; only the consumed 95 USD is charged.
        let r = pay(&mut f, &mut buyer, None, 200 * USD).unwrap();
        assert_eq!(r.receipt.usd_spent, 95 * USD);
        assert_eq!(r.receipt.usd_unspent, 105 * USD);
        assert_eq!(f.sale.stages[1].sold, 100 * TOKEN);
        assert_eq!(f.sale.current_stage(), 1);

        let res = pay(&mut f, &mut buyer, None, 5 * USD);
        assert!(matches!(res, Err(SaleError::SaleSoldOut)));
        assert_eq!(buyer.cumulative_purchased_usd, 200 * USD);
        assert_eq!(buyer.purchase_count, 3);
        assert_eq!(f.sale.total_usd_raised, 200 * USD);
        assert_eq!(f.sale.total_tokens_sold, 200 * TOKEN);
    }

    #[test]
    fn two_hundred_fills_both_stages() {
        let mut f = two_stage_fixture();
        let mut buyer = verified(f.sale_key, None);
        let r = pay(&mut f, &mut buyer, None, 200 * USD).unwrap();
        assert_eq!(r.receipt.base_tokens, 200 * TOKEN);
        assert_eq!(f.sale.current_stage(), 1);
        assert!(f.sale.is_sold_out());
    }

    #[test]
    fn buy_before_kyc_fails() {
        let mut f = two_stage_fixture();
        let mut buyer = registered(f.sale_key, None);
        let res = pay(&mut f, &mut buyer, None, 5 * USD);
        assert!(matches!(res, Err(SaleError::NotEligible)));

        identity::verify_kyc(&mut buyer).unwrap();
        pay(&mut f, &mut buyer, None, 5 * USD).unwrap();
    }

    #[test]
    fn unknown_asset_rejected() {
        let mut f = two_stage_fixture();
        let mut buyer = verified(f.sale_key, None);
        let mut req = request(&f, 5 * USD, T0);
        req.payment_mint = Pubkey::new_unique();
        let res = buy(&mut f.sale, &mut buyer, None, req);
        assert!(matches!(res, Err(SaleError::AssetNotAccepted)));
    }

    #[test]
    fn paused_sale_rejects_purchases() {
        let mut f = two_stage_fixture();
        let mut buyer = verified(f.sale_key, None);
        f.sale.paused = true;
        let res = pay(&mut f, &mut buyer, None, 5 * USD);
        assert!(matches!(res, Err(SaleError::SalePaused)));
    }

    #[test]
    fn vesting_schedule_created_with_tge_unlock() {
        let mut f = fixture_with(|usdt, operator| {
            let mut config = two_stage_config(usdt, operator, true);
            config.stages[0].bonus_percent = 10;
            config
        });
        let mut buyer = verified(f.sale_key, None);
        let out = pay(&mut f, &mut buyer, None, 50 * USD).unwrap();

        // 50 base tokens + 10% bonus; 10% of the total at TGE.
        assert_eq!(out.receipt.base_tokens, 50 * TOKEN);
        assert_eq!(out.receipt.bonus_tokens, 5 * TOKEN);
        assert_eq!(out.receipt.total_tokens, 55 * TOKEN);
        assert_eq!(out.receipt.unlocked_now, 5_500_000);
        // Bonus does not consume capacity.
        assert_eq!(f.sale.stages[0].sold, 50 * TOKEN);

        let mut s = out.schedule;
        assert_eq!(s.owner, buyer.wallet);
        assert_eq!(s.sale, f.sale_key);
        assert_eq!(s.id, 0);
        assert_eq!(s.start_time, T0);
        assert_eq!(s.duration, DAY);
        assert_eq!(s.claim(&buyer.wallet, T0).unwrap(), 5_500_000);
        assert_eq!(s.claim(&buyer.wallet, T0 + DAY).unwrap(), 49_500_000);
        assert_eq!(f.sale.schedule_count, 1);
    }

    #[test]
    fn schedule_ids_increment() {
        let mut f = two_stage_fixture();
        let mut buyer = verified(f.sale_key, None);
        let a = pay(&mut f, &mut buyer, None, 2 * USD).unwrap();
        let b = pay(&mut f, &mut buyer, None, 2 * USD).unwrap();
        assert_eq!(a.receipt.vesting_schedule_id, 0);
        assert_eq!(b.receipt.vesting_schedule_id, 1);
    }

    #[test]
    fn tier_selected_by_purchase_size() {
        let mut f = fixture_with(|usdt, operator| {
            let mut config = two_stage_config(usdt, operator, true);
            config.stages = vec![StageParams {
                price_cents: 100,
                capacity: 1_000_000 * TOKEN,
                bonus_percent: 0,
            }];
            config.tiers = vec![
                VestingTier {
                    min_amount_usd: USD,
                    max_amount_usd: 1_000 * USD,
                    tge_unlock_percent: 50,
                    vesting_duration: DAY,
                },
                VestingTier {
                    min_amount_usd: 1_000 * USD + 1,
                    max_amount_usd: 100_000 * USD,
                    tge_unlock_percent: 5,
                    vesting_duration: 30 * DAY,
                },
            ];
            config
        });
        let mut buyer = verified(f.sale_key, None);

        let small = pay(&mut f, &mut buyer, None, 1_000 * USD).unwrap();
        assert_eq!(small.schedule.unlocked_at_creation, 500 * TOKEN);
        assert_eq!(small.schedule.duration, DAY);

        let large = pay(&mut f, &mut buyer, None, 2_000 * USD).unwrap();
        assert_eq!(large.schedule.unlocked_at_creation, 100 * TOKEN);
        assert_eq!(large.schedule.duration, 30 * DAY);
    }

    #[test]
    fn no_matching_tier_leaves_state_untouched() {
        let mut f = two_stage_fixture();
        let mut buyer = verified(f.sale_key, None);
        let stages_before = f.sale.stages.clone();

        // Tiers start at 1 USD.
        let res = pay(&mut f, &mut buyer, None, USD / 2);
        assert!(matches!(res, Err(SaleError::NoMatchingTier)));
        assert_eq!(f.sale.stages, stages_before);
        assert_eq!(f.sale.schedule_count, 0);
        assert_eq!(f.sale.total_usd_raised, 0);
        assert_eq!(buyer.cumulative_purchased_usd, 0);
        assert_eq!(buyer.purchase_count, 0);
    }

    #[test]
    fn referral_reward_uses_post_update_volume() {
        let mut f = two_stage_fixture();
        let mut referrer = verified(f.sale_key, None);
        let mut buyer = verified(f.sale_key, Some(&referrer));

        // 60 USD: referrer volume 60 < 100, no level yet.
        let r = pay(&mut f, &mut buyer, Some(&mut referrer), 60 * USD).unwrap();
        assert_eq!(r.receipt.referral_reward, 0);
        assert_eq!(r.receipt.referrer, referrer.wallet);
        assert_eq!(referrer.cumulative_referred_sales_usd, 60 * USD);

        // 40 USD takes the volume to exactly 100: this purchase earns 5%.
        let r = pay(&mut f, &mut buyer, Some(&mut referrer), 40 * USD).unwrap();
        assert_eq!(r.receipt.referral_reward, 2 * USD);
        assert_eq!(referrer.referral_rewards_earned_usd, 2 * USD);
        assert_eq!(f.sale.total_referral_rewards, 2 * USD);

        // Rewards are separate from the referrer's own purchases.
        assert_eq!(referrer.cumulative_purchased_usd, 0);
        assert_eq!(referrer.purchase_count, 0);
    }

    #[test]
    fn referrer_record_must_match() {
        let mut f = two_stage_fixture();
        let mut referrer = verified(f.sale_key, None);
        let mut stranger = verified(f.sale_key, None);
        let mut buyer = verified(f.sale_key, Some(&referrer));
        let mut loner = verified(f.sale_key, None);

        let res = pay(&mut f, &mut buyer, None, 5 * USD);
        assert!(matches!(res, Err(SaleError::ReferrerAccountMismatch)));

        let res = pay(&mut f, &mut buyer, Some(&mut stranger), 5 * USD);
        assert!(matches!(res, Err(SaleError::ReferrerAccountMismatch)));

        let res = pay(&mut f, &mut loner, Some(&mut referrer), 5 * USD);
        assert!(matches!(res, Err(SaleError::ReferrerAccountMismatch)));
        assert_eq!(referrer.cumulative_referred_sales_usd, 0);
    }

    #[test]
    fn designated_levels_from_deployment_table() {
        let mut f = fixture_with(|usdt, operator| {
            let mut config = two_stage_config(usdt, operator, true);
            config.stages = vec![StageParams {
                price_cents: 100,
                capacity: 1_000_000 * TOKEN,
                bonus_percent: 14,
            }];
            config.levels = vec![
                DesignatedLevel {
                    reward_percent: 10,
                    min_cumulative_sales: 1_000 * USD,
                },
                DesignatedLevel {
                    reward_percent: 9,
                    min_cumulative_sales: 2_500 * USD,
                },
            ];
            config
        });
        let mut referrer = verified(f.sale_key, None);
        let mut buyer = verified(f.sale_key, Some(&referrer));

        let r = pay(&mut f, &mut buyer, Some(&mut referrer), 3_000 * USD).unwrap();
        // Volume jumps straight past both thresholds; the highest level pays.
        assert_eq!(r.receipt.referral_reward, 270 * USD);
        assert_eq!(r.receipt.bonus_tokens, 420 * TOKEN);
    }
}

//! Stage ledger: per-stage price, capacity and fill; deterministic advancement.

use anchor_lang::prelude::{borsh, AnchorDeserialize, AnchorSerialize};

use crate::error::SaleError;
use crate::state::Sale;
use crate::utils::math::percent_of;

/// Non-mutating conversion of a USD amount at one stage's price.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageQuote {
    pub tokens: u64,
    pub bonus_tokens: u64,
    pub capacity_remaining: u64,
}

/// Portion of a purchase allocated to one stage.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageFill {
    pub stage_index: u8,
    /// Base tokens taken from the stage's capacity.
    pub tokens: u64,
    pub bonus_tokens: u64,
    /// USD base units charged for this portion.
    pub usd: u64,
    /// Stage `sold` once the fill is applied.
    pub sold_after: u64,
}

/// Fully computed allocation of a purchase, ready to apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SalePlan {
    pub fills: Vec<StageFill>,
    pub usd_spent: u64,
    pub tokens: u64,
    pub bonus_tokens: u64,
}

impl Sale {
    /// Lowest stage with capacity left, or the last stage once all are full.
    pub fn current_stage(&self) -> usize {
        self.stages
            .iter()
            .position(|s| !s.is_full())
            .unwrap_or_else(|| self.stages.len().saturating_sub(1))
    }

    pub fn is_sold_out(&self) -> bool {
        self.stages.iter().all(|s| s.is_full())
    }

    /// Convert `usd` at stage `stage_index`'s price without touching state.
    pub fn quote(&self, usd: u64, stage_index: usize) -> Result<StageQuote, SaleError> {
        let stage = self.stages.get(stage_index).ok_or(SaleError::InvalidStage)?;
        let tokens = self.scale().usd_to_tokens(usd, stage.price_cents)?;
        Ok(StageQuote {
            tokens,
            bonus_tokens: percent_of(tokens, stage.bonus_percent)?,
            capacity_remaining: stage.remaining(),
        })
    }

    /// Allocate `usd` against the stages starting at the active one.
    ///
    /// With `span_stages` the excess over a stage's remaining capacity carries
    /// into the following stages at their own prices; otherwise the purchase is
    /// capped at the active stage. Only the USD actually consumed is reported
    /// as spent.
    pub fn plan_sale(&self, usd: u64) -> Result<SalePlan, SaleError> {
        if self.is_sold_out() {
            return Err(SaleError::SaleSoldOut);
        }
        if usd == 0 {
            return Err(SaleError::InvalidAmount);
        }

        let scale = self.scale();
        let mut remaining = usd;
        let mut fills = Vec::new();
        let mut tokens_total: u64 = 0;
        let mut bonus_total: u64 = 0;

        for (idx, stage) in self.stages.iter().enumerate().skip(self.current_stage()) {
            if remaining == 0 {
                break;
            }
            let left = stage.remaining();
            if left == 0 {
                continue;
            }
            let affordable = scale.usd_to_tokens(remaining, stage.price_cents)?;
            if affordable == 0 {
                break;
            }

            // A fill that exhausts the stage is charged at cost; any remainder
            // moves on to the next stage.
            let (tokens, usd_used) = if affordable < left {
                (affordable, remaining)
            } else {
                (left, scale.tokens_to_usd_ceil(left, stage.price_cents)?)
            };
            let bonus_tokens = percent_of(tokens, stage.bonus_percent)?;
            let sold_after = stage
                .sold
                .checked_add(tokens)
                .ok_or(SaleError::MathOverflow)?;

            fills.push(StageFill {
                stage_index: idx as u8,
                tokens,
                bonus_tokens,
                usd: usd_used,
                sold_after,
            });
            tokens_total = tokens_total
                .checked_add(tokens)
                .ok_or(SaleError::MathOverflow)?;
            bonus_total = bonus_total
                .checked_add(bonus_tokens)
                .ok_or(SaleError::MathOverflow)?;
            remaining = remaining
                .checked_sub(usd_used)
                .ok_or(SaleError::MathOverflow)?;

            if !self.span_stages {
                break;
            }
        }

        if fills.is_empty() {
            return Err(SaleError::InvalidAmount);
        }

        Ok(SalePlan {
            fills,
            usd_spent: usd - remaining,
            tokens: tokens_total,
            bonus_tokens: bonus_total,
        })
    }

    /// Write a plan's fills into the stage table. Plans are computed against
    /// the current table, so this cannot fail.
    pub fn apply_sale(&mut self, plan: &SalePlan) {
        for fill in plan.fills.iter() {
            let stage = &mut self.stages[fill.stage_index as usize];
            stage.sold = fill.sold_after;
        }
    }

    /// Plan and apply in one step; returns the per-stage breakdown.
    pub fn record_sale(&mut self, usd: u64) -> Result<Vec<StageFill>, SaleError> {
        let plan = self.plan_sale(usd)?;
        self.apply_sale(&plan);
        Ok(plan.fills)
    }
}

#[cfg(test)]
mod tests {
    use anchor_lang::prelude::Pubkey;

    use super::*;
    use crate::engine::fixtures::{
        fixture_with, two_stage_config, two_stage_fixture, Fixture, TOKEN, USD,
    };
    use crate::state::StageParams;

    fn stage(price_cents: u64, capacity: u64, bonus_percent: u16) -> StageParams {
        StageParams {
            price_cents,
            capacity,
            bonus_percent,
        }
    }

    fn three_price_fixture(span_stages: bool) -> Fixture {
        fixture_with(|usdt, operator| {
            let mut config = two_stage_config(usdt, operator, span_stages);
            config.stages = vec![
                stage(100, 10 * TOKEN, 10),
                stage(200, 10 * TOKEN, 5),
                stage(400, 10 * TOKEN, 0),
            ];
            config
        })
    }

    /// Whole-unit payout token: stage 0 holds one token at $1.50, stage 1 sells at $0.50.
    fn whole_token_sale(span_stages: bool) -> Sale {
        let mut config = two_stage_config(Pubkey::new_unique(), Pubkey::new_unique(), span_stages);
        config.stages = vec![stage(150, 1, 0), stage(50, 10, 0)];
        Sale::new(Pubkey::new_unique(), Pubkey::new_unique(), 0, 254, config).unwrap()
    }

    #[test]
    fn stays_on_stage_below_capacity() {
        let mut f = two_stage_fixture();
        let fills = f.sale.record_sale(5 * USD).unwrap();
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].stage_index, 0);
        assert_eq!(fills[0].tokens, 5 * TOKEN);
        assert_eq!(f.sale.current_stage(), 0);
        assert_eq!(f.sale.stages[0].sold, 5 * TOKEN);
    }

    #[test]
    fn exact_fill_advances_by_one() {
        let mut f = two_stage_fixture();
        f.sale.record_sale(100 * USD).unwrap();
        assert_eq!(f.sale.stages[0].sold, f.sale.stages[0].capacity);
        assert_eq!(f.sale.stages[1].sold, 0);
        assert_eq!(f.sale.current_stage(), 1);
    }

    #[test]
    fn last_stage_is_terminal() {
        let mut f = two_stage_fixture();
        f.sale.record_sale(200 * USD).unwrap();
        assert!(f.sale.is_sold_out());
        assert_eq!(f.sale.current_stage(), 1);
        assert!(matches!(f.sale.record_sale(USD), Err(SaleError::SaleSoldOut)));
    }

    #[test]
    fn spanning_purchase_prices_each_stage_separately() {
        let f = three_price_fixture(true);
        // 10 tokens at $1 ($10) + 10 at $2 ($20) + $10 left at $4 => 2.5 tokens.
        let plan = f.sale.plan_sale(40 * USD).unwrap();
        let tokens: Vec<u64> = plan.fills.iter().map(|x| x.tokens).collect();
        assert_eq!(tokens, vec![10 * TOKEN, 10 * TOKEN, 2_500_000]);
        let usd: Vec<u64> = plan.fills.iter().map(|x| x.usd).collect();
        assert_eq!(usd, vec![10 * USD, 20 * USD, 10 * USD]);
        assert_eq!(plan.tokens, tokens.iter().sum::<u64>());
        // Bonus follows each stage's own percent.
        assert_eq!(plan.bonus_tokens, TOKEN + TOKEN / 2);
        assert_eq!(plan.usd_spent, 40 * USD);
    }

    #[test]
    fn exhausting_a_stage_carries_leftover_forward() {
        let sale = whole_token_sale(true);
        let plan = sale.plan_sale(2 * USD).unwrap();
        let usd: Vec<u64> = plan.fills.iter().map(|x| x.usd).collect();
        assert_eq!(usd, vec![1_500_000, 500_000]);
        assert_eq!(plan.tokens, 2);
        assert_eq!(plan.usd_spent, 2 * USD);
    }

    #[test]
    fn exhausting_a_capped_stage_charges_only_its_cost() {
        let sale = whole_token_sale(false);
        let plan = sale.plan_sale(2 * USD).unwrap();
        assert_eq!(plan.fills.len(), 1);
        assert_eq!(plan.tokens, 1);
        assert_eq!(plan.usd_spent, 1_500_000);
    }

    #[test]
    fn plan_does_not_mutate() {
        let f = three_price_fixture(true);
        let before = f.sale.stages.clone();
        f.sale.plan_sale(35 * USD).unwrap();
        assert_eq!(f.sale.stages, before);
    }

    #[test]
    fn capped_policy_stops_at_active_stage() {
        let mut f = three_price_fixture(false);
        let plan = f.sale.plan_sale(15 * USD).unwrap();
        assert_eq!(plan.fills.len(), 1);
        assert_eq!(plan.tokens, 10 * TOKEN);
        assert_eq!(plan.usd_spent, 10 * USD);
        f.sale.apply_sale(&plan);
        assert_eq!(f.sale.current_stage(), 1);

        // The remainder is a separate purchase at the next stage's price.
        let fills = f.sale.record_sale(5 * USD).unwrap();
        assert_eq!(fills[0].stage_index, 1);
        assert_eq!(fills[0].tokens, 2_500_000);
    }

    #[test]
    fn sell_out_charges_only_consumed_usd() {
        let f = two_stage_fixture();
        let plan = f.sale.plan_sale(250 * USD).unwrap();
        assert_eq!(plan.tokens, 200 * TOKEN);
        assert_eq!(plan.usd_spent, 200 * USD);
    }

    #[test]
    fn dust_payment_rejected() {
        let f = fixture_with(|usdt, operator| {
            let mut config = two_stage_config(usdt, operator, true);
            config.stages[0].price_cents = 1_000_000_000;
            config
        });
        // $0.000001 buys less than one base unit at $10,000,000 per token.
        assert!(matches!(f.sale.plan_sale(1), Err(SaleError::InvalidAmount)));
        assert!(matches!(f.sale.plan_sale(0), Err(SaleError::InvalidAmount)));
    }

    #[test]
    fn quote_reports_tokens_bonus_and_capacity() {
        let mut f = three_price_fixture(true);
        f.sale.record_sale(4 * USD).unwrap();
        let q = f.sale.quote(20 * USD, 0).unwrap();
        assert_eq!(q.tokens, 20 * TOKEN);
        assert_eq!(q.bonus_tokens, 2 * TOKEN);
        assert_eq!(q.capacity_remaining, 6 * TOKEN);

        let q = f.sale.quote(20 * USD, 1).unwrap();
        assert_eq!(q.tokens, 10 * TOKEN);
        assert!(matches!(f.sale.quote(USD, 3), Err(SaleError::InvalidStage)));
    }

    #[test]
    fn sold_never_exceeds_capacity_and_stage_is_monotonic() {
        let mut f = three_price_fixture(true);
        let mut last_stage = f.sale.current_stage();
        for usd in [3 * USD, 7 * USD + 1, 19 * USD, 1, 33 * USD, 50 * USD] {
            match f.sale.record_sale(usd) {
                Ok(_) | Err(SaleError::InvalidAmount) => {}
                Err(e) => panic!("unexpected error {e:?}"),
            }
            for s in f.sale.stages.iter() {
                assert!(s.sold <= s.capacity);
            }
            let stage = f.sale.current_stage();
            assert!(stage >= last_stage);
            last_stage = stage;
        }
        assert!(f.sale.is_sold_out());
    }
}

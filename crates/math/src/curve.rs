//! Bonding curve models
//!
//! Two incompatible pricing laws exist for the launchpad program. The model is
//! picked once, at configuration time, through [`CurveModel`]; nothing in this
//! module blends the two.
//!
//! All arithmetic runs on `Decimal` (28 significant digits). Amounts enter as
//! raw base units and leave as raw base units through exactly one rounding step.

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::{
    decimal::{checked, from_base_units, to_base_units, LAMPORT_DECIMALS, MAX_SCALE},
    error::{MathError, MathResult},
};

/// Default divisor of the quadratic law
pub const DEFAULT_PROPORTION: i64 = 1280;
/// Decimals of a freshly minted launchpad token
pub const DEFAULT_TOKEN_DECIMALS: u32 = 9;
/// Extra decimals of the quadratic model's secondary denomination (divisor 1,000,000)
pub const DEFAULT_SECONDARY_DECIMALS: u32 = 6;

// ============================================================================
// Curve State
// ============================================================================

/// The part of a pool snapshot that drives price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CurveState {
    /// Supply issued at launch
    pub total_supply: u64,
    /// Tokens still held by the pool
    pub reserve_token: u64,
}

impl CurveState {
    pub fn new(total_supply: u64, reserve_token: u64) -> Self {
        Self {
            total_supply,
            reserve_token,
        }
    }

    /// Tokens sold so far, `total_supply - reserve_token`
    pub fn tokens_sold(&self) -> MathResult<u64> {
        self.total_supply
            .checked_sub(self.reserve_token)
            .ok_or(MathError::InconsistentState {
                total_supply: self.total_supply,
                reserve_token: self.reserve_token,
            })
    }

    /// Share of the supply sold, in basis points
    pub fn progress_bps(&self) -> MathResult<u16> {
        let sold = self.tokens_sold()?;
        if self.total_supply == 0 {
            return Ok(0);
        }
        Ok((sold as u128 * 10_000 / self.total_supply as u128) as u16)
    }

    /// State after the pool hands out `amount` tokens
    pub fn after_buy(&self, amount: u64) -> MathResult<Self> {
        self.tokens_sold()?;
        let reserve_token = self
            .reserve_token
            .checked_sub(amount)
            .ok_or(MathError::overflow("after_buy"))?;
        Ok(Self {
            reserve_token,
            ..*self
        })
    }

    /// State after the pool takes back `amount` tokens
    pub fn after_sell(&self, amount: u64) -> MathResult<Self> {
        let sold = self.tokens_sold()?;
        if amount > sold {
            return Err(MathError::SellExceedsSold {
                requested: amount,
                sold,
            });
        }
        Ok(Self {
            reserve_token: self.reserve_token + amount,
            ..*self
        })
    }
}

// ============================================================================
// Quadratic Model
// ============================================================================

/// `cost(s -> s+Δ) = ((s+Δ)² - s²) / proportion` SOL, with `s` in whole units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadraticCurve {
    /// Divisor applied to the squared sold amount
    pub proportion: Decimal,
    /// Decimals of the issued token mint
    pub token_decimals: u32,
    /// Decimals of the secondary denomination stacked on top of the mint decimals
    pub secondary_decimals: u32,
}

impl Default for QuadraticCurve {
    fn default() -> Self {
        Self {
            proportion: Decimal::from(DEFAULT_PROPORTION),
            token_decimals: DEFAULT_TOKEN_DECIMALS,
            secondary_decimals: DEFAULT_SECONDARY_DECIMALS,
        }
    }
}

impl QuadraticCurve {
    /// Base units per whole unit, as a power of ten
    fn unit_scale(&self) -> u32 {
        self.token_decimals + self.secondary_decimals
    }

    fn to_units(&self, raw: u64) -> MathResult<Decimal> {
        from_base_units(raw, self.unit_scale())
    }

    pub fn validate(&self) -> MathResult<()> {
        if self.proportion <= Decimal::ZERO {
            return Err(MathError::invalid_parameter(
                "proportion",
                format!("must be positive, got {}", self.proportion),
            ));
        }
        if self.token_decimals + self.secondary_decimals > MAX_SCALE {
            return Err(MathError::invalid_parameter(
                "secondary_decimals",
                format!("token and secondary decimals must not exceed {}", MAX_SCALE),
            ));
        }
        Ok(())
    }

    /// Lamports needed to move the curve from `sold` to `sold + amount`
    pub fn buy_cost(&self, sold: u64, amount: u64) -> MathResult<u64> {
        let s = self.to_units(sold)?;
        let delta = self.to_units(amount)?;

        // (s+Δ)² - s² = Δ(2s+Δ)
        let span = checked(
            s.checked_mul(Decimal::TWO).and_then(|v| v.checked_add(delta)),
            "quadratic buy",
        )?;
        let sol = checked(
            delta
                .checked_mul(span)
                .and_then(|v| v.checked_div(self.proportion)),
            "quadratic buy",
        )?;

        to_base_units(sol, LAMPORT_DECIMALS, "quadratic buy")
    }

    /// Lamports returned for moving the curve from `sold` back to `sold - amount`
    pub fn sell_return(&self, sold: u64, amount: u64) -> MathResult<u64> {
        if amount > sold {
            return Err(MathError::SellExceedsSold {
                requested: amount,
                sold,
            });
        }
        let s = self.to_units(sold)?;
        let delta = self.to_units(amount)?;

        // s² - (s-Δ)² = Δ(2s-Δ)
        let span = checked(
            s.checked_mul(Decimal::TWO).and_then(|v| v.checked_sub(delta)),
            "quadratic sell",
        )?;
        let sol = checked(
            delta
                .checked_mul(span)
                .and_then(|v| v.checked_div(self.proportion)),
            "quadratic sell",
        )?;

        to_base_units(sol, LAMPORT_DECIMALS, "quadratic sell")
    }

    /// Token base units obtainable for `lamports`, solving `s' = sqrt(P·C + s²)`
    pub fn tokens_for_sol(&self, sold: u64, lamports: u64) -> MathResult<u64> {
        let s = self.to_units(sold)?;
        let sol = from_base_units(lamports, LAMPORT_DECIMALS)?;

        let radicand = checked(
            self.proportion
                .checked_mul(sol)
                .and_then(|v| s.checked_mul(s).and_then(|sq| v.checked_add(sq))),
            "quadratic inverse",
        )?;
        let root = checked(radicand.sqrt(), "quadratic inverse")?;
        let tokens = checked(root.checked_sub(s), "quadratic inverse")?.max(Decimal::ZERO);

        to_base_units(tokens, self.unit_scale(), "quadratic inverse")
    }

    /// Marginal price at `sold`, in lamports per whole unit
    pub fn spot_price(&self, sold: u64) -> MathResult<u64> {
        let s = self.to_units(sold)?;
        let sol = checked(
            s.checked_mul(Decimal::TWO)
                .and_then(|v| v.checked_div(self.proportion)),
            "quadratic spot price",
        )?;
        to_base_units(sol, LAMPORT_DECIMALS, "quadratic spot price")
    }
}

// ============================================================================
// Linear Model
// ============================================================================

/// `price(x) = slope·x + intercept` SOL per whole token, with `x` the whole tokens sold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearCurve {
    /// Price increase per whole token sold, in SOL
    pub slope: Decimal,
    /// Price of the first token, in SOL
    pub intercept: Decimal,
    /// Decimals of the issued token mint
    pub token_decimals: u32,
}

impl Default for LinearCurve {
    fn default() -> Self {
        Self {
            slope: Decimal::new(1, 6),
            intercept: Decimal::new(1, 5),
            token_decimals: DEFAULT_TOKEN_DECIMALS,
        }
    }
}

impl LinearCurve {
    fn to_units(&self, raw: u64) -> MathResult<Decimal> {
        from_base_units(raw, self.token_decimals)
    }

    pub fn validate(&self) -> MathResult<()> {
        if self.slope.is_sign_negative() {
            return Err(MathError::invalid_parameter(
                "slope",
                format!("must not be negative, got {}", self.slope),
            ));
        }
        if self.intercept <= Decimal::ZERO {
            return Err(MathError::invalid_parameter(
                "intercept",
                format!("must be positive, got {}", self.intercept),
            ));
        }
        if self.token_decimals > MAX_SCALE {
            return Err(MathError::invalid_parameter(
                "token_decimals",
                format!("must not exceed {}", MAX_SCALE),
            ));
        }
        Ok(())
    }

    /// Price at `midpoint` times `width`, in SOL; exact for a straight line
    fn integrate(&self, midpoint: Decimal, width: Decimal, operation: &'static str) -> MathResult<Decimal> {
        checked(
            self.slope
                .checked_mul(midpoint)
                .and_then(|v| v.checked_add(self.intercept))
                .and_then(|avg| avg.checked_mul(width)),
            operation,
        )
    }

    /// Lamports needed to buy `amount` base units with `sold` already sold
    pub fn buy_cost(&self, sold: u64, amount: u64) -> MathResult<u64> {
        let s = self.to_units(sold)?;
        let delta = self.to_units(amount)?;
        let midpoint = checked(
            delta
                .checked_div(Decimal::TWO)
                .and_then(|half| s.checked_add(half)),
            "linear buy",
        )?;

        let sol = self.integrate(midpoint, delta, "linear buy")?;
        to_base_units(sol, LAMPORT_DECIMALS, "linear buy")
    }

    /// Lamports returned for selling `amount` base units with `sold` already sold
    pub fn sell_return(&self, sold: u64, amount: u64) -> MathResult<u64> {
        if amount > sold {
            return Err(MathError::SellExceedsSold {
                requested: amount,
                sold,
            });
        }
        let s = self.to_units(sold)?;
        let delta = self.to_units(amount)?;
        let midpoint = checked(
            delta
                .checked_div(Decimal::TWO)
                .and_then(|half| s.checked_sub(half)),
            "linear sell",
        )?;

        let sol = self.integrate(midpoint, delta, "linear sell")?;
        to_base_units(sol, LAMPORT_DECIMALS, "linear sell")
    }

    /// Token base units obtainable for `lamports`
    ///
    /// Positive root of `(a/2)·t² + (a·s + b)·t - C = 0`, written as
    /// `t = 2C / (B + sqrt(B² + 2aC))` so a tiny spend does not cancel out
    /// against `B`. A negative discriminant yields zero tokens.
    pub fn tokens_for_sol(&self, sold: u64, lamports: u64) -> MathResult<u64> {
        let s = self.to_units(sold)?;
        let sol = from_base_units(lamports, LAMPORT_DECIMALS)?;

        let b = checked(
            self.slope
                .checked_mul(s)
                .and_then(|v| v.checked_add(self.intercept)),
            "linear inverse",
        )?;
        let discriminant = checked(
            b.checked_mul(b).and_then(|b_sq| {
                self.slope
                    .checked_mul(Decimal::TWO)
                    .and_then(|v| v.checked_mul(sol))
                    .and_then(|v| b_sq.checked_add(v))
            }),
            "linear inverse",
        )?;
        if discriminant.is_sign_negative() {
            return Ok(0);
        }

        let root = checked(discriminant.sqrt(), "linear inverse")?;
        let denominator = checked(b.checked_add(root), "linear inverse")?;
        if denominator <= Decimal::ZERO {
            return Ok(0);
        }

        let tokens = checked(
            sol.checked_mul(Decimal::TWO)
                .and_then(|v| v.checked_div(denominator)),
            "linear inverse",
        )?;
        to_base_units(tokens, self.token_decimals, "linear inverse")
    }

    /// Marginal price at `sold`, in lamports per whole token
    pub fn spot_price(&self, sold: u64) -> MathResult<u64> {
        let s = self.to_units(sold)?;
        let sol = checked(
            self.slope
                .checked_mul(s)
                .and_then(|v| v.checked_add(self.intercept)),
            "linear spot price",
        )?;
        to_base_units(sol, LAMPORT_DECIMALS, "linear spot price")
    }
}

// ============================================================================
// Model Selection
// ============================================================================

/// The pricing law in force, chosen once at configuration time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum CurveModel {
    Quadratic(QuadraticCurve),
    Linear(LinearCurve),
}

impl Default for CurveModel {
    fn default() -> Self {
        CurveModel::Linear(LinearCurve::default())
    }
}

impl CurveModel {
    pub fn name(&self) -> &'static str {
        match self {
            CurveModel::Quadratic(_) => "quadratic",
            CurveModel::Linear(_) => "linear",
        }
    }

    pub fn validate(&self) -> MathResult<()> {
        match self {
            CurveModel::Quadratic(curve) => curve.validate(),
            CurveModel::Linear(curve) => curve.validate(),
        }
    }

    /// Lamports needed to buy `amount` token base units from `state`
    pub fn buy_cost(&self, state: &CurveState, amount: u64) -> MathResult<u64> {
        let sold = state.tokens_sold()?;
        match self {
            CurveModel::Quadratic(curve) => curve.buy_cost(sold, amount),
            CurveModel::Linear(curve) => curve.buy_cost(sold, amount),
        }
    }

    /// Lamports returned for selling `amount` token base units into `state`
    pub fn sell_return(&self, state: &CurveState, amount: u64) -> MathResult<u64> {
        let sold = state.tokens_sold()?;
        match self {
            CurveModel::Quadratic(curve) => curve.sell_return(sold, amount),
            CurveModel::Linear(curve) => curve.sell_return(sold, amount),
        }
    }

    /// Token base units obtainable for `lamports` at `state`
    pub fn tokens_for_sol(&self, state: &CurveState, lamports: u64) -> MathResult<u64> {
        let sold = state.tokens_sold()?;
        match self {
            CurveModel::Quadratic(curve) => curve.tokens_for_sol(sold, lamports),
            CurveModel::Linear(curve) => curve.tokens_for_sol(sold, lamports),
        }
    }

    /// Marginal price at `state`, in lamports per whole token
    pub fn spot_price(&self, state: &CurveState) -> MathResult<u64> {
        let sold = state.tokens_sold()?;
        match self {
            CurveModel::Quadratic(curve) => curve.spot_price(sold),
            CurveModel::Linear(curve) => curve.spot_price(sold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const WHOLE_QUADRATIC_UNIT: u64 = 1_000_000_000_000_000;
    const WHOLE_TOKEN: u64 = 1_000_000_000;

    #[test]
    fn test_quadratic_first_unit_costs_one_over_proportion() {
        let curve = QuadraticCurve::default();
        // 1 / 1280 SOL
        assert_eq!(curve.buy_cost(0, WHOLE_QUADRATIC_UNIT).unwrap(), 781_250);
    }

    #[test]
    fn test_quadratic_buy_is_path_independent() {
        let curve = QuadraticCurve::default();
        let first = 3 * WHOLE_QUADRATIC_UNIT / 4;
        let second = 5 * WHOLE_QUADRATIC_UNIT / 4;

        let one_step = curve.buy_cost(0, first + second).unwrap();
        let two_steps =
            curve.buy_cost(0, first).unwrap() + curve.buy_cost(first, second).unwrap();

        assert!(one_step.abs_diff(two_steps) <= 1);
        // (2² - 0²) / 1280 SOL
        assert_eq!(one_step, 3_125_000);
    }

    #[test]
    fn test_quadratic_sell_mirrors_buy() {
        let curve = QuadraticCurve::default();
        let sold = 10 * WHOLE_QUADRATIC_UNIT;
        let amount = WHOLE_QUADRATIC_UNIT / 2;

        let cost = curve.buy_cost(sold, amount).unwrap();
        let proceeds = curve.sell_return(sold + amount, amount).unwrap();
        assert_eq!(cost, proceeds);
        // 0.5 · 20.5 / 1280 SOL = 8_007_812.5 lamports
        assert_eq!(cost, 8_007_813);
    }

    #[test]
    fn test_quadratic_inverse_recovers_amount() {
        let curve = QuadraticCurve::default();
        assert_eq!(
            curve.tokens_for_sol(0, 781_250).unwrap(),
            WHOLE_QUADRATIC_UNIT
        );

        let sold = 10 * WHOLE_QUADRATIC_UNIT;
        let amount = WHOLE_QUADRATIC_UNIT / 2;
        let cost = curve.buy_cost(sold, amount).unwrap();
        let tokens = curve.tokens_for_sol(sold, cost).unwrap();
        assert!(tokens.abs_diff(amount) <= amount / 1_000_000);
    }

    #[test]
    fn test_quadratic_spot_price() {
        let curve = QuadraticCurve::default();
        assert_eq!(curve.spot_price(0).unwrap(), 0);
        // 2 · 640 / 1280 = 1 SOL per whole unit
        assert_eq!(curve.spot_price(640 * WHOLE_QUADRATIC_UNIT).unwrap(), 1_000_000_000);
    }

    #[test]
    fn test_linear_first_thousand_tokens() {
        let curve = LinearCurve::default();
        // (0.000001 · 500 + 0.00001) · 1000 = 0.51 SOL
        assert_eq!(curve.buy_cost(0, 1_000 * WHOLE_TOKEN).unwrap(), 510_000_000);
        assert_eq!(curve.tokens_for_sol(0, 510_000_000).unwrap(), 1_000 * WHOLE_TOKEN);
    }

    #[test]
    fn test_linear_sell_mirrors_buy() {
        let curve = LinearCurve::default();
        let sold = 12_345 * WHOLE_TOKEN;
        let amount = 678 * WHOLE_TOKEN + 9;

        let cost = curve.buy_cost(sold, amount).unwrap();
        let proceeds = curve.sell_return(sold + amount, amount).unwrap();
        assert_eq!(cost, proceeds);
    }

    #[test]
    fn test_linear_small_spend_does_not_cancel_out() {
        let curve = LinearCurve::default();
        let sold = 1_000_000 * WHOLE_TOKEN;
        // One lamport at a price of ~1.00001 SOL per token
        let tokens = curve.tokens_for_sol(sold, 1).unwrap();
        assert_eq!(tokens, 1);
    }

    #[test]
    fn test_linear_negative_discriminant_yields_zero_tokens() {
        let curve = LinearCurve {
            slope: dec!(-0.001),
            intercept: dec!(0.00001),
            token_decimals: 9,
        };
        assert_eq!(curve.tokens_for_sol(0, 1_000_000_000).unwrap(), 0);
    }

    #[test]
    fn test_selling_more_than_sold_is_rejected() {
        let state = CurveState::new(1_000, 900);
        for model in [
            CurveModel::Quadratic(QuadraticCurve::default()),
            CurveModel::Linear(LinearCurve::default()),
        ] {
            assert_eq!(
                model.sell_return(&state, 101),
                Err(MathError::SellExceedsSold {
                    requested: 101,
                    sold: 100
                })
            );
            assert!(model.sell_return(&state, 100).is_ok());
        }
    }

    #[test]
    fn test_inconsistent_state_is_rejected() {
        let state = CurveState::new(100, 101);
        let model = CurveModel::default();
        assert!(matches!(
            model.buy_cost(&state, 1),
            Err(MathError::InconsistentState { .. })
        ));
    }

    #[test]
    fn test_state_transitions_and_progress() {
        let state = CurveState::new(10_000, 10_000);
        assert_eq!(state.progress_bps().unwrap(), 0);

        let bought = state.after_buy(2_500).unwrap();
        assert_eq!(bought.tokens_sold().unwrap(), 2_500);
        assert_eq!(bought.progress_bps().unwrap(), 2_500);

        let sold_back = bought.after_sell(500).unwrap();
        assert_eq!(sold_back.tokens_sold().unwrap(), 2_000);
        assert!(sold_back.after_sell(2_001).is_err());
        assert_eq!(CurveState::default().progress_bps().unwrap(), 0);
    }

    #[test]
    fn test_validation() {
        assert!(CurveModel::default().validate().is_ok());
        assert!(CurveModel::Quadratic(QuadraticCurve::default())
            .validate()
            .is_ok());

        let flat = QuadraticCurve {
            proportion: Decimal::ZERO,
            ..Default::default()
        };
        assert!(flat.validate().is_err());

        let falling = LinearCurve {
            slope: dec!(-0.1),
            ..Default::default()
        };
        assert!(falling.validate().is_err());

        let too_fine = QuadraticCurve {
            token_decimals: 20,
            secondary_decimals: 9,
            ..Default::default()
        };
        assert!(too_fine.validate().is_err());
    }
}

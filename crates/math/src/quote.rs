//! Trade quotes
//!
//! Quotes are throwaway value objects: recomputed from the latest pool
//! snapshot on every input change and never persisted.

use crate::{
    curve::{CurveModel, CurveState},
    error::{MathError, MathResult},
    fees::FeePolicy,
};

/// Preview of spending `gross_amount` lamports on a buy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyQuote {
    /// Lamports the trader pays in total
    pub gross_amount: u64,
    /// Lamports redirected to the fee recipient
    pub platform_fee: u64,
    /// Lamports that reach the curve
    pub net_amount: u64,
    /// Token base units the curve should hand out for `net_amount`
    pub tokens_expected: u64,
}

/// Preview of selling `tokens_in` token base units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SellQuote {
    pub tokens_in: u64,
    /// Lamports the curve pays out
    pub gross_amount: u64,
    /// Lamports carved out of the proceeds for the fee recipient
    pub platform_fee: u64,
    /// Lamports the trader keeps
    pub net_amount: u64,
}

/// Direction-agnostic view of a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub gross_amount: u64,
    pub platform_fee: u64,
    pub net_amount: u64,
    /// Tokens received on a buy, tokens given up on a sell
    pub counterparty_amount_expected: u64,
}

impl From<BuyQuote> for Quote {
    fn from(quote: BuyQuote) -> Self {
        Self {
            gross_amount: quote.gross_amount,
            platform_fee: quote.platform_fee,
            net_amount: quote.net_amount,
            counterparty_amount_expected: quote.tokens_expected,
        }
    }
}

impl From<SellQuote> for Quote {
    fn from(quote: SellQuote) -> Self {
        Self {
            gross_amount: quote.gross_amount,
            platform_fee: quote.platform_fee,
            net_amount: quote.net_amount,
            counterparty_amount_expected: quote.tokens_in,
        }
    }
}

/// Quote a buy: the fee comes off the gross spend, the rest is priced on the curve
///
/// The pool can never hand out more than it holds, so `tokens_expected` is
/// capped at `reserve_token`. A spend whose token count would not fit in a
/// `u64` is quoted at that cap instead of failing.
pub fn quote_buy(
    curve: &CurveModel,
    fees: &FeePolicy,
    state: &CurveState,
    gross_spend: u64,
) -> MathResult<BuyQuote> {
    state.tokens_sold()?;
    let split = fees.split(gross_spend);
    let tokens_expected = match curve.tokens_for_sol(state, split.net) {
        Ok(tokens) => tokens.min(state.reserve_token),
        Err(MathError::Overflow { .. }) => state.reserve_token,
        Err(e) => return Err(e),
    };

    Ok(BuyQuote {
        gross_amount: split.gross,
        platform_fee: split.fee,
        net_amount: split.net,
        tokens_expected,
    })
}

/// Quote a sell: the curve prices the full amount, the fee comes off the proceeds
pub fn quote_sell(
    curve: &CurveModel,
    fees: &FeePolicy,
    state: &CurveState,
    tokens_in: u64,
) -> MathResult<SellQuote> {
    let gross = curve.sell_return(state, tokens_in)?;
    let split = fees.split(gross);

    Ok(SellQuote {
        tokens_in,
        gross_amount: split.gross,
        platform_fee: split.fee,
        net_amount: split.net,
    })
}

//! Exact conversions between raw integer amounts and the decimal domain
//!
//! Raw reserves are `u64` base units that routinely exceed the 53-bit mantissa
//! of an `f64`. They enter the decimal domain by setting the scale of the
//! integer, which is exact, and leave it through a single rounding step.

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};

use crate::error::{MathError, MathResult};

/// Decimal places of one SOL expressed in lamports
pub const LAMPORT_DECIMALS: u32 = 9;

/// Largest scale a `Decimal` can carry
pub const MAX_SCALE: u32 = 28;

/// Lift `raw` base units into whole units, where one whole unit is `10^scale` base units
pub fn from_base_units(raw: u64, scale: u32) -> MathResult<Decimal> {
    Decimal::try_from_i128_with_scale(raw as i128, scale)
        .map_err(|_| MathError::overflow("from_base_units"))
}

/// Scale whole units back into base units, rounding half away from zero
pub fn to_base_units(value: Decimal, scale: u32, operation: &'static str) -> MathResult<u64> {
    let scaled = value
        .checked_mul(pow10(scale)?)
        .ok_or(MathError::overflow(operation))?;

    scaled
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(MathError::overflow(operation))
}

/// `10^exponent` as a decimal
pub fn pow10(exponent: u32) -> MathResult<Decimal> {
    if exponent > MAX_SCALE {
        return Err(MathError::overflow("pow10"));
    }
    Decimal::try_from_i128_with_scale(10i128.pow(exponent), 0).map_err(|_| MathError::overflow("pow10"))
}

/// Unwrap a checked decimal operation
pub(crate) fn checked(value: Option<Decimal>, operation: &'static str) -> MathResult<Decimal> {
    value.ok_or(MathError::overflow(operation))
}

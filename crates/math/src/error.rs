use thiserror::Error;

/// Errors produced by curve and fee math
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    /// Intermediate or final value left the representable range
    #[error("Math overflow in '{operation}'")]
    Overflow { operation: &'static str },

    /// Attempted to sell back more tokens than the curve has sold
    #[error("Cannot sell {requested} base units: only {sold} sold")]
    SellExceedsSold { requested: u64, sold: u64 },

    /// Pool snapshot where reserves exceed the launched supply
    #[error("Inconsistent curve state: reserve {reserve_token} exceeds total supply {total_supply}")]
    InconsistentState { total_supply: u64, reserve_token: u64 },

    /// Curve or fee parameter outside its valid domain
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl MathError {
    pub fn overflow(operation: &'static str) -> Self {
        MathError::Overflow { operation }
    }

    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        MathError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type MathResult<T> = Result<T, MathError>;

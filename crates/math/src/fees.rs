use crate::error::{MathError, MathResult};

/// Platform fee charged on top of the curve, as a whole percent
///
/// Buys pay the fee out of the gross spend before the remainder reaches the
/// curve. Sells pay it out of the gross proceeds after the curve pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeePolicy {
    fee_percent: u8,
}

/// A gross amount split into fee and remainder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    pub gross: u64,
    pub fee: u64,
    pub net: u64,
}

impl FeePolicy {
    pub fn new(fee_percent: u8) -> MathResult<Self> {
        if fee_percent > 100 {
            return Err(MathError::invalid_parameter(
                "fee_percent",
                format!("must be within 0..=100, got {}", fee_percent),
            ));
        }
        Ok(Self { fee_percent })
    }

    pub fn fee_percent(&self) -> u8 {
        self.fee_percent
    }

    /// A zero policy never produces a fee transfer
    pub fn is_zero(&self) -> bool {
        self.fee_percent == 0
    }

    /// `floor(amount · fee_percent / 100)`
    pub fn platform_fee(&self, amount: u64) -> u64 {
        // fee <= amount, so the narrowing cannot truncate
        (amount as u128 * self.fee_percent as u128 / 100) as u64
    }

    pub fn split(&self, gross: u64) -> FeeSplit {
        let fee = self.platform_fee(gross);
        FeeSplit {
            gross,
            fee,
            net: gross - fee,
        }
    }

    /// Spend that reaches the curve once the fee is taken off a buy
    pub fn net_for_buy(&self, gross_spend: u64) -> u64 {
        self.split(gross_spend).net
    }

    /// Proceeds left to the trader once the fee is taken off a sell
    pub fn net_from_sell(&self, gross_proceeds: u64) -> u64 {
        self.split(gross_proceeds).net
    }
}

impl TryFrom<u8> for FeePolicy {
    type Error = MathError;

    fn try_from(fee_percent: u8) -> MathResult<Self> {
        Self::new(fee_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_fee_floors() {
        let policy = FeePolicy::new(50).unwrap();
        assert_eq!(policy.platform_fee(1_000), 500);
        assert_eq!(policy.platform_fee(1_001), 500);
        assert_eq!(policy.platform_fee(1), 0);

        let policy = FeePolicy::new(3).unwrap();
        assert_eq!(policy.platform_fee(99), 2);
    }

    #[test]
    fn test_zero_policy_never_charges() {
        let policy = FeePolicy::new(0).unwrap();
        assert!(policy.is_zero());
        for amount in [0, 1, 99, 1_000_000_000, u64::MAX] {
            assert_eq!(policy.platform_fee(amount), 0);
            assert_eq!(policy.net_for_buy(amount), amount);
        }
    }

    #[test]
    fn test_fee_on_max_amount_does_not_overflow() {
        let policy = FeePolicy::new(100).unwrap();
        assert_eq!(policy.platform_fee(u64::MAX), u64::MAX);
        assert_eq!(policy.net_from_sell(u64::MAX), 0);
    }

    #[test]
    fn test_split_adds_up() {
        let split = FeePolicy::new(7).unwrap().split(123_456_789);
        assert_eq!(split.fee, 8_641_975);
        assert_eq!(split.fee + split.net, split.gross);
    }

    #[test]
    fn test_rejects_percent_above_hundred() {
        assert!(FeePolicy::new(101).is_err());
        assert!(FeePolicy::try_from(255u8).is_err());
    }
}

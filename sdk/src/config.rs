use std::path::Path;
use std::time::Duration;

use bonding_curve_math::{CurveModel, FeePolicy};
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;

use crate::core::{
    program_id, SdkError, SdkResult, DEFAULT_PLATFORM_FEE_PERCENT, DEFAULT_POLL_INTERVAL_MS,
    PLATFORM_FEE_WALLET,
};
use crate::prelude::*;

/// Everything the engine needs to target one deployment of the launchpad program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// RPC endpoint URL
    pub rpc_url: String,

    /// Commitment used for reads and settlement: processed, confirmed or finalized
    #[serde(default = "default_commitment")]
    pub commitment: String,

    /// How often settlement status is polled
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(with = "pubkey_string")]
    pub program_id: Pubkey,

    /// Receives the platform fee transfer on buys and sells
    #[serde(with = "pubkey_string")]
    pub fee_recipient: Pubkey,

    #[serde(default = "default_platform_fee_percent")]
    pub platform_fee_percent: u8,

    /// Pricing law in force for this deployment
    #[serde(default)]
    pub curve: CurveModel,
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_platform_fee_percent() -> u8 {
    DEFAULT_PLATFORM_FEE_PERCENT
}

impl EngineConfig {
    pub fn localnet() -> Self {
        Self {
            rpc_url: "http://localhost:8899".to_string(),
            commitment: default_commitment(),
            poll_interval_ms: 200,
            program_id: program_id(),
            fee_recipient: PLATFORM_FEE_WALLET,
            platform_fee_percent: DEFAULT_PLATFORM_FEE_PERCENT,
            curve: CurveModel::default(),
        }
    }

    pub fn devnet() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            commitment: default_commitment(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            program_id: program_id(),
            fee_recipient: PLATFORM_FEE_WALLET,
            platform_fee_percent: DEFAULT_PLATFORM_FEE_PERCENT,
            curve: CurveModel::default(),
        }
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> SdkResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> SdkResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SdkResult<()> {
        if self.rpc_url.trim().is_empty() {
            return Err(SdkError::Config("RPC URL cannot be empty".to_string()));
        }
        if self.poll_interval_ms == 0 {
            return Err(SdkError::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.program_id == Pubkey::default() {
            return Err(SdkError::Config("Program ID cannot be empty".to_string()));
        }
        self.commitment_config()?;
        self.fee_policy()?;
        self.curve
            .validate()
            .map_err(|e| SdkError::Config(format!("curve: {}", e)))?;
        Ok(())
    }

    pub fn commitment_config(&self) -> SdkResult<CommitmentConfig> {
        match self.commitment.as_str() {
            "processed" => Ok(CommitmentConfig::processed()),
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            other => Err(SdkError::Config(format!(
                "unknown commitment '{}', expected processed, confirmed or finalized",
                other
            ))),
        }
    }

    pub fn fee_policy(&self) -> SdkResult<FeePolicy> {
        FeePolicy::new(self.platform_fee_percent)
            .map_err(|e| SdkError::Config(format!("platform fee: {}", e)))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = url.into();
        self
    }

    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn with_fee_recipient(mut self, fee_recipient: Pubkey) -> Self {
        self.fee_recipient = fee_recipient;
        self
    }

    pub fn with_platform_fee_percent(mut self, percent: u8) -> Self {
        self.platform_fee_percent = percent;
        self
    }

    pub fn with_curve(mut self, curve: CurveModel) -> Self {
        self.curve = curve;
        self
    }

    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::devnet()
    }
}

/// Base58 strings for pubkeys in TOML
mod pubkey_string {
    use std::str::FromStr;

    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use solana_sdk::pubkey::Pubkey;

    pub fn serialize<S: Serializer>(key: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&key.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pubkey, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Pubkey::from_str(&raw).map_err(|e| D::Error::custom(format!("invalid pubkey '{}': {}", raw, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonding_curve_math::{LinearCurve, QuadraticCurve};

    #[test]
    fn test_presets_validate() {
        assert!(EngineConfig::localnet().validate().is_ok());
        assert!(EngineConfig::devnet().validate().is_ok());
        assert_eq!(EngineConfig::default().curve.name(), "linear");
    }

    #[test]
    fn test_from_toml_quadratic() {
        let toml = r#"
            rpc_url = "http://localhost:8899"
            commitment = "finalized"
            poll_interval_ms = 250
            program_id = "2RvPPes11jGU8CDZDPLZdKRGZEtWye5ZTJ4PZCKJuUoZ"
            fee_recipient = "EkZvFSSYzABfn32sydHGWbaMZWhm5JgjYcDhdmUWeGV6"
            platform_fee_percent = 2

            [curve]
            model = "quadratic"
            proportion = "1280"
        "#;

        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.commitment_config().unwrap(), CommitmentConfig::finalized());
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.fee_policy().unwrap().fee_percent(), 2);
        assert_eq!(config.curve, CurveModel::Quadratic(QuadraticCurve::default()));
    }

    #[test]
    fn test_from_toml_defaults() {
        let toml = r#"
            rpc_url = "http://localhost:8899"
            program_id = "2RvPPes11jGU8CDZDPLZdKRGZEtWye5ZTJ4PZCKJuUoZ"
            fee_recipient = "EkZvFSSYzABfn32sydHGWbaMZWhm5JgjYcDhdmUWeGV6"
        "#;

        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.commitment, "confirmed");
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(config.platform_fee_percent, DEFAULT_PLATFORM_FEE_PERCENT);
        assert_eq!(config.curve, CurveModel::Linear(LinearCurve::default()));
    }

    #[test]
    fn test_rejects_bad_values() {
        let base = EngineConfig::localnet();

        assert!(matches!(
            base.clone().with_platform_fee_percent(101).validate(),
            Err(SdkError::Config(_))
        ));
        assert!(matches!(
            base.clone().with_poll_interval_ms(0).validate(),
            Err(SdkError::Config(_))
        ));
        assert!(matches!(
            base.clone().with_rpc_url("").validate(),
            Err(SdkError::Config(_))
        ));

        let mut unknown_commitment = base;
        unknown_commitment.commitment = "eventual".to_string();
        assert!(matches!(
            unknown_commitment.validate(),
            Err(SdkError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_pubkey() {
        let toml = r#"
            rpc_url = "http://localhost:8899"
            program_id = "nope"
            fee_recipient = "EkZvFSSYzABfn32sydHGWbaMZWhm5JgjYcDhdmUWeGV6"
        "#;
        assert!(matches!(
            EngineConfig::from_toml_str(toml),
            Err(SdkError::Config(_))
        ));
    }
}

use bonding_curve_math::MathError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Corrupt account {account}: {reason}")]
    CorruptAccount { account: String, reason: String },

    #[error("Settlement failed: {0}")]
    SettlementFailed(String),

    #[error("Program {0} is not deployed on this cluster")]
    ProgramNotDeployed(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Math(#[from] MathError),
}

impl SdkError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        SdkError::InvalidInput(reason.into())
    }

    pub fn corrupt_account(account: impl ToString, reason: impl Into<String>) -> Self {
        SdkError::CorruptAccount {
            account: account.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<solana_client::client_error::ClientError> for SdkError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        SdkError::Rpc(err.to_string())
    }
}

impl From<toml::de::Error> for SdkError {
    fn from(err: toml::de::Error) -> Self {
        SdkError::Config(err.to_string())
    }
}

impl From<std::io::Error> for SdkError {
    fn from(err: std::io::Error) -> Self {
        SdkError::Config(err.to_string())
    }
}

pub type SdkResult<T> = Result<T, SdkError>;

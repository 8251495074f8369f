use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::core::{SdkError, SdkResult};
use crate::prelude::*;

/// Instruction parameters with a fixed Anchor discriminator
pub trait InstructionBuilder: AnchorSerialize {
    /// The 8-byte instruction discriminator
    const DISCRIMINATOR: [u8; 8];

    /// Build the instruction data (discriminator + serialized params)
    fn build_data(&self) -> SdkResult<Vec<u8>> {
        let mut data = Self::DISCRIMINATOR.to_vec();
        self.serialize(&mut data)
            .map_err(|e| SdkError::Serialization(e.to_string()))?;
        Ok(data)
    }
}

/// Ordered account list plus data for one program instruction
pub struct CurveInstructionBuilder {
    program_id: Pubkey,
    accounts: Vec<AccountMeta>,
    data: Vec<u8>,
}

impl CurveInstructionBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            accounts: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Add a writable signer account
    pub fn add_signer(mut self, pubkey: Pubkey) -> Self {
        self.accounts.push(AccountMeta::new(pubkey, true));
        self
    }

    /// Add a writable non-signer account
    pub fn add_writable(mut self, pubkey: Pubkey) -> Self {
        self.accounts.push(AccountMeta::new(pubkey, false));
        self
    }

    /// Add a readonly account
    pub fn add_readonly(mut self, pubkey: Pubkey) -> Self {
        self.accounts.push(AccountMeta::new_readonly(pubkey, false));
        self
    }

    /// Rent sysvar, System, Token and Associated Token programs, in the order
    /// the trading and liquidity instructions expect them
    pub fn add_program_tail(self) -> Self {
        self.add_readonly(sysvar::rent::id())
            .add_readonly(solana_sdk::system_program::id())
            .add_readonly(spl_token::id())
            .add_readonly(spl_associated_token_account::id())
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    pub fn build(self) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: self.accounts,
            data: self.data,
        }
    }
}

/// Macro for implementing InstructionBuilder for a params struct
#[macro_export]
macro_rules! impl_instruction {
    ($name:ident, $discriminator:expr) => {
        impl $crate::instructions::InstructionBuilder for $name {
            const DISCRIMINATOR: [u8; 8] = $discriminator;
        }
    };
}

/// Reject the all-zero pubkey standing in for a missing mint
pub(crate) fn require_mint(mint: &Pubkey) -> SdkResult<()> {
    if *mint == Pubkey::default() {
        return Err(SdkError::invalid_input("token mint is missing"));
    }
    Ok(())
}

/// Reject zero amounts before anything is built
pub(crate) fn require_positive(amount: u64, what: &str) -> SdkResult<()> {
    if amount == 0 {
        return Err(SdkError::invalid_input(format!("{} must be positive", what)));
    }
    Ok(())
}

use solana_sdk::instruction::Instruction;
use tracing::debug;

use crate::prelude::*;
use crate::{
    core::{discriminators, SdkError, SdkResult},
    impl_instruction,
    instructions::{builder::require_mint, CurveInstructionBuilder, InstructionBuilder},
    protocol::PdaBuilder,
};

/// Parameters for initializing the curve configuration
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitializeParams {
    /// Fee rate stored in the configuration, as an IEEE-754 double
    pub fee: f64,
}

impl_instruction!(InitializeParams, discriminators::INITIALIZE);

/// Parameters for creating a pool (discriminator only)
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default)]
pub struct CreatePoolParams {}

impl_instruction!(CreatePoolParams, discriminators::CREATE_POOL);

/// Builders for the one-time configuration and pool lifecycle instructions
pub struct AdminInstructionBuilder {
    pda: PdaBuilder,
}

impl AdminInstructionBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            pda: PdaBuilder::new(program_id),
        }
    }

    pub fn pda(&self) -> &PdaBuilder {
        &self.pda
    }

    /// Create the global curve configuration
    pub fn initialize(&self, authority: Pubkey, fee: f64) -> SdkResult<Instruction> {
        if !fee.is_finite() {
            return Err(SdkError::invalid_input(format!(
                "configuration fee must be finite, got {}",
                fee
            )));
        }
        let (curve_configuration, _) = self.pda.curve_configuration();

        let ix = CurveInstructionBuilder::new(self.pda.program_id)
            .add_writable(curve_configuration)
            .add_signer(authority)
            .add_readonly(sysvar::rent::id())
            .add_readonly(solana_sdk::system_program::id())
            .with_data(InitializeParams { fee }.build_data()?)
            .build();

        debug!(
            program_id = %ix.program_id,
            accounts = ix.accounts.len(),
            data_len = ix.data.len(),
            fee,
            "Built initialize instruction"
        );
        Ok(ix)
    }

    /// Create the pool for `mint`, funded by `payer`
    pub fn create_pool(&self, payer: Pubkey, mint: Pubkey) -> SdkResult<Instruction> {
        require_mint(&mint)?;
        let (pool, _) = self.pda.pool(&mint);
        let pool_token_account = self.pda.pool_token_account(&mint);

        let ix = CurveInstructionBuilder::new(self.pda.program_id)
            .add_writable(pool)
            .add_writable(mint)
            .add_writable(pool_token_account)
            .add_signer(payer)
            .add_readonly(spl_token::id())
            .add_readonly(spl_associated_token_account::id())
            .add_readonly(sysvar::rent::id())
            .add_readonly(solana_sdk::system_program::id())
            .with_data(CreatePoolParams::default().build_data()?)
            .build();

        debug!(
            program_id = %ix.program_id,
            %pool,
            %mint,
            accounts = ix.accounts.len(),
            data_len = ix.data.len(),
            "Built create_pool instruction"
        );
        Ok(ix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::program_id;

    #[test]
    fn test_initialize_data_is_le_double() {
        let builder = AdminInstructionBuilder::new(program_id());
        let authority = Pubkey::new_unique();
        let ix = builder.initialize(authority, 0.01).unwrap();

        assert_eq!(&ix.data[..8], &discriminators::INITIALIZE);
        assert_eq!(&ix.data[8..], &0.01f64.to_le_bytes());
        assert_eq!(ix.accounts.len(), 4);
        assert!(ix.accounts[1].is_signer && ix.accounts[1].is_writable);
        assert_eq!(ix.accounts[1].pubkey, authority);
    }

    #[test]
    fn test_initialize_rejects_non_finite_fee() {
        let builder = AdminInstructionBuilder::new(program_id());
        for fee in [f64::NAN, f64::INFINITY] {
            assert!(matches!(
                builder.initialize(Pubkey::new_unique(), fee),
                Err(SdkError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_create_pool_is_discriminator_only() {
        let builder = AdminInstructionBuilder::new(program_id());
        let ix = builder
            .create_pool(Pubkey::new_unique(), Pubkey::new_unique())
            .unwrap();
        assert_eq!(ix.data, discriminators::CREATE_POOL.to_vec());
        assert_eq!(ix.accounts.len(), 8);
    }

    #[test]
    fn test_create_pool_requires_mint() {
        let builder = AdminInstructionBuilder::new(program_id());
        assert!(matches!(
            builder.create_pool(Pubkey::new_unique(), Pubkey::default()),
            Err(SdkError::InvalidInput(_))
        ));
    }
}

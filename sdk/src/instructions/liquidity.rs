use solana_sdk::instruction::Instruction;
use tracing::debug;

use crate::prelude::*;
use crate::{
    core::{discriminators, SdkResult},
    impl_instruction,
    instructions::{builder::require_mint, CurveInstructionBuilder, InstructionBuilder},
    protocol::PdaBuilder,
};

/// Parameters for seeding a pool (discriminator only)
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default)]
pub struct AddLiquidityParams {}

impl_instruction!(AddLiquidityParams, discriminators::ADD_LIQUIDITY);

/// Parameters for withdrawing pool liquidity
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct RemoveLiquidityParams {
    /// Bump of the SOL vault PDA, which signs the withdrawal
    pub bump: u8,
}

impl_instruction!(RemoveLiquidityParams, discriminators::REMOVE_LIQUIDITY);

/// Accounts shared by both liquidity instructions
struct LiquidityAccounts {
    pool: Pubkey,
    pool_token_account: Pubkey,
    user_token_account: Pubkey,
    sol_vault: Pubkey,
    sol_vault_bump: u8,
}

/// Liquidity instruction builder
pub struct LiquidityInstructionBuilder {
    pda: PdaBuilder,
}

impl LiquidityInstructionBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            pda: PdaBuilder::new(program_id),
        }
    }

    /// Move the user's token supply into the pool
    pub fn add_liquidity(&self, user: Pubkey, mint: Pubkey) -> SdkResult<Instruction> {
        let accounts = self.resolve(&user, &mint)?;
        let ix = self.build(&user, &mint, &accounts, AddLiquidityParams::default().build_data()?);

        debug!(
            program_id = %ix.program_id,
            pool = %accounts.pool,
            accounts = ix.accounts.len(),
            data_len = ix.data.len(),
            "Built add_liquidity instruction"
        );
        Ok(ix)
    }

    /// Withdraw the pool's reserves back to the user
    pub fn remove_liquidity(&self, user: Pubkey, mint: Pubkey) -> SdkResult<Instruction> {
        let accounts = self.resolve(&user, &mint)?;
        let params = RemoveLiquidityParams {
            bump: accounts.sol_vault_bump,
        };
        let ix = self.build(&user, &mint, &accounts, params.build_data()?);

        debug!(
            program_id = %ix.program_id,
            pool = %accounts.pool,
            bump = accounts.sol_vault_bump,
            accounts = ix.accounts.len(),
            "Built remove_liquidity instruction"
        );
        Ok(ix)
    }

    fn resolve(&self, user: &Pubkey, mint: &Pubkey) -> SdkResult<LiquidityAccounts> {
        require_mint(mint)?;
        let (pool, _) = self.pda.pool(mint);
        let (sol_vault, sol_vault_bump) = self.pda.sol_vault(mint);
        Ok(LiquidityAccounts {
            pool,
            pool_token_account: self.pda.pool_token_account(mint),
            user_token_account: self.pda.user_token_account(user, mint),
            sol_vault,
            sol_vault_bump,
        })
    }

    fn build(
        &self,
        user: &Pubkey,
        mint: &Pubkey,
        accounts: &LiquidityAccounts,
        data: Vec<u8>,
    ) -> Instruction {
        CurveInstructionBuilder::new(self.pda.program_id)
            .add_writable(accounts.pool)
            .add_writable(*mint)
            .add_writable(accounts.pool_token_account)
            .add_writable(accounts.user_token_account)
            .add_writable(accounts.sol_vault)
            .add_signer(*user)
            .add_program_tail()
            .with_data(data)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::program_id;

    #[test]
    fn test_remove_liquidity_carries_vault_bump() {
        let builder = LiquidityInstructionBuilder::new(program_id());
        let mint = Pubkey::new_unique();
        let (_, bump) = builder.pda.sol_vault(&mint);

        let ix = builder.remove_liquidity(Pubkey::new_unique(), mint).unwrap();
        assert_eq!(ix.data.len(), 9);
        assert_eq!(&ix.data[..8], &discriminators::REMOVE_LIQUIDITY);
        assert_eq!(ix.data[8], bump);
    }

    #[test]
    fn test_add_liquidity_shares_account_order() {
        let builder = LiquidityInstructionBuilder::new(program_id());
        let user = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let add = builder.add_liquidity(user, mint).unwrap();
        let remove = builder.remove_liquidity(user, mint).unwrap();
        assert_eq!(add.accounts, remove.accounts);
        assert_eq!(add.data, discriminators::ADD_LIQUIDITY.to_vec());
    }
}

use bonding_curve_math::{CurveModel, FeePolicy, FeeSplit};
use solana_sdk::{instruction::Instruction, system_instruction};
use tracing::debug;

use crate::prelude::*;
use crate::{
    core::{discriminators, SdkError, SdkResult},
    impl_instruction,
    instructions::{
        builder::{require_mint, require_positive},
        CurveInstructionBuilder, InstructionBuilder,
    },
    protocol::{PdaBuilder, Pool},
};

/// Parameters for buying from the curve
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct BuyParams {
    /// Lamports reaching the curve, after the platform fee
    pub amount: u64,
}

impl_instruction!(BuyParams, discriminators::BUY);

/// Parameters for selling back into the curve
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct SellParams {
    /// Token base units handed back to the pool
    pub amount: u64,
    /// Bump of the SOL vault PDA paying out the proceeds
    pub bump: u8,
}

impl_instruction!(SellParams, discriminators::SELL);

/// Platform fee policy together with where the fee goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformFee {
    pub policy: FeePolicy,
    pub recipient: Pubkey,
}

impl PlatformFee {
    pub fn new(policy: FeePolicy, recipient: Pubkey) -> Self {
        Self { policy, recipient }
    }

    /// System transfer for the fee carved out of `gross`, if there is any fee at all
    pub fn transfer(&self, payer: &Pubkey, split: &FeeSplit) -> Option<Instruction> {
        if self.policy.is_zero() || split.fee == 0 {
            return None;
        }
        Some(system_instruction::transfer(payer, &self.recipient, split.fee))
    }
}

/// Instructions for one trade plus the fee arithmetic they encode
#[derive(Debug, Clone)]
pub struct TradeBundle {
    /// In submission order
    pub instructions: Vec<Instruction>,
    pub fee: FeeSplit,
}

impl TradeBundle {
    pub fn has_fee_transfer(&self) -> bool {
        self.instructions.len() > 1
    }
}

/// Resolved accounts for buy and sell, which share one layout
struct TradeAccounts {
    curve_configuration: Pubkey,
    pool: Pubkey,
    pool_token_account: Pubkey,
    sol_vault: Pubkey,
    sol_vault_bump: u8,
    user_token_account: Pubkey,
}

/// Trade instruction builder
pub struct TradeInstructionBuilder {
    pda: PdaBuilder,
    curve: CurveModel,
    platform_fee: PlatformFee,
}

impl TradeInstructionBuilder {
    pub fn new(program_id: Pubkey, curve: CurveModel, platform_fee: PlatformFee) -> Self {
        Self {
            pda: PdaBuilder::new(program_id),
            curve,
            platform_fee,
        }
    }

    pub fn platform_fee(&self) -> &PlatformFee {
        &self.platform_fee
    }

    /// Spend `gross_spend` lamports on `mint`
    ///
    /// The fee transfer, when present, precedes the buy so only the net spend
    /// reaches the curve.
    pub fn buy(&self, user: Pubkey, mint: Pubkey, gross_spend: u64) -> SdkResult<TradeBundle> {
        require_positive(gross_spend, "buy amount")?;
        let accounts = self.resolve(&user, &mint)?;

        let split = self.platform_fee.policy.split(gross_spend);
        if split.net == 0 {
            return Err(SdkError::invalid_input(format!(
                "buy amount {} leaves nothing after a {}% platform fee",
                gross_spend,
                self.platform_fee.policy.fee_percent()
            )));
        }

        let buy_ix = self.build(
            &user,
            &mint,
            &accounts,
            BuyParams { amount: split.net }.build_data()?,
        );

        let mut instructions = Vec::with_capacity(2);
        instructions.extend(self.platform_fee.transfer(&user, &split));
        instructions.push(buy_ix);

        debug!(
            pool = %accounts.pool,
            gross = split.gross,
            fee = split.fee,
            net = split.net,
            instructions = instructions.len(),
            "Built buy"
        );
        Ok(TradeBundle {
            instructions,
            fee: split,
        })
    }

    /// Sell `token_amount` base units of `mint` back into the curve
    ///
    /// `pool` must be a fresh read: the fee is sized from the proceeds the
    /// curve pays at that state and the transfer follows the sell in the same
    /// transaction.
    pub fn sell(
        &self,
        user: Pubkey,
        mint: Pubkey,
        token_amount: u64,
        pool: Option<&Pool>,
    ) -> SdkResult<TradeBundle> {
        require_positive(token_amount, "sell amount")?;
        let accounts = self.resolve(&user, &mint)?;
        let pool = pool.ok_or_else(|| {
            SdkError::invalid_input(format!("no pool exists for mint {}", mint))
        })?;
        if pool.token != mint {
            return Err(SdkError::invalid_input(format!(
                "pool snapshot belongs to mint {}, not {}",
                pool.token, mint
            )));
        }

        let gross = self.curve.sell_return(&pool.curve_state(), token_amount)?;
        let split = self.platform_fee.policy.split(gross);

        let sell_ix = self.build(
            &user,
            &mint,
            &accounts,
            SellParams {
                amount: token_amount,
                bump: accounts.sol_vault_bump,
            }
            .build_data()?,
        );

        let mut instructions = vec![sell_ix];
        instructions.extend(self.platform_fee.transfer(&user, &split));

        debug!(
            pool = %accounts.pool,
            tokens = token_amount,
            gross = split.gross,
            fee = split.fee,
            net = split.net,
            instructions = instructions.len(),
            "Built sell"
        );
        Ok(TradeBundle {
            instructions,
            fee: split,
        })
    }

    fn resolve(&self, user: &Pubkey, mint: &Pubkey) -> SdkResult<TradeAccounts> {
        require_mint(mint)?;
        let (curve_configuration, _) = self.pda.curve_configuration();
        let (pool, _) = self.pda.pool(mint);
        let (sol_vault, sol_vault_bump) = self.pda.sol_vault(mint);
        Ok(TradeAccounts {
            curve_configuration,
            pool,
            pool_token_account: self.pda.pool_token_account(mint),
            sol_vault,
            sol_vault_bump,
            user_token_account: self.pda.user_token_account(user, mint),
        })
    }

    fn build(
        &self,
        user: &Pubkey,
        mint: &Pubkey,
        accounts: &TradeAccounts,
        data: Vec<u8>,
    ) -> Instruction {
        CurveInstructionBuilder::new(self.pda.program_id)
            .add_writable(accounts.curve_configuration)
            .add_writable(accounts.pool)
            .add_writable(*mint)
            .add_writable(accounts.pool_token_account)
            .add_writable(accounts.sol_vault)
            .add_writable(accounts.user_token_account)
            .add_signer(*user)
            .add_program_tail()
            .with_data(data)
            .build()
    }
}

use std::sync::Arc;

use bonding_curve_math::{quote_buy, quote_sell, BuyQuote, SellQuote};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::signature::{Keypair, Signature};
use tracing::{debug, info};

use crate::client::{KeypairSigner, LedgerQuery, RpcLedger, TransactionSigner, TransactionSubmitter};
use crate::config::EngineConfig;
use crate::core::{SdkError, SdkResult};
use crate::instructions::{
    AdminInstructionBuilder, LiquidityInstructionBuilder, PlatformFee, TradeBundle,
    TradeInstructionBuilder,
};
use crate::prelude::*;
use crate::protocol::{CurveConfiguration, PdaBuilder, Pool};

/// Signatures of the two settlements behind `create_and_seed_pool`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededPool {
    pub create: Signature,
    pub seed: Signature,
}

/// Read, quote and trade against one deployment of the launchpad program
///
/// Each call runs its own pipeline (read, quote, build, sign, await) with no
/// state carried between calls.
pub struct BondingCurveClient {
    config: EngineConfig,
    ledger: Arc<dyn LedgerQuery>,
    signer: Arc<dyn TransactionSigner>,
    submitter: TransactionSubmitter,
    pda: PdaBuilder,
    admin: AdminInstructionBuilder,
    liquidity: LiquidityInstructionBuilder,
    trade: TradeInstructionBuilder,
}

impl BondingCurveClient {
    pub fn new(
        config: EngineConfig,
        ledger: Arc<dyn LedgerQuery>,
        signer: Arc<dyn TransactionSigner>,
    ) -> SdkResult<Self> {
        config.validate()?;
        let platform_fee = PlatformFee::new(config.fee_policy()?, config.fee_recipient);
        let program_id = config.program_id;

        Ok(Self {
            submitter: TransactionSubmitter::new(
                ledger.clone(),
                signer.clone(),
                config.poll_interval(),
            ),
            pda: PdaBuilder::new(program_id),
            admin: AdminInstructionBuilder::new(program_id),
            liquidity: LiquidityInstructionBuilder::new(program_id),
            trade: TradeInstructionBuilder::new(program_id, config.curve.clone(), platform_fee),
            config,
            ledger,
            signer,
        })
    }

    /// Client over JSON-RPC signing with a local keypair
    pub fn connect(config: EngineConfig, payer: Keypair) -> SdkResult<Self> {
        config.validate()?;
        let rpc = Arc::new(RpcClient::new_with_commitment(
            config.rpc_url.clone(),
            config.commitment_config()?,
        ));
        let ledger = Arc::new(RpcLedger::new(rpc.clone(), config.commitment_config()?));
        let signer = Arc::new(KeypairSigner::new(Arc::new(payer), rpc));
        Self::new(config, ledger, signer)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pda(&self) -> &PdaBuilder {
        &self.pda
    }

    /// Fee payer and trading identity
    pub fn payer(&self) -> Pubkey {
        self.signer.pubkey()
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Current pool for `mint`, `None` if it was never created
    pub async fn get_pool(&self, mint: &Pubkey) -> SdkResult<Option<Pool>> {
        if *mint == Pubkey::default() {
            return Err(SdkError::invalid_input("token mint is missing"));
        }
        let (address, _) = self.pda.pool(mint);
        match self.ledger.get_account_data(&address).await? {
            Some(data) => Pool::decode(&data).map(Some),
            None => Ok(None),
        }
    }

    pub async fn get_curve_configuration(&self) -> SdkResult<Option<CurveConfiguration>> {
        let (address, _) = self.pda.curve_configuration();
        match self.ledger.get_account_data(&address).await? {
            Some(data) => CurveConfiguration::decode(&data).map(Some),
            None => Ok(None),
        }
    }

    // ========================================================================
    // Quotes
    // ========================================================================

    /// Preview spending `gross_spend` lamports, `None` if the pool does not exist
    pub async fn quote_buy(&self, mint: &Pubkey, gross_spend: u64) -> SdkResult<Option<BuyQuote>> {
        let Some(pool) = self.get_pool(mint).await? else {
            return Ok(None);
        };
        let quote = quote_buy(
            &self.config.curve,
            &self.trade.platform_fee().policy,
            &pool.curve_state(),
            gross_spend,
        )?;
        debug!(%mint, ?quote, "Quoted buy");
        Ok(Some(quote))
    }

    /// Preview selling `tokens_in` base units, `None` if the pool does not exist
    pub async fn quote_sell(&self, mint: &Pubkey, tokens_in: u64) -> SdkResult<Option<SellQuote>> {
        let Some(pool) = self.get_pool(mint).await? else {
            return Ok(None);
        };
        let quote = quote_sell(
            &self.config.curve,
            &self.trade.platform_fee().policy,
            &pool.curve_state(),
            tokens_in,
        )?;
        debug!(%mint, ?quote, "Quoted sell");
        Ok(Some(quote))
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// One-time creation of the global curve configuration
    pub async fn initialize(&self, fee: f64) -> SdkResult<Signature> {
        let ix = self.admin.initialize(self.payer(), fee)?;
        self.submitter.submit(&[ix]).await
    }

    pub async fn create_pool(&self, mint: &Pubkey) -> SdkResult<Signature> {
        let ix = self.admin.create_pool(self.payer(), *mint)?;
        self.ensure_program_deployed().await?;
        self.submitter.submit(&[ix]).await
    }

    pub async fn add_liquidity(&self, mint: &Pubkey) -> SdkResult<Signature> {
        let ix = self.liquidity.add_liquidity(self.payer(), *mint)?;
        self.submitter.submit(&[ix]).await
    }

    pub async fn remove_liquidity(&self, mint: &Pubkey) -> SdkResult<Signature> {
        let ix = self.liquidity.remove_liquidity(self.payer(), *mint)?;
        self.submitter.submit(&[ix]).await
    }

    /// Create the pool, then move the payer's supply into it
    ///
    /// Two separate settlements: if seeding fails the pool stays created and
    /// empty.
    pub async fn create_and_seed_pool(&self, mint: &Pubkey) -> SdkResult<SeededPool> {
        let create = self.create_pool(mint).await?;
        info!(%mint, %create, "Pool created, seeding liquidity");
        let seed = self.add_liquidity(mint).await?;
        Ok(SeededPool { create, seed })
    }

    /// Spend `gross_spend` lamports, platform fee included
    pub async fn buy(&self, mint: &Pubkey, gross_spend: u64) -> SdkResult<Signature> {
        let bundle = self.trade.buy(self.payer(), *mint, gross_spend)?;
        self.submit_trade("buy", mint, bundle).await
    }

    /// Sell `token_amount` base units, sizing the fee from a fresh pool read
    pub async fn sell(&self, mint: &Pubkey, token_amount: u64) -> SdkResult<Signature> {
        if token_amount == 0 {
            return Err(SdkError::invalid_input("sell amount must be positive"));
        }
        let pool = self.get_pool(mint).await?;
        let bundle = self
            .trade
            .sell(self.payer(), *mint, token_amount, pool.as_ref())?;
        self.submit_trade("sell", mint, bundle).await
    }

    async fn submit_trade(&self, side: &str, mint: &Pubkey, bundle: TradeBundle) -> SdkResult<Signature> {
        info!(
            side,
            %mint,
            gross = bundle.fee.gross,
            fee = bundle.fee.fee,
            net = bundle.fee.net,
            "Submitting trade"
        );
        self.submitter.submit(&bundle.instructions).await
    }

    async fn ensure_program_deployed(&self) -> SdkResult<()> {
        if self
            .ledger
            .get_account_data(&self.config.program_id)
            .await?
            .is_none()
        {
            return Err(SdkError::ProgramNotDeployed(
                self.config.program_id.to_string(),
            ));
        }
        Ok(())
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};

use crate::core::{SdkError, SdkResult};
use crate::prelude::*;

/// Holds or proxies the trader's key
///
/// Handing a transaction to `sign_and_send` is the point of no return: once it
/// returns a signature the transaction may land, and nothing here can recall it.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Fee payer and signing identity
    fn pubkey(&self) -> Pubkey;

    /// Sign an unsigned transaction whose blockhash is already set, then broadcast it
    async fn sign_and_send(&self, transaction: Transaction) -> SdkResult<Signature>;
}

/// Local keypair broadcasting over JSON-RPC
pub struct KeypairSigner {
    keypair: Arc<Keypair>,
    rpc: Arc<RpcClient>,
}

impl KeypairSigner {
    pub fn new(keypair: Arc<Keypair>, rpc: Arc<RpcClient>) -> Self {
        Self { keypair, rpc }
    }
}

#[async_trait]
impl TransactionSigner for KeypairSigner {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_and_send(&self, mut transaction: Transaction) -> SdkResult<Signature> {
        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_sign(&[self.keypair.as_ref()], blockhash)
            .map_err(|e| SdkError::invalid_input(format!("signing failed: {}", e)))?;

        // Preflight rejections are terminal for this transaction
        self.rpc
            .send_transaction(&transaction)
            .await
            .map_err(|e| SdkError::SettlementFailed(e.to_string()))
    }
}

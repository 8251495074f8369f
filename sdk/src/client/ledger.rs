use std::sync::Arc;

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, hash::Hash, signature::Signature};

use crate::core::SdkResult;
use crate::prelude::*;

/// Where a submitted transaction stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementStatus {
    /// Seen by the cluster but not yet at the requested commitment
    Processing,
    /// Reached the requested commitment without error
    Settled,
    /// Terminal failure, with the cluster's detail
    Failed(String),
}

/// Read-only view of the ledger
///
/// Answers are eventually consistent; callers must not assume two reads
/// observe the same slot.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Raw account bytes, `None` when the account does not exist
    async fn get_account_data(&self, address: &Pubkey) -> SdkResult<Option<Vec<u8>>>;

    /// Fresh blockhash and the last block height at which it is still valid
    async fn get_latest_blockhash(&self) -> SdkResult<(Hash, u64)>;

    async fn get_block_height(&self) -> SdkResult<u64>;

    /// `None` while the cluster has no record of the signature
    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> SdkResult<Option<SettlementStatus>>;
}

/// Ledger queries over JSON-RPC
pub struct RpcLedger {
    rpc: Arc<RpcClient>,
    commitment: CommitmentConfig,
}

impl RpcLedger {
    pub fn new(rpc: Arc<RpcClient>, commitment: CommitmentConfig) -> Self {
        Self { rpc, commitment }
    }

    /// Get the RPC client
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Get the RPC endpoint URL
    pub fn rpc_url(&self) -> String {
        self.rpc.url()
    }
}

#[async_trait]
impl LedgerQuery for RpcLedger {
    async fn get_account_data(&self, address: &Pubkey) -> SdkResult<Option<Vec<u8>>> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.commitment)
            .await?;
        Ok(response.value.map(|account| account.data))
    }

    async fn get_latest_blockhash(&self) -> SdkResult<(Hash, u64)> {
        Ok(self
            .rpc
            .get_latest_blockhash_with_commitment(self.commitment)
            .await?)
    }

    async fn get_block_height(&self) -> SdkResult<u64> {
        Ok(self
            .rpc
            .get_block_height_with_commitment(self.commitment)
            .await?)
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> SdkResult<Option<SettlementStatus>> {
        let response = self.rpc.get_signature_statuses(&[*signature]).await?;
        let status = match response.value.into_iter().next().flatten() {
            Some(status) => status,
            None => return Ok(None),
        };

        if let Some(err) = status.err {
            return Ok(Some(SettlementStatus::Failed(err.to_string())));
        }
        if status.satisfies_commitment(self.commitment) {
            Ok(Some(SettlementStatus::Settled))
        } else {
            Ok(Some(SettlementStatus::Processing))
        }
    }
}

use std::sync::Arc;
use std::time::Duration;

use solana_sdk::{instruction::Instruction, signature::Signature, transaction::Transaction};
use tracing::{debug, info, warn};

use crate::client::{LedgerQuery, SettlementStatus, TransactionSigner};
use crate::core::{SdkError, SdkResult};

/// Signs, sends and waits for one transaction at a time
///
/// Never resubmits. A failed settlement may already have moved funds, so the
/// caller decides what to do next with a fresh read.
pub struct TransactionSubmitter {
    ledger: Arc<dyn LedgerQuery>,
    signer: Arc<dyn TransactionSigner>,
    poll_interval: Duration,
}

impl TransactionSubmitter {
    pub fn new(
        ledger: Arc<dyn LedgerQuery>,
        signer: Arc<dyn TransactionSigner>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            ledger,
            signer,
            poll_interval,
        }
    }

    /// Submit `instructions` as one atomic transaction and wait for settlement
    pub async fn submit(&self, instructions: &[Instruction]) -> SdkResult<Signature> {
        if instructions.is_empty() {
            return Err(SdkError::invalid_input("nothing to submit"));
        }

        let payer = self.signer.pubkey();
        // Fetched here, never carried over from a quote
        let (blockhash, last_valid_block_height) = self.ledger.get_latest_blockhash().await?;

        let mut transaction = Transaction::new_with_payer(instructions, Some(&payer));
        transaction.message.recent_blockhash = blockhash;

        info!(
            %payer,
            %blockhash,
            last_valid_block_height,
            instructions = instructions.len(),
            "Handing transaction to signer, cannot be cancelled past this point"
        );
        let signature = self.signer.sign_and_send(transaction).await.map_err(|e| {
            warn!(error = %e, "Transaction was not accepted for broadcast");
            e
        })?;

        self.await_settlement(&signature, last_valid_block_height)
            .await?;
        info!(%signature, "Transaction settled");
        Ok(signature)
    }

    async fn await_settlement(
        &self,
        signature: &Signature,
        last_valid_block_height: u64,
    ) -> SdkResult<()> {
        loop {
            match self.ledger.get_signature_status(signature).await? {
                Some(SettlementStatus::Settled) => return Ok(()),
                Some(SettlementStatus::Failed(detail)) => {
                    warn!(%signature, %detail, "Transaction failed on-ledger");
                    return Err(SdkError::SettlementFailed(detail));
                }
                Some(SettlementStatus::Processing) | None => {}
            }

            let block_height = self.ledger.get_block_height().await?;
            if block_height > last_valid_block_height {
                warn!(
                    %signature,
                    block_height,
                    last_valid_block_height,
                    "Blockhash expired before settlement"
                );
                return Err(SdkError::SettlementFailed(format!(
                    "blockhash expired at block height {} (valid through {}) before {} settled",
                    block_height, last_valid_block_height, signature
                )));
            }

            debug!(%signature, block_height, "Awaiting settlement");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

//! In-memory ledger and signer used by the integration tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bonding_curve_sdk::{
    EngineConfig, LedgerQuery, SdkError, SdkResult, SettlementStatus, TransactionSigner,
};
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};

pub const LAST_VALID_BLOCK_HEIGHT: u64 = 1_000;

/// Ledger whose answers are scripted by the test
pub struct FakeLedger {
    accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
    statuses: Mutex<VecDeque<Option<SettlementStatus>>>,
    blockhashes: Mutex<Vec<Hash>>,
    block_height: AtomicU64,
    pub status_polls: AtomicUsize,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            statuses: Mutex::new(VecDeque::new()),
            blockhashes: Mutex::new(Vec::new()),
            block_height: AtomicU64::new(LAST_VALID_BLOCK_HEIGHT - 10),
            status_polls: AtomicUsize::new(0),
        }
    }

    pub fn set_account(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts.lock().unwrap().insert(address, data);
    }

    /// Statuses returned by successive polls; once drained, polls see `None`
    pub fn script_statuses(&self, statuses: impl IntoIterator<Item = Option<SettlementStatus>>) {
        self.statuses.lock().unwrap().extend(statuses);
    }

    pub fn set_block_height(&self, height: u64) {
        self.block_height.store(height, Ordering::SeqCst);
    }

    pub fn issued_blockhashes(&self) -> Vec<Hash> {
        self.blockhashes.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerQuery for FakeLedger {
    async fn get_account_data(&self, address: &Pubkey) -> SdkResult<Option<Vec<u8>>> {
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn get_latest_blockhash(&self) -> SdkResult<(Hash, u64)> {
        let hash = Hash::new_unique();
        self.blockhashes.lock().unwrap().push(hash);
        Ok((hash, LAST_VALID_BLOCK_HEIGHT))
    }

    /// Advances one block per call
    async fn get_block_height(&self) -> SdkResult<u64> {
        Ok(self.block_height.fetch_add(1, Ordering::SeqCst))
    }

    async fn get_signature_status(
        &self,
        _signature: &Signature,
    ) -> SdkResult<Option<SettlementStatus>> {
        self.status_polls.fetch_add(1, Ordering::SeqCst);
        Ok(self.statuses.lock().unwrap().pop_front().flatten())
    }
}

/// Signer that signs locally and records what it was asked to broadcast
pub struct FakeSigner {
    keypair: Keypair,
    sent: Mutex<Vec<Transaction>>,
    reject_with: Option<String>,
}

impl FakeSigner {
    pub fn new() -> Self {
        Self {
            keypair: Keypair::new(),
            sent: Mutex::new(Vec::new()),
            reject_with: None,
        }
    }

    pub fn rejecting(detail: &str) -> Self {
        Self {
            reject_with: Some(detail.to_string()),
            ..Self::new()
        }
    }

    pub fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionSigner for FakeSigner {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_and_send(&self, mut transaction: Transaction) -> SdkResult<Signature> {
        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_sign(&[&self.keypair], blockhash)
            .map_err(|e| SdkError::InvalidInput(e.to_string()))?;
        let signature = transaction.signatures[0];
        self.sent.lock().unwrap().push(transaction);

        match &self.reject_with {
            Some(detail) => Err(SdkError::SettlementFailed(detail.clone())),
            None => Ok(signature),
        }
    }
}

pub fn test_config(fee_recipient: Pubkey, fee_percent: u8) -> EngineConfig {
    EngineConfig::localnet()
        .with_poll_interval_ms(1)
        .with_fee_recipient(fee_recipient)
        .with_platform_fee_percent(fee_percent)
}

pub fn fakes() -> (Arc<FakeLedger>, Arc<FakeSigner>) {
    (Arc::new(FakeLedger::new()), Arc::new(FakeSigner::new()))
}

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::RwLock;

use spl_associated_token_account::get_associated_token_address;

use crate::core::{program_id, seeds, SdkError, SdkResult};
use crate::prelude::*;

/// PDA cache to avoid re-running the bump search
pub struct PdaCache {
    cache: RwLock<HashMap<String, (Pubkey, u8)>>,
}

impl PdaCache {
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> (Pubkey, u8)
    where
        F: FnOnce() -> (Pubkey, u8),
    {
        // A poisoned lock only costs us the cache, derivation itself is pure
        if let Some(cached) = self.cache.read().ok().and_then(|c| c.get(key).copied()) {
            return cached;
        }

        let result = compute();
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key.to_string(), result);
        }
        result
    }
}

impl Default for PdaCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Address derivation for every account the launchpad program owns
pub struct PdaBuilder {
    cache: PdaCache,
    pub program_id: Pubkey,
}

impl PdaBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            cache: PdaCache::new(),
            program_id,
        }
    }

    /// Uncached derivation over arbitrary seeds
    ///
    /// Searches the bump from 255 downward until the hash lands off the
    /// ed25519 curve.
    pub fn derive(&self, seeds: &[&[u8]]) -> (Pubkey, u8) {
        Pubkey::find_program_address(seeds, &self.program_id)
    }

    /// Global curve configuration singleton
    pub fn curve_configuration(&self) -> (Pubkey, u8) {
        let key = "curve_configuration";
        self.cache
            .get_or_compute(key, || self.derive(&[seeds::CURVE_CONFIGURATION]))
    }

    pub fn pool(&self, mint: &Pubkey) -> (Pubkey, u8) {
        let key = format!("pool:{}", mint);
        self.cache.get_or_compute(&key, || {
            self.derive(&[seeds::LIQUIDITY_POOL, mint.as_ref()])
        })
    }

    /// Vault holding the pool's SOL reserve
    pub fn sol_vault(&self, mint: &Pubkey) -> (Pubkey, u8) {
        let key = format!("sol_vault:{}", mint);
        self.cache.get_or_compute(&key, || {
            self.derive(&[seeds::LIQUIDITY_SOL_VAULT, mint.as_ref()])
        })
    }

    /// Associated token account owned by the pool PDA
    pub fn pool_token_account(&self, mint: &Pubkey) -> Pubkey {
        let (pool, _) = self.pool(mint);
        get_associated_token_address(&pool, mint)
    }

    pub fn user_token_account(&self, owner: &Pubkey, mint: &Pubkey) -> Pubkey {
        get_associated_token_address(owner, mint)
    }
}

/// Parse a base58 account identifier, failing before any network call
pub fn parse_identifier(value: &str) -> SdkResult<Pubkey> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SdkError::InvalidIdentifier(value.to_string()));
    }
    Pubkey::from_str(trimmed).map_err(|_| SdkError::InvalidIdentifier(value.to_string()))
}

/// Convenience functions for one-off derivations against the default deployment
pub fn find_pool_address(mint: &Pubkey) -> (Pubkey, u8) {
    PdaBuilder::new(program_id()).pool(mint)
}

pub fn find_sol_vault_address(mint: &Pubkey) -> (Pubkey, u8) {
    PdaBuilder::new(program_id()).sol_vault(mint)
}

pub fn find_curve_configuration_address() -> (Pubkey, u8) {
    PdaBuilder::new(program_id()).curve_configuration()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_derivation_is_deterministic() {
        let mint = Pubkey::new_unique();
        let pda = PdaBuilder::new(program_id());

        let first = pda.pool(&mint);
        let second = pda.pool(&mint);
        assert_eq!(first, second);
        assert_eq!(first, find_pool_address(&mint));
    }

    #[test]
    fn test_seed_families_do_not_collide() {
        let mint = Pubkey::new_unique();
        let pda = PdaBuilder::new(program_id());

        let (pool, _) = pda.pool(&mint);
        let (vault, _) = pda.sol_vault(&mint);
        let (config, _) = pda.curve_configuration();
        assert_ne!(pool, vault);
        assert_ne!(pool, config);
        assert_ne!(vault, config);
    }

    #[test]
    fn test_derived_addresses_are_off_curve() {
        let mint = Pubkey::new_unique();
        let pda = PdaBuilder::new(program_id());
        let (pool, bump) = pda.pool(&mint);

        assert!(!pool.is_on_curve());
        let rebuilt =
            Pubkey::create_program_address(&[seeds::LIQUIDITY_POOL, mint.as_ref(), &[bump]], &program_id())
                .unwrap();
        assert_eq!(rebuilt, pool);
    }

    #[test]
    fn test_program_id_changes_addresses() {
        let mint = Pubkey::new_unique();
        let default = PdaBuilder::new(program_id()).pool(&mint);
        let other = PdaBuilder::new(Pubkey::new_unique()).pool(&mint);
        assert_ne!(default.0, other.0);
    }

    #[test]
    fn test_parse_identifier() {
        let mint = Pubkey::new_unique();
        assert_eq!(parse_identifier(&mint.to_string()).unwrap(), mint);
        assert!(matches!(
            parse_identifier(""),
            Err(SdkError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            parse_identifier("not-a-key"),
            Err(SdkError::InvalidIdentifier(_))
        ));
    }
}

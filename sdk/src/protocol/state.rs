//! Fixed-layout decoders for accounts owned by the launchpad program

use bonding_curve_math::{CurveState, MathResult};
use solana_sdk::hash::hash;

use crate::core::{SdkError, SdkResult, ACCOUNT_HEADER_LEN};
use crate::prelude::*;

// ============================================================================
// Liquidity Pool
// ============================================================================

/// Snapshot of one token's curve state
///
/// Always a disposable read: the next fetch supersedes it and nothing here is
/// ever mutated locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pool {
    pub creator: Pubkey,
    pub token: Pubkey,
    pub total_supply: u64,
    pub reserve_token: u64,
    pub reserve_sol: u64,
    pub bump: u8,
}

impl Pool {
    /// Header, two identities, three little-endian u64s and the bump
    pub const LEN: usize = ACCOUNT_HEADER_LEN + 32 + 32 + 8 + 8 + 8 + 1;

    pub fn decode(data: &[u8]) -> SdkResult<Self> {
        if data.len() < Self::LEN {
            return Err(SdkError::corrupt_account(
                "LiquidityPool",
                format!("expected at least {} bytes, got {}", Self::LEN, data.len()),
            ));
        }

        let mut cursor = ByteCursor::new(&data[ACCOUNT_HEADER_LEN..]);
        Ok(Self {
            creator: cursor.pubkey(),
            token: cursor.pubkey(),
            total_supply: cursor.u64(),
            reserve_token: cursor.u64(),
            reserve_sol: cursor.u64(),
            bump: cursor.u8(),
        })
    }

    /// Serialize into the on-chain layout, header included
    pub fn encode(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(Self::LEN);
        data.extend_from_slice(&account_header("LiquidityPool"));
        data.extend_from_slice(self.creator.as_ref());
        data.extend_from_slice(self.token.as_ref());
        data.extend_from_slice(&self.total_supply.to_le_bytes());
        data.extend_from_slice(&self.reserve_token.to_le_bytes());
        data.extend_from_slice(&self.reserve_sol.to_le_bytes());
        data.push(self.bump);
        data
    }

    pub fn curve_state(&self) -> CurveState {
        CurveState::new(self.total_supply, self.reserve_token)
    }

    pub fn tokens_sold(&self) -> MathResult<u64> {
        self.curve_state().tokens_sold()
    }
}

// ============================================================================
// Curve Configuration
// ============================================================================

/// Global fee parameter written once by `initialize`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveConfiguration {
    pub fees: f64,
}

impl CurveConfiguration {
    pub const LEN: usize = ACCOUNT_HEADER_LEN + 8;

    pub fn decode(data: &[u8]) -> SdkResult<Self> {
        if data.len() < Self::LEN {
            return Err(SdkError::corrupt_account(
                "CurveConfiguration",
                format!("expected at least {} bytes, got {}", Self::LEN, data.len()),
            ));
        }
        let mut cursor = ByteCursor::new(&data[ACCOUNT_HEADER_LEN..]);
        Ok(Self {
            fees: f64::from_bits(cursor.u64()),
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(Self::LEN);
        data.extend_from_slice(&account_header("CurveConfiguration"));
        data.extend_from_slice(&self.fees.to_le_bytes());
        data
    }
}

/// Anchor account discriminator, `sha256("account:<Name>")[..8]`
pub fn account_header(name: &str) -> [u8; ACCOUNT_HEADER_LEN] {
    let digest = hash(format!("account:{}", name).as_bytes()).to_bytes();
    let mut header = [0u8; ACCOUNT_HEADER_LEN];
    header.copy_from_slice(&digest[..ACCOUNT_HEADER_LEN]);
    header
}

/// Forward-only reader over a buffer whose length was checked up front
struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.offset..self.offset + N]);
        self.offset += N;
        out
    }

    fn pubkey(&mut self) -> Pubkey {
        Pubkey::new_from_array(self.take::<32>())
    }

    fn u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take::<8>())
    }

    fn u8(&mut self) -> u8 {
        self.take::<1>()[0]
    }
}

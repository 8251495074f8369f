use solana_sdk::pubkey;

use crate::prelude::*;

/// Program ID of the devnet launchpad deployment
pub const PROGRAM_ID: Pubkey = pubkey!("2RvPPes11jGU8CDZDPLZdKRGZEtWye5ZTJ4PZCKJuUoZ");

/// Wallet collecting platform fees on the devnet deployment
pub const PLATFORM_FEE_WALLET: Pubkey = pubkey!("EkZvFSSYzABfn32sydHGWbaMZWhm5JgjYcDhdmUWeGV6");

/// Get the program ID as a Pubkey
pub fn program_id() -> Pubkey {
    PROGRAM_ID
}

/// Seeds for program derived addresses
pub mod seeds {
    pub const CURVE_CONFIGURATION: &[u8] = b"CurveConfiguration";
    pub const LIQUIDITY_POOL: &[u8] = b"liquidity_pool";
    pub const LIQUIDITY_SOL_VAULT: &[u8] = b"liquidity_sol_vault";
}

/// Anchor instruction discriminators, `sha256("global:<name>")[..8]`
pub mod discriminators {
    pub const INITIALIZE: [u8; 8] = [175, 175, 109, 31, 13, 152, 155, 237];
    pub const CREATE_POOL: [u8; 8] = [233, 146, 209, 142, 207, 104, 64, 188];
    pub const ADD_LIQUIDITY: [u8; 8] = [181, 157, 89, 67, 143, 182, 52, 72];
    pub const REMOVE_LIQUIDITY: [u8; 8] = [80, 85, 209, 72, 24, 206, 177, 108];
    pub const BUY: [u8; 8] = [102, 6, 61, 18, 1, 218, 235, 234];
    pub const SELL: [u8; 8] = [51, 230, 133, 164, 1, 127, 131, 173];
}

/// Platform fee applied when nothing else is configured
pub const DEFAULT_PLATFORM_FEE_PERCENT: u8 = 1;

/// Settlement polling cadence
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Size of the Anchor account header preceding every account body
pub const ACCOUNT_HEADER_LEN: usize = 8;

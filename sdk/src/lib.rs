//! Bonding Curve Launchpad SDK
//!
//! Client-side engine for the bonding curve launchpad program:
//! - Address derivation for the configuration, pool and SOL vault accounts
//! - Pool and configuration account decoding
//! - Quotes under the configured curve model and platform fee
//! - Byte-exact instruction assembly for every program action
//! - Submission with settlement tracking
pub mod client;
pub mod config;
pub mod core;
pub mod instructions;
pub mod prelude;
pub mod protocol;

pub use client::*;
pub use config::*;
pub use crate::core::*;
pub use instructions::*;
pub use protocol::*;

// Curve math lives in its own crate; re-export it for single-import users
pub use bonding_curve_math as math;
pub use bonding_curve_math::{BuyQuote, CurveModel, CurveState, FeePolicy, Quote, SellQuote};

//! Pricing math for the bonding curve launchpad
//!
//! This crate is pure: it converts between SOL and issued tokens under the
//! supported curve models, splits platform fees, and assembles quotes. It is
//! shared by the SDK and by anything that needs to preview a trade offline.

pub mod curve;
pub mod decimal;
pub mod error;
pub mod fees;
pub mod quote;

// Re-export commonly used items
pub use curve::*;
pub use error::*;
pub use fees::*;
pub use quote::*;

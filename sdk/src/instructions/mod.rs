//! Instruction builders for the launchpad program

pub mod admin;
pub mod builder;
pub mod liquidity;
pub mod trade;

pub use admin::*;
pub use builder::{CurveInstructionBuilder, InstructionBuilder};
pub use liquidity::*;
pub use trade::*;

pub mod bonding_curve;
pub mod ledger;
pub mod signer;
pub mod submit;

pub use bonding_curve::*;
pub use ledger::*;
pub use signer::*;
pub use submit::*;

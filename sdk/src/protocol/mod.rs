pub mod pda;
pub mod state;

pub use pda::*;
pub use state::*;

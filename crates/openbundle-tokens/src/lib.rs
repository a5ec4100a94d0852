//! OpenBundle Tokens - the engine's external collaborators
//!
//! Asset contracts are untrusted: every transfer call may fail or call back
//! into the engine. This crate defines the three transfer protocols the
//! category dispatcher selects between, the directory that resolves an asset
//! address to a live contract handle, and in-memory reference tokens used by
//! tests and demos.
//!
//! The reference tokens follow the real rules even in memory:
//!
//! 1. Pull-style transfers are allowance/approval gated
//! 2. Push-style transfers are authorized by the sender alone
//! 3. A halted token fails every transfer until resumed

pub mod directory;
pub mod error;
pub mod memory;
pub mod traits;

pub use directory::{InMemoryDirectory, TokenDirectory};
pub use error::{TokenError, TokenResult};
pub use memory::{InMemoryFungible, InMemoryNonFungible, InMemorySemiFungible};
pub use traits::{FungibleToken, NonFungibleToken, SemiFungibleToken};

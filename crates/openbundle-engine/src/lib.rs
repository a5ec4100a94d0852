//! OpenBundle Engine - the create/unwrap state machine
//!
//! A holder deposits a set of tokenized assets into custody and receives one
//! composite bundle token; the holder of that token redeems it to reclaim
//! every underlying asset.
//!
//! # Invariants
//!
//! 1. Bundle ids and nonces strictly increase; never rewound, never reused
//! 2. Every nonce appears in at most one live bundle
//! 3. Exactly one principal holds the ownership unit of a live bundle
//! 4. Live asset entries referenced by live bundles are exactly the assets
//!    in custody
//! 5. Operations are all-or-nothing: a failed operation leaves counters,
//!    registries and balances untouched

pub mod allocator;
pub mod dispatch;
pub mod engine;
pub mod ledger;
pub mod registry;

pub use allocator::IdAllocator;
pub use dispatch::Dispatcher;
pub use engine::{BundlerConfig, TokenBundler};
pub use ledger::OwnershipLedger;
pub use registry::{AssetRegistry, BundleRegistry};

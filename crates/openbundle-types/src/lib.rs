//! OpenBundle Types - Canonical domain types for asset bundling
//!
//! This crate contains all foundational types for OpenBundle with zero
//! dependencies on other openbundle crates. It defines:
//!
//! - Identity types (Address, BundleId, Nonce)
//! - The asset model (category, descriptor/entry)
//! - Bundle lifecycle events
//! - The error taxonomy shared by every engine operation
//!
//! # Architectural Invariants
//!
//! These types support the core OpenBundle invariants:
//!
//! 1. Bundle ids and nonces strictly increase and are never reused
//! 2. Every nonce appears in at most one live bundle
//! 3. Exactly one principal holds the ownership unit of a live bundle
//! 4. Live asset entries referenced by live bundles are exactly the assets
//!    in custody

pub mod asset;
pub mod error;
pub mod event;
pub mod identity;

pub use asset::*;
pub use error::*;
pub use event::*;
pub use identity::*;

/// Version of the OpenBundle types schema
pub const TYPES_VERSION: &str = "0.1.0";

//! Off-chain support crate for the dual-game lottery protocol: the pure
//! ticket-scanning/verification-hash algorithms shared with both on-chain
//! programs, plus the ambient stack (config, persisted state, RPC client,
//! notifications) backing the `lotto-indexer` operator daemon binary.

pub mod chain;
pub mod config;
pub mod daemon;
pub mod error;
pub mod notify;
pub mod scan;
pub mod state;

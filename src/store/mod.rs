//! Ledger Store - durable persistence of wallets, ledger entries,
//! transactions, and catalog items.
//!
//! The store is the sole writer of wallet rows. Its mutating batch API
//! ([`entries::append`]) is crate-private; only the ledger service in
//! `core::ledger` drives it, always inside a storage transaction.

pub mod entries;
pub mod items;
pub mod transactions;
pub mod wallets;

pub use entries::NewEntry;

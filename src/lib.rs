//! `Tillbook` - Wallet ledger service for a multi-tenant commerce backend
//!
//! This crate maintains per-user wallet balances and an append-only ledger of
//! every balance-affecting event. Purchases debit the customer, credit the
//! merchant, and record a transaction atomically; every mutation either lands
//! in full or leaves no trace. The request-handling layer (HTTP or otherwise)
//! lives outside this crate and consumes the `core` API.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Style consistency
    clippy::enum_glob_use,
    clippy::inconsistent_struct_constructor,
    clippy::must_use_candidate,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
    clippy::missing_panics_doc,        // Will add gradually
)]

/// Item catalog boundary - read-only item/price lookups
pub mod catalog;
/// Configuration management for database settings
pub mod config;
/// Core business logic - ledger mutations, purchases, wallet lifecycle, audit
pub mod core;
/// Account directory boundary - read-only user identity/role lookups
pub mod directory;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// Pagination envelope for list queries
pub mod paging;
/// Durable persistence of wallets, ledger entries, and transactions
pub mod store;

#[cfg(test)]
pub mod test_utils;

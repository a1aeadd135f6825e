//! Unified error type for the wallet ledger service.
//!
//! Version conflicts are transient and retried inside `core::ledger`; every
//! other variant propagates to the caller unchanged. A rejected mutation
//! never leaves partial state behind.

use rust_decimal::Decimal;
use thiserror::Error;

/// All failure modes surfaced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Misconfiguration or programmer misuse of a store API.
    #[error("configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// No active wallet exists for the owner.
    #[error("no wallet for owner {owner_id}")]
    WalletNotFound {
        /// Owner whose wallet was requested
        owner_id: i64,
    },

    /// A wallet for the owner already exists (possibly closed).
    #[error("wallet for owner {owner_id} already exists")]
    WalletAlreadyExists {
        /// Owner a duplicate wallet was requested for
        owner_id: i64,
    },

    /// The account directory does not know this user.
    #[error("user {user_id} not found")]
    UserNotFound {
        /// Unresolvable user id
        user_id: i64,
    },

    /// The item catalog does not list this item.
    #[error("item {item_id} not found")]
    ItemNotFound {
        /// Unresolvable item id
        item_id: i64,
    },

    /// A mutation amount was zero, negative, or otherwise unusable.
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// A debit would drive the balance below zero. Business-rule rejection,
    /// not a system fault.
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Balance at the time of the rejected debit
        balance: Decimal,
        /// Amount the debit asked for
        requested: Decimal,
    },

    /// A concurrent mutation bumped the wallet version first. Retried
    /// internally; callers only see this through [`Error::Contention`].
    #[error("stale version for wallet {wallet_id}")]
    VersionConflict {
        /// Wallet whose version check failed
        wallet_id: i64,
    },

    /// Retries exhausted while competing for the same wallet(s).
    #[error("wallet contention: gave up after {attempts} attempts")]
    Contention {
        /// How many read-compute-append cycles were attempted
        attempts: u32,
    },

    /// Malformed transfer request (e.g. source and destination coincide).
    #[error("invalid transfer: {reason}")]
    InvalidTransfer {
        /// Why the transfer was rejected
        reason: String,
    },

    /// Malformed purchase request (self-purchase, non-positive price).
    #[error("invalid purchase: {reason}")]
    InvalidPurchase {
        /// Why the purchase was rejected
        reason: String,
    },

    /// Storage failure. Fatal to the current operation; never retried here.
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

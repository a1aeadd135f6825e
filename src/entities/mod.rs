//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod item;
pub mod ledger_entry;
pub mod transaction;
pub mod wallet;

// Re-export specific types to avoid conflicts
pub use item::{Column as ItemColumn, Entity as Item, Model as ItemModel};
pub use ledger_entry::{
    Column as LedgerEntryColumn, Entity as LedgerEntry, EntryReason, Model as LedgerEntryModel,
};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
pub use wallet::{Column as WalletColumn, Entity as Wallet, Model as WalletModel};

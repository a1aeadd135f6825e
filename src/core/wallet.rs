//! Wallet lifecycle - opening, reading, closing, and browsing history.
//!
//! Opening a wallet is tied to registration: the owner must resolve through
//! the account directory first. Closing is a soft delete; the ledger rows
//! stay behind for audit.

use crate::{
    directory::AccountDirectory,
    entities::{ledger_entry, wallet},
    errors::{Error, Result},
    paging::{Page, PageRequest},
    store,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Creates a wallet for a registered user.
pub async fn open_wallet(
    db: &DatabaseConnection,
    directory: &impl AccountDirectory,
    owner_id: i64,
    initial_balance: Decimal,
) -> Result<wallet::Model> {
    directory
        .resolve_user(owner_id)
        .await?
        .ok_or(Error::UserNotFound { user_id: owner_id })?;

    store::wallets::create(db, owner_id, initial_balance).await
}

/// Fetches an owner's active wallet.
pub async fn get_wallet(db: &DatabaseConnection, owner_id: i64) -> Result<wallet::Model> {
    store::wallets::get_by_owner(db, owner_id)
        .await?
        .ok_or(Error::WalletNotFound { owner_id })
}

/// Closes an owner's wallet. The row and its ledger entries are retained.
pub async fn close_wallet(db: &DatabaseConnection, owner_id: i64) -> Result<wallet::Model> {
    store::wallets::soft_delete(db, owner_id).await
}

/// Pages through an owner's ledger history, newest entries first.
pub async fn history(
    db: &DatabaseConnection,
    owner_id: i64,
    request: PageRequest,
) -> Result<Page<ledger_entry::Model>> {
    let wallet = get_wallet(db, owner_id).await?;
    store::entries::for_wallet(db, wallet.id, request).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::ledger;
    use crate::directory::{Role, StaticDirectory};
    use crate::entities::EntryReason;
    use crate::test_utils::{dec, setup_test_db};

    #[tokio::test]
    async fn test_open_wallet_requires_registered_user() -> Result<()> {
        let db = setup_test_db().await?;
        let directory = StaticDirectory::default().with_user(1, Role::Customer);

        let wallet = open_wallet(&db, &directory, 1, dec("20")).await?;
        assert_eq!(wallet.owner_id, 1);
        assert_eq!(wallet.balance, dec("20"));

        let result = open_wallet(&db, &directory, 99, Decimal::ZERO).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::UserNotFound { user_id: 99 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_open_wallet_twice_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let directory = StaticDirectory::default().with_user(1, Role::Customer);

        open_wallet(&db, &directory, 1, Decimal::ZERO).await?;
        let result = open_wallet(&db, &directory, 1, Decimal::ZERO).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::WalletAlreadyExists { owner_id: 1 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_close_wallet_hides_it_from_reads() -> Result<()> {
        let db = setup_test_db().await?;
        let directory = StaticDirectory::default().with_user(1, Role::Customer);
        open_wallet(&db, &directory, 1, dec("5")).await?;

        let closed = close_wallet(&db, 1).await?;
        assert!(closed.is_deleted);

        let result = get_wallet(&db, 1).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::WalletNotFound { owner_id: 1 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_history_pages_through_entries() -> Result<()> {
        let db = setup_test_db().await?;
        let directory = StaticDirectory::default().with_user(1, Role::Customer);
        open_wallet(&db, &directory, 1, dec("100")).await?;

        ledger::credit(&db, 1, dec("10"), EntryReason::ManualAdjustment, None).await?;
        ledger::debit(&db, 1, dec("4"), EntryReason::ManualAdjustment, None).await?;

        let page = history(&db, 1, PageRequest::default()).await?;
        assert_eq!(page.total_items, 3); // opening entry + credit + debit
        assert_eq!(page.items[0].delta, dec("-4"));
        assert_eq!(page.items[1].delta, dec("10"));
        assert_eq!(page.items[2].delta, dec("100"));
        Ok(())
    }
}

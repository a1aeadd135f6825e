//! Wallet ledger service - invariant-preserving credit, debit, and transfer
//! primitives.
//!
//! Every mutation is a read-compute-append cycle: read the wallet fresh,
//! validate against that snapshot, then hand the store a batch carrying the
//! snapshot's version. A concurrent writer makes the version stale, the store
//! rejects the batch, and the cycle restarts - bounded by
//! [`MAX_MUTATION_ATTEMPTS`], after which [`Error::Contention`] surfaces.
//! Funds checks always run against the freshly read balance, never a cached
//! one. This module is the only caller of the store's append API.

use crate::{
    entities::{EntryReason, wallet},
    errors::{Error, Result},
    store::{self, NewEntry},
};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use tracing::debug;
use uuid::Uuid;

/// How many read-compute-append cycles a mutation attempts before giving up
/// with [`Error::Contention`]. Conflicts retry immediately, without backoff.
pub const MAX_MUTATION_ATTEMPTS: u32 = 5;

fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

async fn read_wallet<C>(conn: &C, owner_id: i64) -> Result<wallet::Model>
where
    C: ConnectionTrait,
{
    store::wallets::get_by_owner(conn, owner_id)
        .await?
        .ok_or(Error::WalletNotFound { owner_id })
}

/// Adds `amount` to a wallet and records the entry. Returns the new balance.
pub async fn credit(
    db: &DatabaseConnection,
    owner_id: i64,
    amount: Decimal,
    reason: EntryReason,
    related_transaction_id: Option<Uuid>,
) -> Result<Decimal> {
    ensure_positive(amount)?;

    for _ in 0..MAX_MUTATION_ATTEMPTS {
        let wallet = read_wallet(db, owner_id).await?;
        let entry = NewEntry {
            wallet_id: wallet.id,
            delta: amount,
            reason,
            related_transaction_id,
        };

        let txn = db.begin().await?;
        match store::entries::append(&txn, &[entry], &[(wallet.id, wallet.version)]).await {
            Ok(_) => {
                txn.commit().await?;
                return Ok(wallet.balance + amount);
            }
            Err(Error::VersionConflict { wallet_id }) => {
                debug!(owner_id, wallet_id, "Credit lost a version race, retrying");
            }
            Err(err) => return Err(err),
        }
    }

    Err(Error::Contention {
        attempts: MAX_MUTATION_ATTEMPTS,
    })
}

/// Subtracts `amount` from a wallet and records the entry. Returns the new
/// balance. Rejects with [`Error::InsufficientFunds`] rather than letting the
/// balance go negative; the check runs against the balance read in the
/// current attempt.
pub async fn debit(
    db: &DatabaseConnection,
    owner_id: i64,
    amount: Decimal,
    reason: EntryReason,
    related_transaction_id: Option<Uuid>,
) -> Result<Decimal> {
    ensure_positive(amount)?;

    for _ in 0..MAX_MUTATION_ATTEMPTS {
        let wallet = read_wallet(db, owner_id).await?;
        if wallet.balance < amount {
            return Err(Error::InsufficientFunds {
                balance: wallet.balance,
                requested: amount,
            });
        }

        let entry = NewEntry {
            wallet_id: wallet.id,
            delta: -amount,
            reason,
            related_transaction_id,
        };

        let txn = db.begin().await?;
        match store::entries::append(&txn, &[entry], &[(wallet.id, wallet.version)]).await {
            Ok(_) => {
                txn.commit().await?;
                return Ok(wallet.balance - amount);
            }
            Err(Error::VersionConflict { wallet_id }) => {
                debug!(owner_id, wallet_id, "Debit lost a version race, retrying");
            }
            Err(err) => return Err(err),
        }
    }

    Err(Error::Contention {
        attempts: MAX_MUTATION_ATTEMPTS,
    })
}

/// One transfer attempt over the caller's connection: reads both wallets,
/// checks funds, and appends the debit/credit pair as a single batch covering
/// both wallets' versions.
///
/// The caller owns the storage transaction; the purchase orchestrator runs
/// this next to its transaction-row insert so both commit or neither does.
pub(crate) async fn transfer_within<C>(
    conn: &C,
    from_owner_id: i64,
    to_owner_id: i64,
    amount: Decimal,
    related_transaction_id: Uuid,
) -> Result<(Decimal, Decimal)>
where
    C: ConnectionTrait,
{
    let from = read_wallet(conn, from_owner_id).await?;
    let to = read_wallet(conn, to_owner_id).await?;

    if from.balance < amount {
        return Err(Error::InsufficientFunds {
            balance: from.balance,
            requested: amount,
        });
    }

    let batch = [
        NewEntry {
            wallet_id: from.id,
            delta: -amount,
            reason: EntryReason::PurchaseDebit,
            related_transaction_id: Some(related_transaction_id),
        },
        NewEntry {
            wallet_id: to.id,
            delta: amount,
            reason: EntryReason::PurchaseCredit,
            related_transaction_id: Some(related_transaction_id),
        },
    ];
    store::entries::append(
        conn,
        &batch,
        &[(from.id, from.version), (to.id, to.version)],
    )
    .await?;

    Ok((from.balance - amount, to.balance + amount))
}

/// Moves `amount` between two wallets as one atomic unit: either both the
/// debit and the credit land or neither does. The destination wallet is left
/// untouched on every failure path.
pub async fn transfer_atomic(
    db: &DatabaseConnection,
    from_owner_id: i64,
    to_owner_id: i64,
    amount: Decimal,
    related_transaction_id: Uuid,
) -> Result<(Decimal, Decimal)> {
    ensure_positive(amount)?;
    if from_owner_id == to_owner_id {
        return Err(Error::InvalidTransfer {
            reason: "source and destination wallets coincide".to_string(),
        });
    }

    for _ in 0..MAX_MUTATION_ATTEMPTS {
        let txn = db.begin().await?;
        match transfer_within(&txn, from_owner_id, to_owner_id, amount, related_transaction_id)
            .await
        {
            Ok(balances) => {
                txn.commit().await?;
                return Ok(balances);
            }
            Err(Error::VersionConflict { wallet_id }) => {
                debug!(
                    from_owner_id,
                    to_owner_id, wallet_id, "Transfer lost a version race, retrying"
                );
            }
            Err(err) => return Err(err),
        }
    }

    Err(Error::Contention {
        attempts: MAX_MUTATION_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::store::{entries, wallets};
    use crate::test_utils::{dec, setup_test_db};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_credit_returns_new_balance() -> Result<()> {
        let db = setup_test_db().await?;
        wallets::create(&db, 1, dec("10")).await?;

        let balance = credit(&db, 1, dec("15"), EntryReason::ManualAdjustment, None).await?;
        assert_eq!(balance, dec("25"));

        let wallet = wallets::get_by_owner(&db, 1).await?.unwrap();
        assert_eq!(wallet.balance, dec("25"));
        assert_eq!(wallet.version, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_credit_validates_amount() -> Result<()> {
        let db = setup_test_db().await?;
        wallets::create(&db, 1, dec("10")).await?;

        for bad in [Decimal::ZERO, dec("-5")] {
            let result = credit(&db, 1, bad, EntryReason::ManualAdjustment, None).await;
            assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_credit_missing_wallet() -> Result<()> {
        // Mock an empty wallet lookup, as the directory would for a user who
        // never registered
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<wallet::Model>::new()])
            .into_connection();

        let result = credit(&db, 9, dec("5"), EntryReason::ManualAdjustment, None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::WalletNotFound { owner_id: 9 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_contention_surfaces_after_bounded_retries() -> Result<()> {
        // Every attempt reads version 0 and then finds version 1 at append
        // time, simulating a competing writer that always wins the race
        let fresh = wallet::Model {
            id: 1,
            owner_id: 1,
            balance: dec("10"),
            version: 0,
            is_deleted: false,
        };
        let bumped = wallet::Model {
            version: 1,
            ..fresh.clone()
        };

        let mut mock = MockDatabase::new(DatabaseBackend::Sqlite);
        for _ in 0..MAX_MUTATION_ATTEMPTS {
            mock = mock
                .append_query_results([vec![fresh.clone()]])
                .append_query_results([vec![bumped.clone()]]);
        }
        let db = mock.into_connection();

        let result = credit(&db, 1, dec("5"), EntryReason::ManualAdjustment, None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Contention {
                attempts: MAX_MUTATION_ATTEMPTS
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_debit_rejects_overdraft() -> Result<()> {
        let db = setup_test_db().await?;
        wallets::create(&db, 1, dec("10")).await?;

        let result = debit(&db, 1, dec("20"), EntryReason::ManualAdjustment, None).await;
        match result.unwrap_err() {
            Error::InsufficientFunds { balance, requested } => {
                assert_eq!(balance, dec("10"));
                assert_eq!(requested, dec("20"));
            }
            other => panic!("unexpected error: {other}"),
        }

        // Rejected, not clamped - balance and ledger untouched
        let wallet = wallets::get_by_owner(&db, 1).await?.unwrap();
        assert_eq!(wallet.balance, dec("10"));
        assert_eq!(wallet.version, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_debit_sequence_spends_down_to_exact_zero() -> Result<()> {
        let db = setup_test_db().await?;
        wallets::create(&db, 1, dec("25")).await?;

        let balance = debit(&db, 1, dec("25"), EntryReason::ManualAdjustment, None).await?;
        assert_eq!(balance, Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_competing_debits_only_funds_for_one() -> Result<()> {
        // Wallet holds 100; a 40 and a 70 debit race. Whichever lands second
        // sees the reduced balance and must fail - balance ends at 60.
        let db = setup_test_db().await?;
        wallets::create(&db, 1, dec("100")).await?;

        let first = debit(&db, 1, dec("40"), EntryReason::ManualAdjustment, None).await;
        let second = debit(&db, 1, dec("70"), EntryReason::ManualAdjustment, None).await;

        assert_eq!(first.unwrap(), dec("60"));
        assert!(matches!(
            second.unwrap_err(),
            Error::InsufficientFunds { .. }
        ));

        let wallet = wallets::get_by_owner(&db, 1).await?.unwrap();
        assert_eq!(wallet.balance, dec("60"));
        assert_eq!(entries::replay_balance(&db, wallet.id).await?, dec("60"));
        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_moves_funds_atomically() -> Result<()> {
        let db = setup_test_db().await?;
        wallets::create(&db, 1, dec("100")).await?;
        wallets::create(&db, 2, Decimal::ZERO).await?;

        let reference = Uuid::new_v4();
        let (from_balance, to_balance) =
            transfer_atomic(&db, 1, 2, dec("30"), reference).await?;
        assert_eq!(from_balance, dec("70"));
        assert_eq!(to_balance, dec("30"));

        let recorded = entries::for_transaction(&db, reference).await?;
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].reason, EntryReason::PurchaseDebit);
        assert_eq!(recorded[0].delta, dec("-30"));
        assert_eq!(recorded[1].reason, EntryReason::PurchaseCredit);
        assert_eq!(recorded[1].delta, dec("30"));
        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_insufficient_funds_touches_neither_wallet() -> Result<()> {
        let db = setup_test_db().await?;
        wallets::create(&db, 1, dec("10")).await?;
        wallets::create(&db, 2, dec("5")).await?;

        let reference = Uuid::new_v4();
        let result = transfer_atomic(&db, 1, 2, dec("30"), reference).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientFunds { .. }
        ));

        assert_eq!(wallets::get_by_owner(&db, 1).await?.unwrap().balance, dec("10"));
        assert_eq!(wallets::get_by_owner(&db, 2).await?.unwrap().balance, dec("5"));
        assert!(entries::for_transaction(&db, reference).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_missing_destination_leaves_source_untouched() -> Result<()> {
        let db = setup_test_db().await?;
        wallets::create(&db, 1, dec("100")).await?;

        let result = transfer_atomic(&db, 1, 2, dec("30"), Uuid::new_v4()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::WalletNotFound { owner_id: 2 }
        ));
        assert_eq!(wallets::get_by_owner(&db, 1).await?.unwrap().balance, dec("100"));
        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_rejects_self_and_bad_amounts() -> Result<()> {
        let db = setup_test_db().await?;
        wallets::create(&db, 1, dec("100")).await?;

        let result = transfer_atomic(&db, 1, 1, dec("30"), Uuid::new_v4()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidTransfer { .. }));

        let result = transfer_atomic(&db, 1, 2, Decimal::ZERO, Uuid::new_v4()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_mixed_operations_replay_to_stored_balance() -> Result<()> {
        let db = setup_test_db().await?;
        wallets::create(&db, 1, dec("100")).await?;
        wallets::create(&db, 2, dec("20")).await?;

        credit(&db, 1, dec("50"), EntryReason::ManualAdjustment, None).await?;
        debit(&db, 1, dec("30"), EntryReason::ManualAdjustment, None).await?;
        transfer_atomic(&db, 1, 2, dec("45"), Uuid::new_v4()).await?;

        for owner in [1, 2] {
            let wallet = wallets::get_by_owner(&db, owner).await?.unwrap();
            assert_eq!(
                entries::replay_balance(&db, wallet.id).await?,
                wallet.balance
            );
        }
        assert_eq!(wallets::get_by_owner(&db, 1).await?.unwrap().balance, dec("75"));
        assert_eq!(wallets::get_by_owner(&db, 2).await?.unwrap().balance, dec("65"));
        Ok(())
    }
}

//! Audit - replays a wallet's ledger and compares it with the stored balance.

use crate::{
    errors::{Error, Result},
    store,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Outcome of replaying one wallet's ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditReport {
    /// Owner whose wallet was audited
    pub owner_id: i64,
    /// The audited wallet
    pub wallet_id: i64,
    /// Balance currently stored on the wallet row
    pub stored_balance: Decimal,
    /// Balance recomputed by summing every ledger entry
    pub replayed_balance: Decimal,
}

impl AuditReport {
    /// Whether the ledger replays to the stored balance.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.stored_balance == self.replayed_balance
    }
}

/// Replays an owner's ledger. Closed wallets are audited too; their history
/// is retained exactly for this.
pub async fn audit_wallet(db: &DatabaseConnection, owner_id: i64) -> Result<AuditReport> {
    let wallet = store::wallets::get_by_owner_any(db, owner_id)
        .await?
        .ok_or(Error::WalletNotFound { owner_id })?;
    let replayed = store::entries::replay_balance(db, wallet.id).await?;

    Ok(AuditReport {
        owner_id,
        wallet_id: wallet.id,
        stored_balance: wallet.balance,
        replayed_balance: replayed,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::ledger;
    use crate::entities::{EntryReason, wallet};
    use crate::store::wallets;
    use crate::test_utils::{dec, setup_test_db};
    use sea_orm::{ActiveModelTrait, ActiveValue::Set};

    #[tokio::test]
    async fn test_audit_consistent_after_mutations() -> Result<()> {
        let db = setup_test_db().await?;
        wallets::create(&db, 1, dec("100")).await?;
        ledger::credit(&db, 1, dec("10"), EntryReason::ManualAdjustment, None).await?;
        ledger::debit(&db, 1, dec("60"), EntryReason::ManualAdjustment, None).await?;

        let report = audit_wallet(&db, 1).await?;
        assert_eq!(report.stored_balance, dec("50"));
        assert!(report.is_consistent());
        Ok(())
    }

    #[tokio::test]
    async fn test_audit_detects_tampered_balance() -> Result<()> {
        let db = setup_test_db().await?;
        let created = wallets::create(&db, 1, dec("100")).await?;

        // Corrupt the stored balance behind the ledger's back
        let mut tampered: wallet::ActiveModel = created.into();
        tampered.balance = Set(dec("999"));
        tampered.update(&db).await?;

        let report = audit_wallet(&db, 1).await?;
        assert!(!report.is_consistent());
        assert_eq!(report.replayed_balance, dec("100"));
        Ok(())
    }

    #[tokio::test]
    async fn test_audit_covers_closed_wallets() -> Result<()> {
        let db = setup_test_db().await?;
        wallets::create(&db, 1, dec("30")).await?;
        wallets::soft_delete(&db, 1).await?;

        let report = audit_wallet(&db, 1).await?;
        assert!(report.is_consistent());
        Ok(())
    }

    #[tokio::test]
    async fn test_audit_missing_wallet() -> Result<()> {
        let db = setup_test_db().await?;
        let result = audit_wallet(&db, 1).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::WalletNotFound { owner_id: 1 }
        ));
        Ok(())
    }
}

//! Purchase orchestrator - turns a purchase request into a consistent
//! transaction plus ledger effect.
//!
//! The transaction id is allocated before any write and doubles as the
//! idempotency key: a retried purchase that finds its id already recorded
//! returns the stored row and writes nothing. The ledger transfer and the
//! transaction row share one storage transaction, so a crash or conflict can
//! never leave one without the other.

use crate::{
    catalog::ItemCatalog,
    core::ledger,
    entities::transaction,
    errors::{Error, Result},
    store,
};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info};
use uuid::Uuid;

/// Executes a purchase with a freshly allocated transaction id.
pub async fn purchase(
    db: &DatabaseConnection,
    catalog: &impl ItemCatalog,
    customer_id: i64,
    item_id: i64,
) -> Result<transaction::Model> {
    purchase_with_id(db, catalog, customer_id, item_id, Uuid::new_v4()).await
}

/// Executes a purchase under a caller-supplied transaction id.
///
/// Callers that crashed mid-purchase re-invoke this with the same id; if the
/// first attempt committed, the stored transaction comes back and no new
/// ledger entries are written.
pub async fn purchase_with_id(
    db: &DatabaseConnection,
    catalog: &impl ItemCatalog,
    customer_id: i64,
    item_id: i64,
    transaction_id: Uuid,
) -> Result<transaction::Model> {
    let item = catalog
        .get_item(item_id)
        .await?
        .ok_or(Error::ItemNotFound { item_id })?;

    if item.merchant_id == customer_id {
        return Err(Error::InvalidPurchase {
            reason: "customers cannot purchase their own items".to_string(),
        });
    }
    if item.price <= Decimal::ZERO {
        return Err(Error::InvalidPurchase {
            reason: format!("item price must be positive, got {}", item.price),
        });
    }

    if let Some(existing) = store::transactions::get(db, transaction_id).await? {
        debug!(%transaction_id, "Purchase already recorded, returning stored transaction");
        return Ok(existing);
    }

    for _ in 0..ledger::MAX_MUTATION_ATTEMPTS {
        let txn = db.begin().await?;
        match ledger::transfer_within(
            &txn,
            customer_id,
            item.merchant_id,
            item.price,
            transaction_id,
        )
        .await
        {
            Ok(_) => {
                let record = store::transactions::insert(
                    &txn,
                    transaction_id,
                    item_id,
                    item.merchant_id,
                    customer_id,
                    item.price,
                )
                .await?;
                txn.commit().await?;
                info!(
                    %transaction_id,
                    customer_id,
                    merchant_id = item.merchant_id,
                    item_id,
                    "Purchase completed"
                );
                return Ok(record);
            }
            Err(Error::VersionConflict { wallet_id }) => {
                debug!(%transaction_id, wallet_id, "Purchase lost a version race, retrying");
            }
            Err(err) => return Err(err),
        }
    }

    Err(Error::Contention {
        attempts: ledger::MAX_MUTATION_ATTEMPTS,
    })
}

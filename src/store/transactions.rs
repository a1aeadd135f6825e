//! Transaction row persistence - insert plus the lookup and listing queries.
//!
//! Inserts happen only through the purchase orchestrator, inside the same
//! storage transaction as the ledger entries they belong to.

use crate::{
    entities::{Transaction, transaction},
    errors::Result,
    paging::{self, Page, PageRequest},
};
use rust_decimal::Decimal;
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};

/// Writes the record of one completed purchase.
///
/// Must run inside the same storage transaction as the ledger append it
/// describes.
pub(crate) async fn insert<C>(
    conn: &C,
    id: Uuid,
    item_id: i64,
    merchant_id: i64,
    customer_id: i64,
    price: Decimal,
) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    transaction::ActiveModel {
        id: Set(id),
        item_id: Set(item_id),
        merchant_id: Set(merchant_id),
        customer_id: Set(customer_id),
        price: Set(price),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(conn)
    .await
    .map_err(Into::into)
}

/// Looks up a purchase by its pre-allocated id.
pub async fn get<C>(conn: &C, id: Uuid) -> Result<Option<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find_by_id(id).one(conn).await.map_err(Into::into)
}

/// Pages through a customer's purchases, newest first.
pub async fn for_customer(
    db: &DatabaseConnection,
    customer_id: i64,
    request: PageRequest,
) -> Result<Page<transaction::Model>> {
    let paginator = Transaction::find()
        .filter(transaction::Column::CustomerId.eq(customer_id))
        .order_by_desc(transaction::Column::CreatedAt)
        .paginate(db, request.limit());
    paging::fetch_page(paginator, request).await
}

/// Pages through a merchant's sales, newest first.
pub async fn for_merchant(
    db: &DatabaseConnection,
    merchant_id: i64,
    request: PageRequest,
) -> Result<Page<transaction::Model>> {
    let paginator = Transaction::find()
        .filter(transaction::Column::MerchantId.eq(merchant_id))
        .order_by_desc(transaction::Column::CreatedAt)
        .paginate(db, request.limit());
    paging::fetch_page(paginator, request).await
}

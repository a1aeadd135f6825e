//! Item listing persistence - merchants put items up for sale, delist them,
//! and browse their own listings.

use crate::{
    entities::{Item, item},
    errors::{Error, Result},
    paging::{self, Page, PageRequest},
};
use rust_decimal::Decimal;
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};

/// Lists a new item for sale, performing input validation.
pub async fn create_item(
    db: &DatabaseConnection,
    merchant_id: i64,
    name: String,
    price: Decimal,
) -> Result<item::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "item name cannot be empty".to_string(),
        });
    }
    if price <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount: price });
    }

    item::ActiveModel {
        merchant_id: Set(merchant_id),
        name: Set(name.trim().to_string()),
        price: Set(price),
        is_delisted: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Fetches an item if it is still listed.
pub async fn get_item(db: &DatabaseConnection, item_id: i64) -> Result<Option<item::Model>> {
    Item::find_by_id(item_id)
        .filter(item::Column::IsDelisted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Takes an item off the catalog; past transactions keep their reference.
pub async fn delist_item(db: &DatabaseConnection, item_id: i64) -> Result<item::Model> {
    let item = get_item(db, item_id)
        .await?
        .ok_or(Error::ItemNotFound { item_id })?;

    let mut active: item::ActiveModel = item.into();
    active.is_delisted = Set(true);
    active.update(db).await.map_err(Into::into)
}

/// Pages through a merchant's active listings, ordered by name.
pub async fn for_merchant(
    db: &DatabaseConnection,
    merchant_id: i64,
    request: PageRequest,
) -> Result<Page<item::Model>> {
    let paginator = Item::find()
        .filter(item::Column::MerchantId.eq(merchant_id))
        .filter(item::Column::IsDelisted.eq(false))
        .order_by_asc(item::Column::Name)
        .paginate(db, request.limit());
    paging::fetch_page(paginator, request).await
}

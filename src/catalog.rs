//! Item catalog boundary - read-only resolution of an item to its merchant
//! and current price.
//!
//! The catalog is an external collaborator as far as the ledger is concerned;
//! the purchase orchestrator only sees the [`ItemCatalog`] trait. Two
//! implementations ship here: [`DbCatalog`] reads the items table this crate
//! also manages, and [`StaticCatalog`] is an in-memory fixture.

use crate::{errors::Result, store};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::collections::HashMap;

/// What a purchase needs to know about an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItem {
    /// Item id
    pub id: i64,
    /// Merchant whose wallet a purchase credits
    pub merchant_id: i64,
    /// Current asking price
    pub price: Decimal,
}

/// Read-only item lookup.
#[allow(async_fn_in_trait)]
pub trait ItemCatalog {
    /// Resolves an item id to its merchant and price; `None` if the item is
    /// absent or delisted.
    async fn get_item(&self, item_id: i64) -> Result<Option<CatalogItem>>;
}

/// Catalog backed by the items table.
#[derive(Debug, Clone, Copy)]
pub struct DbCatalog<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DbCatalog<'a> {
    /// Wraps a database handle as a catalog.
    #[must_use]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ItemCatalog for DbCatalog<'_> {
    async fn get_item(&self, item_id: i64) -> Result<Option<CatalogItem>> {
        Ok(store::items::get_item(self.db, item_id)
            .await?
            .map(|item| CatalogItem {
                id: item.id,
                merchant_id: item.merchant_id,
                price: item.price,
            }))
    }
}

/// In-memory catalog fixture.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: HashMap<i64, CatalogItem>,
}

impl StaticCatalog {
    /// Adds an item, builder-style.
    #[must_use]
    pub fn with_item(mut self, id: i64, merchant_id: i64, price: Decimal) -> Self {
        self.items.insert(
            id,
            CatalogItem {
                id,
                merchant_id,
                price,
            },
        );
        self
    }
}

impl ItemCatalog for StaticCatalog {
    async fn get_item(&self, item_id: i64) -> Result<Option<CatalogItem>> {
        Ok(self.items.get(&item_id).copied())
    }
}

use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use crate::db::get_connection;
use crate::schema::{product_channel_links, products};

use super::products_errors::{ProductError, Result};
use super::products_model::{ChannelLink, ChannelLinkDB, NewProduct, Product, ProductDB};
use super::products_traits::ProductRepositoryTrait;

/// Repository for managing catalog products and their channel links
pub struct ProductRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl ProductRepository {
    /// Creates a new ProductRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    fn load_links(
        conn: &mut SqliteConnection,
        product_ids: &[String],
    ) -> Result<Vec<ChannelLinkDB>> {
        let links = product_channel_links::table
            .filter(product_channel_links::product_id.eq_any(product_ids))
            .order(product_channel_links::slot_index.asc())
            .load::<ChannelLinkDB>(conn)?;
        Ok(links)
    }
}

impl ProductRepositoryTrait for ProductRepository {
    /// Creates a new product in the catalog
    fn create(&self, new_product: NewProduct) -> Result<Product> {
        new_product.validate()?;
        let sku = new_product.sku.trim().to_string();
        let product_db: ProductDB = new_product.into();

        let mut conn = get_connection(&self.pool).map_err(|e| {
            ProductError::DatabaseError(e.to_string())
        })?;

        let result = diesel::insert_into(products::table)
            .values(&product_db)
            .get_result::<ProductDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => ProductError::DuplicateSku(sku.clone()),
                other => other.into(),
            })?;

        Ok(result.into_product(Vec::new()))
    }

    /// Finds a product by SKU within a client scope, with its channel links
    fn find_by_sku(&self, client_id: &str, sku: &str) -> Result<Option<Product>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        let product = products::table
            .filter(products::client_id.eq(client_id))
            .filter(products::sku.eq(sku.trim()))
            .first::<ProductDB>(&mut conn)
            .optional()?;

        match product {
            Some(db) => {
                let links = Self::load_links(&mut conn, &[db.id.clone()])?;
                Ok(Some(db.into_product(links)))
            }
            None => Ok(None),
        }
    }

    /// Lists all products for a client, with their channel links
    fn list(&self, client_id: &str) -> Result<Vec<Product>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        let product_dbs = products::table
            .filter(products::client_id.eq(client_id))
            .order(products::sku.asc())
            .load::<ProductDB>(&mut conn)?;

        let ids: Vec<String> = product_dbs.iter().map(|p| p.id.clone()).collect();
        let all_links = Self::load_links(&mut conn, &ids)?;

        let mut by_product: std::collections::HashMap<String, Vec<ChannelLinkDB>> =
            std::collections::HashMap::new();
        for link in all_links {
            by_product
                .entry(link.product_id.clone())
                .or_default()
                .push(link);
        }

        Ok(product_dbs
            .into_iter()
            .map(|db| {
                let links = by_product.remove(&db.id).unwrap_or_default();
                db.into_product(links)
            })
            .collect())
    }

    /// Writes a channel link into the first free slot of a product.
    ///
    /// Runs in a transaction: links are re-read immediately before writing so
    /// a stale classification cannot double-link a channel or overwrite an
    /// occupied slot. The unique indexes on (product_id, slot_index) and
    /// (product_id, channel) back this up against concurrent writers from
    /// other processes.
    fn link_channel(
        &self,
        product_id: &str,
        channel: &str,
        external_id: &str,
    ) -> Result<ChannelLink> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        conn.transaction::<ChannelLink, ProductError, _>(|tx| {
            let product_db = products::table
                .find(product_id)
                .first::<ProductDB>(tx)?;

            let links = Self::load_links(tx, &[product_db.id.clone()])?;
            let product = product_db.into_product(links);

            if product.link_for_channel(channel).is_some() {
                return Err(ProductError::AlreadyLinked(channel.to_string()));
            }

            let free_slot = product
                .first_free_slot()
                .ok_or_else(|| ProductError::SlotExhausted(product.sku.clone()))?;

            let link_db = ChannelLinkDB {
                id: uuid::Uuid::new_v4().to_string(),
                product_id: product.id.clone(),
                slot_index: free_slot,
                channel: channel.to_string(),
                external_id: external_id.to_string(),
                created_at: chrono::Utc::now().naive_utc(),
            };

            let inserted = diesel::insert_into(product_channel_links::table)
                .values(&link_db)
                .get_result::<ChannelLinkDB>(tx)
                .map_err(|e| match e {
                    diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::UniqueViolation,
                        _,
                    ) => ProductError::AlreadyLinked(channel.to_string()),
                    other => other.into(),
                })?;

            debug!(
                "Linked channel '{}' to product '{}' at slot {}",
                channel, product.sku, free_slot
            );

            Ok(inserted.into())
        })
    }

    /// Updates the stock of a product
    fn update_stock(&self, product_id: &str, stock: i32) -> Result<()> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        diesel::update(products::table.find(product_id))
            .set((
                products::stock.eq(stock),
                products::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    /// Deletes products in bulk by id (explicit operation, never automatic)
    fn delete_products(&self, client_id: &str, ids: &[String]) -> Result<usize> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        let deleted = diesel::delete(
            products::table
                .filter(products::client_id.eq(client_id))
                .filter(products::id.eq_any(ids)),
        )
        .execute(&mut conn)?;

        Ok(deleted)
    }
}

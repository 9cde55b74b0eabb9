use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::products_errors::Result;
use super::products_model::{NewProduct, Product};
use super::products_repository::ProductRepository;
use super::products_traits::ProductRepositoryTrait;

/// Service for managing catalog products
pub struct ProductService {
    repository: ProductRepository,
}

impl ProductService {
    /// Creates a new ProductService instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            repository: ProductRepository::new(pool),
        }
    }

    /// Lists all products for a client
    pub fn get_products(&self, client_id: &str) -> Result<Vec<Product>> {
        self.repository.list(client_id)
    }

    /// Retrieves a product by SKU within a client scope
    pub fn get_product_by_sku(&self, client_id: &str, sku: &str) -> Result<Option<Product>> {
        self.repository.find_by_sku(client_id, sku)
    }

    /// Creates a product from manual input
    pub fn create_product(&self, new_product: NewProduct) -> Result<Product> {
        debug!("Creating product with SKU '{}'", new_product.sku);
        self.repository.create(new_product)
    }

    /// Updates the stock of a product
    pub fn update_stock(&self, product_id: &str, stock: i32) -> Result<()> {
        self.repository.update_stock(product_id, stock)
    }

    /// Deletes products in bulk. Explicit operation; reconciliation never
    /// deletes products.
    pub fn delete_products(&self, client_id: &str, ids: &[String]) -> Result<usize> {
        self.repository.delete_products(client_id, ids)
    }
}

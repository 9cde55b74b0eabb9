use super::products_errors::Result;
use super::products_model::{ChannelLink, NewProduct, Product};

/// Persistence seam for the catalog, injected into the reconciliation layer
pub trait ProductRepositoryTrait: Send + Sync {
    fn create(&self, new_product: NewProduct) -> Result<Product>;
    fn find_by_sku(&self, client_id: &str, sku: &str) -> Result<Option<Product>>;
    fn list(&self, client_id: &str) -> Result<Vec<Product>>;
    fn link_channel(
        &self,
        product_id: &str,
        channel: &str,
        external_id: &str,
    ) -> Result<ChannelLink>;
    fn update_stock(&self, product_id: &str, stock: i32) -> Result<()>;
    fn delete_products(&self, client_id: &str, ids: &[String]) -> Result<usize>;
}

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::products_constants::MAX_CHANNEL_SLOTS;
use super::products_errors::{ProductError, Result};

/// Domain model representing a canonical catalog product.
///
/// `links` is the ordered collection of channel associations, at most
/// [`MAX_CHANNEL_SLOTS`] entries, sorted by `slot_index`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub client_id: String,
    pub sku: String,
    pub name: String,
    pub stock: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub weight_kg: Option<Decimal>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub links: Vec<ChannelLink>,
}

impl Product {
    /// Returns the link for the given channel, if any.
    pub fn link_for_channel(&self, channel: &str) -> Option<&ChannelLink> {
        self.links.iter().find(|l| l.channel == channel)
    }

    /// Returns the first free slot index (1-based), scanning in order.
    pub fn first_free_slot(&self) -> Option<i32> {
        (1..=MAX_CHANNEL_SLOTS).find(|idx| !self.links.iter().any(|l| l.slot_index == *idx))
    }
}

/// One channel association occupying a slot on a product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelLink {
    pub slot_index: i32,
    pub channel: String,
    pub external_id: String,
}

/// Input model for creating a new product
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub id: Option<String>,
    pub client_id: String,
    pub sku: String,
    pub name: String,
    pub stock: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub weight_kg: Option<Decimal>,
}

impl NewProduct {
    /// Validates the new product data
    pub fn validate(&self) -> Result<()> {
        if self.sku.trim().is_empty() {
            return Err(ProductError::InvalidData(
                "Product SKU cannot be empty".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(ProductError::InvalidData(
                "Product name cannot be empty".to_string(),
            ));
        }
        if self.stock < 0 {
            return Err(ProductError::InvalidData(
                "Product stock cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Database model for products
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Default,
)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductDB {
    pub id: String,
    pub client_id: String,
    pub sku: String,
    pub name: String,
    pub stock: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub weight_kg: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for channel links
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    Associations,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::product_channel_links)]
#[diesel(belongs_to(ProductDB, foreign_key = product_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ChannelLinkDB {
    pub id: String,
    pub product_id: String,
    pub slot_index: i32,
    pub channel: String,
    pub external_id: String,
    pub created_at: NaiveDateTime,
}

// Conversion implementations
impl ProductDB {
    pub fn into_product(self, links: Vec<ChannelLinkDB>) -> Product {
        let mut links: Vec<ChannelLink> = links.into_iter().map(ChannelLink::from).collect();
        links.sort_by_key(|l| l.slot_index);

        Product {
            id: self.id,
            client_id: self.client_id,
            sku: self.sku,
            name: self.name,
            stock: self.stock,
            description: self.description,
            image_url: self.image_url,
            weight_kg: self
                .weight_kg
                .as_deref()
                .and_then(|w| Decimal::from_str(w).ok()),
            created_at: self.created_at,
            updated_at: self.updated_at,
            links,
        }
    }
}

impl From<ChannelLinkDB> for ChannelLink {
    fn from(db: ChannelLinkDB) -> Self {
        Self {
            slot_index: db.slot_index,
            channel: db.channel,
            external_id: db.external_id,
        }
    }
}

impl From<NewProduct> for ProductDB {
    fn from(domain: NewProduct) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            client_id: domain.client_id,
            sku: domain.sku.trim().to_string(),
            name: domain.name,
            stock: domain.stock,
            description: domain.description,
            image_url: domain.image_url,
            weight_kg: domain.weight_kg.map(|w| w.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_with_slots(slots: &[i32]) -> Product {
        Product {
            links: slots
                .iter()
                .map(|idx| ChannelLink {
                    slot_index: *idx,
                    channel: format!("channel-{}", idx),
                    external_id: format!("ext-{}", idx),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_free_slot_fills_gaps_in_order() {
        assert_eq!(product_with_slots(&[]).first_free_slot(), Some(1));
        assert_eq!(product_with_slots(&[1, 2]).first_free_slot(), Some(3));
        assert_eq!(product_with_slots(&[1, 3]).first_free_slot(), Some(2));
    }

    #[test]
    fn test_first_free_slot_none_when_full() {
        assert_eq!(
            product_with_slots(&[1, 2, 3, 4, 5, 6]).first_free_slot(),
            None
        );
    }

    #[test]
    fn test_link_for_channel() {
        let product = product_with_slots(&[1, 2]);
        assert!(product.link_for_channel("channel-2").is_some());
        assert!(product.link_for_channel("amazon").is_none());
    }
}

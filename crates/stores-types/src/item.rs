//! Item types

use crate::store::Store;
use crate::tag::Tag;
use crate::validation::{required_id, required_str, required_price, FieldErrors, Validate};
use serde::{Deserialize, Serialize};

/// A priced good belonging to exactly one store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing, default)]
    pub store_id: i64,
}

/// Item with its store and tags materialized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub store: Store,
    pub tags: Vec<Tag>,
}

impl ItemView {
    pub fn new(item: Item, store: Store, tags: Vec<Tag>) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            store,
            tags,
        }
    }
}

/// `POST /item` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateItemRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub store_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub price: f64,
    pub store_id: i64,
}

impl Validate for CreateItemRequest {
    type Output = NewItem;

    fn validate(self) -> Result<NewItem, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required_str(&mut errors, "name", self.name);
        let price = required_price(&mut errors, "price", self.price);
        let store_id = required_id(&mut errors, "store_id", self.store_id);

        match (name, price, store_id) {
            (Some(name), Some(price), Some(store_id)) => Ok(NewItem {
                name,
                price,
                store_id,
            }),
            _ => Err(errors),
        }
    }
}

/// `PUT /item/:id` body
///
/// `store_id` only matters when the item does not exist yet and the
/// replacement creates it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplaceItemRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub store_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemReplacement {
    pub name: String,
    pub price: f64,
    pub store_id: Option<i64>,
}

impl Validate for ReplaceItemRequest {
    type Output = ItemReplacement;

    fn validate(self) -> Result<ItemReplacement, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required_str(&mut errors, "name", self.name);
        let price = required_price(&mut errors, "price", self.price);

        match (name, price) {
            (Some(name), Some(price)) => Ok(ItemReplacement {
                name,
                price,
                store_id: self.store_id,
            }),
            _ => Err(errors),
        }
    }
}

//! Tag types

use crate::item::{Item, ItemView};
use crate::store::Store;
use crate::validation::{required_str, FieldErrors, Validate};
use serde::{Deserialize, Serialize};

/// A label scoped to one store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub store_id: i64,
}

/// Tag with its store and linked items materialized
///
/// `store` is absent once the owning store has been deleted, since tags are
/// not removed along with their store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagView {
    pub id: i64,
    pub name: String,
    pub store: Option<Store>,
    pub items: Vec<Item>,
}

impl TagView {
    pub fn new(tag: Tag, store: Option<Store>, items: Vec<Item>) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            store,
            items,
        }
    }
}

/// Result of removing an item/tag link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlinkView {
    pub message: String,
    pub item: ItemView,
    pub tag: TagView,
}

/// `POST /store/:id/tag` body; the store comes from the path
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTagRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTag {
    pub name: String,
}

impl Validate for CreateTagRequest {
    type Output = NewTag;

    fn validate(self) -> Result<NewTag, FieldErrors> {
        let mut errors = FieldErrors::new();
        match required_str(&mut errors, "name", self.name) {
            Some(name) => Ok(NewTag { name }),
            None => Err(errors),
        }
    }
}

//! Store types

use crate::item::Item;
use crate::tag::Tag;
use crate::validation::{required_str, FieldErrors, Validate};
use serde::{Deserialize, Serialize};

/// A named container owning items and tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: i64,
    pub name: String,
}

/// Store with its items and tags materialized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreView {
    pub id: i64,
    pub name: String,
    pub items: Vec<Item>,
    pub tags: Vec<Tag>,
}

impl StoreView {
    pub fn new(store: Store, items: Vec<Item>, tags: Vec<Tag>) -> Self {
        Self {
            id: store.id,
            name: store.name,
            items,
            tags,
        }
    }
}

/// `POST /store` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateStoreRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStore {
    pub name: String,
}

impl Validate for CreateStoreRequest {
    type Output = NewStore;

    fn validate(self) -> Result<NewStore, FieldErrors> {
        let mut errors = FieldErrors::new();
        match required_str(&mut errors, "name", self.name) {
            Some(name) => Ok(NewStore { name }),
            None => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_store_requires_name() {
        let errors = CreateStoreRequest::default().validate().unwrap_err();
        assert!(errors.has("name"));

        let ok = CreateStoreRequest {
            name: Some("Corner Shop".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.name, "Corner Shop");
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let res: Result<CreateStoreRequest, _> =
            serde_json::from_str(r#"{"name": "a", "id": 4}"#);
        assert!(res.is_err());
    }
}

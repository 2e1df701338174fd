// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::error::StorageError;
use crate::model::Collection;

/// Storage key holding the JSON array of lists.
pub const LISTS_KEY: &str = "todoLists";
/// Storage key holding the `"dark"`/`"light"` presentation preference.
pub const THEME_KEY: &str = "theme";

/// Something the store recovered from on its own but the user should hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreNotice {
    CorruptPayload { detail: String },
    ReadFailed { detail: String },
}

impl StoreNotice {
    pub fn message(&self) -> String {
        match self {
            Self::CorruptPayload { detail } => {
                format!("saved lists were unreadable ({detail}); starting from an empty collection")
            }
            Self::ReadFailed { detail } => {
                format!("could not read saved lists ({detail}); showing an empty collection")
            }
        }
    }
}

/// Durable home of the collection.
///
/// `load` never fails: absence of data is the empty collection, and anything
/// unreadable is treated as empty and reported through `drain_notices`.
/// `save` replaces the whole collection atomically.
pub trait ListStore {
    fn load(&self) -> Collection;
    fn save(&self, collection: &Collection) -> Result<(), StorageError>;
    fn drain_notices(&self) -> Vec<StoreNotice>;
}

pub fn encode_collection(collection: &Collection) -> Result<String, StorageError> {
    Ok(serde_json::to_string(collection)?)
}

/// Decodes a stored payload, failing open to an empty collection.
pub fn decode_collection(raw: Option<&str>) -> (Collection, Option<StoreNotice>) {
    let Some(raw) = raw else {
        return (Collection::default(), None);
    };
    match serde_json::from_str::<Collection>(raw) {
        Ok(collection) => (collection, None),
        Err(error) => {
            log::warn!("discarding unreadable {LISTS_KEY} payload: {error}");
            (
                Collection::default(),
                Some(StoreNotice::CorruptPayload {
                    detail: error.to_string(),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreNotice, decode_collection, encode_collection};
    use crate::{Collection, ItemId, ListId, TodoList};

    #[test]
    fn missing_payload_is_empty_without_notice() {
        let (collection, notice) = decode_collection(None);
        assert!(collection.is_empty());
        assert!(notice.is_none());
    }

    #[test]
    fn corrupt_payload_fails_open() {
        let (collection, notice) = decode_collection(Some("{not json"));
        assert!(collection.is_empty());
        assert!(matches!(notice, Some(StoreNotice::CorruptPayload { .. })));
    }

    #[test]
    fn wrong_shape_counts_as_corrupt() {
        let (collection, notice) = decode_collection(Some(r#"{"todoLists": []}"#));
        assert!(collection.is_empty());
        let message = notice.expect("notice for wrong shape").message();
        assert!(message.contains("starting from an empty collection"));
    }

    #[test]
    fn encode_then_decode_preserves_lists() {
        let collection = Collection::new(vec![TodoList {
            id: ListId::new(1),
            title: "Trip".to_owned(),
            items: vec![crate::Item {
                id: ItemId::new(2),
                text: "Passport".to_owned(),
                completed: true,
            }],
        }]);
        let raw = encode_collection(&collection).expect("encode");
        let (decoded, notice) = decode_collection(Some(&raw));
        assert!(notice.is_none());
        assert_eq!(decoded, collection);
    }
}

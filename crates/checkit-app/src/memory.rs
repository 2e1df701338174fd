// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cell::{Cell, RefCell};

use crate::error::StorageError;
use crate::model::Collection;
use crate::store::{LISTS_KEY, ListStore, StoreNotice, decode_collection, encode_collection};

/// A `ListStore` that keeps the serialized payload in memory.
///
/// It goes through the same JSON encoding as the on-disk store, so corrupt
/// payloads and failed writes behave identically.
#[derive(Debug, Default)]
pub struct MemoryStore {
    payload: RefCell<Option<String>>,
    notices: RefCell<Vec<StoreNotice>>,
    fail_saves: Cell<bool>,
    save_count: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw_payload(raw: impl Into<String>) -> Self {
        let store = Self::default();
        store.set_raw_payload(raw);
        store
    }

    pub fn set_raw_payload(&self, raw: impl Into<String>) {
        *self.payload.borrow_mut() = Some(raw.into());
    }

    pub fn raw_payload(&self) -> Option<String> {
        self.payload.borrow().clone()
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    pub fn save_count(&self) -> usize {
        self.save_count.get()
    }
}

impl ListStore for MemoryStore {
    fn load(&self) -> Collection {
        let payload = self.payload.borrow();
        let (collection, notice) = decode_collection(payload.as_deref());
        if let Some(notice) = notice {
            self.notices.borrow_mut().push(notice);
        }
        collection
    }

    fn save(&self, collection: &Collection) -> Result<(), StorageError> {
        if self.fail_saves.get() {
            return Err(StorageError::Write {
                key: LISTS_KEY,
                message: "storage quota exceeded".to_owned(),
            });
        }
        let raw = encode_collection(collection)?;
        *self.payload.borrow_mut() = Some(raw);
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }

    fn drain_notices(&self) -> Vec<StoreNotice> {
        std::mem::take(&mut *self.notices.borrow_mut())
    }
}

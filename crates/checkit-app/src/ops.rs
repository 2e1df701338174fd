// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Create/rename/delete/toggle over the persisted collection.
//!
//! Every operation re-reads the collection, validates, mutates a private copy
//! and writes the whole thing back. A failed check or a failed write leaves
//! durable state exactly as it was.

use crate::error::{Field, OpError, Target};
use crate::ids::{ItemId, ListId, now_millis};
use crate::model::{Collection, Item, TodoList};
use crate::store::ListStore;

fn required_text(raw: &str, field: Field) -> Result<String, OpError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(OpError::Validation { field });
    }
    Ok(trimmed.to_owned())
}

fn list_mut(collection: &mut Collection, list_index: usize) -> Result<&mut TodoList, OpError> {
    collection
        .get_mut(list_index)
        .ok_or(OpError::NotFound(Target::List { list_index }))
}

fn item_mut(
    collection: &mut Collection,
    list_index: usize,
    item_index: usize,
) -> Result<&mut Item, OpError> {
    list_mut(collection, list_index)?
        .items
        .get_mut(item_index)
        .ok_or(OpError::NotFound(Target::Item {
            list_index,
            item_index,
        }))
}

fn commit<S: ListStore + ?Sized>(store: &S, collection: &Collection) -> Result<(), OpError> {
    store.save(collection).map_err(|error| {
        log::error!("save failed: {error}");
        OpError::Storage(error)
    })
}

pub fn create_list<S: ListStore + ?Sized>(store: &S, title: &str) -> Result<ListId, OpError> {
    let title = required_text(title, Field::ListTitle)?;
    let mut collection = store.load();
    let id = ListId::new(collection.fresh_id(now_millis()));
    collection.push(TodoList {
        id,
        title,
        items: Vec::new(),
    });
    commit(store, &collection)?;
    Ok(id)
}

pub fn rename_list<S: ListStore + ?Sized>(
    store: &S,
    list_index: usize,
    new_title: &str,
) -> Result<(), OpError> {
    let title = required_text(new_title, Field::ListTitle)?;
    let mut collection = store.load();
    list_mut(&mut collection, list_index)?.title = title;
    commit(store, &collection)
}

pub fn delete_list<S: ListStore + ?Sized>(store: &S, list_index: usize) -> Result<TodoList, OpError> {
    let mut collection = store.load();
    let removed = collection
        .remove(list_index)
        .ok_or(OpError::NotFound(Target::List { list_index }))?;
    commit(store, &collection)?;
    Ok(removed)
}

pub fn create_item<S: ListStore + ?Sized>(
    store: &S,
    list_index: usize,
    text: &str,
) -> Result<ItemId, OpError> {
    let mut collection = store.load();
    if collection.get(list_index).is_none() {
        return Err(OpError::NotFound(Target::List { list_index }));
    }
    let text = required_text(text, Field::ItemText)?;
    let id = ItemId::new(collection.fresh_id(now_millis()));
    list_mut(&mut collection, list_index)?.items.push(Item {
        id,
        text,
        completed: false,
    });
    commit(store, &collection)?;
    Ok(id)
}

pub fn rename_item<S: ListStore + ?Sized>(
    store: &S,
    list_index: usize,
    item_index: usize,
    new_text: &str,
) -> Result<(), OpError> {
    let text = required_text(new_text, Field::ItemText)?;
    let mut collection = store.load();
    item_mut(&mut collection, list_index, item_index)?.text = text;
    commit(store, &collection)
}

pub fn delete_item<S: ListStore + ?Sized>(
    store: &S,
    list_index: usize,
    item_index: usize,
) -> Result<Item, OpError> {
    let mut collection = store.load();
    let list = list_mut(&mut collection, list_index)?;
    if item_index >= list.items.len() {
        return Err(OpError::NotFound(Target::Item {
            list_index,
            item_index,
        }));
    }
    let removed = list.items.remove(item_index);
    commit(store, &collection)?;
    Ok(removed)
}

/// Flips `completed` and returns the new value.
pub fn toggle_item<S: ListStore + ?Sized>(
    store: &S,
    list_index: usize,
    item_index: usize,
) -> Result<bool, OpError> {
    let mut collection = store.load();
    let item = item_mut(&mut collection, list_index, item_index)?;
    item.completed = !item.completed;
    let completed = item.completed;
    commit(store, &collection)?;
    Ok(completed)
}

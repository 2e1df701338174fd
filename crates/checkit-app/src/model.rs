// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

use crate::ids::*;

/// Shown for a stored list or item that carries no usable text.
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoList {
    pub id: ListId,
    pub title: String,
    pub items: Vec<Item>,
}

impl TodoList {
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }
}

/// Every list the user owns, in display order. Serializes as a bare JSON array.
///
/// Decoding is lenient about what older builds wrote: `name` stands in for a
/// missing `title`/`text`, a list without either is `Untitled`, a bare string
/// is an item, and missing ids are assigned above the largest stored one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Collection {
    lists: Vec<TodoList>,
}

impl Collection {
    pub fn new(lists: Vec<TodoList>) -> Self {
        Self { lists }
    }

    pub fn lists(&self) -> &[TodoList] {
        &self.lists
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TodoList> {
        self.lists.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut TodoList> {
        self.lists.get_mut(index)
    }

    pub fn item(&self, list_index: usize, item_index: usize) -> Option<&Item> {
        self.lists.get(list_index)?.items.get(item_index)
    }

    pub fn push(&mut self, list: TodoList) {
        self.lists.push(list);
    }

    pub fn remove(&mut self, index: usize) -> Option<TodoList> {
        if index < self.lists.len() {
            Some(self.lists.remove(index))
        } else {
            None
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TodoList> {
        self.lists.iter()
    }

    fn all_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.lists.iter().flat_map(|list| {
            std::iter::once(list.id.get()).chain(list.items.iter().map(|item| item.id.get()))
        })
    }

    /// Lists and items share one id space.
    pub fn largest_id(&self) -> Option<i64> {
        self.all_ids().max()
    }

    /// Once `i64::MAX` is taken there is nothing above the largest id, so the
    /// lowest free non-negative id is used instead.
    pub fn fresh_id(&self, now_ms: i64) -> i64 {
        next_id(now_ms, self.largest_id()).unwrap_or_else(|| self.lowest_unused_id())
    }

    fn lowest_unused_id(&self) -> i64 {
        let used = self.all_ids().collect::<BTreeSet<_>>();
        (0..i64::MAX)
            .find(|candidate| !used.contains(candidate))
            .unwrap_or(i64::MIN)
    }

    pub fn position_of_list(&self, id: ListId) -> Option<usize> {
        self.lists.iter().position(|list| list.id == id)
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a TodoList;
    type IntoIter = std::slice::Iter<'a, TodoList>;

    fn into_iter(self) -> Self::IntoIter {
        self.lists.iter()
    }
}

#[derive(Deserialize)]
struct StoredList {
    id: Option<ListId>,
    title: Option<String>,
    name: Option<String>,
    items: Option<Vec<StoredItem>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredItem {
    Fields {
        id: Option<ItemId>,
        text: Option<String>,
        name: Option<String>,
        completed: Option<bool>,
    },
    Other(serde_json::Value),
}

enum MissingId {
    List(usize),
    Item(usize, usize),
}

impl Collection {
    fn from_stored(stored: Vec<StoredList>) -> Self {
        let mut collection = Self::default();
        let mut missing = Vec::new();
        for (list_index, list) in stored.into_iter().enumerate() {
            if list.id.is_none() {
                missing.push(MissingId::List(list_index));
            }
            let mut items = Vec::new();
            for (item_index, item) in list.items.unwrap_or_default().into_iter().enumerate() {
                let (id, text, completed) = match item {
                    StoredItem::Fields {
                        id,
                        text,
                        name,
                        completed,
                    } => (id, text.or(name), completed.unwrap_or(false)),
                    StoredItem::Other(serde_json::Value::String(text)) => (None, Some(text), false),
                    StoredItem::Other(value) => (None, Some(value.to_string()), false),
                };
                if id.is_none() {
                    missing.push(MissingId::Item(list_index, item_index));
                }
                items.push(Item {
                    id: id.unwrap_or(ItemId::new(0)),
                    text: text.unwrap_or_else(|| UNTITLED.to_owned()),
                    completed,
                });
            }
            collection.push(TodoList {
                id: list.id.unwrap_or(ListId::new(0)),
                title: list
                    .title
                    .or(list.name)
                    .unwrap_or_else(|| UNTITLED.to_owned()),
                items,
            });
        }

        // Placeholder ids are 0; fresh_id only hands out unused ids.
        for slot in missing {
            let id = collection.fresh_id(0);
            match slot {
                MissingId::List(list_index) => {
                    if let Some(list) = collection.get_mut(list_index) {
                        list.id = ListId::new(id);
                    }
                }
                MissingId::Item(list_index, item_index) => {
                    if let Some(item) = collection
                        .get_mut(list_index)
                        .and_then(|list| list.items.get_mut(item_index))
                    {
                        item.id = ItemId::new(id);
                    }
                }
            }
        }
        collection
    }
}

impl<'de> Deserialize<'de> for Collection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<StoredList>::deserialize(deserializer).map(Self::from_stored)
    }
}

impl From<Vec<TodoList>> for Collection {
    fn from(lists: Vec<TodoList>) -> Self {
        Self { lists }
    }
}

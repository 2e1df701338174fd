// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use checkit_app::{Collection, Item, ItemId, ListId, TodoList};
use std::path::PathBuf;

const LIST_TITLES: [&str; 12] = [
    "Groceries",
    "Weekend Chores",
    "Packing",
    "Garden",
    "Reading",
    "Errands",
    "Gift Ideas",
    "Meal Prep",
    "Move Out",
    "Garage",
    "Camping Trip",
    "Bills",
];

const ITEM_VERBS: [&str; 10] = [
    "Buy", "Call", "Clean", "Fix", "Pack", "Return", "Order", "Sort", "Water", "Check",
];

const ITEM_NOUNS: [&str; 18] = [
    "milk",
    "bread",
    "the plumber",
    "gutters",
    "passport",
    "library books",
    "batteries",
    "tent stakes",
    "tomatoes",
    "the car",
    "receipts",
    "coffee filters",
    "dog food",
    "the bike tire",
    "sunscreen",
    "light bulbs",
    "the basil",
    "the mailbox",
];

/// First id handed out by a faker; chosen to look like a Unix-ms timestamp.
pub const BASE_ID: i64 = 1_767_225_600_000;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator for lists and items. Same seed, same collection.
#[derive(Debug, Clone)]
pub struct ListFaker {
    rng: DeterministicRng,
    next_id: i64,
}

impl ListFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: BASE_ID,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn list_title(&mut self) -> String {
        LIST_TITLES[self.rng.int_n(LIST_TITLES.len())].to_owned()
    }

    pub fn item_text(&mut self) -> String {
        let verb = ITEM_VERBS[self.rng.int_n(ITEM_VERBS.len())];
        let noun = ITEM_NOUNS[self.rng.int_n(ITEM_NOUNS.len())];
        format!("{verb} {noun}")
    }

    pub fn item(&mut self) -> Item {
        Item {
            id: ItemId::new(self.take_id()),
            text: self.item_text(),
            completed: self.rng.bool(),
        }
    }

    pub fn list(&mut self, max_items: usize) -> TodoList {
        let id = ListId::new(self.take_id());
        let title = self.list_title();
        let count = self.rng.int_n(max_items + 1);
        let items = (0..count).map(|_| self.item()).collect();
        TodoList { id, title, items }
    }

    pub fn collection(&mut self, lists: usize, max_items: usize) -> Collection {
        Collection::new((0..lists).map(|_| self.list(max_items)).collect())
    }

    fn take_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1 + self.rng.int_n(50) as i64;
        id
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("checkit.db");
    Ok((dir, db_path))
}

pub fn list_titles() -> &'static [&'static str] {
    &LIST_TITLES
}

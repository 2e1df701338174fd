// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use checkit_app::{
    Action, AppState, Body, DetailBody, ListStore, MemoryStore, NavState, dispatch, ops, render,
};
use checkit_testkit::ListFaker;
use std::collections::BTreeSet;

fn titles(store: &MemoryStore) -> Vec<String> {
    store.load().iter().map(|list| list.title.clone()).collect()
}

#[test]
fn groceries_from_empty_storage() -> Result<()> {
    let store = MemoryStore::new();
    ops::create_list(&store, "Groceries")?;
    ops::create_item(&store, 0, "Milk")?;
    ops::toggle_item(&store, 0, 0)?;

    let collection = store.load();
    assert_eq!(collection.len(), 1);
    let list = &collection.lists()[0];
    assert_eq!(list.title, "Groceries");
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].text, "Milk");
    assert!(list.items[0].completed);
    assert_ne!(list.id.get(), list.items[0].id.get());
    Ok(())
}

#[test]
fn blank_title_on_empty_storage_stays_empty() {
    let store = MemoryStore::new();
    let error = ops::create_list(&store, "").expect_err("blank title");
    assert!(error.is_validation());
    assert!(store.load().is_empty());
    assert_eq!(store.save_count(), 0);
}

#[test]
fn deleting_first_of_two_lists_keeps_second() -> Result<()> {
    let store = MemoryStore::new();
    ops::create_list(&store, "A")?;
    ops::create_list(&store, "B")?;
    ops::delete_list(&store, 0)?;

    assert_eq!(titles(&store), vec!["B".to_owned()]);
    Ok(())
}

#[test]
fn created_titles_are_trimmed_and_appended() -> Result<()> {
    let store = MemoryStore::new();
    let mut faker = ListFaker::new(5);
    let mut expected = Vec::new();
    for _ in 0..6 {
        let title = faker.list_title();
        ops::create_list(&store, &format!("  {title}\t"))?;
        expected.push(title);

        let last = store.load().lists().last().cloned().expect("list appended");
        assert!(last.items.is_empty());
    }
    assert_eq!(titles(&store), expected);
    Ok(())
}

#[test]
fn whitespace_titles_never_change_storage() -> Result<()> {
    let store = MemoryStore::new();
    ops::create_list(&store, "Errands")?;
    let before = store.load();

    for blank in ["", " ", "\t\n", "   \u{3000}"] {
        assert!(ops::create_list(&store, blank).is_err(), "{blank:?}");
        assert!(ops::rename_list(&store, 0, blank).is_err(), "{blank:?}");
    }
    assert_eq!(store.load(), before);
    Ok(())
}

#[test]
fn double_toggle_restores_every_item() -> Result<()> {
    let store = MemoryStore::new();
    let collection = ListFaker::new(9).collection(3, 5);
    store.save(&collection)?;

    for (list_index, list) in collection.iter().enumerate() {
        for item_index in 0..list.items.len() {
            ops::toggle_item(&store, list_index, item_index)?;
            ops::toggle_item(&store, list_index, item_index)?;
        }
    }
    assert_eq!(store.load(), collection);
    Ok(())
}

#[test]
fn deleting_a_list_shifts_later_lists_down() -> Result<()> {
    let store = MemoryStore::new();
    let collection = ListFaker::new(21).collection(5, 4);
    store.save(&collection)?;

    let removed = ops::delete_list(&store, 2)?;
    let after = store.load();
    assert_eq!(after.len(), 4);
    assert_eq!(after.get(2).map(|list| list.id), Some(collection.lists()[3].id));

    let remaining = after
        .iter()
        .flat_map(|list| list.items.iter().map(|item| item.id))
        .collect::<BTreeSet<_>>();
    assert!(removed.items.iter().all(|item| !remaining.contains(&item.id)));
    Ok(())
}

#[test]
fn back_from_overview_is_a_no_op() -> Result<()> {
    let store = MemoryStore::new();
    let mut state = AppState::default();

    let events = dispatch(&mut state, &store, Action::Back)?;
    assert!(events.is_empty());
    assert_eq!(state.nav, NavState::Overview);
    Ok(())
}

#[test]
fn saved_collections_load_back_unchanged() -> Result<()> {
    let store = MemoryStore::new();
    for seed in 1..=10 {
        let collection = ListFaker::new(seed).collection(4, 7);
        store.save(&collection)?;
        assert_eq!(store.load(), collection, "seed {seed}");
    }
    Ok(())
}

#[test]
fn detail_view_dangles_after_list_disappears() -> Result<()> {
    let store = MemoryStore::new();
    let mut state = AppState::default();
    dispatch(
        &mut state,
        &store,
        Action::CreateList {
            title: "Camping".to_owned(),
        },
    )?;
    dispatch(&mut state, &store, Action::OpenList { list_index: 0 })?;

    ops::delete_list(&store, 0)?;
    let tree = render(&state, &store.load());
    assert!(matches!(
        tree.body,
        Body::Detail(DetailBody::NotFound { list_index: 0 })
    ));
    assert!(tree.back_enabled);
    Ok(())
}

#[test]
fn legacy_shapes_survive_the_next_write() -> Result<()> {
    let store = MemoryStore::with_raw_payload(
        r#"[{"id":1,"title":"Keep","name":"old","items":["Milk"]},{"id":3,"items":[]}]"#,
    );
    ops::create_list(&store, "New")?;

    assert!(store.drain_notices().is_empty());
    assert_eq!(titles(&store), vec!["Keep", "Untitled", "New"]);
    let kept = store.load();
    assert_eq!(kept.lists()[0].items[0].text, "Milk");
    let raw = store.raw_payload().expect("payload written");
    assert!(raw.contains(r#""title":"Untitled""#));
    assert!(!raw.contains("\"name\""));
    Ok(())
}

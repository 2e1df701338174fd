// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Declarative view tree built from navigation state plus the collection.
//!
//! `render` only reads. The shell throws away its previous paint and draws
//! whatever tree it gets back.

use serde::Serialize;

use crate::ids::{ItemId, ListId};
use crate::model::{Collection, Theme, TodoList};
use crate::state::{AppState, EditTarget, MenuId, NavState};

pub const EMPTY_OVERVIEW_MESSAGE: &str = "No lists yet. Press n to create one!";
pub const EMPTY_LIST_MESSAGE: &str = "No items in this list yet. Add some items!";
pub const LIST_NOT_FOUND_MESSAGE: &str = "List not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Affordance {
    Open,
    Rename,
    Delete,
    Toggle,
}

pub const LIST_AFFORDANCES: [Affordance; 3] =
    [Affordance::Open, Affordance::Rename, Affordance::Delete];
pub const ITEM_AFFORDANCES: [Affordance; 3] =
    [Affordance::Toggle, Affordance::Rename, Affordance::Delete];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewTree {
    pub theme: Theme,
    pub back_enabled: bool,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Body {
    Overview(OverviewBody),
    Detail(DetailBody),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewBody {
    pub draft: Option<String>,
    pub cards: Vec<ListCard>,
    pub empty_message: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListCard {
    pub index: usize,
    pub id: ListId,
    pub title: String,
    pub item_count: usize,
    pub completed_count: usize,
    pub affordances: [Affordance; 3],
    pub menu_open: bool,
    pub editing: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DetailBody {
    NotFound { list_index: usize },
    List(ListDetail),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListDetail {
    pub list_index: usize,
    pub id: ListId,
    pub title: String,
    pub draft: Option<String>,
    pub rows: Vec<ItemRow>,
    pub empty_message: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRow {
    pub index: usize,
    pub id: ItemId,
    pub text: String,
    pub completed: bool,
    pub affordances: [Affordance; 3],
    pub menu_open: bool,
    pub editing: Option<String>,
}

impl ViewTree {
    /// Number of selectable rows, which is what a cursor should clamp to.
    pub fn row_count(&self) -> usize {
        match &self.body {
            Body::Overview(overview) => overview.cards.len(),
            Body::Detail(DetailBody::List(detail)) => detail.rows.len(),
            Body::Detail(DetailBody::NotFound { .. }) => 0,
        }
    }

    pub fn heading(&self) -> &str {
        match &self.body {
            Body::Overview(_) => "Lists",
            Body::Detail(DetailBody::List(detail)) => &detail.title,
            Body::Detail(DetailBody::NotFound { .. }) => LIST_NOT_FOUND_MESSAGE,
        }
    }
}

pub fn render(state: &AppState, collection: &Collection) -> ViewTree {
    let body = match state.nav {
        NavState::Overview => Body::Overview(render_overview(state, collection)),
        NavState::Detail { list_index } => Body::Detail(match collection.get(list_index) {
            Some(list) => DetailBody::List(render_detail(state, list_index, list)),
            None => DetailBody::NotFound { list_index },
        }),
    };
    ViewTree {
        theme: state.ui.theme,
        back_enabled: matches!(state.nav, NavState::Detail { .. }),
        body,
    }
}

fn edit_buffer_for(state: &AppState, target: EditTarget) -> Option<String> {
    state
        .ui
        .edit
        .as_ref()
        .filter(|edit| edit.target == target)
        .map(|edit| edit.buffer.clone())
}

fn render_overview(state: &AppState, collection: &Collection) -> OverviewBody {
    let cards = collection
        .iter()
        .enumerate()
        .map(|(index, list)| ListCard {
            index,
            id: list.id,
            title: list.title.clone(),
            item_count: list.items.len(),
            completed_count: list.completed_count(),
            affordances: LIST_AFFORDANCES,
            menu_open: state.ui.open_menu == Some(MenuId::List(list.id)),
            editing: edit_buffer_for(state, EditTarget::List(list.id)),
        })
        .collect::<Vec<_>>();
    let draft = edit_buffer_for(state, EditTarget::NewList);
    let empty_message = (cards.is_empty() && draft.is_none()).then_some(EMPTY_OVERVIEW_MESSAGE);
    OverviewBody {
        draft,
        cards,
        empty_message,
    }
}

fn render_detail(state: &AppState, list_index: usize, list: &TodoList) -> ListDetail {
    let rows = list
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| ItemRow {
            index,
            id: item.id,
            text: item.text.clone(),
            completed: item.completed,
            affordances: ITEM_AFFORDANCES,
            menu_open: state.ui.open_menu == Some(MenuId::Item(item.id)),
            editing: edit_buffer_for(state, EditTarget::Item(item.id)),
        })
        .collect::<Vec<_>>();
    let draft = edit_buffer_for(state, EditTarget::NewItem);
    let empty_message = rows.is_empty().then_some(EMPTY_LIST_MESSAGE);
    ListDetail {
        list_index,
        id: list.id,
        title: list.title.clone(),
        draft,
        rows,
        empty_message,
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::error::ActionError;
use crate::ops;
use crate::state::{AppEvent, AppState, NavState, View};
use crate::store::ListStore;

/// The command surface offered to the shell. Item actions address the list
/// currently open in the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreateList { title: String },
    RenameList { list_index: usize, title: String },
    DeleteList { list_index: usize },
    OpenList { list_index: usize },
    Back,
    CreateItem { text: String },
    RenameItem { item_index: usize, text: String },
    DeleteItem { item_index: usize },
    ToggleItem { item_index: usize },
}

impl Action {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateList { .. } => "createList",
            Self::RenameList { .. } => "renameList",
            Self::DeleteList { .. } => "deleteList",
            Self::OpenList { .. } => "openList",
            Self::Back => "back",
            Self::CreateItem { .. } => "createItem",
            Self::RenameItem { .. } => "renameItem",
            Self::DeleteItem { .. } => "deleteItem",
            Self::ToggleItem { .. } => "toggleItem",
        }
    }

    /// The view an action belongs to; `None` means it is valid anywhere.
    pub const fn required_view(&self) -> Option<View> {
        match self {
            Self::CreateList { .. }
            | Self::RenameList { .. }
            | Self::DeleteList { .. }
            | Self::OpenList { .. } => Some(View::Overview),
            Self::CreateItem { .. }
            | Self::RenameItem { .. }
            | Self::DeleteItem { .. }
            | Self::ToggleItem { .. } => Some(View::Detail),
            Self::Back => None,
        }
    }
}

/// Runs one user action to completion: view check, domain operation,
/// navigation, then transient-state reset. The caller re-renders afterwards
/// whatever the outcome.
pub fn dispatch<S: ListStore + ?Sized>(
    state: &mut AppState,
    store: &S,
    action: Action,
) -> Result<Vec<AppEvent>, ActionError> {
    log::debug!("dispatch {} in {:?}", action.name(), state.nav);
    let outcome = run_action(state, store, action);

    let mut events = state.clear_transient();
    for notice in store.drain_notices() {
        let message = notice.message();
        events.push(AppEvent::Notice(message.clone()));
        state.status_line = Some(message);
    }

    match outcome {
        Ok(mut produced) => {
            produced.append(&mut events);
            Ok(produced)
        }
        Err(error) => {
            log::debug!("action rejected: {error}");
            state.status_line = Some(error.to_string());
            Err(error)
        }
    }
}

fn run_action<S: ListStore + ?Sized>(
    state: &mut AppState,
    store: &S,
    action: Action,
) -> Result<Vec<AppEvent>, ActionError> {
    if let Some(expected) = action.required_view()
        && state.view() != expected
    {
        return Err(ActionError::WrongView { expected });
    }

    let events = match action {
        Action::CreateList { title } => {
            let id = ops::create_list(store, &title)?;
            vec![AppEvent::ListCreated(id)]
        }
        Action::RenameList { list_index, title } => {
            ops::rename_list(store, list_index, &title)?;
            vec![AppEvent::ListRenamed { list_index }]
        }
        Action::DeleteList { list_index } => {
            let removed = ops::delete_list(store, list_index)?;
            vec![AppEvent::ListDeleted {
                list_index,
                id: removed.id,
            }]
        }
        Action::OpenList { list_index } => {
            let collection = store.load();
            state.nav.open(list_index, &collection)?;
            vec![AppEvent::Navigated(state.nav)]
        }
        Action::Back => {
            if state.nav.back() {
                vec![AppEvent::Navigated(NavState::Overview)]
            } else {
                Vec::new()
            }
        }
        Action::CreateItem { text } => {
            let list_index = active_list(state)?;
            let id = ops::create_item(store, list_index, &text)?;
            vec![AppEvent::ItemCreated(id)]
        }
        Action::RenameItem { item_index, text } => {
            let list_index = active_list(state)?;
            ops::rename_item(store, list_index, item_index, &text)?;
            vec![AppEvent::ItemRenamed { item_index }]
        }
        Action::DeleteItem { item_index } => {
            let list_index = active_list(state)?;
            let removed = ops::delete_item(store, list_index, item_index)?;
            vec![AppEvent::ItemDeleted {
                item_index,
                id: removed.id,
            }]
        }
        Action::ToggleItem { item_index } => {
            let list_index = active_list(state)?;
            let completed = ops::toggle_item(store, list_index, item_index)?;
            vec![AppEvent::ItemToggled {
                item_index,
                completed,
            }]
        }
    };
    Ok(events)
}

fn active_list(state: &AppState) -> Result<usize, ActionError> {
    state
        .nav
        .active_list_index()
        .ok_or(ActionError::WrongView {
            expected: View::Detail,
        })
}

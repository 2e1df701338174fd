// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;

use crate::error::{OpError, Target};
use crate::ids::{ItemId, ListId};
use crate::model::{Collection, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum View {
    Overview,
    Detail,
}

impl View {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Detail => "detail",
        }
    }
}

/// Which screen is showing. The index in `Detail` is never auto-corrected;
/// it may dangle after the list disappears and rendering copes with that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum NavState {
    #[default]
    Overview,
    Detail { list_index: usize },
}

impl NavState {
    pub const fn view(self) -> View {
        match self {
            Self::Overview => View::Overview,
            Self::Detail { .. } => View::Detail,
        }
    }

    pub const fn active_list_index(self) -> Option<usize> {
        match self {
            Self::Overview => None,
            Self::Detail { list_index } => Some(list_index),
        }
    }

    pub fn open(&mut self, list_index: usize, collection: &Collection) -> Result<(), OpError> {
        if collection.get(list_index).is_none() {
            return Err(OpError::NotFound(Target::List { list_index }));
        }
        *self = Self::Detail { list_index };
        Ok(())
    }

    /// Returns whether anything changed.
    pub fn back(&mut self) -> bool {
        match self {
            Self::Overview => false,
            Self::Detail { .. } => {
                *self = Self::Overview;
                true
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EditTarget {
    NewList,
    List(ListId),
    NewItem,
    Item(ItemId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditState {
    pub target: EditTarget,
    pub buffer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MenuId {
    List(ListId),
    Item(ItemId),
}

/// Presentation state that lives only as long as the current paint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiState {
    pub edit: Option<EditState>,
    pub open_menu: Option<MenuId>,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub nav: NavState,
    pub ui: UiState,
    pub status_line: Option<String>,
}

/// Commands touching only transient UI state; nothing here reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    BeginEdit { target: EditTarget, initial: String },
    EditInput(char),
    EditBackspace,
    CancelEdit,
    ToggleMenu(MenuId),
    CloseMenus,
    SetTheme(Theme),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Navigated(NavState),
    ListCreated(ListId),
    ListRenamed { list_index: usize },
    ListDeleted { list_index: usize, id: ListId },
    ItemCreated(ItemId),
    ItemRenamed { item_index: usize },
    ItemDeleted { item_index: usize, id: ItemId },
    ItemToggled { item_index: usize, completed: bool },
    EditStarted(EditTarget),
    EditCleared,
    MenuChanged(Option<MenuId>),
    ThemeChanged(Theme),
    Notice(String),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn view(&self) -> View {
        self.nav.view()
    }

    pub fn apply(&mut self, command: UiCommand) -> Vec<AppEvent> {
        match command {
            UiCommand::BeginEdit { target, initial } => {
                self.ui.open_menu = None;
                self.ui.edit = Some(EditState {
                    target,
                    buffer: initial,
                });
                vec![AppEvent::EditStarted(target)]
            }
            UiCommand::EditInput(ch) => {
                if let Some(edit) = &mut self.ui.edit {
                    edit.buffer.push(ch);
                }
                Vec::new()
            }
            UiCommand::EditBackspace => {
                if let Some(edit) = &mut self.ui.edit {
                    edit.buffer.pop();
                }
                Vec::new()
            }
            UiCommand::CancelEdit => self.clear_transient(),
            UiCommand::ToggleMenu(menu) => {
                self.ui.open_menu = if self.ui.open_menu == Some(menu) {
                    None
                } else {
                    Some(menu)
                };
                vec![AppEvent::MenuChanged(self.ui.open_menu)]
            }
            UiCommand::CloseMenus => {
                if self.ui.open_menu.take().is_some() {
                    vec![AppEvent::MenuChanged(None)]
                } else {
                    Vec::new()
                }
            }
            UiCommand::SetTheme(theme) => {
                self.ui.theme = theme;
                vec![AppEvent::ThemeChanged(theme)]
            }
            UiCommand::SetStatus(message) => vec![self.set_status(message)],
            UiCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    /// Drops inline edits and open menus; every re-render from durable state
    /// goes through here.
    pub fn clear_transient(&mut self) -> Vec<AppEvent> {
        let mut events = Vec::new();
        if self.ui.edit.take().is_some() {
            events.push(AppEvent::EditCleared);
        }
        if self.ui.open_menu.take().is_some() {
            events.push(AppEvent::MenuChanged(None));
        }
        events
    }

    pub fn set_status(&mut self, message: impl Into<String>) -> AppEvent {
        let message = message.into();
        self.status_line = Some(message.clone());
        AppEvent::StatusUpdated(message)
    }
}

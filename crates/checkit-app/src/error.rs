// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::state::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ListTitle,
    ItemText,
}

impl Field {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ListTitle => "list title",
            Self::ItemText => "item text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    List { list_index: usize },
    Item { list_index: usize, item_index: usize },
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List { list_index } => write!(f, "list #{}", list_index + 1),
            Self::Item {
                list_index,
                item_index,
            } => write!(f, "item #{} in list #{}", item_index + 1, list_index + 1),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("encode lists: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("write {key}: {message}")]
    Write { key: &'static str, message: String },
    #[error("read {key}: {message}")]
    Read { key: &'static str, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum OpError {
    #[error("{} must not be empty", .field.label())]
    Validation { field: Field },
    #[error("{0} no longer exists")]
    NotFound(Target),
    #[error("could not save your last change ({0}); a refresh may lose unsaved changes")]
    Storage(#[from] StorageError),
}

impl OpError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Op(#[from] OpError),
    #[error("that action is only available in the {} view", .expected.label())]
    WrongView { expected: View },
}

impl ActionError {
    pub fn op(&self) -> Option<&OpError> {
        match self {
            Self::Op(error) => Some(error),
            Self::WrongView { .. } => None,
        }
    }
}

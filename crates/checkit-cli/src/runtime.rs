// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use checkit_app::{
    Action, ActionError, AppEvent, AppState, Collection, ListStore, StoreNotice, Theme,
};
use checkit_db::Store;

pub struct DbRuntime<'a> {
    store: &'a Store,
}

impl<'a> DbRuntime<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }
}

impl checkit_tui::AppRuntime for DbRuntime<'_> {
    fn load_collection(&mut self) -> Result<Collection> {
        Ok(self.store.load())
    }

    fn dispatch(
        &mut self,
        state: &mut AppState,
        action: Action,
    ) -> Result<Vec<AppEvent>, ActionError> {
        checkit_app::dispatch(state, self.store, action)
    }

    fn load_theme(&mut self) -> Result<Option<Theme>> {
        self.store.load_theme()
    }

    fn save_theme(&mut self, theme: Theme) -> Result<()> {
        self.store.save_theme(theme)
    }

    fn drain_notices(&mut self) -> Vec<StoreNotice> {
        self.store.drain_notices()
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use checkit_app::{
    Action, ActionError, AppEvent, AppState, Body, Collection, DetailBody, EditTarget, ListCard,
    ItemRow, LIST_NOT_FOUND_MESSAGE, MenuId, NavState, StoreNotice, Theme, UiCommand, View,
    ViewTree, render as render_tree,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const EDIT_CARET: &str = "▏";
const MENU_HINT: &str = "   [r] rename  [d] delete  [esc] close";
const BACK_HINT: &str = "← back (esc)";
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);

/// Everything the shell needs from the outside world. The binary backs this
/// with SQLite; tests back it with an in-memory store.
pub trait AppRuntime {
    fn load_collection(&mut self) -> Result<Collection>;
    fn dispatch(
        &mut self,
        state: &mut AppState,
        action: Action,
    ) -> Result<Vec<AppEvent>, ActionError>;
    fn load_theme(&mut self) -> Result<Option<Theme>>;
    fn save_theme(&mut self, theme: Theme) -> Result<()>;
    fn drain_notices(&mut self) -> Vec<StoreNotice>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewData {
    collection: Collection,
    tree: ViewTree,
    cursor: usize,
    overview_cursor: usize,
    help_visible: bool,
    status_token: u64,
}

impl Default for ViewData {
    fn default() -> Self {
        let collection = Collection::default();
        let tree = render_tree(&AppState::default(), &collection);
        Self {
            collection,
            tree,
            cursor: 0,
            overview_cursor: 0,
            help_visible: false,
            status_token: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    fg: Color,
    bg: Color,
    accent: Color,
    dim: Color,
    done: Color,
    status: Color,
}

const fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            fg: Color::Black,
            bg: Color::White,
            accent: Color::Blue,
            dim: Color::Gray,
            done: Color::DarkGray,
            status: Color::Magenta,
        },
        Theme::Dark => Palette {
            fg: Color::White,
            bg: Color::Black,
            accent: Color::Cyan,
            dim: Color::DarkGray,
            done: Color::Gray,
            status: Color::Yellow,
        },
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    match runtime.load_theme() {
        Ok(Some(theme)) => {
            state.apply(UiCommand::SetTheme(theme));
        }
        Ok(None) => {}
        Err(error) => log::warn!("theme preference unavailable: {error:#}"),
    }
    refresh_or_report(state, runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        match next_key(Duration::from_millis(120)) {
            Ok(Some(key)) => {
                if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                    break;
                }
            }
            Ok(None) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

// Errors here still unwind through the terminal restore in `run_app`.
fn next_key(timeout: Duration) -> Result<Option<KeyEvent>> {
    if !event::poll(timeout).context("poll event")? {
        return Ok(None);
    }
    match event::read().context("read event")? {
        Event::Key(key) if key.kind != KeyEventKind::Release => Ok(Some(key)),
        _ => Ok(None),
    }
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.apply(UiCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn bump_status_token(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>) {
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.apply(UiCommand::SetStatus(message.into()));
    bump_status_token(view_data, internal_tx);
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return false;
    }

    if state.ui.edit.is_some() {
        handle_edit_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    if let Some(menu) = state.ui.open_menu
        && handle_menu_key(state, runtime, view_data, internal_tx, menu, key)
    {
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('?') => view_data.help_visible = true,
        KeyCode::Char('j') | KeyCode::Down => move_cursor(view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(view_data, -1),
        KeyCode::Char('g') | KeyCode::Home => view_data.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            view_data.cursor = view_data.tree.row_count().saturating_sub(1);
        }
        KeyCode::Char('t') => toggle_theme(state, runtime, view_data, internal_tx),
        KeyCode::Char('n') => {
            let target = match state.view() {
                View::Overview => Some(EditTarget::NewList),
                View::Detail if detail_is_missing(view_data) => None,
                View::Detail => Some(EditTarget::NewItem),
            };
            if let Some(target) = target {
                begin_edit(state, view_data, target, String::new());
            }
        }
        KeyCode::Char('r') => {
            if let Some((target, initial)) = rename_target_at_cursor(view_data) {
                begin_edit(state, view_data, target, initial);
            }
        }
        KeyCode::Char('d') => {
            if let Some(action) = delete_action_at_cursor(state, view_data) {
                dispatch_and_refresh(state, runtime, view_data, action, internal_tx);
            }
        }
        KeyCode::Char('m') => {
            if let Some(menu) = menu_at_cursor(view_data) {
                state.apply(UiCommand::ToggleMenu(menu));
                repaint(state, view_data);
            }
        }
        _ => handle_view_key(state, runtime, view_data, internal_tx, key),
    }
    false
}

fn handle_view_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let action = match (state.view(), key.code) {
        (View::Overview, KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right) => {
            if view_data.tree.row_count() == 0 {
                return;
            }
            Action::OpenList {
                list_index: view_data.cursor,
            }
        }
        (View::Detail, KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left) => {
            Action::Back
        }
        (View::Detail, KeyCode::Char(' ') | KeyCode::Char('x')) => {
            if view_data.tree.row_count() == 0 {
                return;
            }
            Action::ToggleItem {
                item_index: view_data.cursor,
            }
        }
        _ => return,
    };
    dispatch_and_refresh(state, runtime, view_data, action, internal_tx);
}

fn handle_edit_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            state.apply(UiCommand::CancelEdit);
            repaint(state, view_data);
        }
        KeyCode::Enter => confirm_edit(state, runtime, view_data, internal_tx),
        KeyCode::Backspace => {
            state.apply(UiCommand::EditBackspace);
            repaint(state, view_data);
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.apply(UiCommand::EditInput(ch));
            repaint(state, view_data);
        }
        _ => {}
    }
}

/// Returns true when the key was consumed by the open menu.
fn handle_menu_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    menu: MenuId,
    key: KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('m') => {
            state.apply(UiCommand::CloseMenus);
            repaint(state, view_data);
            true
        }
        KeyCode::Char('r') => {
            if let Some((target, initial)) = rename_target_for_menu(view_data, menu) {
                begin_edit(state, view_data, target, initial);
            }
            true
        }
        KeyCode::Char('d') => {
            if let Some(action) = delete_action_for_menu(view_data, menu) {
                dispatch_and_refresh(state, runtime, view_data, action, internal_tx);
            }
            true
        }
        _ => {
            state.apply(UiCommand::CloseMenus);
            repaint(state, view_data);
            false
        }
    }
}

fn begin_edit(state: &mut AppState, view_data: &mut ViewData, target: EditTarget, initial: String) {
    state.apply(UiCommand::BeginEdit { target, initial });
    repaint(state, view_data);
}

fn confirm_edit<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(edit) = state.ui.edit.clone() else {
        return;
    };
    let action = match edit.target {
        EditTarget::NewList => Some(Action::CreateList { title: edit.buffer }),
        EditTarget::NewItem => Some(Action::CreateItem { text: edit.buffer }),
        EditTarget::List(id) => view_data
            .collection
            .position_of_list(id)
            .map(|list_index| Action::RenameList {
                list_index,
                title: edit.buffer,
            }),
        EditTarget::Item(id) => item_position(view_data, id).map(|item_index| Action::RenameItem {
            item_index,
            text: edit.buffer,
        }),
    };
    match action {
        Some(action) => dispatch_and_refresh(state, runtime, view_data, action, internal_tx),
        None => {
            state.apply(UiCommand::CancelEdit);
            repaint(state, view_data);
            emit_status(state, view_data, internal_tx, "that entry no longer exists");
        }
    }
}

fn toggle_theme<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let theme = state.ui.theme.toggled();
    state.apply(UiCommand::SetTheme(theme));
    repaint(state, view_data);
    match runtime.save_theme(theme) {
        Ok(()) => emit_status(
            state,
            view_data,
            internal_tx,
            format!("{} theme", theme.label()),
        ),
        Err(error) => emit_status(
            state,
            view_data,
            internal_tx,
            format!("theme not saved: {error:#}"),
        ),
    }
}

fn move_cursor(view_data: &mut ViewData, delta: isize) {
    let rows = view_data.tree.row_count();
    if rows == 0 {
        view_data.cursor = 0;
        return;
    }
    let next = view_data.cursor.saturating_add_signed(delta);
    view_data.cursor = next.min(rows - 1);
}

/// The open list was deleted elsewhere; only back makes sense.
fn detail_is_missing(view_data: &ViewData) -> bool {
    matches!(
        view_data.tree.body,
        Body::Detail(DetailBody::NotFound { .. })
    )
}

fn selected_card(view_data: &ViewData) -> Option<&ListCard> {
    match &view_data.tree.body {
        Body::Overview(overview) => overview.cards.get(view_data.cursor),
        Body::Detail(_) => None,
    }
}

fn selected_row(view_data: &ViewData) -> Option<&ItemRow> {
    match &view_data.tree.body {
        Body::Detail(DetailBody::List(detail)) => detail.rows.get(view_data.cursor),
        _ => None,
    }
}

fn item_position(view_data: &ViewData, id: checkit_app::ItemId) -> Option<usize> {
    match &view_data.tree.body {
        Body::Detail(DetailBody::List(detail)) => detail.rows.iter().position(|row| row.id == id),
        _ => None,
    }
}

fn rename_target_at_cursor(view_data: &ViewData) -> Option<(EditTarget, String)> {
    if let Some(card) = selected_card(view_data) {
        return Some((EditTarget::List(card.id), card.title.clone()));
    }
    selected_row(view_data).map(|row| (EditTarget::Item(row.id), row.text.clone()))
}

fn rename_target_for_menu(view_data: &ViewData, menu: MenuId) -> Option<(EditTarget, String)> {
    match menu {
        MenuId::List(id) => {
            let index = view_data.collection.position_of_list(id)?;
            let list = view_data.collection.get(index)?;
            Some((EditTarget::List(id), list.title.clone()))
        }
        MenuId::Item(id) => match &view_data.tree.body {
            Body::Detail(DetailBody::List(detail)) => detail
                .rows
                .iter()
                .find(|row| row.id == id)
                .map(|row| (EditTarget::Item(id), row.text.clone())),
            _ => None,
        },
    }
}

fn delete_action_at_cursor(state: &AppState, view_data: &ViewData) -> Option<Action> {
    match state.view() {
        View::Overview => selected_card(view_data).map(|card| Action::DeleteList {
            list_index: card.index,
        }),
        View::Detail => selected_row(view_data).map(|row| Action::DeleteItem {
            item_index: row.index,
        }),
    }
}

fn delete_action_for_menu(view_data: &ViewData, menu: MenuId) -> Option<Action> {
    match menu {
        MenuId::List(id) => view_data
            .collection
            .position_of_list(id)
            .map(|list_index| Action::DeleteList { list_index }),
        MenuId::Item(id) => {
            item_position(view_data, id).map(|item_index| Action::DeleteItem { item_index })
        }
    }
}

fn menu_at_cursor(view_data: &ViewData) -> Option<MenuId> {
    if let Some(card) = selected_card(view_data) {
        return Some(MenuId::List(card.id));
    }
    selected_row(view_data).map(|row| MenuId::Item(row.id))
}

fn dispatch_and_refresh<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    action: Action,
    internal_tx: &Sender<InternalEvent>,
) {
    let renaming = matches!(
        action,
        Action::RenameList { .. } | Action::RenameItem { .. }
    );
    let previous_nav = state.nav;
    match runtime.dispatch(state, action) {
        Ok(events) => {
            place_cursor(view_data, previous_nav, &events);
            if let Some(message) = status_for_events(&events) {
                emit_status(state, view_data, internal_tx, message);
            }
        }
        Err(error) => {
            let rejected_rename = renaming && error.op().is_some_and(|op| op.is_validation());
            if rejected_rename {
                state.apply(UiCommand::SetStatus("rename canceled".to_owned()));
            }
            bump_status_token(view_data, internal_tx);
        }
    }
    refresh_or_report(state, runtime, view_data, internal_tx);
}

fn refresh_or_report<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if let Err(error) = refresh_view_data(state, runtime, view_data) {
        emit_status(state, view_data, internal_tx, format!("load failed: {error:#}"));
    }
    let notices = runtime.drain_notices();
    if let Some(notice) = notices.last() {
        emit_status(state, view_data, internal_tx, notice.message());
    }
}

fn refresh_view_data<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
) -> Result<()> {
    view_data.collection = runtime.load_collection()?;
    repaint(state, view_data);
    Ok(())
}

/// Re-renders from the cached collection; used for UI-only changes that
/// never touch the store.
fn repaint(state: &AppState, view_data: &mut ViewData) {
    view_data.tree = render_tree(state, &view_data.collection);
    clamp_cursor(view_data);
}

fn clamp_cursor(view_data: &mut ViewData) {
    let rows = view_data.tree.row_count();
    view_data.cursor = view_data.cursor.min(rows.saturating_sub(1));
}

fn place_cursor(view_data: &mut ViewData, previous_nav: NavState, events: &[AppEvent]) {
    for event in events {
        match event {
            AppEvent::Navigated(NavState::Detail { .. }) => {
                if previous_nav == NavState::Overview {
                    view_data.overview_cursor = view_data.cursor;
                }
                view_data.cursor = 0;
            }
            AppEvent::Navigated(NavState::Overview) => {
                view_data.cursor = view_data.overview_cursor;
            }
            AppEvent::ListCreated(_) | AppEvent::ItemCreated(_) => {
                view_data.cursor = usize::MAX;
            }
            _ => {}
        }
    }
}

fn status_for_events(events: &[AppEvent]) -> Option<String> {
    let mut status = None;
    for event in events {
        let message = match event {
            AppEvent::ListCreated(_) => "list created".to_owned(),
            AppEvent::ListRenamed { .. } => "list renamed".to_owned(),
            AppEvent::ListDeleted { .. } => "list deleted".to_owned(),
            AppEvent::ItemCreated(_) => "item added".to_owned(),
            AppEvent::ItemRenamed { .. } => "item renamed".to_owned(),
            AppEvent::ItemDeleted { .. } => "item deleted".to_owned(),
            AppEvent::ItemToggled { completed, .. } => {
                if *completed {
                    "marked done".to_owned()
                } else {
                    "marked not done".to_owned()
                }
            }
            AppEvent::Notice(message) => message.clone(),
            _ => continue,
        };
        status = Some(message);
    }
    status
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let colors = palette(view_data.tree.theme);
    let base = Style::default().fg(colors.fg).bg(colors.bg);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let back_style = if view_data.tree.back_enabled {
        Style::default().fg(colors.accent)
    } else {
        Style::default()
            .fg(colors.dim)
            .add_modifier(Modifier::DIM)
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(BACK_HINT, back_style),
        Span::raw("   "),
        Span::styled(
            render_breadcrumb_text(&view_data.tree),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            format!("theme: {}", view_data.tree.theme.label()),
            Style::default().fg(colors.dim),
        ),
    ]))
    .style(base)
    .block(Block::default().title("checkit").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    let body_area = layout[1];
    let lines = body_lines(&view_data.tree, view_data.cursor);
    let visible_rows = usize::from(body_area.height.saturating_sub(2)).max(1);
    let offset = view_data.cursor.saturating_sub(visible_rows - 1);
    let styled = lines
        .iter()
        .map(|line| Line::styled(line.text.clone(), line_style(line.kind, colors)))
        .collect::<Vec<_>>();
    let body = Paragraph::new(styled)
        .style(base)
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0))
        .block(
            Block::default()
                .title(view_data.tree.heading().to_owned())
                .borders(Borders::ALL),
        );
    frame.render_widget(body, body_area);

    let status = Paragraph::new(status_text(state))
        .style(base.fg(colors.status))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if view_data.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .style(base)
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Row { selected: bool, completed: bool },
    Draft,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BodyLine {
    text: String,
    kind: LineKind,
}

fn line_style(kind: LineKind, colors: Palette) -> Style {
    match kind {
        LineKind::Row {
            selected: true,
            completed,
        } => {
            let style = Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED);
            if completed {
                style.add_modifier(Modifier::CROSSED_OUT)
            } else {
                style
            }
        }
        LineKind::Row {
            selected: false,
            completed: true,
        } => Style::default()
            .fg(colors.done)
            .add_modifier(Modifier::CROSSED_OUT),
        LineKind::Row { .. } => Style::default().fg(colors.fg),
        LineKind::Draft => Style::default().fg(colors.accent),
        LineKind::Placeholder => Style::default()
            .fg(colors.dim)
            .add_modifier(Modifier::ITALIC),
    }
}

fn render_breadcrumb_text(tree: &ViewTree) -> String {
    match &tree.body {
        Body::Overview(_) => "Lists".to_owned(),
        Body::Detail(DetailBody::List(detail)) => format!("Lists › {}", detail.title),
        Body::Detail(DetailBody::NotFound { .. }) => "Lists › ?".to_owned(),
    }
}

fn editing_text(buffer: &str) -> String {
    format!("{buffer}{EDIT_CARET}")
}

fn selection_prefix(selected: bool) -> &'static str {
    if selected { "> " } else { "  " }
}

fn body_lines(tree: &ViewTree, cursor: usize) -> Vec<BodyLine> {
    let mut lines = Vec::new();
    match &tree.body {
        Body::Overview(overview) => {
            for card in &overview.cards {
                let selected = card.index == cursor;
                let label = match &card.editing {
                    Some(buffer) => editing_text(buffer),
                    None => format!(
                        "{}  ({}/{})",
                        card.title, card.completed_count, card.item_count
                    ),
                };
                let menu = if card.menu_open { MENU_HINT } else { "" };
                lines.push(BodyLine {
                    text: format!("{}{label}{menu}", selection_prefix(selected)),
                    kind: LineKind::Row {
                        selected,
                        completed: false,
                    },
                });
            }
            if let Some(draft) = &overview.draft {
                lines.push(BodyLine {
                    text: format!("+ new list: {}", editing_text(draft)),
                    kind: LineKind::Draft,
                });
            }
            if let Some(message) = overview.empty_message {
                lines.push(BodyLine {
                    text: message.to_owned(),
                    kind: LineKind::Placeholder,
                });
            }
        }
        Body::Detail(DetailBody::NotFound { .. }) => {
            lines.push(BodyLine {
                text: format!("{LIST_NOT_FOUND_MESSAGE}. Press esc to go back."),
                kind: LineKind::Placeholder,
            });
        }
        Body::Detail(DetailBody::List(detail)) => {
            for row in &detail.rows {
                let selected = row.index == cursor;
                let mark = if row.completed { "x" } else { " " };
                let label = match &row.editing {
                    Some(buffer) => editing_text(buffer),
                    None => row.text.clone(),
                };
                let menu = if row.menu_open { MENU_HINT } else { "" };
                lines.push(BodyLine {
                    text: format!("{}[{mark}] {label}{menu}", selection_prefix(selected)),
                    kind: LineKind::Row {
                        selected,
                        completed: row.completed,
                    },
                });
            }
            if let Some(draft) = &detail.draft {
                lines.push(BodyLine {
                    text: format!("+ new item: {}", editing_text(draft)),
                    kind: LineKind::Draft,
                });
            }
            if let Some(message) = detail.empty_message {
                lines.push(BodyLine {
                    text: message.to_owned(),
                    kind: LineKind::Placeholder,
                });
            }
        }
    }
    lines
}

fn status_text(state: &AppState) -> String {
    let hints = if state.ui.edit.is_some() {
        "enter save | esc cancel"
    } else if state.ui.open_menu.is_some() {
        "r rename | d delete | esc close"
    } else {
        match state.view() {
            View::Overview => {
                "j/k move | enter open | n new | r rename | d delete | m menu | t theme | ? help | q quit"
            }
            View::Detail => {
                "esc back | space toggle | n new | r rename | d delete | m menu | t theme | ? help | q quit"
            }
        }
    };
    match &state.status_line {
        Some(status) => format!("{status} | {hints}"),
        None => hints.to_owned(),
    }
}

fn help_overlay_text() -> &'static str {
    "\
lists
  j/k, arrows   move
  enter         open list
  n             new list
  r             rename
  d             delete
  m             actions menu
  t             toggle theme

items
  esc, h        back to lists
  space, x      toggle done
  n / r / d     new / rename / delete

editing
  enter         save
  esc           cancel

q or ctrl+q quits. esc closes this help."
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, BodyLine, LineKind, ViewData, body_lines, handle_key_event, palette,
        refresh_view_data, render_breadcrumb_text, status_for_events, status_text,
    };
    use anyhow::{Result, bail};
    use checkit_app::{
        Action, ActionError, AppEvent, AppState, Collection, EMPTY_LIST_MESSAGE, ListStore,
        MemoryStore, NavState, StoreNotice, Theme, dispatch, render,
    };
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::mpsc;

    #[derive(Debug, Default)]
    struct TestRuntime {
        store: MemoryStore,
        theme: Option<Theme>,
        fail_theme_save: bool,
        dispatch_count: usize,
    }

    impl AppRuntime for TestRuntime {
        fn load_collection(&mut self) -> Result<Collection> {
            Ok(self.store.load())
        }

        fn dispatch(
            &mut self,
            state: &mut AppState,
            action: Action,
        ) -> Result<Vec<AppEvent>, ActionError> {
            self.dispatch_count += 1;
            dispatch(state, &self.store, action)
        }

        fn load_theme(&mut self) -> Result<Option<Theme>> {
            Ok(self.theme)
        }

        fn save_theme(&mut self, theme: Theme) -> Result<()> {
            if self.fail_theme_save {
                bail!("disk full");
            }
            self.theme = Some(theme);
            Ok(())
        }

        fn drain_notices(&mut self) -> Vec<StoreNotice> {
            self.store.drain_notices()
        }
    }

    struct Harness {
        state: AppState,
        runtime: TestRuntime,
        view_data: ViewData,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_runtime(TestRuntime::default())
        }

        fn with_runtime(mut runtime: TestRuntime) -> Self {
            let state = AppState::default();
            let mut view_data = ViewData::default();
            refresh_view_data(&state, &mut runtime, &mut view_data).expect("initial refresh");
            Self {
                state,
                runtime,
                view_data,
            }
        }

        fn press(&mut self, code: KeyCode) -> bool {
            self.press_with(code, KeyModifiers::NONE)
        }

        fn press_with(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
            let (tx, _rx) = mpsc::channel();
            handle_key_event(
                &mut self.state,
                &mut self.runtime,
                &mut self.view_data,
                &tx,
                KeyEvent::new(code, modifiers),
            )
        }

        fn type_text(&mut self, text: &str) {
            for ch in text.chars() {
                self.press(KeyCode::Char(ch));
            }
        }

        fn titles(&self) -> Vec<String> {
            self.runtime
                .store
                .load()
                .iter()
                .map(|list| list.title.clone())
                .collect()
        }

        fn lines(&self) -> Vec<String> {
            body_lines(&self.view_data.tree, self.view_data.cursor)
                .into_iter()
                .map(|line| line.text)
                .collect()
        }
    }

    #[test]
    fn creating_a_list_from_the_keyboard() {
        let mut harness = Harness::new();
        harness.press(KeyCode::Char('n'));
        harness.type_text("Groceries");
        assert!(
            harness
                .lines()
                .iter()
                .any(|line| line == "+ new list: Groceries▏")
        );

        harness.press(KeyCode::Enter);
        assert_eq!(harness.titles(), vec!["Groceries"]);
        assert!(harness.state.ui.edit.is_none());
        assert_eq!(harness.lines(), vec!["> Groceries  (0/0)"]);
        assert_eq!(harness.state.status_line.as_deref(), Some("list created"));
    }

    #[test]
    fn escape_cancels_edit_without_dispatch() {
        let mut harness = Harness::new();
        harness.press(KeyCode::Char('n'));
        harness.type_text("Nope");
        harness.press(KeyCode::Esc);

        assert!(harness.state.ui.edit.is_none());
        assert_eq!(harness.runtime.dispatch_count, 0);
        assert!(harness.titles().is_empty());
    }

    #[test]
    fn full_item_flow_through_detail_view() {
        let mut harness = Harness::new();
        harness.press(KeyCode::Char('n'));
        harness.type_text("Trip");
        harness.press(KeyCode::Enter);

        harness.press(KeyCode::Enter);
        assert_eq!(harness.state.nav, NavState::Detail { list_index: 0 });
        assert_eq!(harness.lines(), vec![EMPTY_LIST_MESSAGE.to_owned()]);

        for text in ["Passport", "Tickets"] {
            harness.press(KeyCode::Char('n'));
            harness.type_text(text);
            harness.press(KeyCode::Enter);
        }
        assert_eq!(harness.view_data.cursor, 1);

        harness.press(KeyCode::Char('k'));
        harness.press(KeyCode::Char(' '));
        assert_eq!(
            harness.lines(),
            vec!["> [x] Passport".to_owned(), "  [ ] Tickets".to_owned()]
        );

        harness.press(KeyCode::Char('j'));
        harness.press(KeyCode::Char('d'));
        assert_eq!(harness.lines(), vec!["> [x] Passport".to_owned()]);

        harness.press(KeyCode::Esc);
        assert_eq!(harness.state.nav, NavState::Overview);
        assert_eq!(harness.lines(), vec!["> Trip  (1/1)".to_owned()]);
    }

    #[test]
    fn rename_prefills_current_title() {
        let mut harness = Harness::new();
        harness.press(KeyCode::Char('n'));
        harness.type_text("Chores");
        harness.press(KeyCode::Enter);

        harness.press(KeyCode::Char('r'));
        assert_eq!(harness.lines(), vec!["> Chores▏".to_owned()]);
        harness.press(KeyCode::Backspace);
        harness.press(KeyCode::Backspace);
        harness.type_text("ing");
        harness.press(KeyCode::Enter);
        assert_eq!(harness.titles(), vec!["Choring"]);
    }

    #[test]
    fn blank_rename_is_treated_as_cancel() {
        let mut harness = Harness::new();
        harness.press(KeyCode::Char('n'));
        harness.type_text("Chores");
        harness.press(KeyCode::Enter);

        harness.press(KeyCode::Char('r'));
        for _ in 0.."Chores".len() {
            harness.press(KeyCode::Backspace);
        }
        harness.type_text("   ");
        harness.press(KeyCode::Enter);

        assert_eq!(harness.titles(), vec!["Chores"]);
        assert!(harness.state.ui.edit.is_none());
        assert_eq!(harness.state.status_line.as_deref(), Some("rename canceled"));
    }

    #[test]
    fn menu_opens_and_deletes_selected_list() {
        let mut harness = Harness::new();
        for title in ["A", "B"] {
            harness.press(KeyCode::Char('n'));
            harness.type_text(title);
            harness.press(KeyCode::Enter);
        }
        harness.press(KeyCode::Char('g'));
        harness.press(KeyCode::Char('m'));
        assert!(harness.lines()[0].ends_with("[esc] close"));
        assert!(!harness.lines()[1].contains("[esc] close"));

        harness.press(KeyCode::Char('d'));
        assert_eq!(harness.titles(), vec!["B"]);
        assert!(harness.state.ui.open_menu.is_none());
    }

    #[test]
    fn escape_closes_menu_without_leaving_detail() {
        let mut harness = Harness::new();
        harness.press(KeyCode::Char('n'));
        harness.type_text("Trip");
        harness.press(KeyCode::Enter);
        harness.press(KeyCode::Enter);
        harness.press(KeyCode::Char('n'));
        harness.type_text("Passport");
        harness.press(KeyCode::Enter);

        harness.press(KeyCode::Char('m'));
        assert!(harness.state.ui.open_menu.is_some());
        harness.press(KeyCode::Esc);
        assert!(harness.state.ui.open_menu.is_none());
        assert_eq!(harness.state.nav, NavState::Detail { list_index: 0 });
    }

    #[test]
    fn theme_toggle_persists_preference() {
        let mut harness = Harness::new();
        harness.press(KeyCode::Char('t'));
        assert_eq!(harness.state.ui.theme, Theme::Dark);
        assert_eq!(harness.view_data.tree.theme, Theme::Dark);
        assert_eq!(harness.runtime.theme, Some(Theme::Dark));
        assert_eq!(harness.state.status_line.as_deref(), Some("Dark theme"));
    }

    #[test]
    fn theme_save_failure_is_reported() {
        let mut harness = Harness::with_runtime(TestRuntime {
            fail_theme_save: true,
            ..TestRuntime::default()
        });
        harness.press(KeyCode::Char('t'));
        assert_eq!(harness.state.ui.theme, Theme::Dark);
        let status = harness.state.status_line.clone().unwrap_or_default();
        assert!(status.contains("theme not saved"));
    }

    #[test]
    fn quit_keys() {
        let mut harness = Harness::new();
        assert!(harness.press_with(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(harness.press(KeyCode::Char('q')));

        harness.press(KeyCode::Char('n'));
        assert!(!harness.press(KeyCode::Char('q')));
        assert!(harness.press_with(KeyCode::Char('q'), KeyModifiers::CONTROL));
    }

    #[test]
    fn enter_on_empty_overview_does_nothing() {
        let mut harness = Harness::new();
        harness.press(KeyCode::Enter);
        assert_eq!(harness.state.nav, NavState::Overview);
        assert_eq!(harness.runtime.dispatch_count, 0);
    }

    #[test]
    fn dangling_detail_renders_placeholder() {
        let state = AppState {
            nav: NavState::Detail { list_index: 3 },
            ..AppState::default()
        };
        let tree = render(&state, &Collection::default());
        let lines = body_lines(&tree, 0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind, LineKind::Placeholder);
        assert_eq!(render_breadcrumb_text(&tree), "Lists › ?");
    }

    #[test]
    fn missing_list_ignores_edit_and_menu_keys() {
        let mut harness = Harness::new();
        harness.press(KeyCode::Char('n'));
        harness.type_text("Gone");
        harness.press(KeyCode::Enter);
        harness.press(KeyCode::Enter);
        harness.runtime.store.set_raw_payload("[]");
        refresh_view_data(&harness.state, &mut harness.runtime, &mut harness.view_data)
            .expect("refresh after external delete");
        let dispatched = harness.runtime.dispatch_count;

        for key in ['n', 'r', 'm', 'd', ' '] {
            harness.press(KeyCode::Char(key));
            assert!(harness.state.ui.edit.is_none(), "{key:?} started an edit");
            assert!(harness.state.ui.open_menu.is_none(), "{key:?} opened a menu");
        }
        assert_eq!(harness.runtime.dispatch_count, dispatched);

        harness.press(KeyCode::Esc);
        assert_eq!(harness.state.nav, NavState::Overview);
    }

    #[test]
    fn cursor_returns_to_list_after_back() {
        let mut harness = Harness::new();
        for title in ["A", "B", "C"] {
            harness.press(KeyCode::Char('n'));
            harness.type_text(title);
            harness.press(KeyCode::Enter);
        }
        harness.press(KeyCode::Char('k'));
        assert_eq!(harness.view_data.cursor, 1);
        harness.press(KeyCode::Enter);
        assert_eq!(render_breadcrumb_text(&harness.view_data.tree), "Lists › B");
        harness.press(KeyCode::Char('h'));
        assert_eq!(harness.view_data.cursor, 1);
    }

    #[test]
    fn corrupt_payload_notice_reaches_status_line() {
        let runtime = TestRuntime {
            store: MemoryStore::with_raw_payload("{oops"),
            ..TestRuntime::default()
        };
        let mut harness = Harness::with_runtime(runtime);
        harness.press(KeyCode::Char('n'));
        harness.type_text("Fresh");
        harness.press(KeyCode::Enter);

        let status = harness.state.status_line.clone().unwrap_or_default();
        assert!(status.contains("unreadable"));
        assert_eq!(harness.titles(), vec!["Fresh"]);
    }

    #[test]
    fn status_text_prefers_status_then_hints() {
        let mut state = AppState::default();
        assert!(status_text(&state).starts_with("j/k move"));
        state.status_line = Some("saved".to_owned());
        assert!(status_text(&state).starts_with("saved | "));
        state.nav = NavState::Detail { list_index: 0 };
        state.status_line = None;
        assert!(status_text(&state).starts_with("esc back"));
    }

    #[test]
    fn status_for_events_reports_last_meaningful_event() {
        assert_eq!(status_for_events(&[]), None);
        assert_eq!(
            status_for_events(&[
                AppEvent::ItemToggled {
                    item_index: 0,
                    completed: false
                },
                AppEvent::MenuChanged(None),
            ])
            .as_deref(),
            Some("marked not done")
        );
        assert_eq!(
            status_for_events(&[
                AppEvent::ListCreated(checkit_app::ListId::new(1)),
                AppEvent::Notice("heads up".to_owned()),
            ])
            .as_deref(),
            Some("heads up")
        );
    }

    #[test]
    fn palettes_differ_by_theme() {
        assert_ne!(palette(Theme::Light), palette(Theme::Dark));
    }

    #[test]
    fn single_card_renders_as_selected_row() {
        let mut state = AppState::default();
        let store = MemoryStore::new();
        dispatch(
            &mut state,
            &store,
            Action::CreateList {
                title: "Only".to_owned(),
            },
        )
        .expect("create list");
        let tree = render(&AppState::default(), &store.load());
        let lines = body_lines(&tree, 0);
        assert_eq!(
            lines,
            vec![BodyLine {
                text: "> Only  (0/0)".to_owned(),
                kind: LineKind::Row {
                    selected: true,
                    completed: false
                },
            }]
        );
    }
}

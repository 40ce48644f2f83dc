//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the list controller, a
//! tokio runtime to drive its network calls, and all view state: the
//! tab-filtered item ids, the table selection, the modal form, and the
//! status bar message. Controller operations run to completion inside the
//! key handlers, so a frame never shows a half-applied mutation.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame, Terminal,
};
use tokio::runtime::Runtime;

use crate::controller::{DeleteOutcome, ListController, SubmitOutcome};
use crate::item::TodoItem;
use crate::tui::{
    colors::{AMBER, SEA_GREEN, SLATE_BLUE},
    form::{FormField, ItemForm},
    utils::centered_rect,
};

/// Main application state for the terminal user interface.
///
/// The controller is the source of truth for the list and the modal flag;
/// `visible_ids` mirrors its filtered view so the table selection can be
/// kept on the same item across refreshes and tab switches.
pub struct App {
    controller: ListController,
    runtime: Runtime,
    visible_ids: Vec<u64>,
    table_state: TableState,
    form: Option<ItemForm>,
    status_message: String,
}

impl App {
    /// Create the app and run the initial fetch so the first frame has data.
    pub fn new(controller: ListController, runtime: Runtime) -> Self {
        let mut app = App {
            controller,
            runtime,
            visible_ids: Vec::new(),
            table_state: TableState::default(),
            form: None,
            status_message: String::new(),
        };
        app.refresh();
        app
    }

    /// Re-fetch the list from the backend and refilter the view.
    fn refresh(&mut self) {
        self.runtime.block_on(self.controller.refresh());
        self.update_visible_items();
    }

    /// Recompute the visible ids for the current tab.
    ///
    /// Keeps the selection on the same item when it is still visible,
    /// otherwise falls back to the first row.
    fn update_visible_items(&mut self) {
        let old_selected_id = self
            .table_state
            .selected()
            .and_then(|idx| self.visible_ids.get(idx))
            .copied();

        self.visible_ids = self.controller.visible_items().map(|item| item.id).collect();

        if let Some(old_id) = old_selected_id {
            if let Some(new_idx) = self.visible_ids.iter().position(|&id| id == old_id) {
                self.table_state.select(Some(new_idx));
            } else {
                self.table_state.select(if self.visible_ids.is_empty() {
                    None
                } else {
                    Some(0)
                });
            }
        } else if !self.visible_ids.is_empty() && self.table_state.selected().is_none() {
            self.table_state.select(Some(0));
        } else if self.visible_ids.is_empty() {
            self.table_state.select(None);
        }
    }

    /// The item under the table selection, if any.
    fn selected_item(&self) -> Option<&TodoItem> {
        let id = self
            .table_state
            .selected()
            .and_then(|idx| self.visible_ids.get(idx))
            .copied()?;
        self.controller.todo_list().iter().find(|item| item.id == id)
    }

    /// Set a status message to display in the status bar.
    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    /// Clear the current status message.
    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Accent color for the active tab.
    fn tab_accent(&self) -> Color {
        if self.controller.view_completed() {
            SEA_GREEN
        } else {
            AMBER
        }
    }

    /// Switch between the Incomplete and Complete tabs.
    fn switch_tab(&mut self, show_completed: bool) {
        self.controller.set_filter(show_completed);
        self.update_visible_items();
    }

    /// Load a blank draft into the modal form.
    fn open_create_form(&mut self) {
        self.controller.open_for_create();
        if let Some(draft) = self.controller.active_item() {
            self.form = Some(ItemForm::from_draft(draft));
        }
    }

    /// Load the selected item into the modal form.
    fn open_edit_form(&mut self) {
        let Some(item) = self.selected_item().cloned() else {
            self.set_status_message("No item selected".to_string());
            return;
        };
        self.controller.open_for_edit(&item);
        if let Some(draft) = self.controller.active_item() {
            self.form = Some(ItemForm::from_draft(draft));
        }
    }

    /// Delete the selected item. There is no confirmation step; the backend
    /// is re-fetched on success.
    fn delete_selected(&mut self) {
        let Some(item) = self.selected_item().cloned() else {
            self.set_status_message("No item selected".to_string());
            return;
        };

        match self.runtime.block_on(self.controller.delete_item(item.id)) {
            DeleteOutcome::Deleted => {
                self.update_visible_items();
                self.set_status_message(format!("Deleted \"{}\"", item.title));
            }
            DeleteOutcome::Failed => {
                self.set_status_message("Failed to delete item. Please try again.".to_string());
            }
        }
    }

    /// Close the modal without submitting. The list is untouched.
    fn cancel_form(&mut self) {
        self.form = None;
        self.controller.close_modal();
    }

    /// Hand the form's draft to the controller and report the outcome.
    fn confirm_form(&mut self) {
        let Some(form) = self.form.as_ref() else {
            return;
        };
        let draft = form.to_draft();

        match self.runtime.block_on(self.controller.submit(draft)) {
            SubmitOutcome::Rejected => {
                // Modal stays open so the user can fix the fields.
                self.set_status_message("Title and description cannot be empty!".to_string());
            }
            SubmitOutcome::Created => {
                self.form = None;
                self.update_visible_items();
                self.set_status_message("Task created".to_string());
            }
            SubmitOutcome::Updated => {
                self.form = None;
                self.update_visible_items();
                self.set_status_message("Task updated".to_string());
            }
            SubmitOutcome::Failed(kind) => {
                self.form = None;
                self.update_visible_items();
                self.set_status_message(format!(
                    "Failed to {} item. Please try again.",
                    kind.verb()
                ));
            }
        }
    }

    fn handle_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Tab => {
                let show_completed = !self.controller.view_completed();
                self.switch_tab(show_completed);
            }
            KeyCode::Char('1') => self.switch_tab(false),
            KeyCode::Char('2') => self.switch_tab(true),
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(selected) = self.table_state.selected() {
                    if selected > 0 {
                        self.table_state.select(Some(selected - 1));
                    }
                } else if !self.visible_ids.is_empty() {
                    self.table_state.select(Some(0));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(selected) = self.table_state.selected() {
                    if selected + 1 < self.visible_ids.len() {
                        self.table_state.select(Some(selected + 1));
                    }
                } else if !self.visible_ids.is_empty() {
                    self.table_state.select(Some(0));
                }
            }
            KeyCode::Char('a') => self.open_create_form(),
            KeyCode::Enter | KeyCode::Char('e') => self.open_edit_form(),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('r') => {
                self.refresh();
                self.set_status_message(format!(
                    "Loaded {} items",
                    self.controller.todo_list().len()
                ));
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_form_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Esc => {
                self.cancel_form();
                return Ok(false);
            }
            KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.confirm_form();
                return Ok(false);
            }
            KeyCode::Enter => {
                // Enter toggles the checkbox when it has focus, saves
                // otherwise.
                let on_checkbox = self
                    .form
                    .as_ref()
                    .map_or(false, |form| form.focus == FormField::Completed);
                if on_checkbox {
                    if let Some(form) = self.form.as_mut() {
                        form.toggle_completed();
                    }
                } else {
                    self.confirm_form();
                }
                return Ok(false);
            }
            _ => {}
        }

        if let Some(form) = self.form.as_mut() {
            match key {
                KeyCode::Tab | KeyCode::Down => form.next_field(),
                KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                KeyCode::Left => form.handle_left_right(false),
                KeyCode::Right => form.handle_left_right(true),
                KeyCode::Home => form.handle_home_end(false),
                KeyCode::End => form.handle_home_end(true),
                KeyCode::Backspace => form.handle_backspace(),
                KeyCode::Delete => form.handle_delete(),
                KeyCode::Char(c) => form.handle_char(c),
                _ => {}
            }
        }
        Ok(false)
    }

    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.clear_status_message();

                let should_quit = if self.controller.modal_open() {
                    self.handle_form_input(key.code, key.modifiers)?
                } else {
                    self.handle_list_input(key.code, key.modifiers)?
                };
                if should_quit {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Render the tab bar with the app heading.
    fn render_tabs(&mut self, f: &mut Frame, area: Rect) {
        let selected = if self.controller.view_completed() { 1 } else { 0 };
        let tabs = Tabs::new(vec![Line::from("Incomplete"), Line::from("Complete")])
            .select(selected)
            .block(Block::default().borders(Borders::ALL).title("Todo app"))
            .highlight_style(
                Style::default()
                    .fg(self.tab_accent())
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs, area);
    }

    /// Render the item table for the active tab.
    fn render_list(&mut self, f: &mut Frame, area: Rect) {
        let accent = self.tab_accent();
        let header_cells = ["ID", "Title", "Description"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(accent).fg(accent_text_color(accent)))
            .height(1);

        let rows: Vec<Row> = self
            .visible_ids
            .iter()
            .filter_map(|&id| self.controller.todo_list().iter().find(|item| item.id == id))
            .map(|item| {
                let style = if item.completed {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::White)
                };
                Row::new(vec![
                    Cell::from(item.id.to_string()),
                    Cell::from(item.title.clone()),
                    Cell::from(item.description.clone()),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(5),
            Constraint::Min(20),
            Constraint::Percentage(55),
        ];
        let tab_name = if self.controller.view_completed() {
            "Complete"
        } else {
            "Incomplete"
        };
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "{} ({} of {})",
                tab_name,
                self.visible_ids.len(),
                self.controller.todo_list().len()
            )))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    /// Render the modal form over the list area.
    fn render_form(&mut self, f: &mut Frame, area: Rect) {
        let Some(form) = self.form.as_ref() else {
            return;
        };

        let popup = centered_rect(60, 70, area);
        f.render_widget(Clear, popup);

        let heading = if form.is_edit() { "Edit task" } else { "Add task" };
        let block = Block::default()
            .title(heading)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(SLATE_BLUE));
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(3), // Title
                    Constraint::Length(3), // Description
                    Constraint::Length(3), // Completed
                    Constraint::Min(1),    // Instructions
                ]
                .as_ref(),
            )
            .split(inner);

        let title_style = if form.focus == FormField::Title {
            Style::default().fg(SLATE_BLUE)
        } else {
            Style::default()
        };
        let title_input = Paragraph::new(form.title.value()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Title *")
                .border_style(title_style),
        );
        f.render_widget(title_input, chunks[0]);

        let desc_style = if form.focus == FormField::Description {
            Style::default().fg(SLATE_BLUE)
        } else {
            Style::default()
        };
        let desc_input = Paragraph::new(form.description.value()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Description *")
                .border_style(desc_style),
        );
        f.render_widget(desc_input, chunks[1]);

        let completed_style = if form.focus == FormField::Completed {
            Style::default().fg(SLATE_BLUE)
        } else {
            Style::default()
        };
        let checkbox = Paragraph::new(if form.completed {
            "[x] Completed"
        } else {
            "[ ] Completed"
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(completed_style),
        );
        f.render_widget(checkbox, chunks[2]);

        let instructions =
            Paragraph::new("Tab: Next field | Space: Toggle | Enter: Save | Esc: Cancel")
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
        f.render_widget(instructions, chunks[3]);

        // Place the terminal cursor inside the focused text input.
        let cursor_field = match form.focus {
            FormField::Title => Some((chunks[0], &form.title)),
            FormField::Description => Some((chunks[1], &form.description)),
            FormField::Completed => None,
        };
        if let Some((chunk, field)) = cursor_field {
            f.set_cursor_position((chunk.x + field.cursor() as u16 + 1, chunk.y + 1));
        }
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.controller.modal_open() {
            let heading = if self.form.as_ref().map_or(false, |form| form.is_edit()) {
                "Edit task"
            } else {
                "Add task"
            };
            format!("{heading} | Tab: Next field | Enter: Save | Esc: Cancel")
        } else {
            format!(
                "{} items | Tab: Switch view | a: Add | e: Edit | d: Delete | r: Refresh | q: Quit",
                self.visible_ids.len()
            )
        };

        let accent = self.tab_accent();
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(accent).fg(accent_text_color(accent)))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    /// Main render function: tabs, table, status bar, and the modal overlay
    /// when a form is open.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(3),
                    Constraint::Min(0),
                    Constraint::Length(1),
                ]
                .as_ref(),
            )
            .split(f.area());

        self.render_tabs(f, chunks[0]);
        self.render_list(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);

        if self.controller.modal_open() {
            self.render_form(f, chunks[1]);
        }
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

/// Text color that stays readable on a given accent background.
fn accent_text_color(accent: Color) -> Color {
    match accent {
        AMBER => Color::Rgb(20, 20, 20),
        _ => Color::White,
    }
}

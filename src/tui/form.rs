//! Item form handling for the terminal user interface.
//!
//! `ItemForm` is the modal's working copy of a draft: two text inputs and a
//! completed checkbox. It carries the draft it was seeded from so a confirm
//! hands back the same variant, with an edit keeping the id it came in with.

use crate::item::{ItemDraft, ItemFields};
use crate::tui::input::InputField;

/// Which form control currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Completed,
}

/// Form state for creating or editing a single item.
pub struct ItemForm {
    pub title: InputField,
    pub description: InputField,
    pub completed: bool,
    pub focus: FormField,
    seed: ItemDraft,
}

impl ItemForm {
    /// Create a form pre-filled from the draft loaded into the modal.
    pub fn from_draft(draft: &ItemDraft) -> Self {
        let fields = draft.fields();
        ItemForm {
            title: InputField::with_value(&fields.title),
            description: InputField::with_value(&fields.description),
            completed: fields.completed,
            focus: FormField::Title,
            seed: draft.clone(),
        }
    }

    /// Rebuild the draft from current form values. An edit keeps the id it
    /// was opened with.
    pub fn to_draft(&self) -> ItemDraft {
        self.seed.with_fields(ItemFields {
            title: self.title.value().to_string(),
            description: self.description.value().to_string(),
            completed: self.completed,
        })
    }

    /// True when the form edits an already-persisted item.
    pub fn is_edit(&self) -> bool {
        self.seed.existing_id().is_some()
    }

    /// Move focus to the next control, wrapping around.
    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Completed,
            FormField::Completed => FormField::Title,
        };
    }

    /// Move focus to the previous control, wrapping around.
    pub fn prev_field(&mut self) {
        self.focus = match self.focus {
            FormField::Title => FormField::Completed,
            FormField::Description => FormField::Title,
            FormField::Completed => FormField::Description,
        };
    }

    /// Route a typed character to the focused control. On the checkbox only
    /// space does anything, flipping the flag.
    pub fn handle_char(&mut self, c: char) {
        match self.focus {
            FormField::Title => self.title.handle_char(c),
            FormField::Description => self.description.handle_char(c),
            FormField::Completed => {
                if c == ' ' {
                    self.toggle_completed();
                }
            }
        }
    }

    /// Backspace in the focused text input; ignored on the checkbox.
    pub fn handle_backspace(&mut self) {
        match self.focus {
            FormField::Title => self.title.handle_backspace(),
            FormField::Description => self.description.handle_backspace(),
            FormField::Completed => {}
        }
    }

    /// Delete-under-cursor in the focused text input.
    pub fn handle_delete(&mut self) {
        match self.focus {
            FormField::Title => self.title.handle_delete(),
            FormField::Description => self.description.handle_delete(),
            FormField::Completed => {}
        }
    }

    /// Left/right cursor movement in the focused text input.
    pub fn handle_left_right(&mut self, right: bool) {
        let field = match self.focus {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
            FormField::Completed => return,
        };
        if right {
            field.move_cursor_right();
        } else {
            field.move_cursor_left();
        }
    }

    /// Jump to the start or end of the focused text input.
    pub fn handle_home_end(&mut self, end: bool) {
        let field = match self.focus {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
            FormField::Completed => return,
        };
        if end {
            field.move_cursor_end();
        } else {
            field.move_cursor_home();
        }
    }

    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }
}

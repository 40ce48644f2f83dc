//! Todo item data structures.
//!
//! This module defines the wire-level `TodoItem` record as the backend returns
//! it, plus the `ItemDraft` the modal form works on. Whether a submit becomes
//! a create or an update is carried by the draft's variant, never inferred
//! from an optional id.

use serde::{Deserialize, Serialize};

/// A persisted todo item, exactly as the backend serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// The editable fields of an item; also the request body for create and
/// update calls (the backend assigns and owns `id`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFields {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl ItemFields {
    /// True when `title` or `description` is empty after trimming whitespace.
    pub fn has_blank_field(&self) -> bool {
        self.title.trim().is_empty() || self.description.trim().is_empty()
    }
}

impl From<&TodoItem> for ItemFields {
    fn from(item: &TodoItem) -> Self {
        ItemFields {
            title: item.title.clone(),
            description: item.description.clone(),
            completed: item.completed,
        }
    }
}

/// An item being composed or edited in the modal form.
///
/// `New` has never been sent to the backend; `Existing` is an edit of a
/// persisted item and keeps its id so the submit path can address it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemDraft {
    New(ItemFields),
    Existing { id: u64, fields: ItemFields },
}

impl ItemDraft {
    /// A blank draft for the create flow.
    pub fn blank() -> Self {
        ItemDraft::New(ItemFields::default())
    }

    /// A draft seeded from a persisted item, for the edit flow.
    pub fn from_item(item: &TodoItem) -> Self {
        ItemDraft::Existing {
            id: item.id,
            fields: ItemFields::from(item),
        }
    }

    pub fn fields(&self) -> &ItemFields {
        match self {
            ItemDraft::New(fields) => fields,
            ItemDraft::Existing { fields, .. } => fields,
        }
    }

    /// The persisted id, when this draft edits an existing item.
    pub fn existing_id(&self) -> Option<u64> {
        match self {
            ItemDraft::New(_) => None,
            ItemDraft::Existing { id, .. } => Some(*id),
        }
    }

    /// Rebuild the draft with new field values, keeping the variant and id.
    pub fn with_fields(&self, fields: ItemFields) -> Self {
        match self {
            ItemDraft::New(_) => ItemDraft::New(fields),
            ItemDraft::Existing { id, .. } => ItemDraft::Existing { id: *id, fields },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_field_detection() {
        let mut fields = ItemFields {
            title: "Buy milk".to_string(),
            description: "Two litres".to_string(),
            completed: false,
        };
        assert!(!fields.has_blank_field());

        fields.title = "   ".to_string();
        assert!(fields.has_blank_field());

        fields.title = "Buy milk".to_string();
        fields.description = "\t\n".to_string();
        assert!(fields.has_blank_field());

        fields.description = String::new();
        assert!(fields.has_blank_field());
    }

    #[test]
    fn test_draft_from_item_keeps_id() {
        let item = TodoItem {
            id: 7,
            title: "Water plants".to_string(),
            description: "Balcony only".to_string(),
            completed: true,
        };
        let draft = ItemDraft::from_item(&item);
        assert_eq!(draft.existing_id(), Some(7));
        assert_eq!(draft.fields().title, "Water plants");
        assert!(draft.fields().completed);
    }

    #[test]
    fn test_with_fields_preserves_variant() {
        let edited = ItemFields {
            title: "New title".to_string(),
            description: "New description".to_string(),
            completed: false,
        };

        let new_draft = ItemDraft::blank().with_fields(edited.clone());
        assert_eq!(new_draft.existing_id(), None);

        let existing = ItemDraft::Existing {
            id: 3,
            fields: ItemFields::default(),
        };
        let updated = existing.with_fields(edited);
        assert_eq!(updated.existing_id(), Some(3));
        assert_eq!(updated.fields().title, "New title");
    }

    #[test]
    fn test_fields_serialize_without_id() {
        let fields = ItemFields {
            title: "A".to_string(),
            description: "d".to_string(),
            completed: false,
        };
        let body = serde_json::to_value(&fields).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["title"], "A");
    }
}

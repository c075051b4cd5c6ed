//! Detail panel state: single-item expansion and one-field inline editing

use crate::types::{CalendarItem, DaygridError, ItemField, ItemKey, Result};

/// A field being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub key: ItemKey,
    pub field: ItemField,
    /// Pre-seeded with the field's value when editing starts
    pub buffer: String,
}

/// Expansion and edit state for the selected day's items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPanel {
    expanded: Option<ItemKey>,
    edit: Option<FieldEdit>,
}

impl DetailPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expanded(&self) -> Option<ItemKey> {
        self.expanded
    }

    pub fn is_expanded(&self, key: ItemKey) -> bool {
        self.expanded == Some(key)
    }

    pub fn edit(&self) -> Option<&FieldEdit> {
        self.edit.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Expand `key`, collapsing any other item; toggling the expanded item collapses it.
    /// An open edit is discarded.
    pub fn toggle(&mut self, key: ItemKey) {
        self.edit = None;
        self.expanded = if self.expanded == Some(key) {
            None
        } else {
            Some(key)
        };
    }

    /// Collapse everything and drop any edit (e.g. when the selected day changes)
    pub fn reset(&mut self) {
        self.expanded = None;
        self.edit = None;
    }

    /// Start editing `field` of an expanded item. Replaces any open edit.
    pub fn begin_edit(&mut self, item: &CalendarItem, field: ItemField) -> Result<()> {
        let key = item.key();
        if !self.is_expanded(key) {
            return Err(DaygridError::Validation(
                "Expand the item before editing it".into(),
            ));
        }
        self.edit = Some(FieldEdit {
            key,
            field,
            buffer: field.value(item),
        });
        Ok(())
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(edit) = self.edit.as_mut() {
            edit.buffer.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(edit) = self.edit.as_mut() {
            edit.buffer.pop();
        }
    }

    /// Apply the edit buffer to `item` and return the updated item.
    /// On a validation error the edit stays open and `item` is untouched.
    pub fn commit(&mut self, item: &CalendarItem) -> Result<CalendarItem> {
        let edit = self
            .edit
            .as_ref()
            .ok_or_else(|| DaygridError::Validation("No field is being edited".into()))?;
        if edit.key != item.key() {
            return Err(DaygridError::NotFound { key: edit.key });
        }

        let mut updated = item.clone();
        edit.field.apply(&mut updated, &edit.buffer)?;
        self.edit = None;
        Ok(updated)
    }

    /// Discard the edit without touching anything
    pub fn cancel(&mut self) {
        self.edit = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemKind, Priority};

    fn party() -> CalendarItem {
        let mut item = CalendarItem::new(ItemKind::Event, 3, "2024-03-12", "Birthday Party");
        item.description = Some("Celebrating Sarah's 30th birthday".into());
        item.notes = Some("Bring gift".into());
        item.priority = Some(Priority::High);
        item
    }

    fn conference() -> CalendarItem {
        CalendarItem::new(ItemKind::Event, 4, "2024-03-20", "Conference")
    }

    #[test]
    fn test_single_expansion() {
        let mut panel = DetailPanel::new();
        panel.toggle(party().key());
        assert!(panel.is_expanded(party().key()));

        panel.toggle(conference().key());
        assert!(panel.is_expanded(conference().key()));
        assert!(!panel.is_expanded(party().key()));

        panel.toggle(conference().key());
        assert_eq!(panel.expanded(), None);
    }

    #[test]
    fn test_begin_edit_requires_expansion() {
        let mut panel = DetailPanel::new();
        assert!(panel.begin_edit(&party(), ItemField::Title).is_err());
        assert!(!panel.is_editing());
    }

    #[test]
    fn test_begin_edit_seeds_buffer() {
        let mut panel = DetailPanel::new();
        let item = party();
        panel.toggle(item.key());
        panel.begin_edit(&item, ItemField::Notes).unwrap();
        assert_eq!(panel.edit().unwrap().buffer, "Bring gift");

        // Only one field at a time
        panel.begin_edit(&item, ItemField::Title).unwrap();
        let edit = panel.edit().unwrap();
        assert_eq!(edit.field, ItemField::Title);
        assert_eq!(edit.buffer, "Birthday Party");
    }

    #[test]
    fn test_commit_changes_exactly_one_field() {
        let mut panel = DetailPanel::new();
        let item = party();
        panel.toggle(item.key());
        panel.begin_edit(&item, ItemField::Title).unwrap();
        for _ in 0.."Party".len() {
            panel.pop_char();
        }
        "Dinner".chars().for_each(|c| panel.push_char(c));

        let updated = panel.commit(&item).unwrap();
        assert_eq!(updated.title, "Birthday Dinner");
        assert_eq!(
            CalendarItem {
                title: item.title.clone(),
                ..updated.clone()
            },
            item
        );
        assert!(!panel.is_editing());
        assert!(panel.is_expanded(item.key()));
    }

    #[test]
    fn test_cancel_leaves_item_unchanged() {
        let mut panel = DetailPanel::new();
        let item = party();
        let snapshot = item.clone();
        panel.toggle(item.key());
        panel.begin_edit(&item, ItemField::Description).unwrap();
        panel.push_char('!');
        panel.cancel();

        assert!(!panel.is_editing());
        assert_eq!(item, snapshot);
        assert!(panel.commit(&item).is_err());
    }

    #[test]
    fn test_invalid_commit_keeps_edit_open() {
        let mut panel = DetailPanel::new();
        let item = party();
        panel.toggle(item.key());
        panel.begin_edit(&item, ItemField::Priority).unwrap();
        for _ in 0..4 {
            panel.pop_char();
        }
        "urgent".chars().for_each(|c| panel.push_char(c));

        assert!(panel.commit(&item).is_err());
        assert!(panel.is_editing());
        assert_eq!(panel.edit().unwrap().buffer, "urgent");
    }

    #[test]
    fn test_commit_against_other_item_fails() {
        let mut panel = DetailPanel::new();
        let item = party();
        panel.toggle(item.key());
        panel.begin_edit(&item, ItemField::Title).unwrap();
        let err = panel.commit(&conference()).unwrap_err();
        assert!(matches!(err, DaygridError::NotFound { .. }));
    }

    #[test]
    fn test_toggle_discards_edit() {
        let mut panel = DetailPanel::new();
        let item = party();
        panel.toggle(item.key());
        panel.begin_edit(&item, ItemField::Title).unwrap();
        panel.toggle(conference().key());
        assert!(!panel.is_editing());
    }

    #[test]
    fn test_reset() {
        let mut panel = DetailPanel::new();
        let item = party();
        panel.toggle(item.key());
        panel.begin_edit(&item, ItemField::Title).unwrap();
        panel.reset();
        assert_eq!(panel, DetailPanel::new());
    }
}

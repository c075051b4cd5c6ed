//! Flat item collection with exact date-string filtering

use crate::types::{CalendarItem, DaygridError, ItemKey, ItemKind, Result};

/// First id handed to locally created items. Fetched ids stay below it.
pub const LOCAL_ID_BASE: u32 = u32::MAX / 2 + 1;

/// All known calendar items, in arrival order
#[derive(Debug, Clone, Default)]
pub struct ItemIndex {
    items: Vec<CalendarItem>,
}

impl ItemIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<CalendarItem>) -> Self {
        let mut index = Self::new();
        index.merge(items);
        index
    }

    pub fn items(&self) -> &[CalendarItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items whose `date` equals `iso` exactly, any kind
    pub fn items_for_day(&self, iso: &str) -> Vec<&CalendarItem> {
        self.items.iter().filter(|item| item.date == iso).collect()
    }

    /// Items for a day split into (appointments, events)
    pub fn partition_for_day(&self, iso: &str) -> (Vec<&CalendarItem>, Vec<&CalendarItem>) {
        self.items_for_day(iso)
            .into_iter()
            .partition(|item| item.kind == ItemKind::Appointment)
    }

    /// Appointments then events for a day, the order the detail panel lists them
    pub fn listed_for_day(&self, iso: &str) -> Vec<&CalendarItem> {
        let (mut appointments, events) = self.partition_for_day(iso);
        appointments.extend(events);
        appointments
    }

    pub fn get(&self, key: ItemKey) -> Option<&CalendarItem> {
        self.items.iter().find(|item| item.key() == key)
    }

    /// Merge fetched items. Keys already present are kept as-is, so local
    /// edits and creations win over refetched copies. Returns how many were added.
    pub fn merge(&mut self, fetched: Vec<CalendarItem>) -> usize {
        let mut added = 0;
        for item in fetched {
            if self.get(item.key()).is_none() {
                self.items.push(item);
                added += 1;
            }
        }
        added
    }

    /// Add a new item; its key must be free
    pub fn insert(&mut self, item: CalendarItem) -> Result<()> {
        if self.get(item.key()).is_some() {
            return Err(DaygridError::Validation(format!(
                "{} already exists",
                item.key()
            )));
        }
        self.items.push(item);
        Ok(())
    }

    /// Replace the item with the same key
    pub fn update(&mut self, item: CalendarItem) -> Result<()> {
        let key = item.key();
        let slot = self
            .items
            .iter_mut()
            .find(|existing| existing.key() == key)
            .ok_or(DaygridError::NotFound { key })?;
        *slot = item;
        Ok(())
    }

    /// Id for a locally created item of `kind`: one past the highest local
    /// id, starting at `LOCAL_ID_BASE`
    pub fn next_id(&self, kind: ItemKind) -> u32 {
        self.items
            .iter()
            .filter(|item| item.kind == kind && item.id >= LOCAL_ID_BASE)
            .map(|item| item.id)
            .max()
            .map_or(LOCAL_ID_BASE, |max| max.saturating_add(1))
    }
}

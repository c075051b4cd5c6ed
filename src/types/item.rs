//! Calendar item types

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{DaygridError, Result};

/// ISO date format used as the item date key
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Format a date as the `YYYY-MM-DD` key items are matched on
pub fn iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

/// Parse a `YYYY-MM-DD` string
pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE)
        .map_err(|e| DaygridError::Parse(format!("invalid date '{}': {}", s, e)))
}

/// Long display form, e.g. "March 5, 2024"
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Validate a clock time and normalize it to `HH:MM`
pub fn normalize_time(s: &str) -> Result<String> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| DaygridError::Validation(format!("Time must be HH:MM, got '{}'", s.trim())))
}

/// Kind of calendar item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Appointment,
    Event,
}

impl ItemKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Appointment => "appointment",
            Self::Event => "event",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Item identity: ids are only unique within a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub kind: ItemKind,
    pub id: u32,
}

impl ItemKey {
    pub fn new(kind: ItemKind, id: u32) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} with id {}", self.kind, self.id)
    }
}

/// Goal and event priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn all() -> &'static [Priority] {
        &[Priority::Low, Priority::Medium, Priority::High]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Capitalized label for display
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Next priority (wrapping)
    pub fn next(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }

    /// Previous priority (wrapping)
    pub fn prev(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::Medium => Self::Low,
            Self::High => Self::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = DaygridError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(DaygridError::Validation(format!(
                "Priority must be low, medium or high, got '{}'",
                other
            ))),
        }
    }
}

/// A dated appointment or event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarItem {
    pub id: u32,
    /// `YYYY-MM-DD`; matched against grid cells by exact string equality
    pub date: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl CalendarItem {
    /// Item with only the required fields set
    pub fn new(kind: ItemKind, id: u32, date: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            date: date.into(),
            title: title.into(),
            kind,
            description: None,
            notes: None,
            time: None,
            priority: None,
        }
    }

    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.kind, self.id)
    }

    /// True when none of the optional detail fields are set
    pub fn has_no_details(&self) -> bool {
        self.description.is_none()
            && self.notes.is_none()
            && self.time.is_none()
            && self.priority.is_none()
    }
}

/// Editable field of a calendar item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Title,
    Time,
    Priority,
    Description,
    Notes,
}

impl ItemField {
    /// Fields in display order
    pub fn all() -> &'static [ItemField] {
        &[
            ItemField::Title,
            ItemField::Time,
            ItemField::Priority,
            ItemField::Description,
            ItemField::Notes,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Time => "Time",
            Self::Priority => "Priority",
            Self::Description => "Description",
            Self::Notes => "Notes",
        }
    }

    /// Current value of this field as text (empty when unset)
    pub fn value(self, item: &CalendarItem) -> String {
        match self {
            Self::Title => item.title.clone(),
            Self::Time => item.time.clone().unwrap_or_default(),
            Self::Priority => item.priority.map(|p| p.to_string()).unwrap_or_default(),
            Self::Description => item.description.clone().unwrap_or_default(),
            Self::Notes => item.notes.clone().unwrap_or_default(),
        }
    }

    /// Write `raw` into this field. Only this field changes; on error nothing does.
    pub fn apply(self, item: &mut CalendarItem, raw: &str) -> Result<()> {
        let trimmed = raw.trim();
        match self {
            Self::Title => {
                if trimmed.is_empty() {
                    return Err(DaygridError::Validation("Title is required".into()));
                }
                item.title = trimmed.to_string();
            }
            Self::Time => {
                item.time = if trimmed.is_empty() {
                    None
                } else {
                    Some(normalize_time(trimmed)?)
                };
            }
            Self::Priority => {
                item.priority = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.parse()?)
                };
            }
            Self::Description => item.description = non_empty(trimmed),
            Self::Notes => item.notes = non_empty(trimmed),
        }
        Ok(())
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dentist() -> CalendarItem {
        CalendarItem::new(ItemKind::Appointment, 1, "2024-03-05", "Dentist")
    }

    #[test]
    fn test_iso_and_long_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(iso_date(date), "2024-03-05");
        assert_eq!(long_date(date), "March 5, 2024");
        assert_eq!(parse_iso_date("2024-03-05").unwrap(), date);
        assert!(parse_iso_date("2024-3-5x").is_err());
    }

    #[test]
    fn test_normalize_time() {
        assert_eq!(normalize_time("9:05").unwrap(), "09:05");
        assert_eq!(normalize_time(" 14:30 ").unwrap(), "14:30");
        assert!(normalize_time("25:00").is_err());
        assert!(normalize_time("noon").is_err());
    }

    #[test]
    fn test_serialize_uses_type_key() {
        let json = serde_json::to_value(dentist()).unwrap();
        assert_eq!(json["type"], "appointment");
        assert_eq!(json["date"], "2024-03-05");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_deserialize_with_priority() {
        let item: CalendarItem = serde_json::from_str(
            r#"{"id":3,"date":"2024-03-12","title":"Birthday Party","type":"event","priority":"high"}"#,
        )
        .unwrap();
        assert_eq!(item.kind, ItemKind::Event);
        assert_eq!(item.priority, Some(Priority::High));
        assert!(item.description.is_none());
    }

    #[test]
    fn test_key_distinguishes_kind() {
        let a = CalendarItem::new(ItemKind::Appointment, 1, "2024-03-05", "A");
        let e = CalendarItem::new(ItemKind::Event, 1, "2024-03-05", "E");
        assert_ne!(a.key(), e.key());
    }

    #[test]
    fn test_priority_parse_and_cycle() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::High.next(), Priority::Low);
        assert_eq!(Priority::Low.prev(), Priority::High);
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_field_apply_changes_only_that_field() {
        let mut item = dentist();
        item.notes = Some("bring card".into());
        let before = item.clone();

        ItemField::Time.apply(&mut item, "8:15").unwrap();

        assert_eq!(item.time.as_deref(), Some("08:15"));
        assert_eq!(item.title, before.title);
        assert_eq!(item.notes, before.notes);
        assert_eq!(item.date, before.date);
    }

    #[test]
    fn test_field_apply_rejects_empty_title() {
        let mut item = dentist();
        let err = ItemField::Title.apply(&mut item, "   ").unwrap_err();
        assert!(matches!(err, DaygridError::Validation(_)));
        assert_eq!(item, dentist());
    }

    #[test]
    fn test_field_apply_empty_clears_optional() {
        let mut item = dentist();
        item.description = Some("cleaning".into());
        ItemField::Description.apply(&mut item, "").unwrap();
        assert!(item.description.is_none());
        assert!(item.has_no_details());
    }

    #[test]
    fn test_field_value_round_trip_priority() {
        let mut item = dentist();
        ItemField::Priority.apply(&mut item, "Low").unwrap();
        assert_eq!(ItemField::Priority.value(&item), "low");
    }
}

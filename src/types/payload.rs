//! Validated payloads sent to the calendar client

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

use super::{CalendarItem, ItemKind, Priority};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    /// `YYYY-MM-DD`
    pub date: String,
    pub title: String,
    /// `HH:MM`
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewAppointment {
    /// Calendar entry for an accepted appointment
    pub fn into_item(self, id: u32) -> CalendarItem {
        let mut item = CalendarItem::new(ItemKind::Appointment, id, self.date, self.title);
        item.time = Some(self.time);
        item.description = self.description;
        item
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGoal {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(default)]
    pub tasks: Vec<NewTask>,
}

/// A postable payload and the key it is returned under
pub trait Payload: Serialize {
    const KEY: &'static str;
}

impl Payload for NewAppointment {
    const KEY: &'static str = "appointment";
}

impl Payload for NewGoal {
    const KEY: &'static str = "goal";
}

impl Payload for NewTask {
    const KEY: &'static str = "task";
}

/// Response of a post call: `{ "success": bool, "<key>": payload }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posted<T> {
    pub success: bool,
    pub payload: T,
}

impl<T: Payload> Serialize for Posted<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Posted", 2)?;
        state.serialize_field("success", &self.success)?;
        state.serialize_field(T::KEY, &self.payload)?;
        state.end()
    }
}

impl<T> Posted<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dentist() -> NewAppointment {
        NewAppointment {
            date: "2024-03-05".into(),
            title: "Dentist".into(),
            time: "09:30".into(),
            description: None,
        }
    }

    #[test]
    fn test_posted_nests_payload_under_its_key() {
        let json = serde_json::to_value(Posted::ok(dentist())).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["appointment"]["title"], "Dentist");
        assert!(json.get("title").is_none());
        assert!(json["appointment"].get("description").is_none());

        let task = NewTask {
            description: "Long run".into(),
            notes: None,
            duration_minutes: 90,
        };
        let json = serde_json::to_value(Posted::ok(task)).unwrap();
        assert_eq!(json["task"]["duration_minutes"], 90);

        let goal = NewGoal {
            title: "Run a marathon".into(),
            description: "Spring race".into(),
            priority: Priority::High,
            tasks: Vec::new(),
        };
        let json = serde_json::to_value(Posted::ok(goal)).unwrap();
        assert_eq!(json["goal"]["title"], "Run a marathon");
    }

    #[test]
    fn test_into_item() {
        let item = dentist().into_item(7);
        assert_eq!(item.kind, ItemKind::Appointment);
        assert_eq!(item.id, 7);
        assert_eq!(item.date, "2024-03-05");
        assert_eq!(item.time.as_deref(), Some("09:30"));
        assert!(item.priority.is_none());
    }
}

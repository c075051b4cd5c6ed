//! Calendar data access
//!
//! `CalendarClient` is the seam a real backend would plug into. The shipped
//! `MockClient` returns fixed items for any month after an artificial delay.

use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::services::config::ClientConfig;
use crate::types::{
    CalendarItem, DaygridError, ItemKind, Month, NewAppointment, NewGoal, NewTask, Payload,
    Posted, Priority, Result,
};

/// Data access used by the calendar
pub trait CalendarClient: Send + Sync {
    /// Appointments for `month`
    fn fetch_appointments(&self, month: Month) -> Result<Vec<CalendarItem>>;

    /// Events for `month`
    fn fetch_events(&self, month: Month) -> Result<Vec<CalendarItem>>;

    fn post_appointment(&self, appointment: NewAppointment) -> Result<Posted<NewAppointment>>;

    fn post_goal(&self, goal: NewGoal) -> Result<Posted<NewGoal>>;

    fn post_task(&self, task: NewTask) -> Result<Posted<NewTask>>;
}

/// In-memory client with fixed per-month data
#[derive(Debug, Clone)]
pub struct MockClient {
    fetch_delay: Duration,
    post_delay: Duration,
}

impl MockClient {
    pub fn new(fetch_delay: Duration, post_delay: Duration) -> Self {
        Self {
            fetch_delay,
            post_delay,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.fetch_delay(), config.post_delay())
    }

    /// No delays (tests, one-shot CLI output)
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    fn wait(delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    /// Ids unique per month so items of different months never share a key.
    /// Always below `LOCAL_ID_BASE`.
    fn mock_id(month: Month, n: u32) -> u32 {
        month.ordinal() * 10 + n
    }

    fn mock_date(month: Month, day: u32) -> String {
        format!("{}-{:02}", month, day)
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl CalendarClient for MockClient {
    fn fetch_appointments(&self, month: Month) -> Result<Vec<CalendarItem>> {
        Self::wait(self.fetch_delay);
        Ok(vec![
            CalendarItem::new(
                ItemKind::Appointment,
                Self::mock_id(month, 1),
                Self::mock_date(month, 5),
                "Dentist",
            ),
            CalendarItem::new(
                ItemKind::Appointment,
                Self::mock_id(month, 2),
                Self::mock_date(month, 12),
                "Team Meeting",
            ),
        ])
    }

    fn fetch_events(&self, month: Month) -> Result<Vec<CalendarItem>> {
        Self::wait(self.fetch_delay);
        let mut party = CalendarItem::new(
            ItemKind::Event,
            Self::mock_id(month, 3),
            Self::mock_date(month, 12),
            "Birthday Party",
        );
        party.description = Some("Celebrating Sarah's 30th birthday".to_string());
        party.notes = Some("Bring gift and RSVP by end of week".to_string());
        party.priority = Some(Priority::High);

        let mut conference = CalendarItem::new(
            ItemKind::Event,
            Self::mock_id(month, 4),
            Self::mock_date(month, 20),
            "Conference",
        );
        conference.description = Some("Annual tech conference with industry leaders".to_string());
        conference.notes = Some("Book hotel and prepare presentation slides".to_string());
        conference.priority = Some(Priority::Medium);

        Ok(vec![party, conference])
    }

    fn post_appointment(&self, appointment: NewAppointment) -> Result<Posted<NewAppointment>> {
        info!(
            payload = %serde_json::to_string(&appointment).unwrap_or_default(),
            "post appointment"
        );
        Self::wait(self.post_delay);
        Ok(Posted::ok(appointment))
    }

    fn post_goal(&self, goal: NewGoal) -> Result<Posted<NewGoal>> {
        info!(
            payload = %serde_json::to_string(&goal).unwrap_or_default(),
            "post goal"
        );
        Self::wait(self.post_delay);
        Ok(Posted::ok(goal))
    }

    fn post_task(&self, task: NewTask) -> Result<Posted<NewTask>> {
        info!(
            payload = %serde_json::to_string(&task).unwrap_or_default(),
            "post task"
        );
        Self::wait(self.post_delay);
        Ok(Posted::ok(task))
    }
}

fn accepted<T: Payload>(posted: Posted<T>) -> Result<T> {
    debug!(
        response = %serde_json::to_string(&posted).unwrap_or_default(),
        "post response"
    );
    if posted.success {
        Ok(posted.payload)
    } else {
        Err(DaygridError::Rejected(format!("{} was not accepted", T::KEY)))
    }
}

/// Post an appointment. A `success: false` answer is an error.
pub fn submit_appointment(
    client: &dyn CalendarClient,
    appointment: NewAppointment,
) -> Result<NewAppointment> {
    let created = accepted(client.post_appointment(appointment)?)?;
    info!(title = %created.title, date = %created.date, "appointment created");
    Ok(created)
}

/// Post a goal, then each of its tasks in order. Stops at the first failure.
pub fn submit_goal(client: &dyn CalendarClient, goal: NewGoal) -> Result<NewGoal> {
    let tasks = goal.tasks.clone();
    let created = accepted(client.post_goal(goal)?)?;
    for task in tasks {
        accepted(client.post_task(task)?)?;
    }
    info!(title = %created.title, tasks = created.tasks.len(), "goal created");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::index::ItemIndex;
    use std::sync::Mutex;

    /// Records post calls; answers `success: false` for tasks when asked to
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
        reject_tasks: bool,
    }

    impl Recorder {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl CalendarClient for Recorder {
        fn fetch_appointments(&self, _month: Month) -> Result<Vec<CalendarItem>> {
            Ok(Vec::new())
        }

        fn fetch_events(&self, _month: Month) -> Result<Vec<CalendarItem>> {
            Ok(Vec::new())
        }

        fn post_appointment(&self, appointment: NewAppointment) -> Result<Posted<NewAppointment>> {
            self.record(format!("appointment:{}", appointment.title));
            Ok(Posted::ok(appointment))
        }

        fn post_goal(&self, goal: NewGoal) -> Result<Posted<NewGoal>> {
            self.record(format!("goal:{}", goal.title));
            Ok(Posted::ok(goal))
        }

        fn post_task(&self, task: NewTask) -> Result<Posted<NewTask>> {
            self.record(format!("task:{}", task.description));
            Ok(Posted {
                success: !self.reject_tasks,
                payload: task,
            })
        }
    }

    fn goal_with_tasks() -> NewGoal {
        let task = |d: &str| NewTask {
            description: d.into(),
            notes: None,
            duration_minutes: 5,
        };
        NewGoal {
            title: "Marathon".into(),
            description: "Run 42km".into(),
            priority: Priority::High,
            tasks: vec![task("Buy shoes"), task("Long run")],
        }
    }

    #[test]
    fn test_submit_goal_posts_goal_then_tasks() {
        let client = Recorder::default();
        let created = submit_goal(&client, goal_with_tasks()).unwrap();
        assert_eq!(created.tasks.len(), 2);
        assert_eq!(
            *client.calls.lock().unwrap(),
            vec!["goal:Marathon", "task:Buy shoes", "task:Long run"]
        );
    }

    #[test]
    fn test_submit_goal_stops_on_rejected_task() {
        let client = Recorder {
            reject_tasks: true,
            ..Default::default()
        };
        let err = submit_goal(&client, goal_with_tasks()).unwrap_err();
        assert!(matches!(err, DaygridError::Rejected(_)));
        assert_eq!(client.calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_submit_appointment() {
        let client = Recorder::default();
        let appointment = NewAppointment {
            date: "2024-03-05".into(),
            title: "Dentist".into(),
            time: "09:30".into(),
            description: None,
        };
        assert_eq!(
            submit_appointment(&client, appointment.clone()).unwrap(),
            appointment
        );
    }

    #[test]
    fn test_mock_items_fall_in_requested_month() {
        let client = MockClient::instant();
        let march = Month::new(2024, 3).unwrap();
        let appointments = client.fetch_appointments(march).unwrap();
        let events = client.fetch_events(march).unwrap();

        let dates: Vec<_> = appointments
            .iter()
            .chain(events.iter())
            .map(|i| i.date.as_str())
            .collect();
        assert_eq!(
            dates,
            vec!["2024-03-05", "2024-03-12", "2024-03-12", "2024-03-20"]
        );
        assert!(appointments.iter().all(|i| i.kind == ItemKind::Appointment));
        assert!(events.iter().all(|i| i.kind == ItemKind::Event));
        assert_eq!(events[0].priority, Some(Priority::High));
    }

    #[test]
    fn test_mock_ids_unique_across_months() {
        let client = MockClient::instant();
        let march = Month::new(2024, 3).unwrap();
        let mut index = ItemIndex::new();
        index.merge(client.fetch_appointments(march).unwrap());
        let added = index.merge(client.fetch_appointments(march.succ()).unwrap());
        assert_eq!(added, 2);
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_posts_echo_payload() {
        let client = MockClient::instant();
        let task = NewTask {
            description: "Stretch".into(),
            notes: None,
            duration_minutes: 10,
        };
        let posted = client.post_task(task.clone()).unwrap();
        assert!(posted.success);
        assert_eq!(posted.payload, task);
    }

    #[test]
    fn test_client_is_object_safe() {
        let client: std::sync::Arc<dyn CalendarClient> = std::sync::Arc::new(MockClient::instant());
        assert!(client
            .fetch_events(Month::new(2024, 1).unwrap())
            .is_ok());
    }
}

//! Create-form drafts and their validation
//!
//! Drafts hold raw user input. `validate` turns a draft into the payload
//! posted to the calendar client; `reset` restores the defaults after a
//! successful submission.

use chrono::NaiveDate;

use crate::types::{
    iso_date, normalize_time, DaygridError, NewAppointment, NewGoal, NewTask, Priority, Result,
};

/// Default task duration in minutes
pub const DEFAULT_TASK_MINUTES: u32 = 1;

fn required(value: &str, label: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(DaygridError::Validation(format!("{} is required", label)))
    } else {
        Ok(trimmed.to_string())
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Appointment form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentDraft {
    pub title: String,
    pub time: String,
    pub description: String,
}

impl AppointmentDraft {
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }

    /// Validate into an appointment on `date`
    pub fn validate(&self, date: NaiveDate) -> Result<NewAppointment> {
        let title = required(&self.title, "Title")?;
        let time = normalize_time(&required(&self.time, "Time")?)?;
        Ok(NewAppointment {
            date: iso_date(date),
            title,
            time,
            description: optional(&self.description),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A task row in the goal draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Draft-local id, stable across removals
    pub id: u32,
    pub description: String,
    pub notes: String,
    pub duration_minutes: u32,
}

impl TaskDraft {
    fn validate(&self) -> Result<NewTask> {
        let description = required(&self.description, "Task description")?;
        if self.duration_minutes == 0 {
            return Err(DaygridError::Validation(
                "Task duration must be at least 1 minute".into(),
            ));
        }
        Ok(NewTask {
            description,
            notes: optional(&self.notes),
            duration_minutes: self.duration_minutes,
        })
    }
}

/// Input for the next task to add to a goal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub description: String,
    pub notes: String,
    /// Raw text; parsed when the task is added
    pub duration: String,
}

impl Default for TaskInput {
    fn default() -> Self {
        Self {
            description: String::new(),
            notes: String::new(),
            duration: DEFAULT_TASK_MINUTES.to_string(),
        }
    }
}

impl TaskInput {
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }

    /// Parse the duration as a positive number of minutes
    pub fn duration_minutes(&self) -> Result<u32> {
        match self.duration.trim().parse::<u32>() {
            Ok(minutes) if minutes >= 1 => Ok(minutes),
            _ => Err(DaygridError::Validation(format!(
                "Duration must be a positive number of minutes, got '{}'",
                self.duration.trim()
            ))),
        }
    }
}

/// Goal form input, including its task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub tasks: Vec<TaskDraft>,
    pub task_input: TaskInput,
    next_task_id: u32,
}

impl Default for GoalDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            priority: Priority::default(),
            tasks: Vec::new(),
            task_input: TaskInput::default(),
            next_task_id: 1,
        }
    }
}

impl GoalDraft {
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty()
            && self.description.trim().is_empty()
            && self.tasks.is_empty()
            && self.task_input.is_blank()
    }

    /// Append a task and return its draft id
    pub fn add_task(
        &mut self,
        description: impl Into<String>,
        notes: impl Into<String>,
        duration_minutes: u32,
    ) -> Result<u32> {
        let task = TaskDraft {
            id: self.next_task_id,
            description: description.into(),
            notes: notes.into(),
            duration_minutes,
        };
        task.validate()?;
        self.next_task_id += 1;
        let id = task.id;
        self.tasks.push(task);
        Ok(id)
    }

    /// Add the pending task input as a task and clear the input
    pub fn add_task_from_input(&mut self) -> Result<u32> {
        let minutes = self.task_input.duration_minutes()?;
        let input = self.task_input.clone();
        let id = self.add_task(input.description, input.notes, minutes)?;
        self.task_input = TaskInput::default();
        Ok(id)
    }

    /// Remove a task by draft id; other tasks keep their ids
    pub fn remove_task(&mut self, id: u32) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    pub fn validate(&self) -> Result<NewGoal> {
        let title = required(&self.title, "Title")?;
        let description = required(&self.description, "Description")?;
        let tasks = self
            .tasks
            .iter()
            .map(TaskDraft::validate)
            .collect::<Result<Vec<_>>>()?;
        Ok(NewGoal {
            title,
            description,
            priority: self.priority,
            tasks,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

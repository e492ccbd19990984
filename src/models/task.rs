use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TaskGenieError;

/// Urgency of a task. Declared low-to-high so the derived `Ord` gives
/// `High > Medium > Low`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Display order used by selection lists.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = TaskGenieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "h" => Ok(Self::High),
            "medium" | "m" => Ok(Self::Medium),
            "low" | "l" => Ok(Self::Low),
            _ => Err(TaskGenieError::validation(format!(
                "Invalid priority '{s}'. Expected one of: high, medium, low"
            ))),
        }
    }
}

/// Session-local handle naming a task. Carries no domain meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn generate() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn short(&self) -> &str {
        &self.0[..std::cmp::min(8, self.0.len())]
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub priority: Priority,
    pub deadline: NaiveDate,
    pub completed: bool,
    pub category: String,
}

impl Task {
    /// True when the task is still open and its deadline lies strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.deadline < today
    }
}

/// Input for creating a task. Names are validated by the store, not here.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub priority: Priority,
    pub deadline: NaiveDate,
    pub category: String,
}

/// Attribute names accepted by `edit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TaskField {
    Name,
    Description,
    Priority,
    Deadline,
    Category,
    Completed,
}

impl TaskField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Priority => "priority",
            Self::Deadline => "deadline",
            Self::Category => "category",
            Self::Completed => "completed",
        }
    }
}

/// A single-attribute change to an existing task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEdit {
    Name(String),
    Description(String),
    Priority(Priority),
    Deadline(NaiveDate),
    Category(String),
    Completed(bool),
}

impl TaskEdit {
    /// Parse a raw user-supplied value for `field`.
    pub fn parse(field: TaskField, value: &str) -> Result<Self, TaskGenieError> {
        Ok(match field {
            TaskField::Name => Self::Name(value.to_string()),
            TaskField::Description => Self::Description(value.to_string()),
            TaskField::Priority => Self::Priority(value.parse()?),
            TaskField::Deadline => Self::Deadline(parse_date(value)?),
            TaskField::Category => Self::Category(value.to_string()),
            TaskField::Completed => Self::Completed(parse_bool(value)?),
        })
    }

    pub fn field(&self) -> TaskField {
        match self {
            Self::Name(_) => TaskField::Name,
            Self::Description(_) => TaskField::Description,
            Self::Priority(_) => TaskField::Priority,
            Self::Deadline(_) => TaskField::Deadline,
            Self::Category(_) => TaskField::Category,
            Self::Completed(_) => TaskField::Completed,
        }
    }
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, TaskGenieError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        TaskGenieError::validation(format!("Invalid date '{s}'. Expected YYYY-MM-DD"))
    })
}

pub fn parse_bool(s: &str) -> Result<bool, TaskGenieError> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Ok(true),
        "false" | "no" | "n" | "off" | "0" => Ok(false),
        _ => Err(TaskGenieError::validation(format!(
            "Invalid boolean '{s}'. Expected true or false"
        ))),
    }
}

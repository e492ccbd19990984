//! Visible-subset computation.
//!
//! Four independent criteria, all default-permissive, combined with AND.
//! The result keeps store order.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::TaskGenieError;
use crate::models::{Priority, Task};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn matches(&self, priority: Priority) -> bool {
        match self {
            Self::All => true,
            Self::Only(p) => *p == priority,
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All Priorities"),
            Self::Only(p) => write!(f, "{p}"),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = TaskGenieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Category criterion. `Only` holds a canonical registered name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parse user input; `"all"` (any case) selects every category. The
    /// returned name is not yet checked against a registry.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("all categories") {
            Self::All
        } else {
            Self::Only(s.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(name) => name == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All Categories"),
            Self::Only(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParams {
    pub priority: PriorityFilter,
    pub category: CategoryFilter,
    pub show_completed: bool,
    pub overdue_only: bool,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            priority: PriorityFilter::All,
            category: CategoryFilter::All,
            show_completed: true,
            overdue_only: false,
        }
    }
}

impl FilterParams {
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        if !self.priority.matches(task.priority) {
            return false;
        }
        if !self.category.matches(&task.category) {
            return false;
        }
        if !self.show_completed && task.completed {
            return false;
        }
        if self.overdue_only && !task.is_overdue(today) {
            return false;
        }
        true
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Apply a partial change. Fields left `None` keep their current value.
    pub fn apply(&mut self, update: FilterUpdate) {
        if let Some(p) = update.priority {
            self.priority = p;
        }
        if let Some(c) = update.category {
            self.category = c;
        }
        if let Some(v) = update.show_completed {
            self.show_completed = v;
        }
        if let Some(v) = update.overdue_only {
            self.overdue_only = v;
        }
    }
}

/// Partial change to the filter; each field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub priority: Option<PriorityFilter>,
    pub category: Option<CategoryFilter>,
    pub show_completed: Option<bool>,
    pub overdue_only: Option<bool>,
}

impl FilterUpdate {
    /// Fill every unset field from the default filter, so applying the
    /// result is a reset followed by this update.
    pub fn over_defaults(self) -> Self {
        let d = FilterParams::default();
        Self {
            priority: Some(self.priority.unwrap_or(d.priority)),
            category: Some(self.category.unwrap_or(d.category)),
            show_completed: Some(self.show_completed.unwrap_or(d.show_completed)),
            overdue_only: Some(self.overdue_only.unwrap_or(d.overdue_only)),
        }
    }
}

/// Tasks passing every criterion, in store order.
pub fn visible_subset<'a>(tasks: &'a [Task], params: &FilterParams, today: NaiveDate) -> Vec<&'a Task> {
    tasks.iter().filter(|t| params.matches(t, today)).collect()
}

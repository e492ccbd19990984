//! One interactive session: the task store, the category table, the
//! current filter and selection, and the clock that decides "today".
//!
//! Every operation is synchronous. Failed operations leave the session
//! exactly as it was.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::TaskDefaults;
use crate::error::{ErrorCode, TaskGenieError};
use crate::models::{CategoryRegistry, NewTask, Priority, Task, TaskEdit, TaskId};
use crate::query::{visible_subset, CategoryFilter, FilterParams, FilterUpdate, Statistics};
use crate::store::TaskStore;

/// Marks a reference as an ID prefix even when it is all digits.
pub const ID_PREFIX: &str = "id:";

/// Add-form input. Missing fields fall back to the session defaults.
#[derive(Debug, Clone, Default)]
pub struct AddRequest {
    pub name: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub deadline: Option<NaiveDate>,
    pub category: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Added {
    pub task: Task,
    /// Deadline already behind today. Accepted, but worth telling the user.
    pub past_deadline: bool,
}

/// What the presentation layer renders after each command.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub today: NaiveDate,
    pub filter: &'a FilterParams,
    pub tasks: Vec<&'a Task>,
    pub statistics: Statistics,
}

pub struct Session {
    store: TaskStore,
    registry: CategoryRegistry,
    defaults: TaskDefaults,
    filter: FilterParams,
    selected: Option<TaskId>,
    clock: Box<dyn Clock>,
}

impl Session {
    pub fn new(registry: CategoryRegistry, defaults: TaskDefaults, clock: Box<dyn Clock>) -> Self {
        Self {
            store: TaskStore::new(),
            registry,
            defaults,
            filter: FilterParams::default(),
            selected: None,
            clock,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn add(&mut self, req: AddRequest) -> Result<Added, TaskGenieError> {
        let today = self.today();
        let new = NewTask {
            name: req.name,
            description: req.description.unwrap_or_default(),
            priority: req.priority.unwrap_or(self.defaults.priority),
            deadline: req.deadline.unwrap_or(today),
            category: req.category.unwrap_or_else(|| self.defaults.category.clone()),
        };
        let task = self
            .store
            .add(new, &self.registry)
            .inspect_err(|e| warn!(error = %e, "add rejected"))?
            .clone();

        let past_deadline = task.deadline < today;
        if past_deadline {
            warn!(id = %task.id, deadline = %task.deadline, "task added with a past deadline");
        }
        Ok(Added {
            task,
            past_deadline,
        })
    }

    /// Select by 1-based row in the visible subset, or by ID prefix. Only a
    /// visible task can be selected.
    pub fn select(&mut self, reference: &str) -> Result<&Task, TaskGenieError> {
        let id = self.resolve(reference)?.id.clone();
        if !self.is_visible(&id) {
            let err = TaskGenieError::new(
                ErrorCode::SelectionError,
                format!("Task {} is hidden by the current filter", id.short()),
            );
            warn!(error = %err, "select rejected");
            return Err(err);
        }
        debug!(id = %id, "task selected");
        self.selected = Some(id.clone());
        self.task(&id)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected.as_ref().and_then(|id| self.store.get(id))
    }

    pub fn selected_id(&self) -> Option<&TaskId> {
        self.selected.as_ref()
    }

    /// Delete the selected task and clear the selection. A selection hidden
    /// since it was made counts as no selection.
    pub fn remove_selected(&mut self) -> Result<Task, TaskGenieError> {
        self.drop_hidden_selection();
        let removed = self
            .store
            .remove(self.selected.as_ref())
            .inspect_err(|e| warn!(error = %e, "delete rejected"))?;
        self.selected = None;
        Ok(removed)
    }

    pub fn update(&mut self, reference: &str, edit: TaskEdit) -> Result<&Task, TaskGenieError> {
        let id = self.resolve(reference)?.id.clone();
        self.store
            .update(&id, edit, &self.registry)
            .inspect_err(|e| warn!(error = %e, "edit rejected"))?;
        self.drop_hidden_selection();
        self.task(&id)
    }

    pub fn toggle_completed(&mut self, reference: &str) -> Result<&Task, TaskGenieError> {
        let task = self.resolve(reference)?;
        let id = task.id.clone();
        let completed = !task.completed;
        self.store
            .update(&id, TaskEdit::Completed(completed), &self.registry)?;
        self.drop_hidden_selection();
        self.task(&id)
    }

    /// Apply a partial filter change. A category must be registered; on any
    /// error the filter keeps its previous value.
    pub fn set_filter(&mut self, mut update: FilterUpdate) -> Result<&FilterParams, TaskGenieError> {
        if let Some(CategoryFilter::Only(name)) = &update.category {
            let canonical = self
                .registry
                .resolve(name)
                .inspect_err(|e| warn!(error = %e, "filter rejected"))?
                .to_string();
            update.category = Some(CategoryFilter::Only(canonical));
        }
        self.filter.apply(update);
        info!(filter = ?self.filter, "filter changed");
        self.drop_hidden_selection();
        Ok(&self.filter)
    }

    pub fn reset_filter(&mut self) -> &FilterParams {
        self.filter = FilterParams::default();
        info!("filter reset");
        self.drop_hidden_selection();
        &self.filter
    }

    pub fn filter(&self) -> &FilterParams {
        &self.filter
    }

    pub fn visible(&self) -> Vec<&Task> {
        visible_subset(self.store.tasks(), &self.filter, self.today())
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::compute(self.store.tasks(), self.today())
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let today = self.today();
        Snapshot {
            today,
            filter: &self.filter,
            tasks: visible_subset(self.store.tasks(), &self.filter, today),
            statistics: Statistics::compute(self.store.tasks(), today),
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn defaults(&self) -> &TaskDefaults {
        &self.defaults
    }

    fn task(&self, id: &TaskId) -> Result<&Task, TaskGenieError> {
        self.store
            .get(id)
            .ok_or_else(|| TaskGenieError::task_not_found(id.as_str()))
    }

    fn is_visible(&self, id: &TaskId) -> bool {
        self.visible().iter().any(|t| &t.id == id)
    }

    /// The selection follows the table: once its row is filtered out, it is gone.
    fn drop_hidden_selection(&mut self) {
        let hidden = match &self.selected {
            Some(id) => !self.is_visible(id),
            None => false,
        };
        if hidden {
            debug!("selected task no longer visible, selection cleared");
            self.selected = None;
        }
    }

    /// Resolve a user reference: `id:<prefix>` is always an ID prefix, a bare
    /// number is a 1-based row in the visible subset, anything else is an ID
    /// prefix over the whole store.
    pub fn resolve(&self, reference: &str) -> Result<&Task, TaskGenieError> {
        if let Some(prefix) = reference.trim().strip_prefix(ID_PREFIX) {
            return self.store.resolve(prefix);
        }
        if let Ok(row) = reference.trim().parse::<usize>() {
            let visible = self.visible();
            return row
                .checked_sub(1)
                .and_then(|i| visible.get(i).copied())
                .ok_or_else(|| {
                    TaskGenieError::task_not_found(&format!(
                        "row {row} (visible rows: {})",
                        visible.len()
                    ))
                });
        }
        self.store.resolve(reference)
    }
}

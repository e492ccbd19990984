use tracing::{debug, info};

use crate::error::TaskGenieError;
use crate::models::{CategoryRegistry, NewTask, Task, TaskEdit, TaskId};

/// Ordered in-memory collection of tasks. Insertion order is display order.
#[derive(Debug, Default, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new task. The name is trimmed and must be non-empty; the
    /// category must be registered and is stored under its canonical name.
    pub fn add(&mut self, new: NewTask, registry: &CategoryRegistry) -> Result<&Task, TaskGenieError> {
        let name = validate_name(&new.name)?;
        let category = registry.resolve(&new.category)?.to_string();

        let task = Task {
            id: TaskId::generate(),
            name,
            description: new.description,
            priority: new.priority,
            deadline: new.deadline,
            completed: false,
            category,
        };
        info!(id = %task.id, name = %task.name, "task added");
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Remove the selected task. `None` means nothing is selected.
    pub fn remove(&mut self, selected: Option<&TaskId>) -> Result<Task, TaskGenieError> {
        let id = selected.ok_or_else(TaskGenieError::no_selection)?;
        let pos = self
            .position(id)
            .ok_or_else(|| TaskGenieError::task_not_found(id.as_str()))?;
        let task = self.tasks.remove(pos);
        info!(id = %task.id, name = %task.name, "task removed");
        Ok(task)
    }

    /// Change one attribute of a task in place. On error the task is untouched.
    pub fn update(
        &mut self,
        id: &TaskId,
        edit: TaskEdit,
        registry: &CategoryRegistry,
    ) -> Result<&Task, TaskGenieError> {
        let pos = self
            .position(id)
            .ok_or_else(|| TaskGenieError::task_not_found(id.as_str()))?;

        // Validate before touching the record
        let edit = match edit {
            TaskEdit::Name(name) => TaskEdit::Name(validate_name(&name)?),
            TaskEdit::Category(name) => TaskEdit::Category(registry.resolve(&name)?.to_string()),
            other => other,
        };

        let field = edit.field();
        let task = &mut self.tasks[pos];
        match edit {
            TaskEdit::Name(v) => task.name = v,
            TaskEdit::Description(v) => task.description = v,
            TaskEdit::Priority(v) => task.priority = v,
            TaskEdit::Deadline(v) => task.deadline = v,
            TaskEdit::Category(v) => task.category = v,
            TaskEdit::Completed(v) => task.completed = v,
        }
        info!(id = %task.id, field = field.as_str(), "task updated");
        Ok(&self.tasks[pos])
    }

    /// Resolve a task by full ID or unique ID prefix (case-insensitive).
    pub fn resolve(&self, reference: &str) -> Result<&Task, TaskGenieError> {
        let needle = reference.trim().to_uppercase();
        if needle.is_empty() {
            return Err(TaskGenieError::task_not_found(reference));
        }

        // Exact ID match first
        if let Some(task) = self.tasks.iter().find(|t| t.id.as_str() == needle) {
            return Ok(task);
        }

        let matches: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.id.as_str().starts_with(&needle))
            .collect();
        debug!(reference, candidates = matches.len(), "resolving task reference");

        match matches.as_slice() {
            [] => Err(TaskGenieError::task_not_found(reference)),
            [task] => Ok(*task),
            _ => {
                let candidates: Vec<String> =
                    matches.iter().map(|t| format!("{} ({})", t.name, t.id)).collect();
                Err(TaskGenieError::ambiguous_ref(reference, &candidates))
            }
        }
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }
}

fn validate_name(name: &str) -> Result<String, TaskGenieError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TaskGenieError::empty_name());
    }
    Ok(trimmed.to_string())
}

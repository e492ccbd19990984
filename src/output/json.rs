use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::error::TaskGenieError;
use crate::models::{CategoryRegistry, Task, TaskId};
use crate::query::{CategoryFilter, FilterParams, PriorityFilter, Statistics};
use crate::session::Snapshot;

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &TaskGenieError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn task_json(t: &Task, today: NaiveDate) -> Value {
    json!({
        "id": t.id.as_str(),
        "name": t.name,
        "description": t.description,
        "priority": t.priority.as_str(),
        "deadline": t.deadline.to_string(),
        "completed": t.completed,
        "category": t.category,
        "overdue": t.is_overdue(today)
    })
}

pub fn statistics_json(s: &Statistics) -> Value {
    json!({
        "total": s.total,
        "completed": s.completed,
        "completed_pct": s.completed_pct,
        "overdue": s.overdue,
        "high_priority": s.high_priority
    })
}

pub fn filter_json(f: &FilterParams) -> Value {
    let priority = match f.priority {
        PriorityFilter::All => Value::Null,
        PriorityFilter::Only(p) => json!(p.as_str()),
    };
    let category = match &f.category {
        CategoryFilter::All => Value::Null,
        CategoryFilter::Only(name) => json!(name),
    };
    json!({
        "priority": priority,
        "category": category,
        "show_completed": f.show_completed,
        "overdue_only": f.overdue_only
    })
}

pub fn snapshot_json(snap: &Snapshot<'_>, selected: Option<&TaskId>) -> Value {
    let tasks: Vec<_> = snap.tasks.iter().map(|t| task_json(t, snap.today)).collect();
    json!({
        "today": snap.today.to_string(),
        "tasks": tasks,
        "statistics": statistics_json(&snap.statistics),
        "filter": filter_json(snap.filter),
        "selected": selected.map(TaskId::as_str)
    })
}

pub fn categories_json(registry: &CategoryRegistry, default_category: &str) -> Value {
    json!({
        "categories": registry.names(),
        "default": default_category
    })
}

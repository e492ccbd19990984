use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Priority, Task};

/// Counts over the full store. Recomputed from scratch on every change.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub completed: usize,
    pub completed_pct: usize,
    pub overdue: usize,
    pub high_priority: usize,
}

impl Statistics {
    pub fn compute<'a, I>(tasks: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut stats = tasks.into_iter().fold(Self::default(), |mut s, t| {
            s.total += 1;
            if t.completed {
                s.completed += 1;
            }
            if t.is_overdue(today) {
                s.overdue += 1;
            }
            if t.priority == Priority::High {
                s.high_priority += 1;
            }
            s
        });
        // Integer division, truncating
        stats.completed_pct = if stats.total > 0 {
            stats.completed * 100 / stats.total
        } else {
            0
        };
        stats
    }
}

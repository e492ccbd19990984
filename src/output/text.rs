//! Terminal rendering for the interactive session.

use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{CategoryRegistry, Priority, Task, TaskId};
use crate::query::{FilterParams, Statistics};
use crate::session::Snapshot;

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

pub fn priority_colored(priority: Priority) -> String {
    match priority {
        Priority::High => priority.label().red().bold().to_string(),
        Priority::Medium => priority.label().yellow().to_string(),
        Priority::Low => priority.label().green().to_string(),
    }
}

fn deadline_cell(deadline: NaiveDate, today: NaiveDate) -> Cell {
    let cell = Cell::new(deadline.to_string());
    if deadline < today {
        cell.fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        cell
    }
}

pub fn task_table(tasks: &[&Task], today: NaiveDate, selected: Option<&TaskId>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Done").fg(Color::Cyan),
        Cell::new("Task Name").fg(Color::Cyan),
        Cell::new("Description").fg(Color::Cyan),
        Cell::new("Priority").fg(Color::Cyan),
        Cell::new("Deadline").fg(Color::Cyan),
        Cell::new("Category").fg(Color::Cyan),
        Cell::new("ID").fg(Color::Cyan),
    ]);

    for (i, t) in tasks.iter().enumerate() {
        let marker = if selected == Some(&t.id) { ">" } else { "" };
        let mut priority = Cell::new(t.priority.label()).fg(priority_color(t.priority));
        if t.priority == Priority::High {
            priority = priority.add_attribute(Attribute::Bold);
        }

        table.add_row(vec![
            Cell::new(format!("{marker}{}", i + 1)),
            Cell::new(if t.completed { "[x]" } else { "[ ]" }),
            Cell::new(&t.name),
            Cell::new(&t.description),
            priority,
            deadline_cell(t.deadline, today),
            Cell::new(&t.category),
            Cell::new(t.id.short()).fg(Color::DarkGrey),
        ]);
    }

    table
}

pub fn statistics_line(s: &Statistics) -> String {
    format!(
        "Total: {} | Completed: {} ({}%) | Overdue: {} | High Priority: {}",
        s.total, s.completed, s.completed_pct, s.overdue, s.high_priority
    )
}

pub fn filter_line(f: &FilterParams) -> String {
    format!(
        "Filters: {} | {} | show completed: {} | overdue only: {}",
        f.priority,
        f.category,
        yes_no(f.show_completed),
        yes_no(f.overdue_only)
    )
}

fn yes_no(v: bool) -> &'static str {
    if v {
        "yes"
    } else {
        "no"
    }
}

pub fn print_snapshot(snap: &Snapshot<'_>, selected: Option<&TaskId>) {
    if !snap.filter.is_default() {
        println!("{}", filter_line(snap.filter).dimmed());
    }
    if snap.tasks.is_empty() {
        println!("No tasks found.");
    } else {
        println!("{}", task_table(&snap.tasks, snap.today, selected));
    }
    print_statistics(&snap.statistics);
}

pub fn print_statistics(s: &Statistics) {
    println!("{}", statistics_line(s));
}

pub fn print_task(t: &Task, today: NaiveDate) {
    println!("Task: {} ({})", t.name.bold(), t.id);
    if !t.description.is_empty() {
        println!("  Description: {}", t.description);
    }
    println!("  Priority: {}", priority_colored(t.priority));
    if t.is_overdue(today) {
        println!("  Deadline: {} {}", t.deadline.to_string().red().bold(), "(overdue)".red());
    } else {
        println!("  Deadline: {}", t.deadline);
    }
    println!("  Category: {}", t.category);
    println!("  Completed: {}", yes_no(t.completed));
}

pub fn print_categories(registry: &CategoryRegistry, default_category: &str) {
    for c in registry.iter() {
        if c.name == default_category {
            println!("  {} (default)", c.name);
        } else {
            println!("  {}", c.name);
        }
    }
}

use std::io::{self, BufRead, IsTerminal, Write};

use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;
use serde_json::json;
use tracing::{debug, info};

use crate::cli::commands::{SessionCommand, SessionLine};
use crate::error::TaskGenieError;
use crate::models::TaskEdit;
use crate::output;
use crate::query::{CategoryFilter, FilterUpdate};
use crate::session::{AddRequest, Session};

const PROMPT: &str = "taskgenie> ";

/// Whether the loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Read commands line by line until end of input or `quit`.
///
/// Rejected commands are reported and the loop continues; only a failure
/// to read input ends it with an error.
pub fn run<R: BufRead>(
    session: &mut Session,
    input: R,
    json_output: bool,
    interactive: bool,
) -> Result<i32, TaskGenieError> {
    let show_prompt = interactive && !json_output;
    if show_prompt {
        println!("Task Genie: type `help` for commands, `quit` to leave.");
        prompt()?;
    }

    for line in input.lines() {
        let line = line?;
        let flow = run_line(session, &line, json_output);
        if flow == Flow::Quit {
            break;
        }
        if show_prompt {
            prompt()?;
        }
    }
    info!(tasks = session.store().len(), "session ended");
    Ok(0)
}

/// Run a session against stdin, prompting only when it is a terminal.
pub fn run_stdin(session: &mut Session, json_output: bool) -> Result<i32, TaskGenieError> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    run(session, stdin.lock(), json_output, interactive)
}

fn prompt() -> Result<(), TaskGenieError> {
    let mut stdout = io::stdout();
    write!(stdout, "{PROMPT}")?;
    stdout.flush()?;
    Ok(())
}

/// Parse and execute one input line, reporting any error.
pub fn run_line(session: &mut Session, line: &str, json_output: bool) -> Flow {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Flow::Continue;
    }
    debug!(line, "command received");

    let Some(args) = shlex::split(line) else {
        report(&TaskGenieError::usage("Unbalanced quotes in command"), json_output);
        return Flow::Continue;
    };

    let parsed = match SessionLine::try_parse_from(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    let help = e.render().to_string();
                    if json_output {
                        emit(json!({ "help": help.trim_end() }));
                    } else {
                        println!("{}", help.trim_end());
                    }
                }
                _ => {
                    let message = e.render().to_string();
                    let message = message
                        .lines()
                        .next()
                        .unwrap_or_default()
                        .trim_start_matches("error: ")
                        .to_string();
                    report(&TaskGenieError::usage(message), json_output);
                }
            }
            return Flow::Continue;
        }
    };

    match execute(session, parsed.command, json_output) {
        Ok(flow) => flow,
        Err(e) => {
            report(&e, json_output);
            Flow::Continue
        }
    }
}

fn report(err: &TaskGenieError, json_output: bool) {
    if json_output {
        println!("{}", output::json::error(err));
    } else {
        eprintln!("{} {}", "Error:".red().bold(), err.message);
    }
}

fn emit(data: serde_json::Value) {
    println!("{}", output::json::success(data));
}

fn execute(
    session: &mut Session,
    cmd: SessionCommand,
    json_output: bool,
) -> Result<Flow, TaskGenieError> {
    match cmd {
        SessionCommand::Add {
            name,
            description,
            priority,
            category,
            deadline,
        } => run_add(
            session,
            AddRequest {
                name,
                description,
                priority,
                deadline,
                category,
            },
            json_output,
        )?,
        SessionCommand::List => run_list(session, json_output),
        SessionCommand::Show { reference } => run_show(session, &reference, json_output)?,
        SessionCommand::Select { reference } => run_select(session, &reference, json_output)?,
        SessionCommand::Unselect => {
            session.clear_selection();
            if json_output {
                emit(json!({ "selected": null }));
            } else {
                println!("Selection cleared.");
            }
        }
        SessionCommand::Delete => run_delete(session, json_output)?,
        SessionCommand::Edit {
            reference,
            field,
            value,
        } => {
            let edit = TaskEdit::parse(field, &value)?;
            run_edit(session, &reference, edit, json_output)?
        }
        SessionCommand::Toggle { reference } => run_toggle(session, &reference, json_output)?,
        SessionCommand::Filter {
            priority,
            category,
            show_completed,
            overdue_only,
            reset,
        } => {
            let update = FilterUpdate {
                priority,
                category: category.as_deref().map(CategoryFilter::parse),
                show_completed,
                overdue_only,
            };
            run_filter(session, update, reset, json_output)?
        }
        SessionCommand::Stats => run_stats(session, json_output),
        SessionCommand::Categories => run_categories(session, json_output),
        SessionCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn run_add(session: &mut Session, req: AddRequest, json_output: bool) -> Result<(), TaskGenieError> {
    let added = session.add(req)?;
    let today = session.today();
    if json_output {
        emit(json!({
            "task": output::json::task_json(&added.task, today),
            "past_deadline": added.past_deadline,
            "statistics": output::json::statistics_json(&session.statistics())
        }));
    } else {
        println!("Added task: {} ({})", added.task.name, added.task.id.short());
        if added.past_deadline {
            println!(
                "{}",
                format!("Note: deadline {} is already past.", added.task.deadline).yellow()
            );
        }
        output::text::print_statistics(&session.statistics());
    }
    Ok(())
}

fn run_list(session: &Session, json_output: bool) {
    let snap = session.snapshot();
    if json_output {
        emit(output::json::snapshot_json(&snap, session.selected_id()));
    } else {
        output::text::print_snapshot(&snap, session.selected_id());
    }
}

fn run_show(session: &Session, reference: &str, json_output: bool) -> Result<(), TaskGenieError> {
    let task = session.resolve(reference)?;
    let today = session.today();
    if json_output {
        emit(json!({
            "task": output::json::task_json(task, today),
            "selected": session.selected_id() == Some(&task.id)
        }));
    } else {
        output::text::print_task(task, today);
    }
    Ok(())
}

fn run_select(session: &mut Session, reference: &str, json_output: bool) -> Result<(), TaskGenieError> {
    let today = session.today();
    let task = session.select(reference)?;
    if json_output {
        emit(json!({ "selected": output::json::task_json(task, today) }));
    } else {
        println!("Selected: {} ({})", task.name, task.id.short());
    }
    Ok(())
}

fn run_delete(session: &mut Session, json_output: bool) -> Result<(), TaskGenieError> {
    let removed = session.remove_selected()?;
    let today = session.today();
    if json_output {
        emit(json!({
            "deleted": output::json::task_json(&removed, today),
            "statistics": output::json::statistics_json(&session.statistics())
        }));
    } else {
        println!("Deleted task: {} ({})", removed.name, removed.id.short());
        output::text::print_statistics(&session.statistics());
    }
    Ok(())
}

fn run_edit(
    session: &mut Session,
    reference: &str,
    edit: TaskEdit,
    json_output: bool,
) -> Result<(), TaskGenieError> {
    let field = edit.field();
    let today = session.today();
    let task = session.update(reference, edit)?.clone();
    if json_output {
        emit(json!({
            "task": output::json::task_json(&task, today),
            "field": field.as_str(),
            "statistics": output::json::statistics_json(&session.statistics())
        }));
    } else {
        println!("Updated {} of {} ({})", field.as_str(), task.name, task.id.short());
        output::text::print_statistics(&session.statistics());
    }
    Ok(())
}

fn run_toggle(session: &mut Session, reference: &str, json_output: bool) -> Result<(), TaskGenieError> {
    let today = session.today();
    let task = session.toggle_completed(reference)?.clone();
    if json_output {
        emit(json!({
            "task": output::json::task_json(&task, today),
            "statistics": output::json::statistics_json(&session.statistics())
        }));
    } else {
        let state = if task.completed { "done" } else { "open" };
        println!("Task {} → {}", task.name, state);
        output::text::print_statistics(&session.statistics());
    }
    Ok(())
}

fn run_filter(
    session: &mut Session,
    update: FilterUpdate,
    reset: bool,
    json_output: bool,
) -> Result<(), TaskGenieError> {
    if reset && update == FilterUpdate::default() {
        session.reset_filter();
    } else if reset {
        session.set_filter(update.over_defaults())?;
    } else {
        session.set_filter(update)?;
    }
    run_list(session, json_output);
    Ok(())
}

fn run_stats(session: &Session, json_output: bool) {
    let stats = session.statistics();
    if json_output {
        emit(json!({ "statistics": output::json::statistics_json(&stats) }));
    } else {
        output::text::print_statistics(&stats);
    }
}

fn run_categories(session: &Session, json_output: bool) {
    let registry = session.registry();
    let default_category = &session.defaults().category;
    if json_output {
        emit(output::json::categories_json(registry, default_category));
    } else {
        output::text::print_categories(registry, default_category);
    }
}

#[allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

const TODAY: &str = "2024-06-01";

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        Self { dir }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskgenie").expect("binary");
        cmd.current_dir(self.dir.path());
        cmd.env_remove("TASKGENIE_CONFIG");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Run a script in JSON mode and return one document per output line.
    fn run_json(&self, script: &str, extra: &[&str]) -> Vec<Value> {
        let output = self
            .cmd()
            .args(["--json", "--today", TODAY])
            .args(extra)
            .write_stdin(script)
            .output()
            .expect("run");
        assert!(output.status.success(), "exit status: {:?}", output.status);
        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .lines()
            .map(|l| {
                serde_json::from_str(l)
                    .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nline: {l}"))
            })
            .collect()
    }

    fn last(&self, script: &str) -> Value {
        self.run_json(script, &[])
            .pop()
            .expect("at least one output line")
    }

    fn write_file(&self, filename: &str, content: &str) -> String {
        let p = self.dir.path().join(filename);
        fs::write(&p, content).expect("write file");
        p.to_string_lossy().into_owned()
    }
}

fn names(list: &Value) -> Vec<String> {
    list["data"]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect()
}

fn sample_script() -> &'static str {
    "\
add A --deadline 2024-05-01 -p high
add B --deadline 2024-07-01 -c personal
add C --deadline 2024-05-01 -p low -c study
toggle 3
"
}

// ─── 1. add ────────────────────────────────────────────────────────

#[test]
fn test_add_uses_defaults() {
    let env = TestEnv::new();
    let v = env.last("add \"Write report\"");
    assert_eq!(v["success"], true);
    let task = &v["data"]["task"];
    assert_eq!(task["name"], "Write report");
    assert_eq!(task["description"], "");
    assert_eq!(task["priority"], "medium");
    assert_eq!(task["category"], "Work");
    assert_eq!(task["deadline"], TODAY);
    assert_eq!(task["completed"], false);
    assert_eq!(v["data"]["past_deadline"], false);
    assert_eq!(v["data"]["statistics"]["total"], 1);
}

#[test]
fn test_add_all_fields() {
    let env = TestEnv::new();
    let v = env.last(
        "add '  Gym  ' --description 'leg day' --priority HIGH --category health --deadline 2024-06-10",
    );
    let task = &v["data"]["task"];
    assert_eq!(task["name"], "Gym");
    assert_eq!(task["description"], "leg day");
    assert_eq!(task["priority"], "high");
    assert_eq!(task["category"], "Health");
    assert_eq!(task["deadline"], "2024-06-10");
    assert_eq!(v["data"]["statistics"]["high_priority"], 1);
}

#[test]
fn test_add_empty_name_is_validation_error() {
    let env = TestEnv::new();
    let out = env.run_json("add '   '\nstats", &[]);
    assert_eq!(out[0]["success"], false);
    assert_eq!(out[0]["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(out[0]["error"]["message"], "Task name cannot be empty!");
    assert_eq!(out[1]["data"]["statistics"]["total"], 0);
}

#[test]
fn test_add_unknown_category_rejected() {
    let env = TestEnv::new();
    let out = env.run_json("add x -c Hobby\nstats", &[]);
    assert_eq!(out[0]["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(out[1]["data"]["statistics"]["total"], 0);
}

#[test]
fn test_add_past_deadline_accepted_with_flag() {
    let env = TestEnv::new();
    let v = env.last("add late --deadline 2024-01-01");
    assert_eq!(v["success"], true);
    assert_eq!(v["data"]["past_deadline"], true);
    assert_eq!(v["data"]["task"]["overdue"], true);
}

#[test]
fn test_bad_date_is_usage_error() {
    let env = TestEnv::new();
    let v = env.last("add x --deadline 2024-13-01");
    assert_eq!(v["success"], false);
    assert_eq!(v["error"]["code"], "USAGE_ERROR");
}

// ─── 2. list / filters ─────────────────────────────────────────────

#[test]
fn test_list_keeps_insertion_order() {
    let env = TestEnv::new();
    let v = env.last(&format!("{}list", sample_script()));
    assert_eq!(names(&v), vec!["A", "B", "C"]);
    assert_eq!(v["data"]["filter"]["show_completed"], true);
    assert_eq!(v["data"]["filter"]["priority"], Value::Null);
    assert_eq!(v["data"]["today"], TODAY);
}

#[test]
fn test_overdue_only_filter() {
    let env = TestEnv::new();
    let v = env.last(&format!("{}filter --overdue-only true", sample_script()));
    assert_eq!(names(&v), vec!["A"]);
    assert_eq!(v["data"]["filter"]["overdue_only"], true);
}

#[test]
fn test_hide_and_restore_completed() {
    let env = TestEnv::new();
    let out = env.run_json(
        &format!(
            "{}filter --show-completed false\nfilter --show-completed true",
            sample_script()
        ),
        &[],
    );
    let hidden = &out[out.len() - 2];
    let restored = &out[out.len() - 1];
    assert_eq!(names(hidden), vec!["A", "B"]);
    assert_eq!(names(restored), vec!["A", "B", "C"]);
    let c = &restored["data"]["tasks"][2];
    assert_eq!(c["completed"], true);
    assert_eq!(c["priority"], "low");
    assert_eq!(c["category"], "Study");
}

#[test]
fn test_priority_and_category_filters_combine() {
    let env = TestEnv::new();
    let out = env.run_json(
        &format!(
            "{}filter --priority high\nfilter --category personal\nfilter --priority all",
            sample_script()
        ),
        &[],
    );
    let n = out.len();
    assert_eq!(names(&out[n - 3]), vec!["A"]);
    assert!(names(&out[n - 2]).is_empty());
    assert_eq!(names(&out[n - 1]), vec!["B"]);
    assert_eq!(out[n - 1]["data"]["filter"]["category"], "Personal");
}

#[test]
fn test_filter_unknown_category_keeps_filter() {
    let env = TestEnv::new();
    let out = env.run_json(
        &format!("{}filter --category study\nfilter --category Hobby\nlist", sample_script()),
        &[],
    );
    let n = out.len();
    assert_eq!(out[n - 2]["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(out[n - 1]["data"]["filter"]["category"], "Study");
    assert_eq!(names(&out[n - 1]), vec!["C"]);
}

#[test]
fn test_filter_reset() {
    let env = TestEnv::new();
    let v = env.last(&format!(
        "{}filter --overdue-only true --priority low\nfilter --reset",
        sample_script()
    ));
    assert_eq!(names(&v), vec!["A", "B", "C"]);
    assert_eq!(v["data"]["filter"]["overdue_only"], false);
}

#[test]
fn test_statistics_ignore_filters() {
    let env = TestEnv::new();
    let v = env.last(&format!("{}filter --overdue-only true", sample_script()));
    let stats = &v["data"]["statistics"];
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["completed"], 1);
    assert_eq!(stats["completed_pct"], 33);
    assert_eq!(stats["overdue"], 1);
    assert_eq!(stats["high_priority"], 1);
}

#[test]
fn test_statistics_two_of_five() {
    let env = TestEnv::new();
    let script = "\
add a --deadline 2024-05-01
add b --deadline 2024-05-01
add c --deadline 2024-05-01
add d --deadline 2024-07-01
add e --deadline 2024-07-01
toggle 1
toggle 4
stats
";
    let v = env.last(script);
    let stats = &v["data"]["statistics"];
    assert_eq!(stats["total"], 5);
    assert_eq!(stats["completed"], 2);
    assert_eq!(stats["completed_pct"], 40);
    assert_eq!(stats["overdue"], 2);
}

// ─── 3. select / delete ────────────────────────────────────────────

#[test]
fn test_delete_without_selection() {
    let env = TestEnv::new();
    let out = env.run_json(&format!("{}delete\nstats", sample_script()), &[]);
    let n = out.len();
    assert_eq!(out[n - 2]["error"]["code"], "SELECTION_ERROR");
    assert_eq!(out[n - 2]["error"]["message"], "No task selected!");
    assert_eq!(out[n - 1]["data"]["statistics"]["total"], 3);
}

#[test]
fn test_select_then_delete() {
    let env = TestEnv::new();
    let out = env.run_json(
        &format!("{}select 2\ndelete\ndelete\nlist", sample_script()),
        &[],
    );
    let n = out.len();
    assert_eq!(out[n - 4]["data"]["selected"]["name"], "B");
    assert_eq!(out[n - 3]["data"]["deleted"]["name"], "B");
    assert_eq!(out[n - 3]["data"]["statistics"]["total"], 2);
    // Selection is cleared after a delete
    assert_eq!(out[n - 2]["error"]["code"], "SELECTION_ERROR");
    assert_eq!(names(&out[n - 1]), vec!["A", "C"]);
    assert_eq!(out[n - 1]["data"]["selected"], Value::Null);
}

#[test]
fn test_select_counts_visible_rows() {
    let env = TestEnv::new();
    let v = env.last("add first -p low\nadd second\nfilter --priority medium\nselect 1");
    assert_eq!(v["success"], true);
    assert_eq!(v["data"]["selected"]["name"], "second");
}

#[test]
fn test_select_row_out_of_range() {
    let env = TestEnv::new();
    let v = env.last("add only\nselect 5");
    assert_eq!(v["success"], false);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

#[test]
fn test_filter_hiding_selection_blocks_delete() {
    let env = TestEnv::new();
    let out = env.run_json(
        &format!(
            "{}select 3\nfilter --show-completed false\ndelete\nstats",
            sample_script()
        ),
        &[],
    );
    let n = out.len();
    assert_eq!(out[n - 4]["data"]["selected"]["name"], "C");
    assert_eq!(names(&out[n - 3]), vec!["A", "B"]);
    assert_eq!(out[n - 3]["data"]["selected"], Value::Null);
    assert_eq!(out[n - 2]["error"]["code"], "SELECTION_ERROR");
    assert_eq!(out[n - 1]["data"]["statistics"]["total"], 3);
}

#[test]
fn test_toggle_hiding_selection_blocks_delete() {
    let env = TestEnv::new();
    let out = env.run_json(
        "add a\nadd b\nfilter --show-completed false\nselect 1\ntoggle 1\ndelete\nlist",
        &[],
    );
    let n = out.len();
    assert_eq!(out[n - 2]["error"]["code"], "SELECTION_ERROR");
    assert_eq!(out[n - 1]["data"]["statistics"]["total"], 2);
    assert_eq!(names(&out[n - 1]), vec!["b"]);
}

#[test]
fn test_id_marker_forces_prefix_lookup() {
    let env = TestEnv::new();
    let out = env.run_json("add only\nlist", &[]);
    let id = out[1]["data"]["tasks"][0]["id"].as_str().unwrap().to_string();
    // With the row hidden, digits alone name a missing row while the
    // marker still finds the task by ID prefix
    let script = "add only -p low\nfilter --priority high\n";
    let v = env.last(&format!("{script}show {}", &id[..2]));
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
    let v = env.last(&format!("{script}show id:{}", &id[..2]));
    assert_eq!(v["data"]["task"]["name"], "only");
    let v = env.last(&format!("{script}select id:{}", &id[..2]));
    assert_eq!(v["error"]["code"], "SELECTION_ERROR");
}

// ─── 4. edit / toggle ──────────────────────────────────────────────

#[test]
fn test_edit_empty_name_keeps_original() {
    let env = TestEnv::new();
    let out = env.run_json("add original -d keep\nedit 1 name ''\nshow 1", &[]);
    assert_eq!(out[1]["error"]["code"], "VALIDATION_ERROR");
    let task = &out[2]["data"]["task"];
    assert_eq!(task["name"], "original");
    assert_eq!(task["description"], "keep");
}

#[test]
fn test_edit_name_leaves_other_fields() {
    let env = TestEnv::new();
    let out = env.run_json(
        "add original -d keep -p low -c finance --deadline 2024-06-20\nedit 1 name renamed",
        &[],
    );
    let before = &out[0]["data"]["task"];
    let after = &out[1]["data"]["task"];
    assert_eq!(after["name"], "renamed");
    assert_eq!(out[1]["data"]["field"], "name");
    for key in ["id", "description", "priority", "deadline", "category", "completed"] {
        assert_eq!(before[key], after[key], "{key} changed");
    }
}

#[test]
fn test_edit_each_field() {
    let env = TestEnv::new();
    let script = "\
add t
edit 1 description 'new desc'
edit 1 priority high
edit 1 deadline 2020-01-01
edit 1 category Study
edit 1 completed true
show 1
";
    let v = env.last(script);
    let task = &v["data"]["task"];
    assert_eq!(task["description"], "new desc");
    assert_eq!(task["priority"], "high");
    assert_eq!(task["deadline"], "2020-01-01");
    assert_eq!(task["category"], "Study");
    assert_eq!(task["completed"], true);
    assert_eq!(task["overdue"], false);
}

#[test]
fn test_edit_invalid_values() {
    let env = TestEnv::new();
    let out = env.run_json(
        "add t\nedit 1 category Hobby\nedit 1 deadline soon\nedit 1 priority urgent\nedit 1 colour red",
        &[],
    );
    assert_eq!(out[1]["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(out[2]["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(out[3]["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(out[4]["error"]["code"], "USAGE_ERROR");
}

#[test]
fn test_toggle_updates_statistics() {
    let env = TestEnv::new();
    let out = env.run_json("add a --deadline 2024-05-01\ntoggle 1\ntoggle 1", &[]);
    assert_eq!(out[0]["data"]["statistics"]["overdue"], 1);
    assert_eq!(out[1]["data"]["task"]["completed"], true);
    assert_eq!(out[1]["data"]["statistics"]["overdue"], 0);
    assert_eq!(out[1]["data"]["statistics"]["completed_pct"], 100);
    assert_eq!(out[2]["data"]["task"]["completed"], false);
}

// ─── 5. config / categories ────────────────────────────────────────

#[test]
fn test_default_categories() {
    let env = TestEnv::new();
    let v = env.last("categories");
    assert_eq!(
        v["data"]["categories"],
        serde_json::json!(["Work", "Personal", "Study", "Health", "Finance"])
    );
    assert_eq!(v["data"]["default"], "Work");
}

#[test]
fn test_custom_config() {
    let env = TestEnv::new();
    let path = env.write_file(
        "taskgenie.json",
        r#"{"categories": ["Home", "Garden"], "default_priority": "low", "default_category": "Garden"}"#,
    );
    let out = env.run_json("categories\nadd weed\nadd x -c Work", &["--config", &path]);
    assert_eq!(out[0]["data"]["categories"], serde_json::json!(["Home", "Garden"]));
    assert_eq!(out[1]["data"]["task"]["category"], "Garden");
    assert_eq!(out[1]["data"]["task"]["priority"], "low");
    assert_eq!(out[2]["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn test_config_from_env() {
    let env = TestEnv::new();
    let path = env.write_file("env.json", r#"{"categories": ["Solo"]}"#);
    let output = env
        .cmd()
        .args(["--json", "--today", TODAY])
        .env("TASKGENIE_CONFIG", &path)
        .write_stdin("categories")
        .output()
        .expect("run");
    let v: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(v["data"]["categories"], serde_json::json!(["Solo"]));
}

#[test]
fn test_invalid_config_fails_startup() {
    let env = TestEnv::new();
    let path = env.write_file("bad.json", r#"{"categories": []}"#);
    let output = env
        .cmd()
        .args(["--json", "--config", &path])
        .write_stdin("list")
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let v: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(v["error"]["code"], "CONFIG_ERROR");
}

// ─── 6. session plumbing ───────────────────────────────────────────

#[test]
fn test_script_file_and_quit() {
    let env = TestEnv::new();
    let path = env.write_file("script.txt", "add one\n# skipped\n\nquit\nadd two\n");
    let output = env
        .cmd()
        .args(["--json", "--today", TODAY, "--script", &path])
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1);
}

#[test]
fn test_missing_script_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["--script", "does-not-exist.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot open script"));
}

#[test]
fn test_unknown_command_continues() {
    let env = TestEnv::new();
    let out = env.run_json("frobnicate\nadd ok\nstats", &[]);
    assert_eq!(out[0]["error"]["code"], "USAGE_ERROR");
    assert_eq!(out[2]["data"]["statistics"]["total"], 1);
}

#[test]
fn test_text_output() {
    let env = TestEnv::new();
    env.cmd()
        .args(["--today", TODAY])
        .write_stdin("add 'Pay rent' -p high -c finance --deadline 2024-05-30\nlist\ndelete\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task: Pay rent"))
        .stdout(predicate::str::contains("Task Name"))
        .stdout(predicate::str::contains("Finance"))
        .stdout(predicate::str::contains(
            "Total: 1 | Completed: 0 (0%) | Overdue: 1 | High Priority: 1",
        ))
        .stderr(predicate::str::contains("No task selected!"));
}

#[test]
fn test_text_filter_line_shown_when_active() {
    let env = TestEnv::new();
    env.cmd()
        .args(["--today", TODAY])
        .write_stdin("add a\nfilter --show-completed false\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Filters: All Priorities | All Categories | show completed: no | overdue only: no",
        ));
}

#[test]
fn test_help_in_json_mode_is_one_document() {
    let env = TestEnv::new();
    let out = env.run_json("help\nadd x", &[]);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0]["success"], true);
    let help = out[0]["data"]["help"].as_str().unwrap();
    assert!(help.contains("filter"));
    assert_eq!(out[1]["data"]["task"]["name"], "x");
}

#[test]
fn test_help_lists_commands() {
    let env = TestEnv::new();
    env.cmd()
        .write_stdin("help\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("filter"));
}

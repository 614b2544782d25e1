//! Basic CLI E2E tests.
//!
//! Each test points the binary at its own temporary data directory.

mod common;

use common::{parse_json, run_cli, run_cli_success, run_cli_with_stdin};

fn add_task(dir: &std::path::Path, title: &str, subject: &str) -> String {
    let out = run_cli_success(
        dir,
        &["task", "add", title, "--subject", subject, "--due", "2024-05-10"],
    );
    parse_json(&out)["id"].as_str().unwrap().to_string()
}

#[test]
fn test_task_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    add_task(dir.path(), "Problem set", "Math");

    let tasks = parse_json(&run_cli_success(dir.path(), &["task", "list"]));
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["subject"], "Math");
    assert_eq!(tasks[0]["dueDate"], "2024-05-10");
    assert_eq!(tasks[0]["priority"], "medium");
}

#[test]
fn test_task_add_rejects_bad_priority() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(
        dir.path(),
        &["task", "add", "X", "--subject", "Math", "--priority", "urgent"],
    );
    assert_ne!(code, 0);
}

#[test]
fn test_task_complete_hides_from_active_list() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_task(dir.path(), "Essay", "History");
    run_cli_success(dir.path(), &["task", "complete", &id]);

    let active = parse_json(&run_cli_success(dir.path(), &["task", "list"]));
    assert!(active.as_array().unwrap().is_empty());
    let all = parse_json(&run_cli_success(dir.path(), &["task", "list", "--all"]));
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[test]
fn test_full_progress_update_completes_task() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_task(dir.path(), "Lab report", "Chemistry");
    run_cli_success(
        dir.path(),
        &["update", "add", &id, "--notes", "done", "--progress", "100"],
    );
    let task = parse_json(&run_cli_success(dir.path(), &["task", "show", &id]));
    assert_eq!(task["completed"], true);
}

#[test]
fn test_task_delete_unknown_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["task", "delete", "missing"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_timer_records_session_for_selected_task() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_task(dir.path(), "Flashcards", "Math");

    let (stdout, stderr, code) = run_cli_with_stdin(
        dir.path(),
        &[
            "timer", "run", "--focus", "1", "--break", "1", "--task", &id, "--autostart",
            "--cycles", "1", "--tick-ms", "1",
        ],
        "",
    );
    assert_eq!(code, 0, "timer run failed: {stderr}");
    assert!(stdout
        .lines()
        .any(|l| parse_json(l)["type"] == "PhaseCompleted"));

    let sessions = parse_json(&run_cli_success(dir.path(), &["session", "list"]));
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["subject"], "Math");
    assert_eq!(sessions[0]["duration"], 1);

    let stats = parse_json(&run_cli_success(dir.path(), &["stats"]));
    assert_eq!(stats["pomodoros"], 1);
    assert_eq!(stats["streakDays"], 1);
}

#[test]
fn test_timer_without_task_records_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli_with_stdin(
        dir.path(),
        &[
            "timer", "run", "--focus", "1", "--autostart", "--cycles", "1", "--tick-ms", "1",
        ],
        "",
    );
    assert_eq!(code, 0, "timer run failed: {stderr}");
    let sessions = parse_json(&run_cli_success(dir.path(), &["session", "list"]));
    assert!(sessions.as_array().unwrap().is_empty());
}

#[test]
fn test_timer_runs_requested_cycles_with_closed_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_task(dir.path(), "Flashcards", "Math");

    let (stdout, stderr, code) = run_cli_with_stdin(
        dir.path(),
        &[
            "timer", "run", "--focus", "1", "--break", "1", "--task", &id, "--autostart",
            "--cycles", "2", "--tick-ms", "1",
        ],
        "",
    );
    assert_eq!(code, 0, "timer run failed: {stderr}");

    let completions: Vec<_> = stdout
        .lines()
        .map(parse_json)
        .filter(|e| e["type"] == "PhaseCompleted")
        .collect();
    assert_eq!(completions.len(), 3);
    assert_eq!(completions[2]["completed"], "focus");
    assert_eq!(completions[2]["completed_focus"], 2);

    let sessions = parse_json(&run_cli_success(dir.path(), &["session", "list"]));
    assert_eq!(sessions.as_array().unwrap().len(), 2);
}

#[test]
fn test_timer_exits_when_idle_and_stdin_closed() {
    let dir = tempfile::tempdir().unwrap();
    // Never started, so nothing can happen once stdin is gone.
    let (_, stderr, code) = run_cli_with_stdin(dir.path(), &["timer", "run", "--cycles", "2"], "");
    assert_eq!(code, 0, "timer run failed: {stderr}");
}

#[cfg(unix)]
#[test]
fn test_timer_exits_cleanly_on_interrupt() {
    use std::io::Read;
    use std::process::{Command, Stdio};
    use std::time::{Duration, Instant};

    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_planora"))
        .args(["timer", "run", "--autostart"])
        .env("PLANORA_DATA_DIR", dir.path())
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    // Held open so only the signal can end the run.
    let _stdin = child.stdin.take();

    std::thread::sleep(Duration::from_millis(1000));
    Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            panic!("timer did not exit after SIGINT");
        }
        std::thread::sleep(Duration::from_millis(50));
    };
    assert_eq!(status.code(), Some(0));

    let mut stdout = String::new();
    child.stdout.take().unwrap().read_to_string(&mut stdout).unwrap();
    assert!(stdout.lines().any(|l| parse_json(l)["type"] == "TimerStarted"));
}

#[test]
fn test_timer_quits_on_command() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli_with_stdin(dir.path(), &["timer", "run"], "q\n");
    assert_eq!(code, 0);
}

#[test]
fn test_timer_rejects_unknown_task() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) =
        run_cli_with_stdin(dir.path(), &["timer", "run", "--task", "missing"], "q\n");
    assert_ne!(code, 0);
    assert!(stderr.contains("no active task"));
}

#[test]
fn test_calendar_shows_due_tasks() {
    let dir = tempfile::tempdir().unwrap();
    add_task(dir.path(), "Problem set", "Math");
    let view = parse_json(&run_cli_success(dir.path(), &["calendar", "2024-05-10"]));
    assert_eq!(view["tasksDue"].as_array().unwrap().len(), 1);
    assert_eq!(view["minutesStudied"], 0);
}

#[test]
fn test_calendar_month_overview() {
    let dir = tempfile::tempdir().unwrap();
    add_task(dir.path(), "Problem set", "Math");
    let days = parse_json(&run_cli_success(dir.path(), &["calendar", "--month", "2024-05"]));
    let days = days.as_array().unwrap();
    assert_eq!(days.len(), 31);
    assert_eq!(days[9]["date"], "2024-05-10");
    assert_eq!(days[9]["tasksDue"], 1);
    assert_eq!(days[0]["tasksDue"], 0);

    let (_, _, code) = run_cli(dir.path(), &["calendar", "--month", "2024-13"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["config", "set", "timer.focus_duration", "45"]);
    let out = run_cli_success(dir.path(), &["config", "get", "timer.focus_duration"]);
    assert_eq!(out.trim(), "45");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "timer.nope", "1"]);
    assert_ne!(code, 0);
}

//! Integration tests for the study workflow.
//!
//! Drives the session timer against a real SQLite store and checks what the
//! planner and analytics see afterwards.

use chrono::NaiveDate;
use planora_core::study::SESSIONS;
use planora_core::{
    CollectionSink, Database, Event, FixedClock, KeyValueStore, NewUpdate, Phase, Planner,
    SessionTimer, StudyAnalyzer, Task, TimerSettings,
};

fn at(day: u32, hour: u32) -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap(),
    )
}

fn run_phase(timer: &mut SessionTimer) -> Event {
    timer.start();
    loop {
        if let Some(event) = timer.tick() {
            return event;
        }
    }
}

#[test]
fn test_focus_sessions_flow_into_analytics() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planora.db");

    let planner = Planner::new(Database::open_at(&path).unwrap());
    let task = planner
        .add_task(Task::new(
            "Past papers",
            "Math",
            NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
        ))
        .unwrap();

    for (day, hour) in [(2, 9), (3, 9), (3, 14), (4, 9)] {
        let mut timer = SessionTimer::new(TimerSettings::new(1, 1).unwrap())
            .with_sink(CollectionSink::new(Database::open_at(&path).unwrap()))
            .with_clock(at(day, hour));
        timer.select_task(task.clone());
        match run_phase(&mut timer) {
            Event::PhaseCompleted {
                completed: Phase::Focus,
                session: Some(session),
                ..
            } => assert_eq!(session.subject, "Math"),
            other => panic!("Expected focus completion, got {other:?}"),
        }
    }

    let analyzer = StudyAnalyzer::load(planner.store());
    let summary = analyzer.summary();
    assert_eq!(summary.pomodoros, 4);
    assert_eq!(summary.total_minutes, 4);
    assert_eq!(summary.streak_days, 3);
    assert_eq!(summary.most_productive_hour, Some(9));
    assert_eq!(
        planner
            .day(NaiveDate::from_ymd_opt(2024, 5, 3).unwrap())
            .minutes_studied,
        2
    );
}

#[test]
fn test_unselected_focus_counts_without_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planora.db");
    let db = Database::open_at(&path).unwrap();
    let mut timer = SessionTimer::new(TimerSettings::default())
        .with_sink(CollectionSink::new(Database::open_at(&path).unwrap()));
    let event = run_phase(&mut timer);

    assert!(matches!(
        event,
        Event::PhaseCompleted {
            completed: Phase::Focus,
            session: None,
            completed_focus: 1,
            ..
        }
    ));
    let state = timer.state();
    assert!(state.is_break);
    assert_eq!(state.remaining_secs, 300);
    assert!(SESSIONS.records(&db).is_empty());
}

#[test]
fn test_corrupt_sessions_are_replaced_on_next_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planora.db");
    let db = Database::open_at(&path).unwrap();
    db.set("studySessions", "not json at all").unwrap();

    let mut timer = SessionTimer::new(TimerSettings::new(1, 1).unwrap())
        .with_sink(CollectionSink::new(Database::open_at(&path).unwrap()))
        .with_clock(at(2, 10));
    timer.select_task(Task::new(
        "Lab report",
        "Chemistry",
        NaiveDate::from_ymd_opt(2024, 5, 9).unwrap(),
    ));
    run_phase(&mut timer);

    let sessions = SESSIONS.records(&db);
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].subject, "Chemistry");
}

#[test]
fn test_progress_update_completes_task_and_hides_it_from_timer() {
    let db = Database::open_memory().unwrap();
    let planner = Planner::new(&db);
    let task = planner
        .add_task(Task::new(
            "Essay",
            "History",
            NaiveDate::from_ymd_opt(2024, 5, 9).unwrap(),
        ))
        .unwrap();
    assert_eq!(planner.active_tasks().len(), 1);

    planner
        .record_update(NewUpdate {
            task_id: task.id.clone(),
            date: NaiveDate::from_ymd_opt(2024, 5, 8).unwrap(),
            notes: "submitted".into(),
            progress: 100,
            time_spent: 45,
        })
        .unwrap();

    assert!(planner.active_tasks().is_empty());
    let analyzer = StudyAnalyzer::load(&db);
    assert_eq!(analyzer.task_completion().completed, 1);
}

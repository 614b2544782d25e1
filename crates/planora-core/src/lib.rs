//! # Planora Core Library
//!
//! Core logic for the Planora study suite. Everything is usable from the
//! standalone `planora` CLI; a GUI would be a thin layer over the same crate.
//!
//! ## Architecture
//!
//! - **Session timer**: a tick-driven focus/break state machine. A
//!   [`TimerContext`] actor owns it and feeds it one tick per second.
//! - **Storage**: a string key-value store (SQLite `kv` table) holding each
//!   collection as a JSON array, plus TOML configuration.
//! - **Study**: tasks, focus sessions and progress notes, with the planner
//!   operations over them.
//! - **Analytics**: daily totals, streaks and productive hours.
//!
//! ## Key Components
//!
//! - [`SessionTimer`]: Core timer state machine
//! - [`Database`]: Key-value persistence
//! - [`Planner`]: Task and progress bookkeeping
//! - [`Config`]: Application configuration management

pub mod analytics;
pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod sink;
pub mod storage;
pub mod study;
pub mod timer;

pub use analytics::{StudyAnalyzer, StudySummary, TaskCompletion};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::Event;
pub use notify::{LogNotifier, Notifier, NullNotifier};
pub use sink::{spawn_session_writer, ChannelSink, CollectionSink, DiscardSink, SessionSink};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use study::{DaySummary, DayView, NewUpdate, Planner, Priority, StudySession, Task, TaskUpdate};
pub use timer::{Phase, SessionTimer, TimerCommand, TimerContext, TimerSettings, TimerState};

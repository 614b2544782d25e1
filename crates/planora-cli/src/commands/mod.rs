pub mod calendar;
pub mod config;
pub mod session;
pub mod stats;
pub mod task;
pub mod timer;
pub mod update;

mod context;
mod engine;
mod settings;

pub use context::{TimerCommand, TimerContext, TICK_PERIOD};
pub use engine::{SessionTimer, TimerState};
pub use settings::{format_clock, parse_minutes, Phase, TimerSettings};

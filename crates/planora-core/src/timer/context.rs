//! Actor that owns a [`SessionTimer`] and its ticker.
//!
//! Commands and ticks arrive on one task, so the timer is only ever touched
//! from one place. While the timer runs, an interval fires `tick()` once per
//! period; the interval restarts on every `start()`, so a countdown resumed
//! after a pause waits a full period before its next tick.
//!
//! Dropping the context aborts the task, which drops the ticker with it.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use super::engine::{SessionTimer, TimerState};
use crate::error::CoreError;
use crate::events::Event;
use crate::study::Task;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub enum TimerCommand {
    Start,
    Pause,
    Reset,
    SetFocusDuration(u32),
    SetBreakDuration(u32),
    SelectTask(Task),
    ClearTask,
    /// Reply with the current state.
    Snapshot(oneshot::Sender<TimerState>),
    /// Publish a `StateSnapshot` event.
    Announce,
    Shutdown,
}

pub struct TimerContext {
    commands: mpsc::UnboundedSender<TimerCommand>,
    task: Option<JoinHandle<SessionTimer>>,
}

impl TimerContext {
    /// Spawn the actor with a one-second tick. Events go to `events`; a
    /// closed receiver is ignored.
    pub fn spawn(timer: SessionTimer, events: mpsc::UnboundedSender<Event>) -> Self {
        Self::spawn_with_period(timer, events, TICK_PERIOD)
    }

    pub fn spawn_with_period(
        timer: SessionTimer,
        events: mpsc::UnboundedSender<Event>,
        period: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(timer, rx, events, period));
        Self {
            commands: tx,
            task: Some(task),
        }
    }

    /// Queue a command.
    ///
    /// # Errors
    /// Fails once the actor has stopped.
    pub fn send(&self, command: TimerCommand) -> Result<(), CoreError> {
        self.commands
            .send(command)
            .map_err(|_| CoreError::Custom("session timer has stopped".into()))
    }

    pub fn start(&self) -> Result<(), CoreError> {
        self.send(TimerCommand::Start)
    }

    pub fn pause(&self) -> Result<(), CoreError> {
        self.send(TimerCommand::Pause)
    }

    pub fn reset(&self) -> Result<(), CoreError> {
        self.send(TimerCommand::Reset)
    }

    /// Current state, or `None` if the actor has stopped.
    pub async fn state(&self) -> Option<TimerState> {
        let (tx, rx) = oneshot::channel();
        self.send(TimerCommand::Snapshot(tx)).ok()?;
        rx.await.ok()
    }

    /// Stop ticking and hand back the timer, paused.
    pub async fn shutdown(mut self) -> Option<SessionTimer> {
        let task = self.task.take()?;
        let _ = self.commands.send(TimerCommand::Shutdown);
        task.await.ok()
    }
}

impl Drop for TimerContext {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

fn ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn run(
    mut timer: SessionTimer,
    mut commands: mpsc::UnboundedReceiver<TimerCommand>,
    events: mpsc::UnboundedSender<Event>,
    period: Duration,
) -> SessionTimer {
    let publish = |event: Option<Event>| {
        if let Some(event) = event {
            let _ = events.send(event);
        }
    };
    let mut ticker = ticker(period);
    tracing::debug!(?period, "session timer started");

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                match command {
                    TimerCommand::Start => {
                        let event = timer.start();
                        if event.is_some() {
                            ticker.reset();
                        }
                        publish(event);
                    }
                    TimerCommand::Pause => publish(timer.pause()),
                    TimerCommand::Reset => publish(timer.reset()),
                    TimerCommand::SetFocusDuration(minutes) => publish(timer.set_focus_duration(minutes)),
                    TimerCommand::SetBreakDuration(minutes) => publish(timer.set_break_duration(minutes)),
                    TimerCommand::SelectTask(task) => publish(timer.select_task(task)),
                    TimerCommand::ClearTask => publish(timer.clear_task()),
                    TimerCommand::Snapshot(reply) => {
                        let _ = reply.send(timer.state());
                    }
                    TimerCommand::Announce => publish(Some(timer.snapshot())),
                    TimerCommand::Shutdown => break,
                }
            }
            _ = ticker.tick(), if timer.is_running() => {
                publish(timer.tick());
            }
        }
    }

    timer.pause();
    tracing::debug!("session timer stopped");
    timer
}

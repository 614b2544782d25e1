//! Foreground session timer.
//!
//! Events are printed to stdout as one JSON object per line. Commands are
//! read from stdin, one per line:
//!
//! ```text
//! s | start        p | pause        r | reset
//! f <min>          b <min>          t [task-id]
//! status           q | quit         h | help
//! ```

use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use planora_core::timer::parse_minutes;
use planora_core::{
    spawn_session_writer, Config, Database, Event, Notifier, Phase, Planner, SessionTimer, Task,
    TimerCommand, TimerContext, TimerSettings,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const HELP: &str = "commands: s(tart) p(ause) r(eset) f <min> b <min> t [task-id] status q(uit)";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground, reading commands from stdin
    Run {
        /// Focus length in minutes (falls back to config on bad input)
        #[arg(long)]
        focus: Option<String>,
        /// Break length in minutes (falls back to config on bad input)
        #[arg(long = "break")]
        break_minutes: Option<String>,
        /// Active task to credit focus sessions to
        #[arg(long)]
        task: Option<String>,
        /// Start counting down immediately
        #[arg(long)]
        autostart: bool,
        /// Start the next phase as soon as one completes
        #[arg(long)]
        auto_advance: bool,
        /// Exit after this many completed focus phases (implies --auto-advance)
        #[arg(long)]
        cycles: Option<u32>,
        /// Tick period in milliseconds
        #[arg(long, default_value_t = 1000, hide = true)]
        tick_ms: u64,
    },
}

/// Prints notifications to stderr, optionally ringing the terminal bell.
struct TerminalNotifier {
    bell: bool,
}

impl Notifier for TerminalNotifier {
    fn notify(&self, title: &str, body: &str) {
        let mut err = std::io::stderr().lock();
        let bell = if self.bell { "\x07" } else { "" };
        let _ = writeln!(err, "{bell}{title} {body}");
    }
}

struct RunOptions {
    settings: TimerSettings,
    task: Option<String>,
    autostart: bool,
    auto_advance: bool,
    cycles: Option<u32>,
    tick: Duration,
}

enum Flow {
    Continue,
    Quit,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            focus,
            break_minutes,
            task,
            autostart,
            auto_advance,
            cycles,
            tick_ms,
        } => {
            let config = Config::load()?;
            let defaults = config.timer_settings();
            let settings = TimerSettings::new(
                parse_minutes(focus.as_deref().unwrap_or(""), defaults.focus_minutes()),
                parse_minutes(break_minutes.as_deref().unwrap_or(""), defaults.break_minutes()),
            )?;
            let options = RunOptions {
                settings,
                task,
                autostart,
                auto_advance: auto_advance || cycles.is_some(),
                cycles,
                tick: Duration::from_millis(tick_ms.max(1)),
            };
            let runtime = tokio::runtime::Runtime::new()?;
            let result = runtime.block_on(run_timer(config, options));
            // A pending stdin read would otherwise keep the runtime alive.
            runtime.shutdown_background();
            result
        }
    }
}

fn find_active_task(planner: &Planner<Database>, id: &str) -> Result<Task, String> {
    planner
        .active_tasks()
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| format!("no active task with id '{id}'"))
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

async fn run_timer(config: Config, options: RunOptions) -> Result<(), Box<dyn std::error::Error>> {
    let planner = Planner::new(Database::open()?);
    let (sink, writer) = spawn_session_writer(Database::open()?);

    let mut timer = SessionTimer::new(options.settings).with_sink(sink);
    if config.notifications.enabled {
        timer = timer.with_notifier(TerminalNotifier {
            bell: config.notifications.bell,
        });
    }
    if let Some(id) = &options.task {
        timer.select_task(find_active_task(&planner, id)?);
    }

    let (events_tx, mut events) = mpsc::unbounded_channel();
    let ctx = TimerContext::spawn_with_period(timer, events_tx, options.tick);
    ctx.send(TimerCommand::Announce)?;
    if options.autostart {
        ctx.start()?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                if let Flow::Quit = handle_event(&ctx, &options, &event)? {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => match handle_line(&ctx, &planner, line.trim()).await {
                        Ok(Flow::Continue) => {}
                        Ok(Flow::Quit) => break,
                        Err(e) => eprintln!("error: {e}"),
                    },
                    None => {
                        stdin_open = false;
                        if options.cycles.is_none() {
                            break;
                        }
                        if let Flow::Quit = settle(&ctx, &options, &mut events).await? {
                            break;
                        }
                    }
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    // Dropping the timer drops its sink, which lets the writer finish.
    drop(ctx.shutdown().await);
    let written = writer.await?;
    tracing::debug!(written, "session writer finished");
    Ok(())
}

fn handle_event(
    ctx: &TimerContext,
    options: &RunOptions,
    event: &Event,
) -> Result<Flow, Box<dyn std::error::Error>> {
    print_event(event)?;
    if let Event::PhaseCompleted {
        completed,
        completed_focus,
        ..
    } = event
    {
        let done =
            *completed == Phase::Focus && options.cycles.is_some_and(|n| *completed_focus >= n);
        if done {
            return Ok(Flow::Quit);
        }
        if options.auto_advance {
            ctx.start()?;
        }
    }
    Ok(Flow::Continue)
}

/// Without stdin only a running countdown can make progress. Decide whether
/// it is running once every event emitted before the state reply is handled.
async fn settle(
    ctx: &TimerContext,
    options: &RunOptions,
    events: &mut mpsc::UnboundedReceiver<Event>,
) -> Result<Flow, Box<dyn std::error::Error>> {
    loop {
        let running = ctx.state().await.is_some_and(|s| s.is_running);
        let mut drained = false;
        while let Ok(event) = events.try_recv() {
            drained = true;
            if let Flow::Quit = handle_event(ctx, options, &event)? {
                return Ok(Flow::Quit);
            }
        }
        if !drained {
            return Ok(if running { Flow::Continue } else { Flow::Quit });
        }
    }
}

async fn handle_line(
    ctx: &TimerContext,
    planner: &Planner<Database>,
    line: &str,
) -> Result<Flow, Box<dyn std::error::Error>> {
    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (line, ""),
    };

    match cmd {
        "" => {}
        "s" | "start" => ctx.start()?,
        "p" | "pause" => ctx.pause()?,
        "r" | "reset" => ctx.reset()?,
        "f" | "focus" => {
            let current = ctx.state().await.ok_or("timer stopped")?.focus_minutes;
            ctx.send(TimerCommand::SetFocusDuration(parse_minutes(arg, current)))?;
        }
        "b" | "break" => {
            let current = ctx.state().await.ok_or("timer stopped")?.break_minutes;
            ctx.send(TimerCommand::SetBreakDuration(parse_minutes(arg, current)))?;
        }
        "t" | "task" => {
            if arg.is_empty() {
                ctx.send(TimerCommand::ClearTask)?;
            } else {
                ctx.send(TimerCommand::SelectTask(find_active_task(planner, arg)?))?;
            }
        }
        "status" => ctx.send(TimerCommand::Announce)?,
        "q" | "quit" => return Ok(Flow::Quit),
        "h" | "help" => eprintln!("{HELP}"),
        other => eprintln!("unknown command '{other}'; {HELP}"),
    }
    Ok(Flow::Continue)
}

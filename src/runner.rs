//! The terminal runner.
//!
//! Owns terminal setup/teardown, forwards input from a dedicated reader
//! thread, and drives the frame/event loop. On a non-TTY stdout the
//! dashboard prints one plain snapshot instead of entering the loop.

use std::io::{stdout, IsTerminal, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::{
    event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use crate::app::{App, AppEvent};
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::tabs::TabId;

/// How long the input thread waits for an event before re-checking the
/// shutdown flag.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Run the dashboard until the user quits.
pub async fn run(config: DashboardConfig, initial_tab: TabId, use_color: bool) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(&config, tx.clone()).with_color(use_color);

    if !stdout().is_terminal() {
        // Piped output: emit one settled snapshot and stop
        app.startup(initial_tab);
        app.teardown();
        println!("{}", app.render_to_string());
        return Ok(());
    }

    let mut terminal = init_terminal()?;
    let shutdown = Arc::new(AtomicBool::new(false));
    let input = spawn_input_thread(tx, Arc::clone(&shutdown));

    let size = terminal.size()?;
    app.handle_resize(size.width);
    app.startup(initial_tab);

    let result = event_loop(&mut terminal, &mut app, &mut rx, config.frame_interval()).await;

    app.teardown();
    shutdown.store(true, Ordering::Relaxed);
    restore_terminal(&mut terminal)?;
    input.join().ok();
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<AppEvent>,
    frame_interval: Duration,
) -> Result<()> {
    let mut frames = tokio::time::interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while app.is_running() {
        tokio::select! {
            maybe = rx.recv() => match maybe {
                Some(event) => app.apply(event),
                None => break,
            },
            _ = frames.tick() => {
                terminal.draw(|frame| app.render(frame))?;
            }
        }
    }
    Ok(())
}

/// Read terminal input on its own thread so the async loop never blocks on
/// the TTY. The thread exits when the flag flips or the channel closes.
fn spawn_input_thread(
    tx: mpsc::UnboundedSender<AppEvent>,
    shutdown: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !shutdown.load(Ordering::Relaxed) {
            match event::poll(INPUT_POLL) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if tx.send(AppEvent::Input(event)).is_err() {
                            break;
                        }
                    }
                    Err(err) => warn!(%err, "failed to read terminal event"),
                },
                Ok(false) => {}
                Err(err) => {
                    warn!(%err, "failed to poll terminal events");
                    break;
                }
            }
        }
    })
}

/// Enter raw mode and the alternate screen.
fn init_terminal() -> std::io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(out))
}

/// Leave the alternate screen and restore the terminal.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

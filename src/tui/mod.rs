//! Terminal front end for the shell game.

mod input;
mod stage;
mod ui;

pub use input::{KeyAction, map_key};
pub use stage::TerminalStage;

use crate::config::GameConfig;
use crate::driver::{Command, Driver, until};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use shell_game_core::{EvenLayout, RoundSequencer};
use std::io;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, sleep};
use tracing::{debug, error, info, instrument, warn};

/// Redraw interval, so swap highlights and confetti fade on time.
const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// How long the input reader blocks before checking for shutdown.
const INPUT_POLL: Duration = Duration::from_millis(100);

type TuiDriver = Driver<EvenLayout, TerminalStage, StdRng>;

/// What woke the event loop.
enum Wake {
    Input(Option<Event>),
    Timer,
    Frame,
}

/// Run the terminal game until the player quits.
pub async fn run_tui(config: GameConfig) -> Result<()> {
    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create(config.log_file())
        .with_context(|| format!("Failed to create log file {}", config.log_file().display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,shell_game=debug")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(difficulty = %config.difficulty(), seed = ?config.seed(), "Starting Shell Game TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_game(&mut terminal, &config).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

/// Builds the session and runs the event loop.
#[instrument(skip_all)]
async fn run_game(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &GameConfig,
) -> Result<()> {
    let width = terminal.size()?.width;
    let sequencer = RoundSequencer::new(
        EvenLayout::new(f32::from(width)),
        TerminalStage::new(*config.mute()),
        config.rng(),
    )
    .with_levels(config.resolved_levels())
    .with_difficulty(*config.difficulty());
    let mut driver = Driver::new(sequencer);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let reader = tokio::task::spawn_blocking(move || -> io::Result<()> {
        while !event_tx.is_closed() {
            if event::poll(INPUT_POLL)? && event_tx.send(event::read()?).is_err() {
                break;
            }
        }
        Ok(())
    });

    loop {
        terminal.draw(|f| ui::draw(f, driver.sequencer().sink(), Instant::now()))?;

        let wake = tokio::select! {
            ev = event_rx.recv() => Wake::Input(ev),
            _ = until(driver.deadline()) => Wake::Timer,
            _ = sleep(FRAME_INTERVAL) => Wake::Frame,
        };

        match wake {
            Wake::Input(None) => {
                warn!("Input reader stopped");
                break;
            }
            Wake::Input(Some(ev)) => {
                if !handle_event(&mut driver, ev) {
                    info!("User quit");
                    break;
                }
            }
            Wake::Timer | Wake::Frame => {}
        }

        if driver.is_due() {
            driver.tick();
        }

        if driver.sequencer_mut().sink_mut().take_bell() {
            let backend = terminal.backend_mut();
            io::Write::write_all(backend, b"\x07")?;
            io::Write::flush(backend)?;
        }
    }

    drop(event_rx);
    match reader.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Input reader failed"),
        Err(e) => warn!(error = %e, "Input reader panicked"),
    }
    Ok(())
}

/// Applies one terminal event. Returns false when the player quits.
fn handle_event(driver: &mut TuiDriver, ev: Event) -> bool {
    match ev {
        Event::Key(key) if key.kind != KeyEventKind::Release => match map_key(key.code) {
            KeyAction::Quit => return false,
            KeyAction::Command(command) => driver.handle(command),
            KeyAction::CursorLeft => driver.sequencer_mut().sink_mut().cursor_left(),
            KeyAction::CursorRight => driver.sequencer_mut().sink_mut().cursor_right(),
            KeyAction::PickCursor => {
                let slot = driver.sequencer().sink().cursor();
                driver.handle(Command::Pick(slot));
            }
            KeyAction::Ignore => {}
        },
        Event::Resize(width, height) => {
            debug!(width, height, "Terminal resized");
            driver
                .sequencer_mut()
                .layout_provider_mut()
                .set_width(f32::from(width));
            driver.handle(Command::Relayout);
        }
        _ => {}
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rand::SeedableRng;
    use shell_game_core::RoundPhase;

    fn driver() -> TuiDriver {
        Driver::new(RoundSequencer::new(
            EvenLayout::new(60.0),
            TerminalStage::new(true),
            StdRng::seed_from_u64(3),
        ))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_drive_a_round() {
        let mut driver = driver();
        assert!(handle_event(&mut driver, key(KeyCode::Char('s'))));
        assert_eq!(driver.phase(), RoundPhase::Peeking);

        driver.run_until_input().await;
        assert!(driver.sequencer().sink().picking_enabled());
        for cup in shell_game_core::CupId::ALL {
            assert_eq!(
                driver.sequencer().sink().cup_slot(cup),
                driver.sequencer().positions().slot_of(cup)
            );
        }

        let target = driver
            .sequencer()
            .positions()
            .slot_of(driver.sequencer().ball_holder());
        while driver.sequencer().sink().cursor() != target {
            handle_event(&mut driver, key(KeyCode::Right));
        }
        handle_event(&mut driver, key(KeyCode::Char(' ')));
        assert_eq!(driver.sequencer().scoreboard().score(), 1);
        assert!(!handle_event(&mut driver, key(KeyCode::Char('q'))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_moves_cups_only() {
        let mut driver = driver();
        handle_event(&mut driver, key(KeyCode::Char('s')));
        driver.tick();
        driver.tick();
        assert_eq!(driver.phase(), RoundPhase::Shuffling);
        let positions = driver.sequencer().positions().clone();

        handle_event(&mut driver, Event::Resize(120, 40));

        let stage = driver.sequencer().sink();
        assert_eq!(stage.slot_x(shell_game_core::SlotIndex::ALL[0]), Some(20.0));
        assert_eq!(driver.sequencer().positions(), &positions);
        assert_eq!(driver.phase(), RoundPhase::Shuffling);
    }
}

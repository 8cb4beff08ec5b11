//! Emberwild - Entry Point
//!
//! This is the main executable that initializes the terminal,
//! sets up the game, and runs the main loop.

use std::fs::OpenOptions;
use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use emberwild::audio::AudioManager;
use emberwild::game::FixedStep;
use emberwild::ui::App;
use emberwild::{Game, GameConfig};

/// Target frames per second for the game loop
const TARGET_FPS: u64 = 60;
const FRAME_TIME: Duration = Duration::from_millis(1000 / TARGET_FPS);

fn init_logging() {
    let builder = &mut env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    // Log to a file so output does not tear the terminal UI
    match OpenOptions::new().create(true).write(true).truncate(true).open("emberwild.log") {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn main() -> Result<()> {
    init_logging();
    log::info!("Starting Emberwild v{}", env!("CARGO_PKG_VERSION"));

    let config = GameConfig::load();

    // Open the audio device before taking over the terminal
    let mut audio = if config.audio.enabled {
        Some(AudioManager::new(&config.audio).context("failed to open the audio device")?)
    } else {
        log::info!("Audio disabled by configuration");
        None
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create game and UI
    let mut app = App::new();
    let mut game = Game::new(config);

    // Run the game loop
    let result = run_game_loop(&mut terminal, &mut app, &mut game, audio.as_mut());

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    // Report any errors
    if let Err(ref e) = result {
        log::error!("Game exited with error: {}", e);
        eprintln!("Error: {}", e);
    }

    log::info!("Emberwild shut down cleanly");
    result
}

/// Main game loop
fn run_game_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    game: &mut Game,
    mut audio: Option<&mut AudioManager>,
) -> Result<()> {
    let mut clock = FixedStep::new(game.config().tick_rate);
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let delta = frame_start.duration_since(last_frame);
        last_frame = frame_start;

        // Handle every pending input event
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) => {
                    if app.handle_input(key, game) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse, game),
                _ => {}
            }
        }
        app.release_stale_keys(game, frame_start);

        // Update game state
        for _ in 0..clock.advance(delta) {
            game.update(clock.step());
        }

        let requests = game.drain_audio_requests();
        if let Some(manager) = audio.as_deref_mut() {
            for request in requests {
                manager.handle(request);
            }
        }

        // Render
        terminal.draw(|frame| {
            app.render(frame, game);
        })?;

        // Check if game wants to quit
        if game.should_quit() {
            break;
        }

        // Frame rate limiting
        let frame_time = frame_start.elapsed();
        if frame_time < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - frame_time);
        }
    }

    Ok(())
}

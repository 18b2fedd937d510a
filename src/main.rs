//! Dotfolio - Entry Point
//!
//! Runs the portfolio widgets in the terminal: the particle field fills the
//! screen, the terminal simulator and keyboard visualizer sit along the bottom.

use dotfolio::core::config::AppConfig;
use dotfolio::core::error::Result;
use dotfolio::keyboard::{PageLocation, Platform};
use dotfolio::particles::Theme;
use dotfolio::ui::{self, App, FRAME};

use clap::Parser;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Trait for reading terminal events
trait EventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }
}

/// Dotfolio - particle field, terminal simulator and keybind visualizer
#[derive(Parser, Debug)]
#[command(name = "dotfolio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Portfolio widgets in your terminal", long_about = None)]
struct Args {
    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keybind API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Page URL the widgets start on, e.g. "/dotfiles?platform=hyprland"
    #[arg(long, default_value = "/")]
    url: String,

    /// Platform used when the URL names none
    #[arg(long)]
    platform: Option<Platform>,

    /// Particle color theme
    #[arg(long)]
    theme: Option<Theme>,

    /// Disable the particle animation
    #[arg(long)]
    reduced_motion: bool,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the screen belongs to the UI)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_ref())?;

    let config = load_config(&args)?;
    tracing::info!(
        base_url = %config.keyboard.base_url,
        theme = %config.particles.theme,
        "Dotfolio starting..."
    );

    // Async runtime for keybind requests
    let rt = Runtime::new()?;

    // Restore the terminal if anything panics while it is in raw mode
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableFocusChange
        );
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let size = terminal.size()?;
    let location = PageLocation::parse(&args.url);
    let run_result = App::new(&config, location, size.width, size.height, rt.handle().clone())
        .and_then(|mut app| {
            let mut events = CrosstermEventReader;
            let result = run_app(&mut terminal, &mut app, &mut events);
            app.shutdown();
            result
        });

    let cleanup_result = cleanup_terminal(&mut terminal);
    let _ = panic::take_hook();

    run_result?;
    cleanup_result?;
    rt.shutdown_timeout(Duration::from_millis(200));
    Ok(())
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("dotfolio=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false);
    match log_file {
        Some(path) => builder.with_writer(Mutex::new(File::create(path)?)).init(),
        None => builder.with_writer(io::sink).init(),
    }
    Ok(())
}

/// Config file first, then command-line overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(base_url) = &args.base_url {
        config.keyboard.base_url = base_url.clone();
    }
    if let Some(platform) = args.platform {
        config.keyboard.default_platform = platform;
    }
    if let Some(theme) = args.theme {
        config.particles.theme = theme;
    }
    if args.reduced_motion {
        config.particles.reduced_motion = true;
    }
    if args.seed.is_some() {
        config.particles.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut impl EventReader,
) -> Result<()> {
    app.start();
    let mut last_frame = Instant::now();

    while !app.should_quit() {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = FRAME.saturating_sub(last_frame.elapsed());
        if let Some(event) = events.read_event(timeout)? {
            app.handle_event(event);
        }
        if last_frame.elapsed() >= FRAME {
            app.tick();
            last_frame = Instant::now();
        }
    }
    Ok(())
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;
    Ok(())
}

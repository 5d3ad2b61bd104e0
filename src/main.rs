//! Bloomy - Terminal Bouquet Composer
//!
//! Compose a bouquet in four stages, store it locally or in a hosted table,
//! and share a link to it. Stored bouquets can be reopened by id or browsed
//! in the garden.

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use bloomy::application::App;
use bloomy::domain::BouquetId;
use bloomy::infrastructure::{config, open_gateway, telemetry, BouquetGateway};
use bloomy::presentation::{render_ui, InputHandler};

#[derive(Debug, Parser)]
#[command(name = "bloomy", version, about = "Compose and share digital bouquets")]
struct Cli {
    /// Path to a TOML config file (defaults to ./bloomy.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Display mode for new bouquets
    #[arg(long, global = true)]
    mode: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start composing a new bouquet
    Compose,
    /// Open a stored bouquet
    View { id: BouquetId },
    /// Browse every stored bouquet
    Garden,
}

/// Entry point for the Bloomy bouquet composer.
///
/// Loads configuration, installs file logging, opens the bouquet store,
/// then runs the terminal interface until the user quits.
///
/// # Errors
///
/// Returns an error if the config cannot be read, the store cannot be
/// opened, or terminal setup fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = config::load(cli.config.as_deref())?;
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    match telemetry::init(&config.log) {
        Ok(Some(warning)) => eprintln!("bloomy: {warning}"),
        Ok(None) => {}
        Err(err) => eprintln!("bloomy: logging disabled: {err}"),
    }
    tracing::info!(mode = %config.mode, "starting bloomy");

    let gateway = open_gateway(&config.store)?;

    let mut app = App::new(&config.mode, &config.share_base_url);
    match cli.command.unwrap_or(Command::Compose) {
        Command::Compose => {}
        Command::View { id } => app.open_bouquet(gateway.as_ref(), id),
        Command::Garden => app.open_garden(gateway.as_ref()),
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, gateway.as_ref());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal loop failed");
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Quits on Ctrl+C, or on `q` anywhere the key is not being typed into the card.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    gateway: &dyn BouquetGateway,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char('q') if app.accepts_quit() => return Ok(()),
                    _ => InputHandler::handle_key_event(app, gateway, key.code, key.modifiers),
                }
            }
        }
    }
}

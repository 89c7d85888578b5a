mod action;
mod app;
mod backend;
mod config;
mod link;
mod metadata;
mod render;
mod types;
mod ui;
mod ui_state;

use std::env;
use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use arboard::Clipboard;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use action::{key_action, Action};
use app::{App, Effect};
use backend::{Dispatcher, RecipeClient, RecipeLookup};
use config::{Config, LOG_FILE_NAME};
use ui::draw;

const USAGE: &str = "usage: recipe-assistant [LINK]

LINK may be a share link (https://cook.aries-happy.com/<query>),
a path (/宫保鸡丁) or plain text. It is looked up on start.";

fn main() -> io::Result<()> {
    // Parse command line args
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }
    let link = args.into_iter().find(|a| !a.starts_with('-'));

    init_logging();

    let config = Config::default();
    info!(api = %config.api_base_url, "starting");

    let runtime = tokio::runtime::Runtime::new()?;
    let client = RecipeClient::new(&config.api_base_url).map_err(io::Error::other)?;
    let mut dispatcher = Dispatcher::new(client, runtime.handle().clone());

    // Create app state
    let mut app = App::new(config);
    if let Some(request) = link.as_deref().and_then(|l| app.open_link(l)) {
        dispatcher.dispatch(request);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app, &mut dispatcher);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableBracketedPaste)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("exiting");
    Ok(())
}

/// Log to a file in the temp dir; the terminal belongs to the UI.
fn init_logging() {
    let path = env::temp_dir().join(LOG_FILE_NAME);
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Logging disabled, cannot open {}: {}", path.display(), e);
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("recipe_assistant=info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn run_app<L: RecipeLookup>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    dispatcher: &mut Dispatcher<L>,
) -> io::Result<()> {
    let mut clipboard: Option<Clipboard> = None;
    let mut applied_title = String::new();

    loop {
        app.tick();

        while let Some(done) = dispatcher.try_next() {
            app.resolve(done.id, done.outcome);
        }

        // Keep the window title in step with the page metadata
        if app.metadata().title != applied_title {
            applied_title = app.metadata().title.clone();
            execute!(terminal.backend_mut(), SetTitle(&applied_title))?;
        }

        terminal.draw(|frame| draw(frame, app))?;

        if !event::poll(Duration::from_millis(app.config.tick_rate_ms))? {
            continue;
        }

        let action = match event::read()? {
            Event::Key(key) => key_action(key, &app.ui),
            Event::Paste(text) => Some(Action::Paste(text)),
            _ => None,
        };
        let Some(action) = action else {
            continue;
        };

        match app.handle_action(action) {
            Some(Effect::Dispatch(request)) => dispatcher.dispatch(request),
            Some(Effect::CopyToClipboard(url)) => {
                match clipboard_handle(&mut clipboard).and_then(|c| c.set_text(url)) {
                    Ok(()) => app.share_copied(),
                    Err(e) => {
                        warn!(error = %e, "clipboard write failed");
                        app.ui.status_message = Some(format!("复制失败: {}", e));
                    }
                }
            }
            Some(Effect::PasteFromClipboard) => {
                match clipboard_handle(&mut clipboard).and_then(|c| c.get_text()) {
                    Ok(text) => app.insert_text(&text),
                    Err(e) => warn!(error = %e, "clipboard read failed"),
                }
            }
            Some(Effect::Quit) => return Ok(()),
            None => {}
        }
    }
}

/// The clipboard is opened on first use and kept for the session, since
/// some platforms drop its contents when the handle goes away.
fn clipboard_handle(slot: &mut Option<Clipboard>) -> Result<&mut Clipboard, arboard::Error> {
    if slot.is_none() {
        *slot = Some(Clipboard::new()?);
    }
    slot.as_mut().ok_or(arboard::Error::ClipboardNotSupported)
}

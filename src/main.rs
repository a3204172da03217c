//! # gallery-tui
//!
//! A terminal product gallery backed by a small REST service.

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use gallery_tui::api::{HttpProductApi, ProductApi};
use gallery_tui::app_core::gesture::PressTracker;
use gallery_tui::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use gallery_tui::app_core::reducer;
use gallery_tui::app_core::state::AppState;
use gallery_tui::config;
use gallery_tui::demo::DemoCatalog;
use gallery_tui::runtime::tasks::TaskRunner;
use gallery_tui::{theme, ui};
use log::LevelFilter;
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::WriteLogger;

use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long the loop waits for input before checking finished tasks.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "gallery-tui: browse, filter, favorite and create products served by a REST backend.\n\
                  Products are read from GET {base}/products and created with POST {base}/products."
)]
struct Args {
    /// Backend base URL (http or https)
    #[arg(short, long, env = "GALLERY_BASE_URL", default_value = config::DEFAULT_BASE_URL)]
    base_url: String,

    /// UI theme (dracula, solarized, gruvbox, everforest_light)
    #[arg(short, long)]
    theme: Option<String>,

    /// Browse a built-in catalog instead of contacting the backend
    #[arg(long)]
    demo: bool,

    /// Log level written to the log file (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Show all paths used by the application and exit
    #[arg(long)]
    config: bool,
}

// ---------------------------------------------------------------------------
// Crossterm → shared-reducer adapters
// ---------------------------------------------------------------------------

fn crossterm_to_app_key_event(
    code: KeyCode,
    modifiers: KeyModifiers,
    kind: KeyEventKind,
) -> Option<AppKeyEvent> {
    if matches!(kind, KeyEventKind::Release) {
        return None;
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);
    let shift = modifiers.contains(KeyModifiers::SHIFT);
    let super_key = modifiers.contains(KeyModifiers::SUPER);

    let key_code = match code {
        KeyCode::Char(c) => AppKeyCode::Char(c),
        KeyCode::Backspace => AppKeyCode::Backspace,
        KeyCode::Delete => AppKeyCode::Delete,
        KeyCode::Enter => AppKeyCode::Enter,
        KeyCode::Esc => AppKeyCode::Esc,
        KeyCode::Up => AppKeyCode::Up,
        KeyCode::Down => AppKeyCode::Down,
        KeyCode::Left => AppKeyCode::Left,
        KeyCode::Right => AppKeyCode::Right,
        KeyCode::Home => AppKeyCode::Home,
        KeyCode::End => AppKeyCode::End,
        KeyCode::PageUp => AppKeyCode::PageUp,
        KeyCode::PageDown => AppKeyCode::PageDown,
        KeyCode::Tab => AppKeyCode::Tab,
        KeyCode::BackTab => AppKeyCode::BackTab,
        _ => return None,
    };

    Some(AppKeyEvent {
        code: key_code,
        ctrl: ctrl || super_key,
        alt,
        shift,
        is_release: false,
    })
}

/// Left presses are resolved into taps or long presses on release.
/// A right click stands in for a long press.
fn crossterm_to_app_mouse_event(
    tracker: &mut PressTracker,
    mouse: &event::MouseEvent,
    now: Instant,
) -> Option<AppMouseEvent> {
    let (column, row) = (mouse.column, mouse.row);
    let kind = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            tracker.press(column, row, now);
            return None;
        }
        MouseEventKind::Up(MouseButton::Left) => return tracker.release(column, row, now),
        MouseEventKind::Down(MouseButton::Right) => AppMouseKind::LongPress,
        MouseEventKind::ScrollUp => AppMouseKind::ScrollUp,
        MouseEventKind::ScrollDown => AppMouseKind::ScrollDown,
        _ => return None,
    };
    Some(AppMouseEvent { kind, column, row })
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn init_logging(path: &Path, level: LevelFilter) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    WriteLogger::init(level, simplelog::Config::default(), file)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let app_version = format!("v{}", env!("CARGO_PKG_VERSION"));

    // Theme selection
    let theme_name = args.theme.as_deref().unwrap_or("dracula");
    let theme_enum = theme::Theme::from_str(theme_name).map_err(anyhow::Error::msg)?;
    let theme = theme_enum.config();

    let base_url = config::parse_base_url(&args.base_url)?;
    let data_dir = config::get_data_dir()?;
    let log_path = config::log_file_path()?;

    if args.config {
        println!("App Paths:");
        println!("  Data:     {}", data_dir.display());
        println!("  Log:      {}", log_path.display());
        println!("  Backend:  {}", base_url);
        return Ok(());
    }

    init_logging(&log_path, args.log_level)?;

    let (api, source_label): (Arc<dyn ProductApi>, String) = if args.demo {
        (Arc::new(DemoCatalog::seeded()), "demo catalog".to_string())
    } else {
        let http = HttpProductApi::new(&base_url)?;
        let label = http.products_url().to_string();
        (Arc::new(http), label)
    };
    log::info!("Starting gallery-tui {} ({})", app_version, source_label);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = AppState::new(theme, source_label, app_version);
    let mut runner = TaskRunner::new(api);

    let res = run_app(&mut terminal, &mut app, &mut runner);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        log::error!("Exiting after error: {:#}", err);
    }
    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    runner: &mut TaskRunner,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let mut tracker = PressTracker::default();

    app.begin_initial_load();
    runner.dispatch_pending(app)?;
    terminal.draw(|f| ui::ui(f, app))?;

    loop {
        if app.should_quit {
            break;
        }

        let mut dirty = false;
        while let Some(outcome) = runner.try_next() {
            outcome.apply(app);
            dirty = true;
        }

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(event) =
                        crossterm_to_app_key_event(key.code, key.modifiers, key.kind)
                    {
                        reducer::handle_key_event(app, event);
                        dirty = true;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(event) =
                        crossterm_to_app_mouse_event(&mut tracker, &mouse, Instant::now())
                    {
                        dirty |= reducer::handle_mouse_event(app, event);
                    }
                }
                Event::Resize(_, _) => {
                    tracker.cancel();
                    dirty = true;
                }
                _ => {}
            }
        }

        if app.pending_action.is_some() {
            runner.dispatch_pending(app)?;
            dirty = true;
        }
        if dirty {
            terminal.draw(|f| ui::ui(f, app))?;
        }
    }

    log::info!("Quitting with {} task(s) still running", runner.in_flight());
    Ok(())
}

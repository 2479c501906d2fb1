//! research-tui: terminal chat client for the research assistant backend.

use anyhow::Context;
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyEventKind,
    KeyModifiers, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::{debug, info};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use research_client::config;
use research_client::session::PendingQuery;
use research_client::Client;
use research_tui::{ui, Action, App, AppEvent};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Command-line options for the TUI client.
#[derive(Parser)]
#[command(name = "research-tui", version)]
struct Cli {
    /// Path to a config.yaml (defaults to $RESEARCH_UI_CONFIG or ~/.research-ui/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Backend base URL, overriding the configured endpoint
    #[arg(long)]
    endpoint: Option<String>,
}

/// Entry point for the research TUI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    let location = config::resolve_config_path(cli.config.as_deref())?;
    let cfg = config::load_or_default(&location)
        .with_context(|| format!("failed to load config from {}", location.path.display()))?;
    let endpoint = cli
        .endpoint
        .clone()
        .unwrap_or_else(|| cfg.endpoint().to_string());
    info!(
        "starting TUI (endpoint={}, config={})",
        endpoint,
        location.path.display()
    );

    let client = Client::new(&endpoint);
    let mut app = App::new(cfg, Some(location.path), &endpoint);

    let mut terminal = setup_terminal()?;
    let (tx, mut rx) = mpsc::channel(256);
    spawn_input_handler(tx.clone());
    spawn_tick(tx.clone());
    if let Action::Probe(current) = app.probe_backend() {
        spawn_health_probe(client.clone(), current, tx.clone());
    }

    let result = run(&mut terminal, &mut app, &client, &mut rx, &tx).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    client: &Client,
    rx: &mut mpsc::Receiver<AppEvent>,
    tx: &mpsc::Sender<AppEvent>,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        let Some(event) = rx.recv().await else {
            break;
        };
        match app.handle_event(event) {
            Action::None => {}
            Action::Quit => break,
            Action::Research(pending) => spawn_research(client.clone(), pending, tx.clone()),
            Action::Probe(endpoint) => spawn_health_probe(client.clone(), endpoint, tx.clone()),
        }
    }
    Ok(())
}

/// Run one research request off the UI loop and report back as an event.
fn spawn_research(client: Client, pending: PendingQuery, sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let outcome = client
            .with_endpoint(&pending.endpoint)
            .research(&pending.query)
            .await;
        let _ = sender.send(AppEvent::Reply { pending, outcome }).await;
    });
}

fn spawn_health_probe(client: Client, endpoint: String, sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let outcome = client.with_endpoint(&endpoint).health().await;
        let _ = sender.send(AppEvent::Health { endpoint, outcome }).await;
    });
}

fn spawn_input_handler(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        const MOUSE_SCROLL_LINES: i16 = 3;
        loop {
            if let Ok(true) = crossterm::event::poll(Duration::from_millis(30)) {
                while let Ok(true) = crossterm::event::poll(Duration::from_millis(0)) {
                    let event = match crossterm::event::read() {
                        Ok(event) => event,
                        Err(_) => break,
                    };
                    match event {
                        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                            let _ = sender.send(AppEvent::Input(key)).await;
                        }
                        CrosstermEvent::Mouse(mouse) => {
                            let lines = if mouse.modifiers.contains(KeyModifiers::SHIFT) {
                                MOUSE_SCROLL_LINES.saturating_mul(2)
                            } else {
                                MOUSE_SCROLL_LINES
                            };
                            match mouse.kind {
                                MouseEventKind::ScrollUp => {
                                    let _ = sender.send(AppEvent::Scroll(-lines)).await;
                                }
                                MouseEventKind::ScrollDown => {
                                    let _ = sender.send(AppEvent::Scroll(lines)).await;
                                }
                                _ => {}
                            }
                        }
                        _ => {}
                    }
                }
            }
            if sender.is_closed() {
                break;
            }
        }
    });
}

fn spawn_tick(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(250));
        loop {
            interval.tick().await;
            if sender.send(AppEvent::Tick).await.is_err() {
                break;
            }
        }
    });
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    debug!("setting up terminal");
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    debug!("restoring terminal");
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

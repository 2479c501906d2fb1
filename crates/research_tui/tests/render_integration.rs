//! Rendering tests using ratatui's `TestBackend`.

use ratatui::backend::TestBackend;
use ratatui::layout::Position;
use ratatui::Terminal;
use research_client::{Config, ResearchResponse};
use research_tui::{ui, App};
use std::time::Duration;

fn render(app: &mut App) -> String {
    render_sized(app, 140, 45).0
}

/// Render at `width`x`height`; returns the screen text and the cursor position.
fn render_sized(app: &mut App, width: u16, height: u16) -> (String, Position) {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| ui::draw(frame, app)).unwrap();
    let cursor = terminal.get_cursor_position().unwrap();

    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    (text, cursor)
}

fn app() -> App {
    App::new(Config::default(), None, "http://localhost:8000")
}

#[test]
fn empty_session_shows_welcome_and_sidebar() {
    let mut app = app();
    let screen = render(&mut app);

    assert!(screen.contains("Research Assistant"));
    assert!(screen.contains("Ready"));
    assert!(screen.contains("What shall we explore?"));
    assert!(screen.contains("Quantum computing progress"));
    assert!(screen.contains("Session Stats"));
    assert!(screen.contains("No queries yet"));
    assert!(screen.contains("http://localhost:8000"));
    assert!(screen.contains("POST /research"));
    assert!(screen.contains("Enter your research query..."));
}

#[test]
fn in_flight_query_shows_thinking_and_researching() {
    let mut app = app();
    app.input = "volcanoes".into();
    let _ = app.submit();

    let screen = render(&mut app);
    assert!(screen.contains("Researching..."));
    assert!(screen.contains("Searching and synthesizing..."));
    assert!(screen.contains("volcanoes"));
}

#[test]
fn result_shows_topic_sources_and_tools() {
    let mut app = app();
    let pending = app.session.begin_query("volcanoes").unwrap();
    app.session.complete_after(
        pending,
        Ok(ResearchResponse {
            topic: "Volcanic activity".into(),
            summary: "Most eruptions happen along plate boundaries.".into(),
            sources: vec![
                "https://volcanoes.example.org/a-very-long-path/with/many/segments".into(),
                "https://usgs.example".into(),
            ],
            tools_used: vec!["web_search".into(), "summarize".into()],
        }),
        Duration::from_millis(2400),
    );

    let screen = render(&mut app);
    assert!(screen.contains("Volcanic activity"));
    assert!(screen.contains("Most eruptions happen along plate boundaries."));
    assert!(screen.contains("SOURCES"));
    assert!(screen.contains("https://usgs.example"));
    assert!(screen.contains("https://volcanoes.example.org/a-very-lon…"));
    assert!(!screen.contains("with/many/segments"));
    assert!(screen.contains("TOOLS USED"));
    assert!(screen.contains("[web_search]"));
    assert!(screen.contains("2.4"));
    assert!(screen.contains("Ready"));
    assert!(!screen.contains("What shall we explore?"));
}

#[test]
fn error_message_is_rendered() {
    let mut app = app();
    let pending = app.session.begin_query("anything").unwrap();
    app.session.complete(
        pending,
        Err(research_client::ClientError::Status {
            status: 500,
            body: "boom".into(),
        }),
    );

    let screen = render(&mut app);
    assert!(screen.contains("Server error 500: boom"));
    assert!(!screen.contains("Searching and synthesizing"));
}

#[test]
fn config_panel_shows_expected_contract() {
    let mut app = app();
    app.toggle_config();

    let screen = render(&mut app);
    assert!(screen.contains("Backend Endpoint"));
    assert!(screen.contains("POST http://localhost:8000/research"));
    assert!(screen.contains("{ topic, summary, sources[], tools_used[] }"));
}

#[test]
fn long_query_scrolls_so_its_end_stays_visible() {
    let mut app = app();
    app.input = "Latest AI breakthroughs 2025 in quantum error correction and TAILMARK".into();

    let (screen, cursor) = render_sized(&mut app, 80, 24);

    assert!(screen.contains("TAILMARK"), "end of the input should be on screen");
    // Chat column is everything left of the 32-wide sidebar.
    let chat_right_edge = 80 - 32;
    assert!(
        cursor.x < chat_right_edge - 1,
        "cursor {cursor:?} left the input box"
    );
    let cursor_row = screen.lines().nth(cursor.y as usize).unwrap();
    assert!(cursor_row.contains("TAILMARK"));
}

#[test]
fn short_query_is_shown_unscrolled() {
    let mut app = app();
    app.input = "mars rovers".into();

    let (screen, cursor) = render_sized(&mut app, 80, 24);

    assert!(screen.contains(" mars rovers"));
    // Border, pad cell, then the text.
    assert_eq!(cursor.x, 2 + "mars rovers".chars().count() as u16);
}

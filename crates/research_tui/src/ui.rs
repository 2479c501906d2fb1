//! Rendering routines for the research TUI.

use crate::app::{App, BackendStatus};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};
use ratatui::Frame;
use research_client::session::SUGGESTIONS;
use research_client::{MessageKind, ResearchResponse, Role};

// ── Theme ─────────────────────────────────────────────────────────────

const ACCENT: Color = Color::Rgb(232, 201, 122); // #e8c97a
const ACCENT_DIM: Color = Color::Rgb(120, 104, 66);
const ACCENT2: Color = Color::Rgb(122, 159, 232); // #7a9fe8
const TEXT: Color = Color::Rgb(232, 230, 224); // #e8e6e0
const MUTED: Color = Color::Rgb(90, 90, 114); // #5a5a72
const BORDER: Color = Color::Rgb(50, 50, 72);
const SUCCESS: Color = Color::Rgb(110, 231, 183); // #6ee7b7
const ERROR: Color = Color::Rgb(248, 113, 113); // #f87171

const HEADER_HEIGHT: u16 = 3;
const HEADER_STATUS_WIDTH: u16 = 34;
const CONFIG_HEIGHT: u16 = 4;
const SIDEBAR_WIDTH: u16 = 32;
const STATS_HEIGHT: u16 = 6;
const CONNECTED_HEIGHT: u16 = 5;
const MAX_INPUT_LINES: usize = 4;

/// Sources longer than this are shown truncated.
pub const SOURCE_DISPLAY_CHARS: usize = 40;

const THINKING_FRAMES: [&str; 4] = ["·  ", "●· ", "●●·", "●●●"];

/// Draw the entire TUI frame.
pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();

    let mut constraints = vec![Constraint::Length(HEADER_HEIGHT)];
    if app.config_open {
        constraints.push(Constraint::Length(CONFIG_HEIGHT));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    draw_header(frame, app, root[0]);
    let body_area = if app.config_open {
        draw_config_panel(frame, app, root[1]);
        root[2]
    } else {
        root[1]
    };
    let status_area = root[root.len() - 1];

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(SIDEBAR_WIDTH)])
        .split(body_area);

    let input_lines = app.input.split('\n').count().clamp(1, MAX_INPUT_LINES) as u16;
    let chat_cols = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),                 // transcript
            Constraint::Length(input_lines + 2), // input
            Constraint::Length(1),              // hint
        ])
        .split(cols[0]);

    draw_chat(frame, app, chat_cols[0]);
    draw_input(frame, app, chat_cols[1]);
    draw_hint(frame, chat_cols[2]);
    draw_sidebar(frame, app, cols[1]);
    draw_status_bar(frame, app, status_area);
}

fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(BORDER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let title = Line::from(vec![
        Span::styled(" ◈ ", Style::default().fg(ACCENT)),
        Span::styled(
            "Research Assistant",
            Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  research agent · POST /research", Style::default().fg(MUTED)),
    ]);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(HEADER_STATUS_WIDTH)])
        .split(inner);
    frame.render_widget(Paragraph::new(title), cols[0]);

    let (label, color) = if app.session.is_loading() {
        ("Researching...", ACCENT)
    } else {
        ("Ready", SUCCESS)
    };
    let status = Line::from(vec![
        Span::styled("Ctrl+E config  ", Style::default().fg(MUTED)),
        Span::styled("● ", Style::default().fg(color)),
        Span::styled(format!("{label} "), Style::default().fg(MUTED)),
    ]);
    frame.render_widget(Paragraph::new(status).alignment(Alignment::Right), cols[1]);
}

fn draw_config_panel(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT))
        .title(Span::styled(
            " Backend Endpoint ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let draft = app.endpoint_draft.trim_end_matches('/');
    let editable = inner.width.saturating_sub(2) as usize;
    let shown = tail_chars(&app.endpoint_draft, editable);
    let lines = vec![
        Line::from(vec![
            Span::styled(" ", Style::default()),
            Span::styled(shown.to_string(), Style::default().fg(TEXT)),
        ]),
        Line::from(vec![
            Span::styled(" Expects ", Style::default().fg(MUTED)),
            Span::styled(
                format!("POST {draft}/research"),
                Style::default().fg(SUCCESS),
            ),
            Span::styled(" → ", Style::default().fg(MUTED)),
            Span::styled(
                "{ topic, summary, sources[], tools_used[] }",
                Style::default().fg(ACCENT2),
            ),
            Span::styled("   Enter apply · Esc cancel", Style::default().fg(MUTED)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
    frame.set_cursor_position((cursor_x(inner, shown), inner.y));
}

/// Draw the chat transcript with border and scrollbar.
fn draw_chat(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let lines = transcript_lines(app);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(" Chat ", Style::default().fg(MUTED)));

    let inner = block.inner(area);
    let content_width = inner.width.saturating_sub(1); // -1 for scrollbar
    let content_height = inner.height as usize;

    let total_lines = Paragraph::new(lines.clone())
        .wrap(Wrap { trim: false })
        .line_count(content_width)
        .max(1);

    let max_scroll = total_lines.saturating_sub(content_height) as u16;
    app.update_scroll_bounds(max_scroll);
    let scroll = app.scroll;

    let chat_inner = Rect {
        width: inner.width.saturating_sub(1),
        ..inner
    };
    let chat = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(block, area);
    frame.render_widget(chat, chat_inner);

    if total_lines > content_height {
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(total_lines)
            .position(scroll as usize)
            .viewport_content_length(content_height);
        let scrollbar_area = Rect {
            x: inner.x + inner.width.saturating_sub(1),
            y: inner.y,
            width: 1,
            height: inner.height,
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .style(Style::default().fg(BORDER))
                .thumb_style(Style::default().fg(MUTED)),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }
}

/// Render the transcript (or the welcome screen) into styled lines.
pub fn transcript_lines(app: &App) -> Vec<Line<'static>> {
    let messages = app.session.messages();
    if messages.is_empty() {
        return welcome_lines(app.suggestion);
    }

    let mut lines = Vec::new();
    for (idx, message) in messages.iter().enumerate() {
        match (&message.role, &message.kind) {
            (Role::User, MessageKind::Text(text)) => {
                lines.push(badge(" ▸ You ", ACCENT));
                push_text(&mut lines, text, Style::default().fg(ACCENT));
            }
            (_, MessageKind::Thinking) => {
                lines.push(badge(" ◆ Processing ", MUTED));
                let dots = THINKING_FRAMES[(app.frame % THINKING_FRAMES.len() as u64) as usize];
                lines.push(Line::from(vec![
                    Span::styled(format!(" {dots} "), Style::default().fg(ACCENT)),
                    Span::styled(
                        "Searching and synthesizing...",
                        Style::default().fg(MUTED),
                    ),
                ]));
            }
            (_, MessageKind::Result(response)) => {
                lines.push(badge(" ◆ Assistant ", ACCENT2));
                push_result(&mut lines, response);
            }
            (_, MessageKind::Error(text)) => {
                lines.push(badge(" ◆ Assistant ", ERROR));
                push_text(&mut lines, text, Style::default().fg(ERROR));
            }
            (Role::Assistant, MessageKind::Text(text)) => {
                lines.push(badge(" ◆ Assistant ", ACCENT2));
                push_text(&mut lines, text, Style::default().fg(TEXT));
            }
        }
        if idx + 1 < messages.len() {
            lines.push(Line::from(""));
        }
    }
    // Trailing padding so the last message always scrolls fully into view.
    lines.push(Line::from(""));
    lines
}

fn welcome_lines(selected: Option<usize>) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("◈", Style::default().fg(MUTED))).centered(),
        Line::from(Span::styled(
            "What shall we explore?",
            Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::from(""),
        Line::from(Span::styled(
            "Ask anything. The backend searches the web, synthesizes sources,",
            Style::default().fg(MUTED),
        ))
        .centered(),
        Line::from(Span::styled(
            "and returns structured research with citations.",
            Style::default().fg(MUTED),
        ))
        .centered(),
        Line::from(""),
    ];
    for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
        let style = if selected == Some(i) {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(MUTED)
        };
        lines.push(Line::from(Span::styled(format!("[ {suggestion} ]"), style)).centered());
    }
    lines.push(Line::from(""));
    lines.push(
        Line::from(Span::styled(
            "Tab to pick a suggestion",
            Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
        ))
        .centered(),
    );
    lines
}

fn push_result(lines: &mut Vec<Line<'static>>, response: &ResearchResponse) {
    lines.push(Line::from(Span::styled(
        format!(" {}", response.topic),
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    push_text(lines, &response.summary, Style::default().fg(TEXT));

    let label = Style::default().fg(MUTED).add_modifier(Modifier::BOLD);
    if !response.sources.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(" SOURCES", label)));
        for source in &response.sources {
            lines.push(Line::from(Span::styled(
                format!("  ↗ {}", truncate_chars(source, SOURCE_DISPLAY_CHARS)),
                Style::default().fg(ACCENT2),
            )));
        }
    }
    if !response.tools_used.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(" TOOLS USED", label)));
        let tools: Vec<Span<'static>> = response
            .tools_used
            .iter()
            .flat_map(|tool| {
                [
                    Span::raw(" "),
                    Span::styled(format!("[{tool}]"), Style::default().fg(SUCCESS)),
                ]
            })
            .collect();
        lines.push(Line::from(tools));
    }
}

fn push_text(lines: &mut Vec<Line<'static>>, text: &str, style: Style) {
    for line in text.lines() {
        lines.push(Line::from(Span::styled(format!(" {line}"), style)));
    }
}

fn badge(label: &'static str, bg: Color) -> Line<'static> {
    Line::from(Span::styled(
        label,
        Style::default()
            .fg(Color::Rgb(10, 10, 15))
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Cut `s` to `max` characters, marking the cut with `…`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push('…');
    out
}

/// Draw the input box; disabled while a request is in flight.
fn draw_input(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let loading = app.session.is_loading();
    let (title, border) = if loading {
        (" Researching... ", ACCENT_DIM)
    } else {
        (" Query ", ACCENT)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(Span::styled(title, Style::default().fg(border)));
    let inner = block.inner(area);

    // One leading pad cell plus one cell for the cursor.
    let editable = inner.width.saturating_sub(2) as usize;
    let all: Vec<&str> = app.input.split('\n').collect();
    let start = all.len().saturating_sub(MAX_INPUT_LINES);
    let visible = &all[start..];
    // The line being typed scrolls sideways so its tail stays in view.
    let cursor_line = tail_chars(visible.last().copied().unwrap_or(""), editable);

    let lines: Vec<Line<'_>> = if app.input.is_empty() {
        vec![Line::from(Span::styled(
            " Enter your research query...",
            Style::default().fg(MUTED),
        ))]
    } else {
        let (earlier, _) = visible.split_at(visible.len() - 1);
        earlier
            .iter()
            .copied()
            .chain(std::iter::once(cursor_line))
            .map(|l| Line::from(Span::styled(format!(" {l}"), Style::default().fg(TEXT))))
            .collect()
    };
    let row = u16::try_from(visible.len().saturating_sub(1)).unwrap_or(u16::MAX);

    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(lines), inner);

    if !loading && !app.config_open {
        let y = inner.y.saturating_add(row.min(inner.height.saturating_sub(1)));
        frame.set_cursor_position((cursor_x(inner, cursor_line), y));
    }
}

/// The last `max` characters of `s`.
fn tail_chars(s: &str, max: usize) -> &str {
    let count = s.chars().count();
    if count <= max {
        return s;
    }
    match s.char_indices().nth(count - max) {
        Some((at, _)) => &s[at..],
        None => "",
    }
}

/// Column just past `text`, drawn after a one-cell pad, kept inside `inner`.
fn cursor_x(inner: Rect, text: &str) -> u16 {
    let offset = u16::try_from(text.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(1);
    let last_col = inner.x.saturating_add(inner.width.saturating_sub(1));
    inner.x.saturating_add(offset).min(last_col)
}

fn draw_hint(frame: &mut Frame<'_>, area: Rect) {
    let hint = Paragraph::new(Line::from(Span::styled(
        " Enter to send · Alt+Enter for new line · Ctrl+↑/↓ history",
        Style::default().fg(MUTED),
    )));
    frame.render_widget(hint, area);
}

fn draw_sidebar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(STATS_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(CONNECTED_HEIGHT),
        ])
        .split(area);

    draw_stats(frame, app, rows[0]);
    draw_history(frame, app, rows[1]);
    draw_connected(frame, app, rows[2]);
}

fn sidebar_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(title, Style::default().fg(MUTED)))
}

fn draw_stats(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let stats = app.session.stats();
    let value = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    let label = Style::default().fg(MUTED);
    let cell = |v: String, l: &'static str| {
        [
            Span::styled(format!(" {v:>5} "), value),
            Span::styled(format!("{l:<10}"), label),
        ]
    };

    let [a, b] = cell(stats.queries.to_string(), "Queries");
    let [c, d] = cell(stats.sources.to_string(), "Sources");
    let [e, f] = cell(stats.tools.to_string(), "Tool Calls");
    let [g, h] = cell(stats.last_elapsed_label(), "Last (s)");
    let lines = vec![
        Line::from(vec![a, b]),
        Line::from(vec![c, d]),
        Line::from(vec![e, f]),
        Line::from(vec![g, h]),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(sidebar_block(" Session Stats ")),
        area,
    );
}

fn draw_history(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let width = area.width.saturating_sub(4) as usize;
    let mut lines = Vec::new();
    if app.session.history().len() == 0 {
        lines.push(Line::from(Span::styled(
            " No queries yet",
            Style::default().fg(MUTED),
        )));
    }
    for (i, entry) in app.session.history().enumerate() {
        let style = if app.history_cursor == Some(i) {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT)
        };
        let first_line = entry.query.lines().next().unwrap_or("");
        lines.push(Line::from(Span::styled(
            format!(" {}", truncate_chars(first_line, width.saturating_sub(1))),
            style,
        )));
        lines.push(Line::from(Span::styled(
            format!(" {}", entry.time.format("%H:%M")),
            Style::default().fg(MUTED),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines).block(sidebar_block(" History ")),
        area,
    );
}

fn draw_connected(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let (status, color) = match &app.backend {
        BackendStatus::Unknown => ("checking...".to_string(), MUTED),
        BackendStatus::Online(s) => (format!("online ({s})"), SUCCESS),
        BackendStatus::Unreachable(s) => (s.clone(), ERROR),
    };
    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", app.session.endpoint()),
            Style::default().fg(TEXT),
        )),
        Line::from(Span::styled(" POST /research", Style::default().fg(SUCCESS))),
        Line::from(Span::styled(format!(" {status}"), Style::default().fg(color))),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(sidebar_block(" Connected To ")),
        area,
    );
}

/// Draw the status bar at the bottom.
fn draw_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let left = if app.status.is_empty() {
        Line::from(vec![
            Span::styled(" Ctrl+C", Style::default().fg(MUTED)),
            Span::styled(" quit", Style::default().fg(BORDER)),
            Span::styled("  Tab", Style::default().fg(MUTED)),
            Span::styled(" suggestions", Style::default().fg(BORDER)),
            Span::styled("  PgUp/PgDn", Style::default().fg(MUTED)),
            Span::styled(" scroll", Style::default().fg(BORDER)),
        ])
    } else {
        Line::from(Span::styled(
            format!(" {}", app.status),
            Style::default().fg(ACCENT),
        ))
    };
    frame.render_widget(Paragraph::new(left), area);
}

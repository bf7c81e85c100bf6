//! Ratatui-based search form and result viewer.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{ExecutableCommand, execute};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

use crate::model::types::SearchResult;
use crate::render::{self, Rendered, ViewMode};
use crate::search::client::{SearchClient, SearchError};
use crate::search::query::{Field, SearchCriteria};
use crate::ui::state::{RequestId, UiEvent, UiState};

const TITLE: &str = "SOF Week Agenda Search";
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

type Completion = (RequestId, Result<SearchResult, SearchError>);

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Quit,
    /// Start a request for these criteria under this id.
    Submit(RequestId, SearchCriteria),
}

pub struct App {
    pub state: UiState,
    next_request: RequestId,
    scroll: u16,
    spinner_tick: usize,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            state: UiState::default(),
            next_request: 0,
            scroll: 0,
            spinner_tick: 0,
            tx,
            rx,
        }
    }

    /// Record a submission and hand back what to fetch.
    fn begin_submit(&mut self) -> Action {
        self.next_request += 1;
        let request_id = self.next_request;
        self.state.apply(UiEvent::SubmitStarted { request_id });
        self.scroll = 0;
        Action::Submit(request_id, self.state.criteria.clone())
    }

    /// Apply a finished request to the state.
    pub fn complete(&mut self, request_id: RequestId, outcome: Result<SearchResult, SearchError>) {
        let event = match outcome {
            Ok(result) => UiEvent::SubmitSucceeded { request_id, result },
            Err(_) => UiEvent::SubmitFailed { request_id },
        };
        self.state.apply(event);
    }

    /// Drain finished requests without blocking.
    fn poll_completions(&mut self) {
        if self.state.loading {
            self.spinner_tick = self.spinner_tick.wrapping_add(1);
        }
        loop {
            match self.rx.try_recv() {
                Ok((request_id, outcome)) => self.complete(request_id, outcome),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn edit_focused(&mut self, f: impl FnOnce(&mut String)) {
        let field = self.state.focus;
        let mut value = self.state.criteria.get(field).to_string();
        f(&mut value);
        self.state.apply(UiEvent::Edit(field, value));
    }
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => return Action::Quit,
        KeyCode::Char('c') if ctrl => return Action::Quit,
        KeyCode::Enter => return app.begin_submit(),
        KeyCode::Char('r') if ctrl => {
            app.state.apply(UiEvent::Reset);
            app.scroll = 0;
        }
        KeyCode::Char('v') if ctrl => {
            app.state.apply(UiEvent::ToggleView);
            app.scroll = 0;
        }
        KeyCode::F(2) => {
            app.state.apply(UiEvent::ToggleView);
            app.scroll = 0;
        }
        KeyCode::Char('u') if ctrl => app.edit_focused(String::clear),
        KeyCode::Tab | KeyCode::Down => app.state.apply(UiEvent::FocusNext),
        KeyCode::BackTab | KeyCode::Up => app.state.apply(UiEvent::FocusPrev),
        KeyCode::PageDown => app.scroll = app.scroll.saturating_add(10),
        KeyCode::PageUp => app.scroll = app.scroll.saturating_sub(10),
        KeyCode::Backspace => app.edit_focused(|v| {
            v.pop();
        }),
        KeyCode::Char(c) if !ctrl => app.edit_focused(|v| v.push(c)),
        _ => {}
    }
    Action::None
}

/// Run the interactive UI until the user quits.
///
/// Requests run on `handle`; the UI thread only polls for their results.
pub fn run_tui(client: SearchClient, handle: tokio::runtime::Handle) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let result = event_loop(&mut terminal, &mut app, &client, &handle);

    teardown_terminal()?;
    terminal.show_cursor().ok();
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &SearchClient,
    handle: &tokio::runtime::Handle,
) -> Result<()> {
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(100);

    loop {
        app.poll_completions();
        terminal.draw(|f| draw(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(0));

        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
        {
            match handle_key(app, key) {
                Action::Quit => break,
                Action::Submit(request_id, criteria) => {
                    spawn_request(client, handle, app.tx.clone(), request_id, criteria)
                }
                Action::None => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }

    Ok(())
}

fn spawn_request(
    client: &SearchClient,
    handle: &tokio::runtime::Handle,
    tx: Sender<Completion>,
    request_id: RequestId,
    criteria: SearchCriteria,
) {
    tracing::debug!(request_id, "request_spawned");
    let client = client.clone();
    handle.spawn(async move {
        let outcome = client.dispatch(&criteria).await;
        let _ = tx.send((request_id, outcome));
    });
}

fn teardown_terminal() -> Result<()> {
    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;
    Ok(())
}

pub fn draw(f: &mut Frame, app: &App) {
    let state = &app.state;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(6),
            Constraint::Length(2),
            Constraint::Min(3),
        ])
        .split(f.area());

    f.render_widget(
        Paragraph::new(TITLE.bold().cyan()).alignment(Alignment::Center),
        chunks[0],
    );

    draw_form(f, chunks[1], state);
    draw_status(f, chunks[2], app);

    if state.show_results()
        && let Some(result) = &state.result
    {
        draw_results(f, chunks[3], result, state.view_mode, app.scroll);
    }
}

fn draw_form(f: &mut Frame, area: Rect, state: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3)])
        .split(area);

    for (row, pair) in rows.iter().zip(Field::all().chunks(2)) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row);
        for (col, field) in cols.iter().zip(pair) {
            draw_input(f, *col, state, *field);
        }
    }
}

fn draw_input(f: &mut Frame, area: Rect, state: &UiState, field: Field) {
    let focused = state.focus == field;
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let value = state.criteria.get(field);
    let text = if value.is_empty() {
        Span::styled(field.placeholder(), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(value)
    };
    let block = Block::default()
        .title(field.label())
        .borders(Borders::ALL)
        .border_style(border);
    f.render_widget(Paragraph::new(text).block(block), area);

    if focused {
        let width = value.chars().count() as u16;
        let x = (area.x + 1 + width).min(area.right().saturating_sub(2));
        f.set_cursor_position((x, area.y + 1));
    }
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let mut lines = Vec::new();

    if state.show_loading() {
        let frame = SPINNER[app.spinner_tick % SPINNER.len()];
        lines.push(Line::from(format!("{frame} Searching...")).cyan());
    } else if let Some(error) = &state.error {
        lines.push(Line::from(error.as_str()).red());
    } else {
        lines.push(Line::default());
    }

    let mut hints = vec!["Enter search", "Tab field", "^V view"];
    if state.can_reset() {
        hints.push("^R reset");
    }
    hints.push("Esc quit");
    lines.push(Line::from(hints.join(" · ")).dark_gray());

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_results(f: &mut Frame, area: Rect, result: &SearchResult, mode: ViewMode, scroll: u16) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let tabs = Tabs::new(ViewMode::all().iter().map(|m| m.name()))
        .select(mode.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    f.render_widget(tabs, chunks[0]);

    let lines = match render::render(result, mode) {
        Rendered::Cards(cards) => card_lines(&cards),
        Rendered::Raw(text) => text.lines().map(|l| Line::from(l.to_string())).collect(),
    };
    let block = Block::default()
        .title(format!("Search Results ({})", result.len()))
        .borders(Borders::ALL);
    let body = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(body, chunks[1]);
}

fn card_lines(cards: &[render::Card]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, card) in cards.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from("─".repeat(40)).dark_gray());
        }
        for field in &card.fields {
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", field.label), Style::default().fg(Color::Gray)),
                Span::raw(field.value.clone()),
            ]));
        }
    }
    lines
}

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use estate_register::{Listing, ListingRegistry};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

/// Which bound of the cost range the popup is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeField {
    Min,
    Max,
}

/// Digits typed into the cost filter popup, one buffer per bound.
#[derive(Debug, Clone)]
pub struct RangeInput {
    pub min: String,
    pub max: String,
    pub field: RangeField,
}

impl RangeInput {
    fn new() -> Self {
        RangeInput {
            min: String::new(),
            max: String::new(),
            field: RangeField::Min,
        }
    }

    fn active_mut(&mut self) -> &mut String {
        match self.field {
            RangeField::Min => &mut self.min,
            RangeField::Max => &mut self.max,
        }
    }

    fn toggle_field(&mut self) {
        self.field = match self.field {
            RangeField::Min => RangeField::Max,
            RangeField::Max => RangeField::Min,
        };
    }

    /// Parsed bounds. An empty minimum means 0, an empty maximum means no
    /// upper limit. `None` when a typed value does not fit an `i64`.
    fn bounds(&self) -> Option<(i64, i64)> {
        let min = if self.min.is_empty() {
            0
        } else {
            self.min.parse().ok()?
        };
        let max = if self.max.is_empty() {
            i64::MAX
        } else {
            self.max.parse().ok()?
        };
        Some((min, max))
    }
}

pub struct App {
    pub registry: ListingRegistry,
    pub rows: Vec<Listing>,
    pub state: TableState,
    pub active_range: Option<(i64, i64)>,
    pub range_input: Option<RangeInput>,
}

impl App {
    pub fn new(registry: ListingRegistry) -> Self {
        let rows = registry.sorted_by_date_desc();

        let mut state = TableState::default();
        if !rows.is_empty() {
            state.select(Some(0));
        }

        Self {
            registry,
            rows,
            state,
            active_range: None,
            range_input: None,
        }
    }

    pub fn apply_filter(&mut self, min: i64, max: i64) {
        self.active_range = Some((min, max));

        let mut rows = self.registry.filter_by_cost(min, max);
        rows.sort_by(|a, b| b.registered_on().cmp(&a.registered_on()));
        self.rows = rows;

        self.reset_selection();
    }

    pub fn clear_filter(&mut self) {
        self.active_range = None;
        self.rows = self.registry.sorted_by_date_desc();
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        if self.rows.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    /// Combined cost of the rows on screen. Wide accumulator so a table of
    /// huge costs cannot overflow the sum.
    pub fn total_value(&self) -> i128 {
        self.rows.iter().map(|l| l.cost() as i128).sum()
    }

    pub fn next(&mut self) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                let next = i + 20;
                if next >= len {
                    len - 1
                } else {
                    next
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let i = match self.state.selected() {
            Some(i) => {
                if i < 20 {
                    0
                } else {
                    i - 20
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            // The popup owns the keyboard while it is open.
            if app.range_input.is_some() {
                handle_popup_key(app, key.code);
                continue;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('f') => app.range_input = Some(RangeInput::new()),
                KeyCode::Char('c') => app.clear_filter(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.state.select(Some(0)),
                KeyCode::End => {
                    if !app.rows.is_empty() {
                        app.state.select(Some(app.rows.len() - 1));
                    }
                }
                _ => {}
            }
        }
    }
}

fn handle_popup_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.range_input = None;
        }
        KeyCode::Tab => {
            if let Some(input) = app.range_input.as_mut() {
                input.toggle_field();
            }
        }
        KeyCode::Backspace => {
            if let Some(input) = app.range_input.as_mut() {
                input.active_mut().pop();
            }
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if let Some(input) = app.range_input.as_mut() {
                input.active_mut().push(c);
            }
        }
        KeyCode::Enter => {
            // An unparseable bound keeps the popup open for correction.
            let bounds = app.range_input.as_ref().and_then(|input| input.bounds());
            if let Some((min, max)) = bounds {
                app.apply_filter(min, max);
                app.range_input = None;
            }
        }
        _ => {}
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Listing table
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_table(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);

    if app.range_input.is_some() {
        render_filter_popup(f, app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let spans = vec![
        Span::styled(
            "Estate Register",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("{} of {} listings", app.rows.len(), app.registry.len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Total value: {} руб.", app.total_value()),
            Style::default().fg(Color::Green),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Owner", "Registered", "Cost (руб.)"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.rows.iter().map(|listing| {
        let cells = vec![
            Cell::from(truncate(listing.owner(), 40)),
            Cell::from(listing.registered_on().format("%Y.%m.%d").to_string()),
            Cell::from(listing.cost().to_string()).style(Style::default().fg(Color::Green)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(42),
            Constraint::Length(12),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Listings "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);

    let mut spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, app.rows.len()),
        Style::default().fg(Color::Cyan),
    )];

    if let Some((min, max)) = app.active_range {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("Filter: {}", range_label(min, max)),
            Style::default().fg(Color::Green),
        ));
        spans.push(Span::raw(" ("));
        spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(" clear)"));
    }

    spans.push(Span::raw(" | "));
    spans.push(Span::styled("f", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Filter | "));
    spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Nav | "));
    spans.push(Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Fast | "));
    spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_filter_popup(f: &mut Frame, app: &App) {
    let input = match &app.range_input {
        Some(input) => input,
        None => return,
    };

    let active = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let inactive = Style::default().fg(Color::White);
    let hint = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC);

    let field_line = |label: &str, value: &str, is_active: bool| {
        let shown = if value.is_empty() && is_active {
            "_".to_string()
        } else if is_active {
            format!("{}_", value)
        } else {
            value.to_string()
        };
        Line::from(vec![
            Span::styled(
                format!("  {} ", label),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(shown, if is_active { active } else { inactive }),
        ])
    };

    let content = vec![
        Line::from(""),
        field_line("Min cost:", &input.min, input.field == RangeField::Min),
        field_line("Max cost:", &input.max, input.field == RangeField::Max),
        Line::from(""),
        Line::from(Span::styled(
            "  Empty min = 0, empty max = no limit",
            hint,
        )),
        Line::from(Span::styled(
            "  Tab switch | Enter apply | Esc cancel",
            hint,
        )),
    ];

    let area = centered_rect(46, 8, f.size());
    f.render_widget(Clear, area);

    let popup = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Cost Filter "),
    );

    f.render_widget(popup, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Character-based truncation. Owner names are Cyrillic, so byte slicing
/// would split a code point.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn range_label(min: i64, max: i64) -> String {
    if max == i64::MAX {
        format!("{} руб. and up", min)
    } else {
        format!("{} to {} руб.", min, max)
    }
}

// ============================================================================
// TESTS
// ============================================================================

//! Terminal UI for the request dashboard
//!
//! Draws the controller's view model with ratatui and turns key presses into
//! [`Action`]s for the run loop.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::dashboard::controller::Dashboard;
use crate::dashboard::filters::FilterInputs;
use crate::dashboard::view::{request_detail, Accent, RequestRow, StatCard};
use crate::format::{MethodClass, PerfClass, Region, StatusClass};

/// What the run loop should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Refresh,
    LoadMore,
    ApplyFilters(FilterInputs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterField {
    Path,
    Method,
    Status,
}

impl FilterField {
    fn next(self) -> Self {
        match self {
            Self::Path => Self::Method,
            Self::Method => Self::Status,
            Self::Status => Self::Path,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Path => "Path contains",
            Self::Method => "Method",
            Self::Status => "Status code",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Mode {
    Browse,
    EditFilters { draft: FilterDraft, field: FilterField },
    /// Detail overlay for the request with this id
    Detail(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
struct FilterDraft {
    path: String,
    method: String,
    status: String,
}

impl FilterDraft {
    fn field_mut(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::Path => &mut self.path,
            FilterField::Method => &mut self.method,
            FilterField::Status => &mut self.status,
        }
    }

    fn field(&self, field: FilterField) -> &str {
        match field {
            FilterField::Path => &self.path,
            FilterField::Method => &self.method,
            FilterField::Status => &self.status,
        }
    }

    fn to_inputs(&self) -> FilterInputs {
        FilterInputs {
            path: Some(self.path.clone()),
            method: Some(self.method.clone()),
            status: Some(self.status.clone()),
        }
    }
}

/// Application state for the terminal dashboard
pub struct DashboardApp {
    pub dashboard: Dashboard,
    pub base_url: String,
    pub last_update: Option<DateTime<Local>>,
    selected: usize,
    mode: Mode,
    /// Last applied control values, used to prefill the filter editor
    draft: FilterDraft,
}

impl DashboardApp {
    pub fn new(dashboard: Dashboard, base_url: String) -> Self {
        Self {
            dashboard,
            base_url,
            last_update: None,
            selected: 0,
            mode: Mode::Browse,
            draft: FilterDraft::default(),
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_editing_filters(&self) -> bool {
        matches!(self.mode, Mode::EditFilters { .. })
    }

    pub fn detail_open(&self) -> bool {
        matches!(self.mode, Mode::Detail(_))
    }

    /// Keep the selection inside the table after rows change
    pub fn clamp_selection(&mut self) {
        let len = self.dashboard.rows().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
        if let Mode::Detail(request_id) = &self.mode {
            if self.detail_row(request_id).is_none() {
                self.mode = Mode::Browse;
            }
        }
    }

    fn detail_row(&self, request_id: &str) -> Option<&RequestRow> {
        self.dashboard
            .rows()
            .iter()
            .find(|row| row.record.request_id == request_id)
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match std::mem::replace(&mut self.mode, Mode::Browse) {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Detail(request_id) => {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => {}
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Action::Quit,
                    _ => self.mode = Mode::Detail(request_id),
                }
                Action::None
            }
            Mode::EditFilters { mut draft, field } => match key.code {
                KeyCode::Esc => Action::None,
                KeyCode::Enter => {
                    let inputs = draft.to_inputs();
                    self.draft = draft;
                    Action::ApplyFilters(inputs)
                }
                KeyCode::Tab | KeyCode::Down => {
                    self.mode = Mode::EditFilters {
                        draft,
                        field: field.next(),
                    };
                    Action::None
                }
                KeyCode::Backspace => {
                    draft.field_mut(field).pop();
                    self.mode = Mode::EditFilters { draft, field };
                    Action::None
                }
                KeyCode::Char(c) => {
                    draft.field_mut(field).push(c);
                    self.mode = Mode::EditFilters { draft, field };
                    Action::None
                }
                _ => {
                    self.mode = Mode::EditFilters { draft, field };
                    Action::None
                }
            },
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => Action::Refresh,
            KeyCode::Char('m') | KeyCode::Char('M') | KeyCode::Char(' ') => Action::LoadMore,
            KeyCode::Char('f') | KeyCode::Char('F') => {
                self.mode = Mode::EditFilters {
                    draft: self.draft.clone(),
                    field: FilterField::Path,
                };
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.dashboard.rows().len() {
                    self.selected += 1;
                }
                Action::None
            }
            KeyCode::Enter => {
                if let Some(row) = self.dashboard.rows().get(self.selected) {
                    self.mode = Mode::Detail(row.record.request_id.clone());
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Render the UI
    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Header
                Constraint::Length(4), // Stat cards
                Constraint::Min(8),    // Table
                Constraint::Length(3), // Footer
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_stats(f, chunks[1]);
        self.render_table(f, chunks[2]);
        self.render_footer(f, chunks[3]);

        match &self.mode {
            Mode::EditFilters { draft, field } => self.render_filter_editor(f, draft, *field),
            Mode::Detail(request_id) => {
                if let Some(row) = self.detail_row(request_id) {
                    self.render_detail(f, row);
                }
            }
            Mode::Browse => {}
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let last_update = self
            .last_update
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "Never".to_string());

        let title = vec![
            Line::from(vec![
                Span::styled(
                    "TimeGlass Dashboard",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" - "),
                Span::styled(self.base_url.clone(), Style::default().fg(Color::Yellow)),
                Span::raw("  |  Last update: "),
                Span::styled(last_update, Style::default().fg(Color::Green)),
            ]),
            Line::from(vec![
                Span::raw("Filters: "),
                Span::styled(
                    self.dashboard.filters().to_string(),
                    Style::default().fg(Color::Magenta),
                ),
            ]),
            Line::from(Span::styled(
                "q quit | r refresh | m load more | f filters | ↑/↓ select | Enter details",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let paragraph = Paragraph::new(title).block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_stats(&self, f: &mut Frame, area: Rect) {
        match self.dashboard.stats() {
            Region::Ready(cards) if !cards.is_empty() => {
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints(vec![Constraint::Ratio(1, cards.len() as u32); cards.len()])
                    .split(area);
                for (card, column) in cards.iter().zip(columns.iter()) {
                    render_card(f, card, *column);
                }
            }
            region => render_region_placeholder(f, region, area, "Statistics"),
        }
    }

    fn render_table(&self, f: &mut Frame, area: Rect) {
        let title = format!("Requests ({} shown)", self.dashboard.rows().len());

        let rows = match self.dashboard.table() {
            Region::Ready(rows) => rows,
            region => {
                render_region_placeholder(f, region, area, &title);
                return;
            }
        };

        let header_cells = ["Time", "Method", "Path", "Status", "Duration", "CPU", "Memory"]
            .iter()
            .map(|h| {
                Cell::from(*h).style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            });
        let header = Row::new(header_cells).height(1).bottom_margin(1);

        let table_rows: Vec<Row> = if rows.is_empty() {
            vec![Row::new(vec![Cell::from("No requests recorded yet.")])]
        } else {
            rows.iter()
                .map(|r| {
                    Row::new(vec![
                        Cell::from(r.start_time.clone()),
                        Cell::from(r.method.clone()).style(method_style(r.method_class)),
                        Cell::from(r.path.clone()),
                        Cell::from(r.status.clone()).style(status_style(r.status_class)),
                        Cell::from(r.duration.clone()).style(perf_style(r.duration_class)),
                        Cell::from(r.cpu.clone()).style(perf_style(r.cpu_class)),
                        Cell::from(r.memory.clone()).style(perf_style(r.memory_class)),
                    ])
                    .height(1)
                })
                .collect()
        };

        let table = Table::new(
            table_rows,
            [
                Constraint::Length(19),
                Constraint::Length(7),
                Constraint::Min(20),
                Constraint::Length(6),
                Constraint::Length(10),
                Constraint::Length(7),
                Constraint::Length(7),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .column_spacing(1);

        let mut state = TableState::default();
        if !rows.is_empty() {
            state.select(Some(self.selected));
        }
        f.render_stateful_widget(table, area, &mut state);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        if let Some(notice) = self.dashboard.notice() {
            spans.push(Span::styled(
                format!("{}  ", notice),
                Style::default().fg(Color::Red),
            ));
        }
        if self.dashboard.load_more_visible() {
            spans.push(Span::styled(
                "[m] Load more",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        } else if !self.dashboard.rows().is_empty() {
            spans.push(Span::styled(
                "End of results",
                Style::default().fg(Color::DarkGray),
            ));
        }

        let paragraph =
            Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_filter_editor(&self, f: &mut Frame, draft: &FilterDraft, active: FilterField) {
        let area = centered_rect(60, 9, f.area());
        let lines: Vec<Line> = [FilterField::Path, FilterField::Method, FilterField::Status]
            .into_iter()
            .map(|field| {
                let style = if field == active {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(format!("{:<14}", field.label()), style),
                    Span::raw(draft.field(field).to_string()),
                    Span::raw(if field == active { "_" } else { "" }),
                ])
            })
            .chain(std::iter::once(Line::from(Span::styled(
                "Tab next field | Enter apply | Esc cancel",
                Style::default().fg(Color::DarkGray),
            ))))
            .collect();

        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Filters")),
            area,
        );
    }

    fn render_detail(&self, f: &mut Frame, row: &RequestRow) {
        let fields = request_detail(&row.record);
        let area = centered_rect(70, fields.len() as u16 + 2, f.area());
        let lines: Vec<Line> = fields
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{:<16}", label), Style::default().fg(Color::Cyan)),
                    Span::raw(value),
                ])
            })
            .collect();

        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Request {}", row.record.request_id)),
            ),
            area,
        );
    }
}

fn render_card(f: &mut Frame, card: &StatCard, area: Rect) {
    let color = match card.accent {
        Accent::Blue => Color::Blue,
        Accent::Green => Color::Green,
        Accent::Yellow => Color::Yellow,
        Accent::Red => Color::Red,
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(
        card.value.clone(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL).title(card.title));
    f.render_widget(paragraph, area);
}

fn render_region_placeholder<T>(f: &mut Frame, region: &Region<T>, area: Rect, title: &str) {
    let line = match region {
        Region::Loading(message) => {
            Line::from(Span::styled(message.clone(), Style::default().fg(Color::Yellow)))
        }
        Region::Error(message) => Line::from(vec![
            Span::styled(
                "Error: ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(message.clone(), Style::default().fg(Color::Red)),
        ]),
        Region::Ready(_) => Line::from(Span::styled(
            "Waiting for data...",
            Style::default().fg(Color::DarkGray),
        )),
    };
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string()),
    );
    f.render_widget(paragraph, area);
}

fn status_style(class: StatusClass) -> Style {
    let color = match class {
        StatusClass::Success => Color::Green,
        StatusClass::Redirect => Color::Blue,
        StatusClass::ClientError => Color::Yellow,
        StatusClass::ServerError => Color::Red,
        StatusClass::Default => Color::Gray,
    };
    Style::default().fg(color)
}

fn method_style(class: MethodClass) -> Style {
    let color = match class {
        MethodClass::Get => Color::Green,
        MethodClass::Post => Color::Blue,
        MethodClass::Put => Color::Yellow,
        MethodClass::Delete => Color::Red,
        MethodClass::Default => Color::Gray,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn perf_style(class: PerfClass) -> Style {
    let color = match class {
        PerfClass::Good => Color::Green,
        PerfClass::Warning => Color::Yellow,
        PerfClass::Critical => Color::Red,
        PerfClass::Neutral => Color::Gray,
    };
    Style::default().fg(color)
}

/// A rectangle `percent_x` wide and `height` rows tall, centred in `r`
fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height - height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequestRecord;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_rows(n: usize) -> DashboardApp {
        let mut dashboard = Dashboard::new(50);
        let records: Vec<RequestRecord> = (0..n)
            .map(|i| {
                serde_json::from_value(serde_json::json!({
                    "request_id": format!("r{}", i),
                    "method": "GET",
                    "path": "/health",
                    "status_code": 200,
                    "duration_ms": 12.0
                }))
                .unwrap()
            })
            .collect();
        dashboard.render_requests(&records);
        DashboardApp::new(dashboard, "http://localhost:8000".to_string())
    }

    #[test]
    fn test_browse_keys() {
        let mut app = app_with_rows(3);
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(app.handle_key(key(KeyCode::Char('r'))), Action::Refresh);
        assert_eq!(app.handle_key(key(KeyCode::Char('m'))), Action::LoadMore);

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected(), 2);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected(), 1);
    }

    #[test]
    fn test_filter_editor_collects_inputs() {
        let mut app = app_with_rows(0);
        assert_eq!(app.handle_key(key(KeyCode::Char('f'))), Action::None);
        assert!(app.is_editing_filters());

        for c in "/api".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Tab));
        for c in "5000".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Backspace));

        let action = app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            action,
            Action::ApplyFilters(FilterInputs {
                path: Some("/api".to_string()),
                method: Some(String::new()),
                status: Some("500".to_string()),
            })
        );
        assert!(!app.is_editing_filters());
    }

    #[test]
    fn test_filter_editor_escape_cancels() {
        let mut app = app_with_rows(0);
        app.handle_key(key(KeyCode::Char('f')));
        app.handle_key(key(KeyCode::Char('x')));
        assert_eq!(app.handle_key(key(KeyCode::Esc)), Action::None);
        assert!(!app.is_editing_filters());
        // typing 'q' in browse mode quits again
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), Action::Quit);
    }

    #[test]
    fn test_detail_opens_and_closes() {
        let mut app = app_with_rows(2);
        app.handle_key(key(KeyCode::Enter));
        assert!(app.detail_open());
        assert_eq!(app.handle_key(key(KeyCode::Char('x'))), Action::None);
        assert!(app.detail_open());
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.detail_open());
    }

    #[test]
    fn test_render_does_not_panic() {
        let mut app = app_with_rows(3);
        app.handle_key(key(KeyCode::Enter));
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(text.contains("TimeGlass Dashboard"));
        assert!(text.contains("/request/r0"));
    }

    #[test]
    fn test_detail_follows_record_across_reset_load() {
        let mut app = app_with_rows(3);
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.detail_open());

        // a reset load that no longer contains r1 closes the overlay
        let query = app.dashboard.begin_requests(true).unwrap();
        let others: Vec<RequestRecord> = (0..5)
            .map(|i| {
                serde_json::from_value(serde_json::json!({
                    "request_id": format!("other{}", i),
                    "path": "/other"
                }))
                .unwrap()
            })
            .collect();
        app.dashboard.finish_requests(&query, Ok(others));
        app.clamp_selection();
        assert!(!app.detail_open());

        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(!text.contains("/request/other1"));
    }

    #[test]
    fn test_detail_keeps_record_when_rows_shift() {
        let mut app = app_with_rows(3);
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));

        // r1 survives the reset but moves to another index
        let query = app.dashboard.begin_requests(true).unwrap();
        let shifted: Vec<RequestRecord> = ["new", "r0", "r1"]
            .iter()
            .map(|id| serde_json::from_value(serde_json::json!({ "request_id": id })).unwrap())
            .collect();
        app.dashboard.finish_requests(&query, Ok(shifted));
        app.clamp_selection();
        assert!(app.detail_open());

        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("/request/r1"));
        assert!(!text.contains("/request/r0"));
    }
}

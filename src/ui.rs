use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use expense_tracker::{
    category_slices, parse_amount, trend_points, ExpenseRecord, ExpenseTracker, Session,
    TrackerError,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Clear, Dataset, GraphType,
        Paragraph, Row, Table, TableState,
    },
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Main,
    CategoryChart,
    TrendChart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Amount,
    Category,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Name => FormField::Amount,
            FormField::Amount => FormField::Category,
            FormField::Category => FormField::Name,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            FormField::Name => FormField::Category,
            FormField::Amount => FormField::Name,
            FormField::Category => FormField::Amount,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormField::Name => "Expense Name",
            FormField::Amount => "Amount",
            FormField::Category => "Category",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default)]
pub struct ExpenseForm {
    pub name: String,
    pub amount: String,
    pub category: String,
}

impl ExpenseForm {
    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Amount => &mut self.amount,
            FormField::Category => &mut self.category,
        }
    }

    fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Amount => &self.amount,
            FormField::Category => &self.category,
        }
    }
}

pub struct App {
    pub tracker: ExpenseTracker,
    pub screen: Screen,
    pub session: Option<Session>,
    pub login: LoginForm,
    pub login_field: LoginField,
    pub form: ExpenseForm,
    pub form_field: FormField,
    /// Some while the budget prompt is open
    pub budget_input: Option<String>,
    pub status: Option<StatusMessage>,
    pub records: Vec<ExpenseRecord>,
    pub state: TableState,
    pub should_quit: bool,
}

impl App {
    pub fn new(tracker: ExpenseTracker) -> Self {
        let status = {
            let warnings = tracker.load_warnings();
            if warnings.is_empty() {
                None
            } else {
                Some(StatusMessage {
                    kind: StatusKind::Warning,
                    text: warnings.join("; "),
                })
            }
        };

        Self {
            tracker,
            screen: Screen::Login,
            session: None,
            login: LoginForm::default(),
            login_field: LoginField::Username,
            form: ExpenseForm::default(),
            form_field: FormField::Name,
            budget_input: None,
            status,
            records: Vec::new(),
            state: TableState::default(),
            should_quit: false,
        }
    }

    fn info(&mut self, text: impl Into<String>) {
        self.set_status(StatusKind::Info, text);
    }

    fn error(&mut self, text: impl Into<String>) {
        self.set_status(StatusKind::Error, text);
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind,
            text: text.into(),
        });
    }

    fn report(&mut self, err: TrackerError) {
        self.error(err.to_string());
    }

    pub fn user(&self) -> &str {
        self.session.as_ref().map(|s| s.user.as_str()).unwrap_or("")
    }

    pub fn total(&self) -> f64 {
        self.tracker.total(self.user())
    }

    /// Reload the table and raise the budget alert if the total is over the limit
    fn refresh(&mut self) {
        self.records = self.tracker.records(self.user());
        if self.records.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(self.records.len() - 1));
        }

        let alert = self
            .session
            .as_ref()
            .and_then(|session| self.tracker.budget_status(session).alert());
        if let Some(alert) = alert {
            self.set_status(StatusKind::Warning, alert);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.screen {
            Screen::Login => self.handle_login_key(key.code),
            Screen::Main if self.budget_input.is_some() => self.handle_budget_key(key.code),
            Screen::Main => self.handle_main_key(key.code),
            Screen::CategoryChart | Screen::TrendChart => match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.screen = Screen::Main,
                KeyCode::F(3) => self.show_category_chart(),
                KeyCode::F(4) => self.show_trend_chart(),
                _ => {}
            },
        }
    }

    fn handle_login_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login_field = match self.login_field {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
            }
            KeyCode::Enter => self.submit_login(),
            KeyCode::F(2) => self.submit_register(),
            KeyCode::Backspace => {
                self.login_input().pop();
            }
            KeyCode::Char(c) => self.login_input().push(c),
            _ => {}
        }
    }

    fn login_input(&mut self) -> &mut String {
        match self.login_field {
            LoginField::Username => &mut self.login.username,
            LoginField::Password => &mut self.login.password,
        }
    }

    pub fn submit_login(&mut self) {
        match self.tracker.login(&self.login.username, &self.login.password) {
            Ok(session) => {
                self.session = Some(session);
                self.login = LoginForm::default();
                self.screen = Screen::Main;
                self.status = None;
                self.refresh();
            }
            Err(e) => self.report(e),
        }
    }

    pub fn submit_register(&mut self) {
        let username = self.login.username.clone();
        match self.tracker.register(&username, &self.login.password) {
            Ok(()) => self.set_status(
                StatusKind::Warning,
                format!("User {} registered (password stored in plaintext)", username),
            ),
            Err(e) => self.report(e),
        }
    }

    fn handle_main_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.form_field = self.form_field.next(),
            KeyCode::BackTab => self.form_field = self.form_field.previous(),
            KeyCode::Enter => self.submit_expense(),
            KeyCode::F(2) => self.budget_input = Some(String::new()),
            KeyCode::F(3) => self.show_category_chart(),
            KeyCode::F(4) => self.show_trend_chart(),
            KeyCode::F(5) => self.export(),
            KeyCode::Down => self.next(),
            KeyCode::Up => self.previous(),
            KeyCode::Backspace => {
                self.form.field_mut(self.form_field).pop();
            }
            KeyCode::Char(c) => self.form.field_mut(self.form_field).push(c),
            _ => {}
        }
    }

    fn handle_budget_key(&mut self, code: KeyCode) {
        let Some(input) = self.budget_input.as_mut() else {
            return;
        };

        match code {
            KeyCode::Esc => self.budget_input = None,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            KeyCode::Enter => {
                let text = input.clone();
                self.budget_input = None;
                self.submit_budget(&text);
            }
            _ => {}
        }
    }

    pub fn submit_budget(&mut self, text: &str) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let result = parse_amount(text)
            .map_err(TrackerError::from)
            .and_then(|limit| self.tracker.set_budget(session, limit).map(|_| limit));

        match result {
            Ok(limit) => {
                self.info(format!("Budget set to {:.2}", limit));
                self.refresh();
            }
            Err(e) => self.report(e),
        }
    }

    pub fn submit_expense(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        match self.tracker.add_expense(
            session,
            &self.form.name,
            &self.form.amount,
            &self.form.category,
        ) {
            Ok(added) => {
                self.form = ExpenseForm::default();
                self.form_field = FormField::Name;
                self.info(format!("Expense added, total {:.2}", added.total));
                self.refresh();
            }
            Err(e) => self.report(e),
        }
    }

    fn show_category_chart(&mut self) {
        if self.records.is_empty() {
            self.info("Nothing to chart yet");
        } else {
            self.screen = Screen::CategoryChart;
        }
    }

    fn show_trend_chart(&mut self) {
        if self.records.is_empty() {
            self.info("Nothing to chart yet");
        } else {
            self.screen = Screen::TrendChart;
        }
    }

    fn export(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        match self.tracker.export_default(session) {
            Ok(path) => self.info(format!("Exported to {}", path.display())),
            Err(e) => self.report(e),
        }
    }

    pub fn next(&mut self) {
        let len = self.records.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.records.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
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

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            app.handle_key(key);
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    match app.screen {
        Screen::Login => render_login(f, chunks[0], app),
        Screen::Main => render_main(f, chunks[0], app),
        Screen::CategoryChart => render_category_chart(f, chunks[0], app),
        Screen::TrendChart => render_trend_chart(f, chunks[0], app),
    }

    render_status_bar(f, chunks[1], app);

    if let Some(input) = &app.budget_input {
        render_budget_prompt(f, input);
    }
}

fn input_line<'a>(label: &'a str, value: String, active: bool) -> Line<'a> {
    let style = if active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if active { "_" } else { "" };

    Line::from(vec![
        Span::styled(format!("{:>14}: ", label), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{}{}", value, cursor), style),
    ])
}

fn render_login(f: &mut Frame, area: Rect, app: &App) {
    let area = centered_rect(50, 9, area);
    let masked = "*".repeat(app.login.password.chars().count());

    let text = vec![
        Line::from(""),
        input_line(
            "Username",
            app.login.username.clone(),
            app.login_field == LoginField::Username,
        ),
        input_line("Password", masked, app.login_field == LoginField::Password),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" Login | "),
            Span::styled("F2", Style::default().fg(Color::Yellow)),
            Span::raw(" Register | "),
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::raw(" Field"),
        ]),
    ];

    let login = Paragraph::new(text).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(" Expense Tracker Login "),
    );

    f.render_widget(Clear, area);
    f.render_widget(login, area);
}

fn render_main(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with total
            Constraint::Length(5), // Form
            Constraint::Min(0),    // Expense table
        ])
        .split(area);

    render_header(f, chunks[0], app);
    render_form(f, chunks[1], app);
    render_table(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let total = app.total();
    let budget = app.session.as_ref().map(|s| s.budget_limit).unwrap_or(0.0);
    let over = budget > 0.0 && total > budget;

    let mut spans = vec![
        Span::styled(
            format!("Welcome {}", app.user()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Total: {:.2}", total),
            Style::default()
                .fg(if over { Color::Red } else { Color::Green })
                .add_modifier(Modifier::BOLD),
        ),
    ];

    spans.push(Span::raw("  |  "));
    if budget > 0.0 {
        spans.push(Span::styled(
            format!("Budget: {:.2}", budget),
            Style::default().fg(Color::White),
        ));
    } else {
        spans.push(Span::styled("No budget", Style::default().fg(Color::DarkGray)));
    }

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let text: Vec<Line> = [FormField::Name, FormField::Amount, FormField::Category]
        .iter()
        .map(|field| {
            input_line(
                field.title(),
                app.form.value(*field).to_string(),
                app.budget_input.is_none() && *field == app.form_field,
            )
        })
        .collect();

    let form = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" New Expense "),
    );

    f.render_widget(form, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["#", "Name", "Amount", "Category"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.records.iter().enumerate().map(|(i, record)| {
        let color = if record.amount < 0.0 {
            Color::Green
        } else {
            Color::Red
        };

        Row::new(vec![
            Cell::from((i + 1).to_string()),
            Cell::from(truncate(&record.name, 30)),
            Cell::from(format!("{:.2}", record.amount)).style(Style::default().fg(color)),
            Cell::from(truncate(&record.category, 20)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(32),
            Constraint::Length(12),
            Constraint::Length(22),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" Expenses ({}) ", app.records.len())),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_category_chart(f: &mut Frame, area: Rect, app: &App) {
    let slices = category_slices(&app.tracker.category_breakdown(app.user()));

    let bars: Vec<Bar> = slices
        .iter()
        .map(|slice| {
            // Bars are integral; chart in cents, negative groups flatten to zero
            let cents = (slice.amount.max(0.0) * 100.0).round() as u64;
            Bar::default()
                .value(cents)
                .label(Line::from(truncate(slice.display_name(), 12)))
                .text_value(format!("{:.1}%", slice.percent))
                .style(Style::default().fg(Color::LightMagenta))
                .value_style(Style::default().fg(Color::Black).bg(Color::LightMagenta))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Expense Distribution "),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(12)
        .bar_gap(2);

    f.render_widget(chart, area);
}

fn render_trend_chart(f: &mut Frame, area: Rect, app: &App) {
    let points = trend_points(&app.tracker.series(app.user()));
    let data: Vec<(f64, f64)> = points.iter().map(|p| (p.index as f64, p.amount)).collect();

    let x_max = (points.len().saturating_sub(1)).max(1) as f64;
    let y_min = points.iter().map(|p| p.amount).fold(0.0_f64, f64::min);
    let y_max = points.iter().map(|p| p.amount).fold(0.0_f64, f64::max).max(1.0);

    let first = points.first().map(|p| truncate(&p.name, 12)).unwrap_or_default();
    let last = points.last().map(|p| truncate(&p.name, 12)).unwrap_or_default();

    let datasets = vec![Dataset::default()
        .name("Amount")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::LightRed))
        .data(&data)];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Expense Trend "),
        )
        .x_axis(
            Axis::default()
                .title("Expense")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, x_max])
                .labels(vec![Span::raw(first), Span::raw(last)]),
        )
        .y_axis(
            Axis::default()
                .title("Amount")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{:.2}", y_min)),
                    Span::raw(format!("{:.2}", y_max)),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_budget_prompt(f: &mut Frame, input: &str) {
    let area = centered_rect(40, 5, f.size());

    let prompt = Paragraph::new(vec![
        input_line("Monthly budget", input.to_string(), true),
        Line::from(Span::styled(
            "Enter save | Esc cancel | 0 clears",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Budget "),
    );

    f.render_widget(Clear, area);
    f.render_widget(prompt, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if let Some(status) = &app.status {
        let color = match status.kind {
            StatusKind::Info => Color::Green,
            StatusKind::Warning => Color::Yellow,
            StatusKind::Error => Color::Red,
        };
        status_spans.push(Span::styled(
            format!(" {} ", status.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        status_spans.push(Span::raw("| "));
    }

    let keys: &[(&str, &str)] = match app.screen {
        Screen::Login => &[("Enter", "Login"), ("F2", "Register"), ("Esc", "Quit")],
        Screen::Main => &[
            ("Enter", "Add"),
            ("Tab", "Field"),
            ("F2", "Budget"),
            ("F3", "Pie"),
            ("F4", "Trend"),
            ("F5", "Export"),
            ("Esc", "Quit"),
        ],
        Screen::CategoryChart | Screen::TrendChart => &[("Esc", "Back")],
    };

    for (i, (key, action)) in keys.iter().enumerate() {
        if i > 0 {
            status_spans.push(Span::raw(" | "));
        }
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(format!(" {}", action)));
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expense_tracker::AppConfig;

    fn create_test_app() -> App {
        let dir = std::env::temp_dir().join(format!("expense-tracker-ui-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        App::new(ExpenseTracker::open(AppConfig::in_dir(&dir)))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::from(code));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn register_and_login(app: &mut App) {
        type_text(app, "alice");
        press(app, KeyCode::Tab);
        type_text(app, "pw");
        press(app, KeyCode::F(2));
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_login_with_unknown_user_shows_error() {
        let mut app = create_test_app();
        type_text(&mut app, "ghost");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::Login);
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn test_register_then_login_opens_main() {
        let mut app = create_test_app();
        register_and_login(&mut app);

        assert_eq!(app.screen, Screen::Main);
        assert_eq!(app.user(), "alice");
        assert!(app.login.password.is_empty());
    }

    #[test]
    fn test_add_expense_through_form() {
        let mut app = create_test_app();
        register_and_login(&mut app);

        type_text(&mut app, "Coffee");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "3.50");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Food");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.records.len(), 1);
        assert_eq!(app.total(), 3.5);
        assert!(app.form.name.is_empty());
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_invalid_amount_keeps_form() {
        let mut app = create_test_app();
        register_and_login(&mut app);

        type_text(&mut app, "Book");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "abc");
        press(&mut app, KeyCode::Enter);

        assert!(app.records.is_empty());
        assert_eq!(app.form.name, "Book");
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn test_budget_prompt_raises_alert() {
        let mut app = create_test_app();
        register_and_login(&mut app);

        type_text(&mut app, "Rent");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "150");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::F(2));
        assert!(app.budget_input.is_some());
        type_text(&mut app, "100");
        press(&mut app, KeyCode::Enter);

        assert!(app.budget_input.is_none());
        assert_eq!(app.session.as_ref().unwrap().budget_limit, 100.0);
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Warning);
    }

    #[test]
    fn test_charts_need_data() {
        let mut app = create_test_app();
        register_and_login(&mut app);

        press(&mut app, KeyCode::F(3));
        assert_eq!(app.screen, Screen::Main);

        type_text(&mut app, "Coffee");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "3.50");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::F(4));
        assert_eq!(app.screen, Screen::TrendChart);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Main);
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Café au lait grande", 8), "Café ...");
    }
}

use anyhow::Result;
use client_ledger::{
    format_currency, format_date, format_optional_currency, ClientDetail, ClientQuery, Client,
    Dataset, LoadError, LoadReport, Loaded, Page, PageMarker, RecordKind,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

/// Shown whenever a load fails outright; the details go to the log
pub const LOAD_ERROR_MESSAGE: &str = "Could not load client data. Press r to try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Reload,
    Quit,
}

pub struct App {
    pub dataset: Dataset,
    pub report: Option<LoadReport>,
    pub query: ClientQuery,
    pub state: TableState,
    pub input_mode: InputMode,
    pub search_input: String,
    pub show_detail: bool,
    pub error: Option<String>,
}

impl App {
    pub fn new(dataset: Dataset, page_size: usize) -> Self {
        let mut app = Self {
            dataset,
            report: None,
            query: ClientQuery::new().with_page_size(page_size),
            state: TableState::default(),
            input_mode: InputMode::Normal,
            search_input: String::new(),
            show_detail: false,
            error: None,
        };
        app.reset_selection();
        app
    }

    pub fn from_loaded(loaded: Loaded, page_size: usize) -> Self {
        let mut app = Self::new(loaded.dataset, page_size);
        app.report = Some(loaded.report);
        app
    }

    /// Start with nothing loaded and the generic error showing
    pub fn failed(page_size: usize) -> Self {
        let mut app = Self::new(Dataset::default(), page_size);
        app.error = Some(LOAD_ERROR_MESSAGE.to_string());
        app
    }

    /// Swap in a freshly loaded dataset. The search term is kept.
    pub fn replace_dataset(&mut self, loaded: Loaded) {
        self.dataset = loaded.dataset;
        self.report = Some(loaded.report);
        self.error = None;
        self.query.set_page(self.query.page(), &self.dataset.clients);
        self.reset_selection();
    }

    /// Keep the old data and show the generic message
    pub fn reload_failed(&mut self) {
        self.error = Some(LOAD_ERROR_MESSAGE.to_string());
    }

    pub fn current_page(&self) -> Page<&Client> {
        self.query.run(&self.dataset.clients)
    }

    pub fn selected_client(&self) -> Option<&Client> {
        let page = self.current_page();
        self.state
            .selected()
            .and_then(|i| page.items.get(i).copied())
    }

    pub fn selected_detail(&self) -> Option<ClientDetail<'_>> {
        self.selected_client()
            .map(|client| self.dataset.detail_for(client))
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    fn reset_selection(&mut self) {
        if self.current_page().is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    fn page_len(&self) -> usize {
        self.current_page().items.len()
    }

    pub fn next(&mut self) {
        let len = self.page_len();
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
        let len = self.page_len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn next_page(&mut self) {
        self.query.next_page(&self.dataset.clients);
        self.reset_selection();
    }

    pub fn previous_page(&mut self) {
        self.query.previous_page(&self.dataset.clients);
        self.reset_selection();
    }

    pub fn first_page(&mut self) {
        self.query.set_page(1, &self.dataset.clients);
        self.reset_selection();
    }

    pub fn last_page(&mut self) {
        let last = self.query.total_pages(&self.dataset.clients);
        self.query.set_page(last, &self.dataset.clients);
        self.reset_selection();
    }

    /// Every keystroke re-runs the search (and so goes back to page 1)
    fn update_search(&mut self) {
        self.query.set_term(self.search_input.clone());
        self.reset_selection();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match self.input_mode {
            InputMode::Search => {
                match key.code {
                    KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
                    KeyCode::Backspace => {
                        self.search_input.pop();
                        self.update_search();
                    }
                    KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.search_input.clear();
                        self.update_search();
                    }
                    KeyCode::Char(c) => {
                        self.search_input.push(c);
                        self.update_search();
                    }
                    _ => {}
                }
                Action::Continue
            }
            InputMode::Normal => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
                KeyCode::Char('r') => Action::Reload,
                KeyCode::Char('/') => {
                    self.input_mode = InputMode::Search;
                    Action::Continue
                }
                KeyCode::Char('c') => {
                    self.search_input.clear();
                    self.update_search();
                    Action::Continue
                }
                KeyCode::Enter => {
                    self.toggle_detail();
                    Action::Continue
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.next();
                    Action::Continue
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.previous();
                    Action::Continue
                }
                KeyCode::Right | KeyCode::PageDown | KeyCode::Char('l') => {
                    self.next_page();
                    Action::Continue
                }
                KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h') => {
                    self.previous_page();
                    Action::Continue
                }
                KeyCode::Home => {
                    self.first_page();
                    Action::Continue
                }
                KeyCode::End => {
                    self.last_page();
                    Action::Continue
                }
                _ => Action::Continue,
            },
        }
    }
}

pub fn run_ui<F>(app: &mut App, reload: F) -> Result<()>
where
    F: FnMut() -> Result<Loaded, LoadError>,
{
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app, reload);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B, F>(terminal: &mut Terminal<B>, app: &mut App, mut reload: F) -> io::Result<()>
where
    B: ratatui::backend::Backend,
    F: FnMut() -> Result<Loaded, LoadError>,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.handle_key(key) {
                Action::Quit => return Ok(()),
                Action::Reload => match reload() {
                    Ok(loaded) => app.replace_dataset(loaded),
                    // already logged by the loader
                    Err(_) => app.reload_failed(),
                },
                Action::Continue => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with counts
            Constraint::Min(0),    // Content area
            Constraint::Length(1), // Page numbers
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(60), // Client list
                Constraint::Percentage(40), // Detail panel
            ])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_table(f, chunks[1], app);
    }

    render_page_numbers(f, chunks[2], app);
    render_status_bar(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            "Client Ledger",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
    ];

    for (i, kind) in RecordKind::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let failed = app
            .report
            .as_ref()
            .and_then(|r| r.get(*kind))
            .map(|k| !k.is_ok())
            .unwrap_or(false);
        let color = if failed { Color::Red } else { Color::White };
        spans.push(Span::styled(
            format!("{}: {}", kind.name(), app.dataset.count(*kind)),
            Style::default().fg(color),
        ));
    }

    if let Some(report) = &app.report {
        let warnings = report.warning_count();
        if warnings > 0 {
            spans.push(Span::raw("  |  "));
            spans.push(Span::styled(
                format!("⚠ {} warnings", warnings),
                Style::default().fg(Color::Yellow),
            ));
        }
    }

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Name", "CPF/CNPJ", "Email", "Net worth"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let page = app.current_page();
    let title = if page.total_items == 0 {
        " No clients match the current search ".to_string()
    } else {
        format!(" Clients ({}) ", page.total_items)
    };

    let rows: Vec<Row> = page
        .items
        .iter()
        .map(|client| {
            let color = if client.net_worth.is_sign_negative() && !client.net_worth.is_zero() {
                Color::Red
            } else {
                Color::Green
            };

            Row::new(vec![
                Cell::from(truncate(client.display_name(), 30)),
                Cell::from(client.tax_id.formatted()),
                Cell::from(truncate(&client.email, 28)),
                Cell::from(format_currency(client.net_worth)).style(Style::default().fg(color)),
            ])
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(32),
            Constraint::Length(20),
            Constraint::Length(30),
            Constraint::Length(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_page_numbers(f: &mut Frame, area: Rect, app: &App) {
    let Some(nav) = app.query.navigation(&app.dataset.clients) else {
        return;
    };

    let enabled = |on: bool| {
        if on {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    let mut spans = vec![Span::raw(" "), Span::styled("«", enabled(nav.has_previous))];
    for marker in &nav.markers {
        spans.push(Span::raw(" "));
        match marker {
            PageMarker::Page(n) if *n == nav.current => spans.push(Span::styled(
                format!("[{}]", n),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            PageMarker::Page(n) => spans.push(Span::raw(n.to_string())),
            PageMarker::Ellipsis => spans.push(Span::styled("…", Style::default().fg(Color::DarkGray))),
        }
    }
    spans.push(Span::raw(" "));
    spans.push(Span::styled("»", enabled(nav.has_next)));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let mut status_spans = Vec::new();

    if let Some(error) = &app.error {
        status_spans.push(Span::styled(format!(" {} ", error), Style::default().fg(Color::Red)));
        status_spans.push(Span::raw(" | "));
    }

    match app.input_mode {
        InputMode::Search => {
            status_spans.push(Span::styled(" Search: ", Style::default().fg(Color::Cyan)));
            status_spans.push(Span::raw(app.search_input.clone()));
            status_spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw("  ("));
            status_spans.push(key("Enter"));
            status_spans.push(Span::raw(" done)"));
        }
        InputMode::Normal => {
            let page = app.current_page();
            status_spans.push(Span::styled(
                format!(" Page: {}/{} ", page.page, page.total_pages.max(1)),
                Style::default().fg(Color::Cyan),
            ));

            if !app.query.term().trim().is_empty() {
                status_spans.push(Span::raw(" | "));
                status_spans.push(Span::styled(
                    format!("Search: {}", app.query.term()),
                    Style::default().fg(Color::Green),
                ));
                status_spans.push(Span::raw(" ("));
                status_spans.push(key("c"));
                status_spans.push(Span::raw(" clear)"));
            }

            status_spans.push(Span::raw(" | "));
            status_spans.push(key("/"));
            status_spans.push(Span::raw(" Search | "));
            status_spans.push(key("Enter"));
            status_spans.push(Span::raw(" Details | "));
            status_spans.push(key("←/→"));
            status_spans.push(Span::raw(" Page | "));
            status_spans.push(key("↑/↓"));
            status_spans.push(Span::raw(" Nav | "));
            status_spans.push(key("r"));
            status_spans.push(Span::raw(" Reload | "));
            status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
            status_spans.push(Span::raw(" Quit"));
        }
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Client Details ");

    let content = match app.selected_detail() {
        Some(detail) => detail_lines(&detail),
        None => vec![Line::from("No client selected")],
    };

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn label(text: &str) -> Span<'static> {
    Span::styled(
        format!("  {}: ", text),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", title),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

fn field(name: &str, value: String) -> Line<'static> {
    Line::from(vec![label(name), Span::raw(value)])
}

fn money(name: &str, value: rust_decimal::Decimal) -> Line<'static> {
    let color = if value.is_sign_negative() && !value.is_zero() {
        Color::Red
    } else {
        Color::Green
    };
    Line::from(vec![
        label(name),
        Span::styled(format_currency(value), Style::default().fg(color)),
    ])
}

/// Personal info, finances, accounts and branch, in that order
pub fn detail_lines(detail: &ClientDetail<'_>) -> Vec<Line<'static>> {
    let client = detail.client;
    let mut lines = vec![
        Line::from(Span::styled(
            format!("  {}", client.display_name()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("PERSONAL"),
        field("Name", client.name.clone()),
    ];

    if let Some(social_name) = &client.social_name {
        lines.push(field("Social name", social_name.clone()));
    }
    lines.push(field(client.tax_id.kind().label(), client.tax_id.formatted()));
    if let Some(national_id) = &client.national_id {
        lines.push(field("RG", national_id.clone()));
    }
    lines.push(field("Born", format_date(client.birth_date)));
    lines.push(field("Email", client.email.clone()));
    lines.push(field("Address", client.address.clone()));
    lines.push(field("Marital status", client.marital_status.as_str().to_string()));

    lines.push(Line::from(""));
    lines.push(section("FINANCES"));
    lines.push(money("Annual income", client.annual_income));
    lines.push(money("Net worth", client.net_worth));

    lines.push(Line::from(""));
    lines.push(section("ACCOUNTS"));
    if detail.accounts.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No accounts found for this client.",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }
    for account in &detail.accounts {
        let mut title = vec![Span::styled(
            format!("  {}", account.kind.title()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )];
        if account.is_overdrawn() {
            title.push(Span::styled("  overdrawn", Style::default().fg(Color::Red)));
        }
        lines.push(Line::from(title));
        lines.push(money("Balance", account.balance));
        lines.push(money("Credit limit", account.credit_limit));
        lines.push(money("Available credit", account.available_credit));
        lines.push(field("Credit used", format_optional_currency(account.credit_used())));
    }
    if detail.accounts.len() > 1 {
        lines.push(field("Total balance", format_optional_currency(detail.total_balance())));
        lines.push(field(
            "Total available",
            format_optional_currency(detail.total_available_credit()),
        ));
    }

    lines.push(Line::from(""));
    lines.push(section("BRANCH"));
    match detail.branch {
        Some(branch) => {
            lines.push(field("Code", branch.code.to_string()));
            lines.push(field("Name", branch.name.clone()));
            lines.push(field("Address", branch.address.clone()));
        }
        None => lines.push(Line::from(Span::styled(
            "  Branch information not found.",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))),
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press Enter to close",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    lines
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
    use client_ledger::{Account, AccountKind, Branch, MaritalStatus, TaxId};
    use rust_decimal::Decimal;

    fn press(app: &mut App, code: KeyCode) -> Action {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn client(i: usize) -> Client {
        Client {
            id: format!("c{}", i),
            tax_id: TaxId::new(format!("{:011}", i)),
            national_id: None,
            birth_date: None,
            name: format!("Cliente {}", i),
            social_name: None,
            email: String::new(),
            address: String::new(),
            annual_income: Decimal::ZERO,
            net_worth: Decimal::ZERO,
            marital_status: MaritalStatus::Married,
            branch_code: 101,
        }
    }

    fn dataset(n: usize) -> Dataset {
        Dataset::new(
            (1..=n).map(client).collect(),
            vec![Account {
                id: "a1".to_string(),
                client_tax_id: TaxId::new("00000000001"),
                kind: AccountKind::Savings,
                balance: Decimal::new(-25, 0),
                credit_limit: Decimal::ZERO,
                available_credit: Decimal::ZERO,
            }],
            vec![Branch {
                id: "b1".to_string(),
                code: 101,
                name: "Centro".to_string(),
                address: "Av. Central".to_string(),
            }],
        )
    }

    fn text_of(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_paging_keys() {
        let mut app = App::new(dataset(25), 10);

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.query.page(), 3);
        assert_eq!(app.current_page().items.len(), 5);
        assert_eq!(app.state.selected(), Some(0));

        press(&mut app, KeyCode::Home);
        assert_eq!(app.query.page(), 1);
    }

    #[test]
    fn test_row_selection_wraps_within_page() {
        let mut app = App::new(dataset(3), 10);

        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_client().unwrap().id, "c3");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_client().unwrap().id, "c1");
    }

    #[test]
    fn test_search_input_resets_page() {
        let mut app = App::new(dataset(25), 10);
        press(&mut app, KeyCode::End);
        assert_eq!(app.query.page(), 3);

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);
        type_text(&mut app, "cliente 2");
        assert_eq!(app.query.page(), 1);
        assert_eq!(app.query.term(), "cliente 2");

        assert_eq!(press(&mut app, KeyCode::Char('q')), Action::Continue, "q is text while searching");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(press(&mut app, KeyCode::Char('q')), Action::Quit);
    }

    #[test]
    fn test_empty_result_has_no_selection() {
        let mut app = App::new(dataset(5), 10);
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "nobody");

        assert!(app.selected_client().is_none());
        assert!(app.query.navigation(&app.dataset.clients).is_none());
    }

    #[test]
    fn test_reload_failure_keeps_data() {
        let mut app = App::new(dataset(5), 10);
        assert_eq!(press(&mut app, KeyCode::Char('r')), Action::Reload);

        app.reload_failed();
        assert_eq!(app.error.as_deref(), Some(LOAD_ERROR_MESSAGE));
        assert_eq!(app.dataset.clients.len(), 5);

        let failed = App::failed(10);
        assert!(failed.dataset.is_empty());
        assert!(failed.error.is_some());
    }

    #[test]
    fn test_detail_lines() {
        let app = App::new(dataset(2), 10);
        let data = &app.dataset;

        let with_account = text_of(&detail_lines(&data.detail("c1").unwrap()));
        assert!(with_account.contains("Conta Poupança"));
        assert!(with_account.contains("-R$ 25,00"));
        assert!(with_account.contains("overdrawn"));
        assert!(with_account.contains("Centro"));
        assert!(with_account.contains("CPF: 000.000.000-01"));

        let without = text_of(&detail_lines(&data.detail("c2").unwrap()));
        assert!(without.contains("No accounts found"));
    }

    #[test]
    fn test_detail_lines_with_extreme_amounts() {
        let extreme = Account {
            id: "a9".to_string(),
            client_tax_id: TaxId::new("00000000001"),
            kind: AccountKind::Checking,
            balance: Decimal::MAX,
            credit_limit: Decimal::MAX,
            available_credit: Decimal::MIN,
        };
        let data = Dataset::new(vec![client(1)], vec![extreme.clone(), extreme], Vec::new());

        let text = text_of(&detail_lines(&data.detail("c1").unwrap()));
        assert!(text.contains("Credit used: -"));
        assert!(text.contains("Total balance: -"));
        assert!(text.contains("Total available: -"));
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("João", 10), "João");
        assert_eq!(truncate("Conceição Araújo", 8), "Conce...");
    }
}

use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use fdr_terminal::config::{AppConfig, DataSource};
use fdr_terminal::difficulty::DifficultyBucket;
use fdr_terminal::entry_store;
use fdr_terminal::provider;
use fdr_terminal::state::{self, AppState, Pane, ProviderCommand, apply_delta};
use fdr_terminal::view::{self, FixtureCell, FixtureGrid, SquadView, WIDE_COLUMNS};

struct App {
    state: AppState,
    cfg: AppConfig,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(cfg: AppConfig, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            cfg,
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.alert.is_some() {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.state.dismiss_alert(),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        if self.state.entry_input.is_some() {
            match key.code {
                KeyCode::Char(ch) => self.state.push_entry_char(ch),
                KeyCode::Backspace => self.state.pop_entry_char(),
                KeyCode::Esc => self.state.cancel_entry_prompt(),
                KeyCode::Enter => self.submit_entry(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_refresh(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.state.open_entry_prompt(),
            KeyCode::Tab => self.state.toggle_focus(),
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            KeyCode::Char('x') | KeyCode::Char('X') => self.request_export(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn submit_entry(&mut self) {
        let Some(entry_id) = self.state.submit_entry_input() else {
            self.state.push_log("[WARN] Entry id must be a positive number");
            return;
        };
        self.remember_entry(entry_id);
        // The provider works through commands in order, so a squad load queued
        // behind an in-flight refresh sees the fresh session.
        if self.state.session.is_some() || self.state.refreshing {
            self.send(ProviderCommand::LoadSquad { entry_id }, "Squad");
        } else {
            self.request_refresh();
        }
    }

    fn remember_entry(&mut self, entry_id: u32) {
        if let Err(err) = entry_store::save_entry_id(entry_id) {
            self.state
                .push_log(format!("[WARN] Could not remember entry id: {err:#}"));
        }
        self.state.push_log(format!(
            "[INFO] Entry {entry_id} (share: {})",
            entry_store::share_hint(entry_id)
        ));
    }

    fn request_refresh(&mut self) {
        if self.state.refreshing {
            self.state.push_log("[INFO] Refresh already in progress");
            return;
        }
        self.state.begin_refresh();
        let entry_id = self.state.entry_id;
        self.send(ProviderCommand::Refresh { entry_id }, "Refresh");
    }

    fn request_export(&mut self) {
        let Some(grid) = self.state.fixture_grid(WIDE_COLUMNS) else {
            self.state.push_log("[INFO] Nothing to export yet");
            return;
        };
        let squad = self.state.squad_view(WIDE_COLUMNS);
        let path = self.cfg.export_path.display().to_string();
        self.send(ProviderCommand::Export { path, grid, squad }, "Export");
    }

    fn send(&mut self, cmd: ProviderCommand, label: &str) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log(format!("[INFO] {label} unavailable"));
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.refreshing = false;
            self.state.squad_loading = false;
            self.state.push_log(format!("[WARN] {label} request failed"));
        } else {
            self.state.push_log(format!("[INFO] {label} request sent"));
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut cfg = AppConfig::from_env();
    cfg.apply_args(std::env::args().skip(1));
    let entry_id = entry_store::resolve_entry_id(cfg.entry_id, entry_store::load_entry_id());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    provider::spawn_provider(provider::feed_from_config(&cfg), tx, cmd_rx);

    let mut app = App::new(cfg, Some(cmd_tx));
    app.state.entry_id = entry_id;
    match entry_id {
        Some(id) => app.remember_entry(id),
        None => app.state.open_entry_prompt(),
    }
    app.request_refresh();

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        // Redrawing every tick also covers terminal resizes.
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let area = frame.size();
    let columns = view::column_count(area.width, app.cfg.narrow_width);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(header_text(app))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);
    render_grid(frame, body[0], &app.state, columns);
    render_squad(frame, body[1], &app.state, columns);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, area);
    }
    if let Some(input) = &app.state.entry_input {
        render_entry_prompt(frame, area, input);
    }
    if let Some(alert) = &app.state.alert {
        render_alert(frame, area, &alert.title, &alert.message);
    }
}

fn header_text(app: &App) -> String {
    let state = &app.state;
    let source = match app.cfg.source {
        DataSource::Live => "LIVE",
        DataSource::Demo => "DEMO",
    };
    let gw = state
        .session
        .as_ref()
        .map(|s| format!("GW{}", s.current_gameweek))
        .unwrap_or_else(|| "GW-".to_string());
    let entry = state
        .entry_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unset".to_string());
    let updated = state
        .last_refresh
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    let busy = if state.refreshing {
        " | Refreshing..."
    } else if state.squad_loading {
        " | Loading squad..."
    } else {
        ""
    };
    let line1 =
        format!("FDR TERMINAL | {source} | {gw} | Entry: {entry} | Updated: {updated}{busy}");

    let line2 = match &state.squad {
        Some(squad) => {
            let points = squad
                .entry
                .summary_overall_points
                .map(|p| format!("{p} pts"))
                .unwrap_or_else(|| "- pts".to_string());
            let rank = squad
                .entry
                .summary_overall_rank
                .map(|r| format!("rank {r}"))
                .unwrap_or_else(|| "unranked".to_string());
            format!(
                "{} - {} | {points} | {rank} | picks GW{}",
                squad.entry.name,
                squad.entry.manager_name(),
                squad.gameweek
            )
        }
        None => "No squad loaded".to_string(),
    };
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    if state.entry_input.is_some() {
        return "0-9 Type | Backspace Delete | Enter Load | Esc Cancel".to_string();
    }
    "r Refresh | e Entry | Tab Focus | j/k/↑/↓ Scroll | x Export | ? Help | q Quit".to_string()
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn render_grid(frame: &mut Frame, area: Rect, state: &AppState, columns: usize) {
    let block = pane_block("Fixture Difficulty".to_string(), state.focus == Pane::Grid);
    let Some(grid) = state.fixture_grid(columns) else {
        let msg = if state.refreshing {
            "Loading league data..."
        } else {
            "No league data (press r to refresh)"
        };
        let empty = Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };
    frame.render_widget(grid_table(&grid, state.grid_scroll).block(block), area);
}

fn grid_table(grid: &FixtureGrid, scroll: usize) -> Table<'static> {
    let rows: Vec<Row> = grid
        .rows
        .iter()
        .skip(scroll)
        .map(|row| {
            let mut cells = vec![Cell::from(row.name.clone())];
            cells.extend(row.cells.iter().map(fixture_cell_widget));
            Row::new(cells).height(row_height(&row.cells))
        })
        .collect();

    let widths = std::iter::once(Constraint::Length(16))
        .chain(std::iter::repeat(Constraint::Min(7)).take(grid.gameweeks.len()));
    Table::new(rows, widths).header(header_row(&grid.header))
}

fn render_squad(frame: &mut Frame, area: Rect, state: &AppState, columns: usize) {
    let block = pane_block("My Squad".to_string(), state.focus == Pane::Squad);
    let Some(view) = state.squad_view(columns) else {
        let msg = if state.squad_loading {
            "Loading squad..."
        } else if state.entry_id.is_none() {
            "No entry id set (press e)"
        } else {
            "No squad loaded (press r to refresh)"
        };
        let empty = Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };
    frame.render_widget(squad_table(&view, state.squad_scroll).block(block), area);
}

fn squad_table(view: &SquadView, scroll: usize) -> Table<'static> {
    let mut header = vec![
        view.header.first().cloned().unwrap_or_default(),
        "Pos".to_string(),
        "Team".to_string(),
        "£".to_string(),
        "Form".to_string(),
        "".to_string(),
    ];
    header.extend(view.header.iter().skip(1).cloned());
    header.push("News".to_string());

    let rows: Vec<Row> = view
        .rows
        .iter()
        .skip(scroll)
        .map(|row| {
            let p = &row.pick;
            let name = format!("{} {}", p.name, p.role_marker()).trim().to_string();
            let mut cells = vec![
                Cell::from(name),
                Cell::from(p.position.label()),
                Cell::from(p.team_short.clone()),
                Cell::from(p.price_label()),
                Cell::from(p.form_label()),
                Cell::from(p.trend.symbol()),
            ];
            cells.extend(row.cells.iter().map(fixture_cell_widget));
            cells.push(Cell::from(p.news.clone()).style(Style::default().fg(Color::Yellow)));

            let style = if p.on_bench {
                Style::default().add_modifier(Modifier::DIM)
            } else {
                Style::default()
            };
            Row::new(cells).height(row_height(&row.cells)).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(18),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(2),
    ]
    .into_iter()
    .chain(std::iter::repeat(Constraint::Min(7)).take(view.gameweeks.len()))
    .chain(std::iter::once(Constraint::Min(10)));
    Table::new(rows, widths).header(header_row(&header))
}

fn header_row(labels: &[String]) -> Row<'static> {
    let style = Style::default().add_modifier(Modifier::BOLD);
    Row::new(labels.iter().cloned().map(Cell::from)).style(style)
}

fn row_height(cells: &[FixtureCell]) -> u16 {
    cells.iter().map(FixtureCell::height).max().unwrap_or(1) as u16
}

fn fixture_cell_widget(cell: &FixtureCell) -> Cell<'static> {
    match cell.bucket() {
        None => Cell::from("-").style(Style::default().fg(Color::DarkGray)),
        Some(bucket) => {
            let lines: Vec<Line> = cell.opponent_labels().into_iter().map(Line::from).collect();
            Cell::from(Text::from(lines)).style(bucket_style(bucket))
        }
    }
}

fn bucket_style(bucket: DifficultyBucket) -> Style {
    let (bg, fg) = match bucket {
        DifficultyBucket::VeryEasy => (Color::Rgb(0x1B, 0x5E, 0x20), Color::White),
        DifficultyBucket::Easy => (Color::Rgb(0x66, 0xBB, 0x6A), Color::Black),
        DifficultyBucket::Moderate => (Color::Rgb(0xBD, 0xBD, 0xBD), Color::Black),
        DifficultyBucket::Tricky => (Color::Rgb(0xEF, 0x9A, 0x9A), Color::Black),
        DifficultyBucket::Hard => (Color::Rgb(0xE5, 0x39, 0x35), Color::White),
        DifficultyBucket::VeryHard => (Color::Rgb(0xB7, 0x1C, 0x1C), Color::White),
        DifficultyBucket::Extreme => (Color::Rgb(0x4A, 0x00, 0x72), Color::White),
    };
    Style::default().bg(bg).fg(fg)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_entry_prompt(frame: &mut Frame, area: Rect, input: &str) {
    let popup_area = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup_area);
    let text = format!("FPL entry id:\n\n> {input}_\n\nEnter to load, Esc to cancel");
    let prompt = Paragraph::new(text)
        .block(Block::default().title("Entry").borders(Borders::ALL));
    frame.render_widget(prompt, popup_area);
}

fn render_alert(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let popup_area = centered_rect(60, 30, area);
    frame.render_widget(Clear, popup_area);
    let text = format!("{message}\n\nEnter/Esc to dismiss");
    let alert = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL),
        );
    frame.render_widget(alert, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![
        "FDR Terminal - Help".to_string(),
        String::new(),
        "  r            Refresh league data and squad".to_string(),
        "  e            Enter / change entry id".to_string(),
        "  Tab          Switch scroll focus".to_string(),
        "  j/k or ↑/↓   Scroll".to_string(),
        "  x            Export to xlsx".to_string(),
        "  ?            Toggle help".to_string(),
        "  q            Quit".to_string(),
        String::new(),
        "Difficulty buckets:".to_string(),
    ];
    lines.extend(
        DifficultyBucket::ALL
            .iter()
            .map(|b| format!("  {}", b.label())),
    );
    lines.push(String::new());
    lines.push("Away fixtures are prefixed with @".to_string());

    let help = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Help").borders(Borders::ALL));
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::session::{Session, Squad};
use crate::view::{FixtureGrid, SquadView};

const MAX_LOG_LINES: usize = 200;
const MAX_ENTRY_DIGITS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Grid,
    Squad,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub session: Option<Session>,
    pub squad: Option<Squad>,
    pub entry_id: Option<u32>,
    pub refreshing: bool,
    pub squad_loading: bool,
    pub last_refresh: Option<DateTime<Local>>,
    pub alert: Option<Alert>,
    /// `Some` while the entry prompt is open; holds the digits typed so far.
    pub entry_input: Option<String>,
    pub focus: Pane,
    pub grid_scroll: usize,
    pub squad_scroll: usize,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: None,
            squad: None,
            entry_id: None,
            refreshing: false,
            squad_loading: false,
            last_refresh: None,
            alert: None,
            entry_input: None,
            focus: Pane::Grid,
            grid_scroll: 0,
            squad_scroll: 0,
            help_overlay: false,
            logs: VecDeque::new(),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOG_LINES {
            self.logs.pop_front();
        }
    }

    pub fn raise_alert(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.alert = Some(Alert {
            title: title.into(),
            message: message.into(),
        });
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn begin_refresh(&mut self) {
        self.refreshing = true;
        if self.entry_id.is_some() {
            self.squad_loading = true;
        }
    }

    pub fn open_entry_prompt(&mut self) {
        let seed = self.entry_id.map(|id| id.to_string()).unwrap_or_default();
        self.entry_input = Some(seed);
    }

    pub fn cancel_entry_prompt(&mut self) {
        self.entry_input = None;
    }

    pub fn push_entry_char(&mut self, ch: char) {
        if let Some(input) = self.entry_input.as_mut()
            && ch.is_ascii_digit()
            && input.len() < MAX_ENTRY_DIGITS
        {
            input.push(ch);
        }
    }

    pub fn pop_entry_char(&mut self) {
        if let Some(input) = self.entry_input.as_mut() {
            input.pop();
        }
    }

    pub fn submit_entry_input(&mut self) -> Option<u32> {
        let raw = self.entry_input.as_deref()?;
        let id = crate::config::parse_entry_id(raw)?;
        self.entry_input = None;
        if self.entry_id != Some(id) {
            self.squad = None;
            self.squad_scroll = 0;
        }
        self.entry_id = Some(id);
        self.squad_loading = true;
        Some(id)
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Pane::Grid => Pane::Squad,
            Pane::Squad => Pane::Grid,
        };
    }

    pub fn scroll_down(&mut self) {
        let max = self.scroll_limit(self.focus);
        let scroll = self.focused_scroll_mut();
        if *scroll + 1 < max {
            *scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        let scroll = self.focused_scroll_mut();
        *scroll = scroll.saturating_sub(1);
    }

    fn focused_scroll_mut(&mut self) -> &mut usize {
        match self.focus {
            Pane::Grid => &mut self.grid_scroll,
            Pane::Squad => &mut self.squad_scroll,
        }
    }

    fn scroll_limit(&self, pane: Pane) -> usize {
        match pane {
            Pane::Grid => self.session.as_ref().map_or(0, |s| s.ratings.len()),
            Pane::Squad => self.squad.as_ref().map_or(0, |s| s.picks.len()),
        }
    }

    fn clamp_scroll(&mut self) {
        let grid_max = self.scroll_limit(Pane::Grid).saturating_sub(1);
        let squad_max = self.scroll_limit(Pane::Squad).saturating_sub(1);
        self.grid_scroll = self.grid_scroll.min(grid_max);
        self.squad_scroll = self.squad_scroll.min(squad_max);
    }

    pub fn fixture_grid(&self, columns: usize) -> Option<FixtureGrid> {
        self.session.as_ref().map(|s| s.fixture_grid(columns))
    }

    pub fn squad_view(&self, columns: usize) -> Option<SquadView> {
        let session = self.session.as_ref()?;
        let squad = self.squad.as_ref()?;
        Some(session.squad_view(squad, columns))
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetSession(Box<Session>),
    RefreshFailed(String),
    SetSquad(Box<Squad>),
    SquadFailed(String),
    ExportFinished { path: String, rows: usize },
    ExportFailed(String),
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    Refresh { entry_id: Option<u32> },
    LoadSquad { entry_id: u32 },
    Export {
        path: String,
        grid: FixtureGrid,
        squad: Option<SquadView>,
    },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetSession(session) => {
            let teams = session.ratings.len();
            let gw = session.current_gameweek;
            state.session = Some(*session);
            state.refreshing = false;
            state.last_refresh = Some(Local::now());
            state.clamp_scroll();
            state.push_log(format!("[INFO] Loaded {teams} teams, anchor GW{gw}"));
        }
        Delta::RefreshFailed(err) => {
            state.refreshing = false;
            state.squad_loading = false;
            state.push_log(format!("[ERROR] Refresh failed: {err}"));
            state.raise_alert("Refresh failed", err);
        }
        Delta::SetSquad(squad) => {
            if state.entry_id != Some(squad.entry.id) {
                state.push_log(format!(
                    "[WARN] Dropped squad for entry {} (current entry changed)",
                    squad.entry.id
                ));
                return;
            }
            state.squad_loading = false;
            state.push_log(format!(
                "[INFO] Loaded squad for {} (GW{}, {} players)",
                squad.entry.name,
                squad.gameweek,
                squad.picks.len()
            ));
            state.squad = Some(*squad);
            state.clamp_scroll();
        }
        Delta::SquadFailed(err) => {
            state.squad_loading = false;
            state.push_log(format!("[ERROR] Squad load failed: {err}"));
            state.raise_alert("Could not load squad", err);
        }
        Delta::ExportFinished { path, rows } => {
            state.push_log(format!("[INFO] Exported {rows} rows to {path}"));
        }
        Delta::ExportFailed(err) => {
            state.push_log(format!("[ERROR] Export failed: {err}"));
            state.raise_alert("Export failed", err);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

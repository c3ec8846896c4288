use std::fmt;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::http_client::http_client;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bootstrap {
    pub events: Vec<Event>,
    pub teams: Vec<Team>,
    #[serde(rename = "elements")]
    pub players: Vec<Player>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub short_name: String,
    pub strength_overall_home: f64,
    pub strength_overall_away: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub deadline_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished: bool,
    pub is_current: bool,
    pub is_next: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    pub fn label(self) -> &'static str {
        match self {
            Position::Goalkeeper => "GKP",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }
}

impl TryFrom<u8> for Position {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Position::Goalkeeper),
            2 => Ok(Position::Defender),
            3 => Ok(Position::Midfielder),
            4 => Ok(Position::Forward),
            other => Err(format!("unknown position code {other}")),
        }
    }
}

impl From<Position> for u8 {
    fn from(pos: Position) -> Self {
        match pos {
            Position::Goalkeeper => 1,
            Position::Defender => 2,
            Position::Midfielder => 3,
            Position::Forward => 4,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub web_name: String,
    #[serde(rename = "element_type")]
    pub position: Position,
    pub team: u32,
    /// Price in tenths (e.g. 55 = 5.5).
    pub now_cost: u32,
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default)]
    pub cost_change_event: i32,
    #[serde(default)]
    pub transfers_in_event: i64,
    #[serde(default)]
    pub transfers_out_event: i64,
    #[serde(default)]
    pub news: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    /// `None` for fixtures that are not yet scheduled into a gameweek.
    pub event: Option<u32>,
    #[serde(rename = "team_h")]
    pub home_team: u32,
    #[serde(rename = "team_a")]
    pub away_team: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub player_first_name: String,
    #[serde(default)]
    pub player_last_name: String,
    #[serde(default)]
    pub summary_overall_points: Option<i64>,
    #[serde(default)]
    pub summary_overall_rank: Option<u64>,
    #[serde(default)]
    pub current_event: Option<u32>,
}

impl EntrySummary {
    pub fn manager_name(&self) -> String {
        format!("{} {}", self.player_first_name, self.player_last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    #[serde(rename = "element")]
    pub player_id: u32,
    /// Squad slot 1..=15; 12 and above are the bench.
    pub position: u8,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_vice_captain: bool,
}

impl Pick {
    pub fn on_bench(&self) -> bool {
        self.position > 11
    }
}

#[derive(Debug, Deserialize)]
struct PicksResponse {
    picks: Vec<Pick>,
}

pub fn parse_bootstrap_json(raw: &str) -> Result<Bootstrap> {
    let trimmed = non_null_body(raw).context("empty bootstrap response")?;
    serde_json::from_str(trimmed).context("invalid bootstrap json")
}

pub fn parse_fixtures_json(raw: &str) -> Result<Vec<Fixture>> {
    let trimmed = non_null_body(raw).context("empty fixtures response")?;
    serde_json::from_str(trimmed).context("invalid fixtures json")
}

pub fn parse_entry_json(raw: &str) -> Result<EntrySummary> {
    let trimmed = non_null_body(raw).context("empty entry response")?;
    serde_json::from_str(trimmed).context("invalid entry json")
}

pub fn parse_picks_json(raw: &str) -> Result<Vec<Pick>> {
    let trimmed = non_null_body(raw).context("empty picks response")?;
    let resp: PicksResponse = serde_json::from_str(trimmed).context("invalid picks json")?;
    Ok(resp.picks)
}

fn non_null_body(raw: &str) -> Result<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow!("no body"));
    }
    Ok(trimmed)
}

#[derive(Debug, Clone)]
pub struct FplApi {
    base: String,
    timeout_secs: u64,
}

impl FplApi {
    pub fn new(base: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            timeout_secs,
        }
    }

    pub fn bootstrap_url(&self) -> String {
        format!("{}/bootstrap-static/", self.base)
    }

    pub fn fixtures_url(&self) -> String {
        format!("{}/fixtures/", self.base)
    }

    pub fn entry_url(&self, entry_id: u32) -> String {
        format!("{}/entry/{entry_id}/", self.base)
    }

    pub fn picks_url(&self, entry_id: u32, gameweek: u32) -> String {
        format!("{}/entry/{entry_id}/event/{gameweek}/picks/", self.base)
    }

    pub fn fetch_bootstrap(&self) -> Result<Bootstrap> {
        let body = self
            .get(&self.bootstrap_url())
            .context("bootstrap request failed")?;
        parse_bootstrap_json(&body)
    }

    pub fn fetch_fixtures(&self) -> Result<Vec<Fixture>> {
        let body = self
            .get(&self.fixtures_url())
            .context("fixtures request failed")?;
        parse_fixtures_json(&body)
    }

    pub fn fetch_entry(&self, entry_id: u32) -> Result<EntrySummary> {
        let body = self
            .get(&self.entry_url(entry_id))
            .with_context(|| format!("entry {entry_id} request failed"))?;
        parse_entry_json(&body)
    }

    pub fn fetch_picks(&self, entry_id: u32, gameweek: u32) -> Result<Vec<Pick>> {
        let body = self
            .get(&self.picks_url(entry_id, gameweek))
            .with_context(|| format!("picks request failed (entry {entry_id}, GW{gameweek})"))?;
        parse_picks_json(&body)
    }

    fn get(&self, url: &str) -> Result<String> {
        let client = http_client(self.timeout_secs)?;
        fetch_body(client, url)
    }
}

fn fetch_body(client: &Client, url: &str) -> Result<String> {
    let resp = client.get(url).send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, truncate(&body, 200)));
    }
    Ok(body)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::{Pick, Player, Position};
use crate::difficulty::{DifficultyBucket, classify};
use crate::fixture_map::{FixtureMap, TeamFixture, fixtures_for};
use crate::rating::Ratings;

pub const NARROW_COLUMNS: usize = 4;
pub const WIDE_COLUMNS: usize = 8;
pub const TRANSFER_MOMENTUM_THRESHOLD: i64 = 50_000;

pub fn column_count(width: u16, narrow_width: u16) -> usize {
    if width < narrow_width {
        NARROW_COLUMNS
    } else {
        WIDE_COLUMNS
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentLabel {
    pub short_name: String,
    pub is_home: bool,
}

impl fmt::Display for OpponentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_home {
            f.write_str(&self.short_name)
        } else {
            write!(f, "@{}", self.short_name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixtureCell {
    Blank,
    Single {
        opponent: OpponentLabel,
        difficulty: i32,
        bucket: DifficultyBucket,
    },
    Multiple {
        opponents: Vec<OpponentLabel>,
        difficulty: i32,
        bucket: DifficultyBucket,
    },
}

impl FixtureCell {
    pub fn bucket(&self) -> Option<DifficultyBucket> {
        match self {
            FixtureCell::Blank => None,
            FixtureCell::Single { bucket, .. } | FixtureCell::Multiple { bucket, .. } => {
                Some(*bucket)
            }
        }
    }

    pub fn opponent_labels(&self) -> Vec<String> {
        match self {
            FixtureCell::Blank => Vec::new(),
            FixtureCell::Single { opponent, .. } => vec![opponent.to_string()],
            FixtureCell::Multiple { opponents, .. } => {
                opponents.iter().map(ToString::to_string).collect()
            }
        }
    }

    pub fn height(&self) -> usize {
        match self {
            FixtureCell::Multiple { opponents, .. } => opponents.len(),
            _ => 1,
        }
    }
}

pub fn mean_difficulty(fixtures: &[TeamFixture]) -> Option<i32> {
    if fixtures.is_empty() {
        return None;
    }
    let sum: i32 = fixtures.iter().map(|f| f.difficulty).sum();
    Some((sum as f64 / fixtures.len() as f64).round() as i32)
}

pub fn fixture_cell(fixtures: &[TeamFixture], ratings: &Ratings) -> FixtureCell {
    match fixtures {
        [] => FixtureCell::Blank,
        [single] => FixtureCell::Single {
            opponent: opponent_label(single, ratings),
            difficulty: single.difficulty,
            bucket: classify(single.difficulty),
        },
        many => {
            let difficulty = mean_difficulty(many).unwrap_or_default();
            FixtureCell::Multiple {
                opponents: many.iter().map(|f| opponent_label(f, ratings)).collect(),
                difficulty,
                bucket: classify(difficulty),
            }
        }
    }
}

fn opponent_label(fixture: &TeamFixture, ratings: &Ratings) -> OpponentLabel {
    let short_name = ratings
        .get(&fixture.opponent_id)
        .map(|r| r.short_name.clone())
        .unwrap_or_else(|| format!("#{}", fixture.opponent_id));
    OpponentLabel {
        short_name,
        is_home: fixture.is_home,
    }
}

fn cells_for_team(
    team_id: u32,
    map: &FixtureMap,
    ratings: &Ratings,
    gameweeks: &[u32],
) -> Vec<FixtureCell> {
    gameweeks
        .iter()
        .map(|gw| fixture_cell(fixtures_for(map, team_id, *gw), ratings))
        .collect()
}

fn header_labels(subject: &str, gameweeks: &[u32]) -> Vec<String> {
    std::iter::once(subject.to_string())
        .chain(gameweeks.iter().map(|gw| format!("GW{gw}")))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRow {
    pub team_id: u32,
    pub name: String,
    pub short_name: String,
    pub strength: i32,
    pub cells: Vec<FixtureCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureGrid {
    pub header: Vec<String>,
    pub gameweeks: Vec<u32>,
    pub rows: Vec<GridRow>,
}

pub fn assemble_fixture_grid(
    ratings: &Ratings,
    map: &FixtureMap,
    gameweeks: &[u32],
) -> FixtureGrid {
    let mut teams: Vec<_> = ratings.values().collect();
    teams.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    let rows = teams
        .into_iter()
        .map(|team| GridRow {
            team_id: team.id,
            name: team.name.clone(),
            short_name: team.short_name.clone(),
            strength: team.strength,
            cells: cells_for_team(team.id, map, ratings, gameweeks),
        })
        .collect();

    FixtureGrid {
        header: header_labels("Team", gameweeks),
        gameweeks: gameweeks.to_vec(),
        rows,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceTrend {
    Up,
    Down,
    Rising,
    Falling,
    Steady,
}

impl PriceTrend {
    pub fn symbol(self) -> &'static str {
        match self {
            PriceTrend::Up => "▲",
            PriceTrend::Down => "▼",
            PriceTrend::Rising => "↗",
            PriceTrend::Falling => "↘",
            PriceTrend::Steady => "-",
        }
    }
}

/// An actual price move wins; otherwise net transfers beyond the threshold
/// hint at the next move.
pub fn price_trend(cost_change_event: i32, transfers_in: i64, transfers_out: i64) -> PriceTrend {
    if cost_change_event > 0 {
        return PriceTrend::Up;
    }
    if cost_change_event < 0 {
        return PriceTrend::Down;
    }
    let net = transfers_in - transfers_out;
    if net > TRANSFER_MOMENTUM_THRESHOLD {
        PriceTrend::Rising
    } else if net < -TRANSFER_MOMENTUM_THRESHOLD {
        PriceTrend::Falling
    } else {
        PriceTrend::Steady
    }
}

pub fn parse_form(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

pub fn price_from_tenths(tenths: u32) -> f64 {
    tenths as f64 / 10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadPick {
    pub player_id: u32,
    pub name: String,
    pub position: Position,
    pub team_id: u32,
    pub team_short: String,
    pub price: f64,
    pub form: f64,
    pub trend: PriceTrend,
    pub news: String,
    pub is_captain: bool,
    pub is_vice_captain: bool,
    pub on_bench: bool,
}

impl SquadPick {
    pub fn price_label(&self) -> String {
        format!("{:.1}", self.price)
    }

    pub fn form_label(&self) -> String {
        format!("{:.1}", self.form)
    }

    pub fn role_marker(&self) -> &'static str {
        if self.is_captain {
            "(C)"
        } else if self.is_vice_captain {
            "(V)"
        } else {
            ""
        }
    }
}

pub fn join_squad(picks: &[Pick], players: &[Player], ratings: &Ratings) -> Vec<SquadPick> {
    let by_id: HashMap<u32, &Player> = players.iter().map(|p| (p.id, p)).collect();

    let mut squad: Vec<SquadPick> = picks
        .iter()
        .filter_map(|pick| {
            let player = by_id.get(&pick.player_id)?;
            let team_short = ratings
                .get(&player.team)
                .map(|r| r.short_name.clone())
                .unwrap_or_default();
            Some(SquadPick {
                player_id: player.id,
                name: player.web_name.clone(),
                position: player.position,
                team_id: player.team,
                team_short,
                price: price_from_tenths(player.now_cost),
                form: parse_form(player.form.as_deref()),
                trend: price_trend(
                    player.cost_change_event,
                    player.transfers_in_event,
                    player.transfers_out_event,
                ),
                news: player.news.clone(),
                is_captain: pick.is_captain,
                is_vice_captain: pick.is_vice_captain,
                on_bench: pick.on_bench(),
            })
        })
        .collect();

    squad.sort_by_key(|p| p.position);
    squad
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadRow {
    pub pick: SquadPick,
    pub cells: Vec<FixtureCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadView {
    pub header: Vec<String>,
    pub gameweeks: Vec<u32>,
    pub rows: Vec<SquadRow>,
}

pub fn assemble_squad_view(
    squad: &[SquadPick],
    map: &FixtureMap,
    ratings: &Ratings,
    gameweeks: &[u32],
) -> SquadView {
    let rows = squad
        .iter()
        .map(|pick| SquadRow {
            pick: pick.clone(),
            cells: cells_for_team(pick.team_id, map, ratings, gameweeks),
        })
        .collect();

    SquadView {
        header: header_labels("Player", gameweeks),
        gameweeks: gameweeks.to_vec(),
        rows,
    }
}

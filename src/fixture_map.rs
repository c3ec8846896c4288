use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::api::{Event, Fixture};
use crate::rating::{Ratings, adjusted_difficulty};

pub const LOOKAHEAD_GAMEWEEKS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamFixture {
    pub opponent_id: u32,
    pub is_home: bool,
    pub difficulty: i32,
}

/// team id -> gameweek -> fixtures in feed order. A missing gameweek is a blank.
pub type FixtureMap = HashMap<u32, BTreeMap<u32, Vec<TeamFixture>>>;

pub fn build_fixture_map(fixtures: &[Fixture], ratings: &Ratings, anchor: u32) -> FixtureMap {
    let window = anchor..anchor.saturating_add(LOOKAHEAD_GAMEWEEKS);
    let mut map: FixtureMap = ratings.keys().map(|id| (*id, BTreeMap::new())).collect();

    for fixture in fixtures {
        let Some(gw) = fixture.event else {
            continue;
        };
        if !window.contains(&gw) {
            continue;
        }

        map.entry(fixture.home_team)
            .or_default()
            .entry(gw)
            .or_default()
            .push(TeamFixture {
                opponent_id: fixture.away_team,
                is_home: true,
                difficulty: adjusted_difficulty(ratings, fixture.away_team, true),
            });
        map.entry(fixture.away_team)
            .or_default()
            .entry(gw)
            .or_default()
            .push(TeamFixture {
                opponent_id: fixture.home_team,
                is_home: false,
                difficulty: adjusted_difficulty(ratings, fixture.home_team, false),
            });
    }

    map
}

pub fn fixtures_for(map: &FixtureMap, team_id: u32, gameweek: u32) -> &[TeamFixture] {
    map.get(&team_id)
        .and_then(|by_gw| by_gw.get(&gameweek))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Current event, else the next one, else the first unfinished one, else 1.
pub fn current_gameweek(events: &[Event]) -> u32 {
    events
        .iter()
        .find(|e| e.is_current)
        .or_else(|| events.iter().find(|e| e.is_next))
        .or_else(|| events.iter().find(|e| !e.finished))
        .map(|e| e.id)
        .unwrap_or(1)
}

pub fn visible_gameweeks(anchor: u32, columns: usize, last_gameweek: Option<u32>) -> Vec<u32> {
    let end = anchor.saturating_add(columns as u32);
    let end = match last_gameweek {
        Some(last) => end.min(last.saturating_add(1)),
        None => end,
    };
    (anchor..end).collect()
}

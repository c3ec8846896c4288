use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::api::{Bootstrap, EntrySummary, Event, Fixture, Pick, Player, Position, Team};

pub const DEMO_SEED: u64 = 2026;
pub const DEMO_CURRENT_GAMEWEEK: u32 = 3;
pub const DEMO_ENTRY_ID: u32 = 1;
const SEASON_GAMEWEEKS: u32 = 38;

pub const DEMO_BLANK_GAMEWEEK: u32 = 4;
pub const DEMO_DOUBLE_GAMEWEEK: u32 = 6;

const TEAMS: [(&str, &str); 20] = [
    ("Ashford", "ASH"),
    ("Bramley", "BRM"),
    ("Carrow", "CAR"),
    ("Dunmore", "DUN"),
    ("Eastleigh Park", "EAS"),
    ("Fairhaven", "FAI"),
    ("Glenford", "GLE"),
    ("Harrowgate", "HAR"),
    ("Ironbridge", "IRO"),
    ("Kingsmere", "KIN"),
    ("Larkhill", "LAR"),
    ("Millbrook", "MIL"),
    ("Northam", "NOR"),
    ("Oakridge", "OAK"),
    ("Portsea", "POR"),
    ("Queensway", "QUE"),
    ("Redcliffe", "RED"),
    ("Stonebury", "STO"),
    ("Thornbury", "THO"),
    ("Westfield", "WES"),
];

const SURNAMES: [&str; 16] = [
    "Archer", "Baines", "Cole", "Dyer", "Ellis", "Frost", "Grant", "Hale", "Irwin", "Jones",
    "Kerr", "Lowe", "Moss", "Nash", "Oakes", "Pike",
];

pub fn demo_bootstrap(seed: u64) -> Bootstrap {
    let mut rng = StdRng::seed_from_u64(seed);

    let teams: Vec<Team> = TEAMS
        .iter()
        .enumerate()
        .map(|(idx, (name, short))| {
            let base = rng.gen_range(1040.0..1340.0_f64).round();
            Team {
                id: idx as u32 + 1,
                name: name.to_string(),
                short_name: short.to_string(),
                strength_overall_home: base + rng.gen_range(0.0..40.0_f64).round(),
                strength_overall_away: base - rng.gen_range(0.0..40.0_f64).round(),
            }
        })
        .collect();

    let season_start = NaiveDate::from_ymd_opt(2026, 8, 15)
        .and_then(|d| d.and_hms_opt(10, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt));
    let events = (1..=SEASON_GAMEWEEKS)
        .map(|id| Event {
            id,
            name: format!("Gameweek {id}"),
            deadline_time: season_start.map(|s| s + ChronoDuration::days(7 * (id as i64 - 1))),
            finished: id < DEMO_CURRENT_GAMEWEEK,
            is_current: id == DEMO_CURRENT_GAMEWEEK,
            is_next: id == DEMO_CURRENT_GAMEWEEK + 1,
        })
        .collect();

    let positions = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];
    let mut players = Vec::new();
    for team in &teams {
        for position in positions {
            let id = players.len() as u32 + 1;
            let surname = SURNAMES[rng.gen_range(0..SURNAMES.len())];
            let base_cost: u32 = match position {
                Position::Goalkeeper => 40,
                Position::Defender => 40,
                Position::Midfielder => 50,
                Position::Forward => 55,
            };
            let injured = rng.gen_bool(0.08);
            players.push(Player {
                id,
                web_name: format!("{surname} ({})", team.short_name),
                position,
                team: team.id,
                now_cost: base_cost + rng.gen_range(0..60),
                form: Some(format!("{:.1}", rng.gen_range(0.0..9.0_f64))),
                cost_change_event: rng.gen_range(-1..=1),
                transfers_in_event: rng.gen_range(0..120_000),
                transfers_out_event: rng.gen_range(0..120_000),
                news: if injured {
                    "Knock - 75% chance of playing".to_string()
                } else {
                    String::new()
                },
            });
        }
    }

    Bootstrap {
        events,
        teams,
        players,
    }
}

pub fn demo_fixtures(teams: &[Team]) -> Vec<Fixture> {
    let ids: Vec<u32> = teams.iter().map(|t| t.id).collect();
    let mut fixtures = round_robin(&ids);

    if let Some(idx) = fixtures
        .iter()
        .position(|f| f.event == Some(DEMO_BLANK_GAMEWEEK))
    {
        fixtures[idx].event = Some(DEMO_DOUBLE_GAMEWEEK);
    }
    if let Some(idx) = fixtures
        .iter()
        .position(|f| f.event == Some(DEMO_CURRENT_GAMEWEEK + 6))
    {
        fixtures[idx].event = None;
    }
    fixtures
}

fn round_robin(ids: &[u32]) -> Vec<Fixture> {
    let n = ids.len();
    if n < 2 {
        return Vec::new();
    }
    let mut slots: Vec<u32> = ids.to_vec();
    if n % 2 == 1 {
        // Bye marker.
        slots.push(0);
    }
    let len = slots.len();
    let rounds = len - 1;
    let mut first_half = Vec::new();

    for round in 0..rounds {
        for i in 0..len / 2 {
            let a = slots[i];
            let b = slots[len - 1 - i];
            if a == 0 || b == 0 {
                continue;
            }
            let swap = if i == 0 { round % 2 == 1 } else { i % 2 == 1 };
            let (home, away) = if swap { (b, a) } else { (a, b) };
            first_half.push((round as u32 + 1, home, away));
        }
        slots[1..].rotate_right(1);
    }

    let mut out: Vec<Fixture> = first_half
        .iter()
        .map(|(gw, home, away)| Fixture {
            event: Some(*gw),
            home_team: *home,
            away_team: *away,
        })
        .collect();
    out.extend(first_half.iter().map(|(gw, home, away)| Fixture {
        event: Some(*gw + rounds as u32),
        home_team: *away,
        away_team: *home,
    }));
    out
}

pub fn demo_entry(entry_id: u32) -> EntrySummary {
    EntrySummary {
        id: entry_id,
        name: "Demo XI".to_string(),
        player_first_name: "Demo".to_string(),
        player_last_name: "Manager".to_string(),
        summary_overall_points: Some(142),
        summary_overall_rank: Some(1_204_331),
        current_event: Some(DEMO_CURRENT_GAMEWEEK),
    }
}

pub fn demo_picks(bootstrap: &Bootstrap) -> Vec<Pick> {
    let quota = [
        (Position::Goalkeeper, 2),
        (Position::Defender, 5),
        (Position::Midfielder, 5),
        (Position::Forward, 3),
    ];
    let mut chosen: Vec<u32> = Vec::new();
    let mut team_cursor = 0usize;
    for (position, count) in quota {
        let pool: Vec<&Player> = bootstrap
            .players
            .iter()
            .filter(|p| p.position == position)
            .collect();
        if pool.is_empty() {
            continue;
        }
        for _ in 0..count {
            let player = pool[team_cursor % pool.len()];
            chosen.push(player.id);
            team_cursor += 1;
        }
    }

    // Bench: the second keeper plus the last defender, midfielder and forward.
    let bench: [usize; 4] = [1, 6, 11, 14];
    let mut starters: Vec<u32> = Vec::new();
    let mut subs: Vec<u32> = Vec::new();
    for (idx, id) in chosen.into_iter().enumerate() {
        if bench.contains(&idx) {
            subs.push(id);
        } else {
            starters.push(id);
        }
    }

    starters
        .into_iter()
        .chain(subs)
        .enumerate()
        .map(|(idx, player_id)| Pick {
            player_id,
            position: idx as u8 + 1,
            is_captain: idx == 10,
            is_vice_captain: idx == 9,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture_map::{build_fixture_map, fixtures_for};
    use crate::rating::normalize_ratings;

    #[test]
    fn every_team_plays_every_other_twice() {
        let boot = demo_bootstrap(DEMO_SEED);
        let fixtures = round_robin(&boot.teams.iter().map(|t| t.id).collect::<Vec<_>>());
        assert_eq!(fixtures.len(), 20 * 19);
        for gw in 1..=38 {
            let count = fixtures.iter().filter(|f| f.event == Some(gw)).count();
            assert_eq!(count, 10, "gameweek {gw}");
        }
    }

    #[test]
    fn demo_season_has_blank_and_double() {
        let boot = demo_bootstrap(DEMO_SEED);
        let fixtures = demo_fixtures(&boot.teams);
        let ratings = normalize_ratings(&boot.teams);
        let map = build_fixture_map(&fixtures, &ratings, DEMO_CURRENT_GAMEWEEK);

        let moved = fixtures
            .iter()
            .find(|f| f.event == Some(DEMO_DOUBLE_GAMEWEEK))
            .expect("double gameweek fixture");
        assert!(fixtures_for(&map, moved.home_team, DEMO_BLANK_GAMEWEEK).is_empty());
        assert_eq!(
            fixtures_for(&map, moved.home_team, DEMO_DOUBLE_GAMEWEEK).len(),
            2
        );
        assert!(fixtures.iter().any(|f| f.event.is_none()));
    }

    #[test]
    fn demo_picks_are_a_full_squad() {
        let boot = demo_bootstrap(DEMO_SEED);
        let picks = demo_picks(&boot);
        assert_eq!(picks.len(), 15);
        assert_eq!(picks.iter().filter(|p| p.is_captain).count(), 1);
        assert_eq!(picks.iter().filter(|p| p.on_bench()).count(), 4);
        assert!(
            picks
                .iter()
                .all(|p| boot.players.iter().any(|pl| pl.id == p.player_id))
        );
    }

    #[test]
    fn same_seed_same_season() {
        assert_eq!(demo_bootstrap(7).teams, demo_bootstrap(7).teams);
    }
}

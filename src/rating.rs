use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::Team;

pub const MIN_DIFFICULTY: i32 = 1;
pub const MAX_DIFFICULTY: i32 = 10;
/// Used for uniform-strength leagues and for opponents with no rating.
pub const NEUTRAL_DIFFICULTY: i32 = 5;

const HOME_MODIFIER: i32 = -1;
const AWAY_MODIFIER: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRating {
    pub id: u32,
    pub name: String,
    pub short_name: String,
    pub difficulty: i32,
    pub strength: i32,
}

pub type Ratings = HashMap<u32, TeamRating>;

/// When every team has the same average strength there is no spread to scale,
/// so every team gets [`NEUTRAL_DIFFICULTY`].
pub fn normalize_ratings(teams: &[Team]) -> Ratings {
    let averages: Vec<f64> = teams
        .iter()
        .map(|t| (t.strength_overall_home + t.strength_overall_away) / 2.0)
        .collect();

    let min = averages.iter().copied().fold(f64::INFINITY, f64::min);
    let max = averages.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let spread = max - min;

    teams
        .iter()
        .zip(averages)
        .map(|(team, avg)| {
            let difficulty = if spread > 0.0 {
                (1.0 + ((avg - min) / spread) * 9.0).round() as i32
            } else {
                NEUTRAL_DIFFICULTY
            };
            let rating = TeamRating {
                id: team.id,
                name: team.name.clone(),
                short_name: team.short_name.clone(),
                difficulty,
                strength: avg.round() as i32,
            };
            (team.id, rating)
        })
        .collect()
}

pub fn clamp_difficulty(value: i32) -> i32 {
    value.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

pub fn adjusted_difficulty(ratings: &Ratings, opponent_id: u32, is_home: bool) -> i32 {
    let Some(opponent) = ratings.get(&opponent_id) else {
        return NEUTRAL_DIFFICULTY;
    };
    let modifier = if is_home { HOME_MODIFIER } else { AWAY_MODIFIER };
    clamp_difficulty(opponent.difficulty + modifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: u32, home: f64, away: f64) -> Team {
        Team {
            id,
            name: format!("Team {id}"),
            short_name: format!("T{id}"),
            strength_overall_home: home,
            strength_overall_away: away,
        }
    }

    #[test]
    fn weakest_is_one_strongest_is_ten() {
        let teams = vec![
            team(1, 1000.0, 1100.0),
            team(2, 1200.0, 1300.0),
            team(3, 1350.0, 1350.0),
            team(4, 1100.0, 1150.0),
        ];
        let ratings = normalize_ratings(&teams);
        assert_eq!(ratings[&1].difficulty, 1);
        assert_eq!(ratings[&3].difficulty, 10);
        for rating in ratings.values() {
            assert!((MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&rating.difficulty));
        }
        // avg 1125 over [1050, 1350] -> 1 + 0.25 * 9 = 3.25
        assert_eq!(ratings[&4].difficulty, 3);
        assert_eq!(ratings[&4].strength, 1125);
    }

    #[test]
    fn raw_strength_is_rounded_average() {
        let ratings = normalize_ratings(&[team(1, 1001.0, 1002.0), team(2, 900.0, 900.0)]);
        assert_eq!(ratings[&1].strength, 1002);
    }

    #[test]
    fn uniform_strength_is_neutral() {
        let ratings = normalize_ratings(&[team(1, 1200.0, 1200.0), team(2, 1100.0, 1300.0)]);
        assert!(ratings.values().all(|r| r.difficulty == NEUTRAL_DIFFICULTY));

        let single = normalize_ratings(&[team(9, 1000.0, 1000.0)]);
        assert_eq!(single[&9].difficulty, NEUTRAL_DIFFICULTY);
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(normalize_ratings(&[]).is_empty());
    }

    #[test]
    fn adjustment_stays_in_range_at_edges() {
        let ratings = normalize_ratings(&[team(1, 100.0, 100.0), team(2, 50.0, 50.0)]);
        assert_eq!(adjusted_difficulty(&ratings, 1, false), 10);
        assert_eq!(adjusted_difficulty(&ratings, 1, true), 9);
        assert_eq!(adjusted_difficulty(&ratings, 2, true), 1);
        assert_eq!(adjusted_difficulty(&ratings, 2, false), 2);
    }

    #[test]
    fn away_never_easier_than_home() {
        let teams: Vec<Team> = (0..10)
            .map(|i| team(i + 1, 1000.0 + 37.0 * i as f64, 1010.0 + 29.0 * i as f64))
            .collect();
        let ratings = normalize_ratings(&teams);
        for id in ratings.keys() {
            let home = adjusted_difficulty(&ratings, *id, true);
            let away = adjusted_difficulty(&ratings, *id, false);
            assert!(away >= home);
            assert!((MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&home));
            assert!((MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&away));
        }
    }

    #[test]
    fn unknown_opponent_is_neutral() {
        let ratings = normalize_ratings(&[team(1, 100.0, 100.0)]);
        assert_eq!(adjusted_difficulty(&ratings, 42, true), NEUTRAL_DIFFICULTY);
        assert_eq!(adjusted_difficulty(&ratings, 42, false), NEUTRAL_DIFFICULTY);
    }
}

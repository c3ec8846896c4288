use crate::api::{Bootstrap, EntrySummary, Fixture, Pick};
use crate::fixture_map::{FixtureMap, build_fixture_map, current_gameweek, visible_gameweeks};
use crate::rating::{Ratings, normalize_ratings};
use crate::view::{
    FixtureGrid, SquadPick, SquadView, assemble_fixture_grid, assemble_squad_view, join_squad,
};

#[derive(Debug, Clone)]
pub struct Session {
    pub bootstrap: Bootstrap,
    pub fixtures: Vec<Fixture>,
    pub current_gameweek: u32,
    pub ratings: Ratings,
    pub entry_id: Option<u32>,
}

impl Session {
    pub fn from_payloads(
        bootstrap: Bootstrap,
        fixtures: Vec<Fixture>,
        entry_id: Option<u32>,
    ) -> Self {
        let current_gameweek = current_gameweek(&bootstrap.events);
        let ratings = normalize_ratings(&bootstrap.teams);
        Self {
            bootstrap,
            fixtures,
            current_gameweek,
            ratings,
            entry_id,
        }
    }

    pub fn last_gameweek(&self) -> Option<u32> {
        self.bootstrap.events.iter().map(|e| e.id).max()
    }

    pub fn visible_gameweeks(&self, columns: usize) -> Vec<u32> {
        visible_gameweeks(self.current_gameweek, columns, self.last_gameweek())
    }

    pub fn fixture_map(&self) -> FixtureMap {
        build_fixture_map(&self.fixtures, &self.ratings, self.current_gameweek)
    }

    pub fn fixture_grid(&self, columns: usize) -> FixtureGrid {
        let map = self.fixture_map();
        assemble_fixture_grid(&self.ratings, &map, &self.visible_gameweeks(columns))
    }

    pub fn join_picks(&self, picks: &[Pick]) -> Vec<SquadPick> {
        join_squad(picks, &self.bootstrap.players, &self.ratings)
    }

    pub fn squad_view(&self, squad: &Squad, columns: usize) -> SquadView {
        let map = self.fixture_map();
        assemble_squad_view(
            &squad.picks,
            &map,
            &self.ratings,
            &self.visible_gameweeks(columns),
        )
    }

    pub fn picks_gameweek(&self, entry: Option<&EntrySummary>) -> u32 {
        entry
            .and_then(|e| e.current_event)
            .unwrap_or(self.current_gameweek)
    }
}

#[derive(Debug, Clone)]
pub struct Squad {
    pub entry: EntrySummary,
    pub gameweek: u32,
    pub picks: Vec<SquadPick>,
    /// Picks dropped because their player id was not in the player list.
    pub unresolved_picks: usize,
}

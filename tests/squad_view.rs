mod common;

use fdr_terminal::api::Position;
use fdr_terminal::difficulty::DifficultyBucket;
use fdr_terminal::session::{Session, Squad};
use fdr_terminal::view::{FixtureCell, PriceTrend};

fn session() -> Session {
    Session::from_payloads(common::bootstrap(), common::fixtures(), Some(777))
}

fn squad(session: &Session) -> Squad {
    let picks = common::picks();
    let joined = session.join_picks(&picks);
    Squad {
        entry: common::entry(),
        gameweek: 5,
        unresolved_picks: picks.len() - joined.len(),
        picks: joined,
    }
}

#[test]
fn unknown_picks_are_dropped_and_positions_ordered() {
    let s = session();
    let squad = squad(&s);
    assert_eq!(squad.unresolved_picks, 1);
    let order: Vec<Position> = squad.picks.iter().map(|p| p.position).collect();
    assert_eq!(
        order,
        vec![
            Position::Goalkeeper,
            Position::Defender,
            Position::Midfielder,
            Position::Forward
        ]
    );
}

#[test]
fn player_columns_are_formatted() {
    let s = session();
    let squad = squad(&s);
    let by_name = |name: &str| {
        squad
            .picks
            .iter()
            .find(|p| p.name == name)
            .expect("player present")
    };

    let raya = by_name("Raya");
    assert_eq!(raya.price_label(), "5.5");
    assert_eq!(raya.form_label(), "4.5");
    assert_eq!(raya.trend, PriceTrend::Rising);
    assert!(raya.on_bench);
    assert_eq!(raya.team_short, "ARS");

    let saka = by_name("Saka");
    assert_eq!(saka.price_label(), "10.1");
    assert_eq!(saka.trend, PriceTrend::Up);
    assert_eq!(saka.role_marker(), "(C)");

    let foster = by_name("Foster");
    assert_eq!(foster.form_label(), "0.0");
    assert_eq!(foster.trend, PriceTrend::Steady);
    assert_eq!(foster.role_marker(), "(V)");
    assert!(!foster.news.is_empty());

    let colwill = by_name("Colwill");
    assert_eq!(colwill.price_label(), "4.8");
    assert_eq!(colwill.trend, PriceTrend::Down);
}

#[test]
fn squad_cells_follow_the_players_team() {
    let s = session();
    let view = s.squad_view(&squad(&s), 8);
    assert_eq!(view.header, vec!["Player", "GW5", "GW6", "GW7"]);

    let colwill = view
        .rows
        .iter()
        .find(|r| r.pick.name == "Colwill")
        .expect("row present");
    assert_eq!(colwill.cells[0], FixtureCell::Blank);
    assert_eq!(colwill.cells[1].bucket(), Some(DifficultyBucket::Tricky));

    let foster = view
        .rows
        .iter()
        .find(|r| r.pick.name == "Foster")
        .expect("row present");
    assert_eq!(foster.cells[0].opponent_labels(), vec!["@ARS"]);
}

#[test]
fn picks_gameweek_prefers_entry_current_event() {
    let s = session();
    let mut entry = common::entry();
    entry.current_event = Some(6);
    assert_eq!(s.picks_gameweek(Some(&entry)), 6);
    entry.current_event = None;
    assert_eq!(s.picks_gameweek(Some(&entry)), 5);
    assert_eq!(s.picks_gameweek(None), 5);
}

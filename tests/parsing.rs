mod common;

use fdr_terminal::api::{
    Position, parse_bootstrap_json, parse_entry_json, parse_fixtures_json, parse_picks_json,
};

use common::read_fixture;

#[test]
fn parses_bootstrap_fixture() {
    let boot = common::bootstrap();
    assert_eq!(boot.events.len(), 4);
    assert!(boot.events[1].is_current);
    assert!(boot.events[3].deadline_time.is_none());
    assert_eq!(boot.teams.len(), 3);
    assert_eq!(boot.teams[0].short_name, "ARS");
    assert_eq!(boot.teams[0].strength_overall_away, 1340.0);
    assert_eq!(boot.players.len(), 4);
    assert_eq!(boot.players[0].position, Position::Goalkeeper);
    assert_eq!(boot.players[2].form, None);
    assert!(boot.players[2].news.starts_with("Hamstring"));
}

#[test]
fn parses_fixtures_with_unscheduled_event() {
    let fixtures = common::fixtures();
    assert_eq!(fixtures.len(), 6);
    assert_eq!(fixtures[0].event, Some(5));
    assert_eq!(fixtures[0].home_team, 1);
    assert_eq!(fixtures[0].away_team, 2);
    assert_eq!(fixtures[4].event, None);
}

#[test]
fn parses_entry_and_picks() {
    let entry = common::entry();
    assert_eq!(entry.id, 777);
    assert_eq!(entry.manager_name(), "Sam Rivera");
    assert_eq!(entry.current_event, Some(5));

    let picks = common::picks();
    assert_eq!(picks.len(), 5);
    assert!(picks[1].is_captain);
    assert!(picks[4].on_bench());
    assert!(!picks[0].on_bench());
}

#[test]
fn missing_required_team_field_fails() {
    let raw = read_fixture("bootstrap.json").replace("\"short_name\": \"BUR\", ", "");
    let err = parse_bootstrap_json(&raw).expect_err("missing short_name should fail");
    assert!(format!("{err:#}").contains("invalid bootstrap json"));
}

#[test]
fn missing_fixture_team_fails() {
    let err = parse_fixtures_json(r#"[{"event": 1, "team_h": 2}]"#)
        .expect_err("missing team_a should fail");
    assert!(format!("{err:#}").contains("team_a"));
}

#[test]
fn unknown_position_code_fails() {
    let raw = read_fixture("bootstrap.json").replace("\"element_type\": 4", "\"element_type\": 9");
    assert!(parse_bootstrap_json(&raw).is_err());
}

#[test]
fn null_and_empty_bodies_are_errors() {
    assert!(parse_bootstrap_json("null").is_err());
    assert!(parse_fixtures_json("  ").is_err());
    assert!(parse_entry_json("null").is_err());
    assert!(parse_picks_json("").is_err());
}

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use fdr_terminal::api::{
    Bootstrap, EntrySummary, Fixture, Pick, parse_bootstrap_json, parse_entry_json,
    parse_fixtures_json, parse_picks_json,
};

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

pub fn bootstrap() -> Bootstrap {
    parse_bootstrap_json(&read_fixture("bootstrap.json")).expect("bootstrap fixture should parse")
}

pub fn fixtures() -> Vec<Fixture> {
    parse_fixtures_json(&read_fixture("fixtures.json")).expect("fixtures fixture should parse")
}

pub fn entry() -> EntrySummary {
    parse_entry_json(&read_fixture("entry.json")).expect("entry fixture should parse")
}

pub fn picks() -> Vec<Pick> {
    parse_picks_json(&read_fixture("picks.json")).expect("picks fixture should parse")
}

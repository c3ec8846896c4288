mod common;

use fdr_terminal::session::{Session, Squad};
use fdr_terminal::state::{AppState, Delta, Pane, apply_delta};

fn session() -> Session {
    Session::from_payloads(common::bootstrap(), common::fixtures(), Some(777))
}

fn squad(session: &Session) -> Squad {
    Squad {
        entry: common::entry(),
        gameweek: 5,
        picks: session.join_picks(&common::picks()),
        unresolved_picks: 1,
    }
}

#[test]
fn set_session_clears_refreshing() {
    let mut state = AppState::new();
    state.begin_refresh();
    assert!(state.refreshing);

    apply_delta(&mut state, Delta::SetSession(Box::new(session())));
    assert!(!state.refreshing);
    assert!(state.session.is_some());
    assert!(state.last_refresh.is_some());
    assert!(state.fixture_grid(8).is_some());
}

#[test]
fn refresh_failure_keeps_previous_session_and_alerts() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetSession(Box::new(session())));
    state.begin_refresh();

    apply_delta(
        &mut state,
        Delta::RefreshFailed("fixtures request failed".to_string()),
    );
    assert!(!state.refreshing);
    assert!(state.session.is_some());
    let alert = state.alert.as_ref().expect("alert raised");
    assert!(alert.message.contains("fixtures"));
    assert!(state.logs.back().is_some_and(|l| l.starts_with("[ERROR]")));

    state.dismiss_alert();
    assert!(state.alert.is_none());
}

#[test]
fn squad_failure_leaves_grid_intact() {
    let mut state = AppState::new();
    state.entry_id = Some(777);
    let s = session();
    let loaded = squad(&s);
    apply_delta(&mut state, Delta::SetSession(Box::new(s)));
    apply_delta(&mut state, Delta::SetSquad(Box::new(loaded)));
    assert!(state.squad_view(8).is_some());

    state.squad_loading = true;
    apply_delta(&mut state, Delta::SquadFailed("http 404".to_string()));
    assert!(!state.squad_loading);
    assert!(state.alert.is_some());
    assert!(state.fixture_grid(8).is_some());
    assert!(state.squad.is_some());
}

#[test]
fn squad_for_previous_entry_is_dropped() {
    let mut state = AppState::new();
    state.entry_id = Some(777);
    let s = session();
    let stale = squad(&s);
    apply_delta(&mut state, Delta::SetSession(Box::new(s)));
    state.begin_refresh();

    state.open_entry_prompt();
    state.entry_input = Some("200".to_string());
    assert_eq!(state.submit_entry_input(), Some(200));

    apply_delta(&mut state, Delta::SetSquad(Box::new(stale)));
    assert_eq!(state.entry_id, Some(200));
    assert!(state.squad.is_none());
    assert!(state.squad_loading);
    assert!(state.logs.back().is_some_and(|l| l.starts_with("[WARN]")));

    apply_delta(&mut state, Delta::SquadFailed("http 404".to_string()));
    assert_eq!(state.entry_id, Some(200));
    assert!(!state.squad_loading);
    assert!(state.squad.is_none());
}

#[test]
fn entry_prompt_accepts_digits_only() {
    let mut state = AppState::new();
    state.open_entry_prompt();
    for ch in "12a3".chars() {
        state.push_entry_char(ch);
    }
    assert_eq!(state.entry_input.as_deref(), Some("123"));
    state.pop_entry_char();
    assert_eq!(state.submit_entry_input(), Some(12));
    assert!(state.entry_input.is_none());
    assert_eq!(state.entry_id, Some(12));
    assert!(state.squad_loading);
}

#[test]
fn zero_entry_keeps_prompt_open() {
    let mut state = AppState::new();
    state.open_entry_prompt();
    state.push_entry_char('0');
    assert_eq!(state.submit_entry_input(), None);
    assert!(state.entry_input.is_some());
    assert_eq!(state.entry_id, None);
}

#[test]
fn scrolling_is_bounded_per_pane() {
    let mut state = AppState::new();
    state.entry_id = Some(777);
    let s = session();
    let loaded = squad(&s);
    apply_delta(&mut state, Delta::SetSession(Box::new(s)));
    apply_delta(&mut state, Delta::SetSquad(Box::new(loaded)));

    for _ in 0..10 {
        state.scroll_down();
    }
    assert_eq!(state.grid_scroll, 2);

    state.toggle_focus();
    assert_eq!(state.focus, Pane::Squad);
    state.scroll_down();
    assert_eq!(state.squad_scroll, 1);
    state.scroll_up();
    state.scroll_up();
    assert_eq!(state.squad_scroll, 0);
}

#[test]
fn log_is_bounded() {
    let mut state = AppState::new();
    for i in 0..500 {
        apply_delta(&mut state, Delta::Log(format!("[INFO] line {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] line 499"));
}

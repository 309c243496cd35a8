use sgl_terminal::state::{
    AppState, Delta, Fighter, Matchup, ProviderCommand, ResultSet, Tab, apply_delta,
};

fn fighter(name: &str) -> Fighter {
    Fighter {
        name: Some(name.to_string()),
        ..Fighter::default()
    }
}

fn matchup(a: &str, b: &str) -> Matchup {
    Matchup {
        fighter_a: Some(a.to_string()),
        fighter_b: Some(b.to_string()),
        ..Matchup::default()
    }
}

fn sample_results() -> ResultSet {
    ResultSet {
        fighters: vec![fighter("Ana Silva"), fighter("Carlos Souza")],
        matchups: vec![matchup("Ana Silva", "Carla Mendes")],
    }
}

#[test]
fn set_today_replaces_the_card_and_clamps_selection() {
    let mut state = AppState::new();
    assert_eq!(state.tab, Tab::Today);
    state.selected = 9;

    apply_delta(
        &mut state,
        Delta::SetToday(vec![matchup("A", "B"), matchup("C", "D")]),
    );
    assert_eq!(state.today.len(), 2);
    assert_eq!(state.selected, 1);

    apply_delta(&mut state, Delta::SetToday(Vec::new()));
    assert!(state.today.is_empty());
    assert_eq!(state.selected, 0);
}

#[test]
fn search_results_set_full_and_visible_together() {
    let mut state = AppState::new();
    assert!(state.results.is_none());

    apply_delta(&mut state, Delta::SetSearchResults(sample_results()));

    assert_eq!(state.full_results, sample_results());
    assert_eq!(state.results, Some(sample_results()));
}

#[test]
fn a_new_consult_discards_previous_narrowing() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetSearchResults(sample_results()));
    state.set_search_term("carlos");
    assert_eq!(state.results.as_ref().map(|r| r.fighters.len()), Some(1));

    let fresh = ResultSet {
        fighters: vec![fighter("Ana Silva")],
        matchups: Vec::new(),
    };
    apply_delta(&mut state, Delta::SetSearchResults(fresh.clone()));

    // The whole response is visible even though "carlos" matches none of it.
    assert_eq!(state.results, Some(fresh.clone()));
    assert_eq!(state.full_results, fresh);
}

#[test]
fn notice_and_log_leave_results_untouched() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetToday(vec![matchup("A", "B")]));
    apply_delta(&mut state, Delta::SetSearchResults(sample_results()));

    apply_delta(&mut state, Delta::Notice("portal is down".to_string()));
    apply_delta(&mut state, Delta::Log("[WARN] portal is down".to_string()));

    assert_eq!(state.notice.as_deref(), Some("portal is down"));
    assert_eq!(state.today.len(), 1);
    assert_eq!(state.full_results, sample_results());
    assert_eq!(state.results, Some(sample_results()));
}

#[test]
fn console_log_is_capped() {
    let mut state = AppState::new();
    for idx in 0..205 {
        apply_delta(&mut state, Delta::Log(format!("line {idx}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("line 5"));
    assert_eq!(state.logs.back().map(String::as_str), Some("line 204"));
}

#[test]
fn selection_stays_inside_the_visible_list() {
    let mut state = AppState::new();
    state.select_tab(Tab::Fighters);
    apply_delta(
        &mut state,
        Delta::SetSearchResults(ResultSet {
            fighters: vec![fighter("A"), fighter("B"), fighter("C")],
            matchups: Vec::new(),
        }),
    );

    state.select_next();
    state.select_next();
    state.select_next();
    assert_eq!(state.selected, 2);

    state.select_prev();
    state.select_prev();
    state.select_prev();
    assert_eq!(state.selected, 0);
}

#[test]
fn switching_tabs_resets_selection() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetToday(vec![matchup("A", "B"), matchup("C", "D")]),
    );
    state.select_next();
    assert_eq!(state.selected, 1);

    state.select_tab(Tab::Matchups);
    assert_eq!(state.selected, 0);

    // Re-selecting the active tab keeps the cursor where it was.
    state.select_tab(Tab::Today);
    state.select_next();
    assert_eq!(state.selected, 1);
    state.select_tab(Tab::Today);
    assert_eq!(state.selected, 1);
}

#[test]
fn search_commands_carry_the_raw_term() {
    let cmd = ProviderCommand::Search {
        term: "  ana maria ".to_string(),
    };
    match cmd {
        ProviderCommand::Search { term } => assert_eq!(term, "  ana maria "),
        other => panic!("unexpected command: {other:?}"),
    }
}

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

const MAX_CONSOLE_LINES: usize = 200;

/// One fighter card from `get_lutador.php`. The backend is loosely typed
/// (numbers sometimes arrive as strings, fields go missing), so every
/// field is optional and normalized by the fetch layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "equipe")]
    pub team: Option<String>,
    #[serde(rename = "vitorias")]
    pub wins: Option<i64>,
    #[serde(rename = "derrotas")]
    pub losses: Option<i64>,
    #[serde(rename = "empates")]
    pub draws: Option<i64>,
    #[serde(rename = "modalidade")]
    pub discipline: Option<String>,
    #[serde(rename = "peso")]
    pub weight: Option<String>,
    #[serde(rename = "imagem")]
    pub image_path: Option<String>,
}

/// One matchup from `get_confrontos.php` / `get_confrontos_hoje.php`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    #[serde(rename = "lutador1")]
    pub fighter_a: Option<String>,
    #[serde(rename = "lutador2")]
    pub fighter_b: Option<String>,
    #[serde(rename = "imagem1")]
    pub image_a: Option<String>,
    #[serde(rename = "imagem2")]
    pub image_b: Option<String>,
    #[serde(rename = "lutador1_id")]
    pub fighter_a_id: Option<i64>,
    #[serde(rename = "lutador2_id")]
    pub fighter_b_id: Option<i64>,
    #[serde(rename = "vencedor_id")]
    pub winner_id: Option<i64>,
    #[serde(rename = "resultado")]
    pub result: Option<String>,
    #[serde(rename = "data_confronto")]
    pub scheduled_at: Option<String>,
    #[serde(rename = "local")]
    pub venue: Option<String>,
}

/// The fighters + matchups pair one consult of the portal returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub fighters: Vec<Fighter>,
    pub matchups: Vec<Matchup>,
}

impl Fighter {
    fn matches(&self, term: &str) -> bool {
        contains_ci(self.name.as_deref(), term)
    }
}

impl Matchup {
    fn matches(&self, term: &str) -> bool {
        contains_ci(self.fighter_a.as_deref(), term)
            || contains_ci(self.fighter_b.as_deref(), term)
    }
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.fighters.is_empty() && self.matchups.is_empty()
    }

    /// Case-insensitive narrowing by fighter name. Always computed from
    /// `self` in full, so a shorter term widens the result again.
    pub fn filter(&self, term: &str) -> ResultSet {
        ResultSet {
            fighters: self
                .fighters
                .iter()
                .filter(|f| f.matches(term))
                .cloned()
                .collect(),
            matchups: self
                .matchups
                .iter()
                .filter(|m| m.matches(term))
                .cloned()
                .collect(),
        }
    }
}

fn contains_ci(text: Option<&str>, term: &str) -> bool {
    match text {
        Some(text) => text.to_lowercase().contains(&term.to_lowercase()),
        // Unnamed records only survive an unrestricted filter.
        None => term.is_empty(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Today,
    Fighters,
    Matchups,
}

pub fn tab_label(tab: Tab) -> &'static str {
    match tab {
        Tab::Today => "Today",
        Tab::Fighters => "Fighters",
        Tab::Matchups => "Matchups",
    }
}

/// Requests the UI sends to the provider thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    FetchToday,
    Search { term: String },
}

/// State changes emitted by the provider thread. The UI owns `AppState`
/// and applies these in order on its tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Delta {
    SetToday(Vec<Matchup>),
    SetSearchResults(ResultSet),
    Notice(String),
    Log(String),
}

pub struct AppState {
    pub tab: Tab,
    pub search_term: String,
    pub search_active: bool,
    pub today: Vec<Matchup>,
    pub full_results: ResultSet,
    // `None` until the first consult of the portal; typing before that
    // only records the term.
    pub results: Option<ResultSet>,
    pub selected: usize,
    pub logs: VecDeque<String>,
    pub notice: Option<String>,
    pub image_overlay: Option<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tab: Tab::Today,
            search_term: String::new(),
            search_active: false,
            today: Vec::new(),
            full_results: ResultSet::default(),
            results: None,
            selected: 0,
            logs: VecDeque::new(),
            notice: None,
            image_overlay: None,
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.logs.len() >= MAX_CONSOLE_LINES {
            self.logs.pop_front();
        }
        self.logs.push_back(line.into());
    }

    pub fn select_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.selected = 0;
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.refilter();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_term.push(c);
        self.refilter();
    }

    pub fn pop_search_char(&mut self) {
        self.search_term.pop();
        self.refilter();
    }

    fn refilter(&mut self) {
        if self.results.is_none() {
            return;
        }
        self.results = Some(self.full_results.filter(&self.search_term));
        self.clamp_selection();
    }

    pub fn visible_fighters(&self) -> &[Fighter] {
        match &self.results {
            Some(results) => &results.fighters,
            None => &[],
        }
    }

    pub fn visible_matchups(&self) -> &[Matchup] {
        match &self.results {
            Some(results) => &results.matchups,
            None => &[],
        }
    }

    pub fn visible_len(&self) -> usize {
        match self.tab {
            Tab::Today => self.today.len(),
            Tab::Fighters => self.visible_fighters().len(),
            Tab::Matchups => self.visible_matchups().len(),
        }
    }

    pub fn selected_fighter(&self) -> Option<&Fighter> {
        if self.tab != Tab::Fighters {
            return None;
        }
        self.visible_fighters().get(self.selected)
    }

    pub fn selected_matchup(&self) -> Option<&Matchup> {
        match self.tab {
            Tab::Today => self.today.get(self.selected),
            Tab::Matchups => self.visible_matchups().get(self.selected),
            Tab::Fighters => None,
        }
    }

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetToday(matchups) => {
            state.today = matchups;
            state.clamp_selection();
        }
        Delta::SetSearchResults(results) => {
            // A consult resets both the full set and the visible set;
            // whatever narrowing was on screen is discarded.
            state.full_results = results.clone();
            state.results = Some(results);
            state.clamp_selection();
        }
        Delta::Notice(message) => {
            state.notice = Some(message);
        }
        Delta::Log(line) => state.push_log(line),
    }
}

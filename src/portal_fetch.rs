use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::http_client::fetch_text;
use crate::state::{Fighter, Matchup, ResultSet};

pub const PORTAL_BASE_URL: &str = "https://sgl.tds104-senac.online/";

const FIGHTERS_ENDPOINT: &str = "get_lutador.php";
const MATCHUPS_ENDPOINT: &str = "get_confrontos.php";
const TODAY_ENDPOINT: &str = "get_confrontos_hoje.php";
const SEARCH_PARAM: &str = "busca";

pub fn fetch_today() -> Result<Vec<Matchup>> {
    let body = fetch_text(&endpoint_url(TODAY_ENDPOINT), &[]).context("today fetch failed")?;
    parse_today_json(&body)
}

pub fn fetch_fighters(term: &str) -> Result<Vec<Fighter>> {
    let body = fetch_endpoint(FIGHTERS_ENDPOINT, term).context("fighters fetch failed")?;
    parse_fighters_json(&body)
}

pub fn fetch_matchups(term: &str) -> Result<Vec<Matchup>> {
    let body = fetch_endpoint(MATCHUPS_ENDPOINT, term).context("matchups fetch failed")?;
    parse_matchups_json(&body)
}

/// Consult both search endpoints for `term`. Either request failing fails
/// the whole consult; callers only ever see a complete fighters +
/// matchups pair.
pub fn search_portal(term: &str) -> Result<ResultSet> {
    let fighters = fetch_fighters(term)?;
    let matchups = fetch_matchups(term)?;
    Ok(ResultSet { fighters, matchups })
}

pub fn parse_fighters_json(raw: &str) -> Result<Vec<Fighter>> {
    let items = parse_record_array(raw, "fighters")?;
    Ok(items.iter().map(fighter_from_value).collect())
}

pub fn parse_matchups_json(raw: &str) -> Result<Vec<Matchup>> {
    let items = parse_record_array(raw, "matchups")?;
    Ok(items.iter().map(matchup_from_value).collect())
}

pub fn parse_today_json(raw: &str) -> Result<Vec<Matchup>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid today json")?;
    // The hoje endpoint answers `{}` instead of `[]` on days without a
    // card; any non-array body counts as an empty schedule.
    let Some(items) = root.as_array() else {
        return Ok(Vec::new());
    };
    Ok(items.iter().map(matchup_from_value).collect())
}

fn endpoint_url(endpoint: &str) -> String {
    format!("{PORTAL_BASE_URL}{endpoint}")
}

fn fetch_endpoint(endpoint: &str, term: &str) -> Result<String> {
    let url = endpoint_url(endpoint);
    if term.is_empty() {
        fetch_text(&url, &[])
    } else {
        fetch_text(&url, &[(SEARCH_PARAM, term)])
    }
}

fn parse_record_array(raw: &str, what: &str) -> Result<Vec<Value>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let root: Value =
        serde_json::from_str(trimmed).with_context(|| format!("invalid {what} json"))?;
    match root {
        Value::Array(items) => Ok(items),
        _ => bail!("{what} response is not a JSON array"),
    }
}

fn fighter_from_value(value: &Value) -> Fighter {
    Fighter {
        name: pick_str(value, "nome"),
        team: pick_str(value, "equipe"),
        wins: pick_i64(value, "vitorias"),
        losses: pick_i64(value, "derrotas"),
        draws: pick_i64(value, "empates"),
        discipline: pick_str(value, "modalidade"),
        weight: pick_str(value, "peso"),
        image_path: pick_str(value, "imagem"),
    }
}

fn matchup_from_value(value: &Value) -> Matchup {
    Matchup {
        fighter_a: pick_str(value, "lutador1"),
        fighter_b: pick_str(value, "lutador2"),
        image_a: pick_str(value, "imagem1"),
        image_b: pick_str(value, "imagem2"),
        fighter_a_id: pick_i64(value, "lutador1_id"),
        fighter_b_id: pick_i64(value, "lutador2_id"),
        winner_id: pick_i64(value, "vencedor_id"),
        result: pick_str(value, "resultado"),
        scheduled_at: pick_str(value, "data_confronto"),
        venue: pick_str(value, "local"),
    }
}

// The portal backend is loosely typed. Only real JSON strings count as
// strings (a numeric `nome` stays absent rather than being stringified),
// while counts and ids accept both numbers and numeric strings.
fn pick_str(record: &Value, key: &str) -> Option<String> {
    match record.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

fn pick_i64(record: &Value, key: &str) -> Option<i64> {
    match record.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

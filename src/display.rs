use crate::portal_fetch::PORTAL_BASE_URL;
use crate::state::{Fighter, Matchup};

// Wire value `get_confrontos.php` uses for a draw.
const DRAW_RESULT: &str = "Empate";

/// Avatar resolved for one fighter slot. `Photo` carries the full image
/// URL and can be opened in the zoom overlay; `Badge` is the initials
/// fallback and is not interactive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    Photo(String),
    Badge(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchupOutcome {
    FighterA,
    FighterB,
    Draw,
    Undecided,
}

/// Up to two uppercased initials from a name, `"?"` when the name is
/// missing or blank.
pub fn initials(name: Option<&str>) -> String {
    let Some(name) = name else {
        return "?".to_string();
    };
    let first_letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect();
    if first_letters.is_empty() {
        return "?".to_string();
    }
    first_letters.to_uppercase().chars().take(2).collect()
}

pub fn has_image_extension(path: Option<&str>) -> bool {
    let Some(path) = path else {
        return false;
    };
    if path.trim().is_empty() {
        return false;
    }
    let lowered = path.to_lowercase();
    lowered.ends_with(".jpg") || lowered.ends_with(".jpeg") || lowered.ends_with(".png")
}

/// Full image URL for a relative path stored by the portal.
pub fn image_url(path: &str) -> String {
    format!("{PORTAL_BASE_URL}{path}")
}

pub fn resolve_avatar(image_path: Option<&str>, name: Option<&str>) -> Avatar {
    if has_image_extension(image_path)
        && let Some(path) = image_path
    {
        return Avatar::Photo(image_url(path));
    }
    Avatar::Badge(initials(name))
}

/// Rearrange the portal's `YYYY-MM-DD HH:MM` timestamps into
/// `DD/MM/YYYY HH:MM`. Purely textual; inputs without a space (or empty)
/// come back as an empty string.
pub fn format_schedule(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    if raw.is_empty() || !raw.contains(' ') {
        return String::new();
    }
    let mut halves = raw.split(' ');
    let date = halves.next().unwrap_or_default();
    let time = halves.next().unwrap_or_default();
    let mut ymd = date.split('-');
    let year = ymd.next().unwrap_or_default();
    let month = ymd.next().unwrap_or_default();
    let day = ymd.next().unwrap_or_default();
    let mut hm = time.split(':');
    let hour = hm.next().unwrap_or_default();
    let minute = hm.next().unwrap_or_default();
    format!("{day}/{month}/{year} {hour}:{minute}")
}

pub fn record_label(fighter: &Fighter) -> String {
    format!(
        "{}W {}L {}D",
        count_label(fighter.wins),
        count_label(fighter.losses),
        count_label(fighter.draws)
    )
}

fn count_label(count: Option<i64>) -> String {
    match count {
        Some(n) => n.to_string(),
        None => "-".to_string(),
    }
}

/// Derive who to mark as winner. A missing winner id marks nobody, even
/// when the fighter ids are missing too.
pub fn outcome(matchup: &Matchup) -> MatchupOutcome {
    if matchup.result.as_deref() == Some(DRAW_RESULT) {
        return MatchupOutcome::Draw;
    }
    let Some(winner) = matchup.winner_id else {
        return MatchupOutcome::Undecided;
    };
    if matchup.fighter_a_id == Some(winner) {
        MatchupOutcome::FighterA
    } else if matchup.fighter_b_id == Some(winner) {
        MatchupOutcome::FighterB
    } else {
        MatchupOutcome::Undecided
    }
}

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use sgl_terminal::display::{Avatar, initials, resolve_avatar};
use sgl_terminal::portal_fetch::{parse_fighters_json, parse_matchups_json};
use sgl_terminal::state::{Fighter, Matchup, ResultSet};

fn synthetic_fighters(count: usize) -> Vec<Fighter> {
    (0..count)
        .map(|idx| Fighter {
            name: Some(format!(
                "Fighter {idx} {}",
                if idx % 5 == 0 { "Silva" } else { "Santos" }
            )),
            team: Some(format!("Equipe {}", idx % 12)),
            wins: Some((idx % 20) as i64),
            losses: Some((idx % 7) as i64),
            draws: Some((idx % 3) as i64),
            discipline: Some(if idx % 2 == 0 { "Boxe" } else { "MMA" }.to_string()),
            weight: Some("Peso Medio".to_string()),
            image_path: if idx % 3 == 0 {
                Some(format!("fighters/f{idx}.png"))
            } else {
                None
            },
        })
        .collect()
}

fn synthetic_matchups(count: usize) -> Vec<Matchup> {
    (0..count)
        .map(|idx| Matchup {
            fighter_a: Some(format!("Fighter {idx} Silva")),
            fighter_b: Some(format!("Fighter {} Santos", idx + 1)),
            fighter_a_id: Some(idx as i64),
            fighter_b_id: Some((idx + 1) as i64),
            winner_id: if idx % 2 == 0 { Some(idx as i64) } else { None },
            result: None,
            image_a: Some(format!("fighters/f{idx}.png")),
            image_b: None,
            scheduled_at: Some("2024-05-01 14:30".to_string()),
            venue: Some("Ginasio Central".to_string()),
        })
        .collect()
}

fn bench_fighters_parse(c: &mut Criterion) {
    c.bench_function("fighters_parse_fixture", |b| {
        b.iter(|| {
            let rows = parse_fighters_json(black_box(FIGHTERS_JSON)).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_matchups_parse(c: &mut Criterion) {
    c.bench_function("matchups_parse_fixture", |b| {
        b.iter(|| {
            let rows = parse_matchups_json(black_box(MATCHUPS_JSON)).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_fighters_parse_large(c: &mut Criterion) {
    let corpus = serde_json::to_string(&synthetic_fighters(1000)).expect("serialize fighters");
    c.bench_function("fighters_parse_1000", |b| {
        b.iter(|| {
            let rows = parse_fighters_json(black_box(&corpus)).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_filter_narrowing(c: &mut Criterion) {
    let results = ResultSet {
        fighters: synthetic_fighters(1000),
        matchups: synthetic_matchups(400),
    };
    c.bench_function("filter_narrowing_1000", |b| {
        b.iter(|| {
            let narrowed = results.filter(black_box("silva"));
            black_box(narrowed.fighters.len());
        })
    });
}

fn bench_avatar_resolution(c: &mut Criterion) {
    let fighters = synthetic_fighters(1000);
    c.bench_function("avatar_resolution_1000", |b| {
        b.iter(|| {
            let mut badges = 0usize;
            for fighter in &fighters {
                let avatar =
                    resolve_avatar(fighter.image_path.as_deref(), fighter.name.as_deref());
                if matches!(avatar, Avatar::Badge(_)) {
                    badges += 1;
                }
            }
            black_box(badges);
            black_box(initials(Some("Ana Silva")));
        })
    });
}

criterion_group!(
    perf,
    bench_fighters_parse,
    bench_matchups_parse,
    bench_fighters_parse_large,
    bench_filter_narrowing,
    bench_avatar_resolution
);
criterion_main!(perf);

static FIGHTERS_JSON: &str = include_str!("../tests/fixtures/fighters.json");
static MATCHUPS_JSON: &str = include_str!("../tests/fixtures/matchups.json");

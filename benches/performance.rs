//! Performance benchmarks for api-lab
//!
//! Covers the hot paths that run per sample or per row: summary statistics,
//! SQL execution over a loaded table and HTML rendering of result sets.

use api_lab::{
    console::QueryConsole,
    db::Database,
    models::{CellValue, CharacterRow, ResultSet, Summary},
    output::html,
    stats,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

fn create_samples(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| {
            if i % 10 == 0 {
                api_lab::defaults::FAILURE_SENTINEL_MS
            } else {
                50.0 + (i * 37 % 400) as f64
            }
        })
        .collect()
}

fn create_rows(count: usize) -> Vec<CharacterRow> {
    (0..count as i64)
        .map(|id| CharacterRow {
            id,
            name: Some(format!("Character <{}>", id)),
            status: Some(if id % 3 == 0 { "Dead" } else { "Alive" }.to_string()),
            species: Some(if id % 2 == 0 { "Human" } else { "Alien" }.to_string()),
            subtype: None,
            gender: Some("Female".to_string()),
            origin: Some("Earth (C-137)".to_string()),
            location: Some("Citadel of Ricks".to_string()),
            image: Some(format!("https://rickandmortyapi.com/api/character/avatar/{}.jpeg", id)),
            created: Some("2017-11-04T18:48:46.250Z".to_string()),
        })
        .collect()
}

fn create_result_set(rows: usize) -> ResultSet {
    let mut result = ResultSet::new(vec!["id".to_string(), "name".to_string(), "image".to_string()]);
    for id in 0..rows as i64 {
        result.rows.push(vec![
            CellValue::Integer(id),
            CellValue::Text(format!("Rick & Morty <{}>", id)),
            CellValue::Text(format!("https://rickandmortyapi.com/api/character/avatar/{}.jpeg", id)),
        ]);
    }
    result
}

/// Benchmark median, p95 and average over growing sample sets
fn benchmark_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");

    for size in [5usize, 100, 10_000] {
        let samples = create_samples(size);

        group.bench_with_input(BenchmarkId::new("summary", size), &samples, |b, samples| {
            b.iter(|| Summary::from_samples(black_box(samples)))
        });

        group.bench_with_input(BenchmarkId::new("p95", size), &samples, |b, samples| {
            b.iter(|| stats::percentile(black_box(samples), 95.0))
        });
    }

    group.finish();
}

/// Benchmark page inserts and ad-hoc queries against the in-memory table
fn benchmark_database(c: &mut Criterion) {
    let mut group = c.benchmark_group("database");
    let rows = create_rows(826);

    group.bench_function("insert_page", |b| {
        let mut db = Database::open_in_memory().unwrap();
        let page = &rows[..20];
        b.iter(|| db.insert_characters(black_box(page)).unwrap())
    });

    let mut db = Database::open_in_memory().unwrap();
    db.insert_characters(&rows).unwrap();

    group.bench_function("group_by_species", |b| {
        b.iter(|| {
            QueryConsole::run_query(
                &mut db,
                black_box("SELECT species, COUNT(*) AS total FROM characters GROUP BY species"),
            )
        })
    });

    group.finish();
}

/// Benchmark escaped HTML table rendering with thumbnail detection
fn benchmark_html_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("html_rendering");

    for size in [20usize, 826] {
        let result = create_result_set(size);
        group.bench_with_input(BenchmarkId::new("result_table", size), &result, |b, result| {
            b.iter(|| html::render_result_table(black_box(result)))
        });
    }

    group.bench_function("escape", |b| {
        b.iter(|| html::escape(black_box("<script>alert(\"Rick & Morty's\")</script>")))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_statistics,
    benchmark_database,
    benchmark_html_rendering
);
criterion_main!(benches);

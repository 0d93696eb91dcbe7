//! Benchmarks for index construction and queries
//!
//! Run with: cargo bench --package similarity
//!
//! Uses a synthetic corpus so the benchmark runs without the TMDB files.
//! Build logs are off unless `RUST_LOG` asks for them.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use data_loader::{MovieCatalog, MovieRecord};
use similarity::{ContentIndex, IndexConfig, SimilarityMatrix};
use tracing_subscriber::EnvFilter;

const WORDS: &[&str] = &[
    "space", "marine", "alien", "heist", "detective", "murder", "romance", "wedding", "dragon",
    "kingdom", "robot", "future", "war", "soldier", "ghost", "haunted", "ocean", "pirate",
    "treasure", "vampire", "zombie", "island", "prison", "escape", "spy", "mission", "family",
    "holiday", "comedy", "drama",
];

fn init_tracing() {
    // Every bench function calls this; only the first install wins
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .try_init();
}

fn synthetic_catalog(movies: usize) -> MovieCatalog {
    init_tracing();

    let records = (0..movies)
        .map(|i| {
            let overview: Vec<&str> = (0..12).map(|w| WORDS[(i * 7 + w * 3) % WORDS.len()]).collect();
            MovieRecord::new(i as u32, format!("Movie {}", i))
                .with_overview(overview.join(" "))
                .with_genres([WORDS[i % WORDS.len()]])
                .with_cast([format!("Actor {}", i % 50), format!("Actor {}", i % 17)])
                .with_director(format!("Director {}", i % 40))
        })
        .collect();
    MovieCatalog::from_records(records)
}

fn bench_index_build(c: &mut Criterion) {
    let catalog = synthetic_catalog(1000);

    c.bench_function("content_index_build_1000", |b| {
        b.iter(|| {
            let index = ContentIndex::build(black_box(catalog.clone()), &IndexConfig::default());
            black_box(index)
        })
    });
}

fn bench_matrix_build(c: &mut Criterion) {
    let index = ContentIndex::build(synthetic_catalog(1000), &IndexConfig::default());
    let vectors = index.vectors().to_vec();

    c.bench_function("similarity_matrix_build_1000", |b| {
        b.iter(|| black_box(SimilarityMatrix::build(black_box(&vectors))))
    });
}

fn bench_query(c: &mut Criterion) {
    let index = ContentIndex::build(synthetic_catalog(1000), &IndexConfig::default());

    c.bench_function("top5_query", |b| {
        b.iter(|| {
            let neighbors = index.matrix().query(black_box(42), black_box(5)).unwrap();
            black_box(neighbors)
        })
    });
}

criterion_group!(benches, bench_index_build, bench_matrix_build, bench_query);
criterion_main!(benches);

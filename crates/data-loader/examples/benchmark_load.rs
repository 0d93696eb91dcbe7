use anyhow::Context;
use data_loader::MovieCatalog;
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let data_dir = Path::new("data/tmdb");

    println!("Loading TMDB 5000 dataset...\n");

    let start = Instant::now();
    let catalog = MovieCatalog::load_from_files(data_dir).context("Failed to load dataset")?;
    let elapsed = start.elapsed();

    let with_director = catalog.iter().filter(|m| m.director.is_some()).count();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", catalog.len());
    println!("With director: {}", with_director);
    println!(
        "\nPerformance: {:.0} movies/second",
        catalog.len() as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}

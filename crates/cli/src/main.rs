use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::MovieCatalog;
use poster_client::TmdbPosterClient;
use server::{RecommendError, RecommendationService, ServiceConfig};
use similarity::{ContentIndex, IndexConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

const SEARCH_LIMIT: usize = 20;
const SUGGESTION_LIMIT: usize = 5;
const POSTER_PLACEHOLDER: &str = "(poster unavailable)";

/// reel-match - content-based movie recommendations
#[derive(Parser)]
#[command(name = "reel-match")]
#[command(about = "Find movies similar to one you like, from the TMDB 5000 dataset", long_about = None)]
struct Cli {
    /// Directory holding tmdb_5000_movies.csv and tmdb_5000_credits.csv
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Vocabulary size cap
    #[arg(long)]
    max_features: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a title
    Recommend {
        /// Exact movie title, e.g. "The Dark Knight Rises"
        #[arg(long)]
        title: String,

        /// Number of recommendations to return
        #[arg(long)]
        limit: Option<usize>,

        /// Also fetch poster URLs (needs TMDB_API_KEY)
        #[arg(long)]
        posters: bool,
    },

    /// Search for movies by title
    Search {
        /// Title fragment (case-insensitive)
        #[arg(long)]
        title: String,
    },

    /// Show corpus and index statistics
    Stats,

    /// Run benchmark to test query performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "1000")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ServiceConfig::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(max_features) = cli.max_features {
        config.max_features = max_features;
    }

    // Search only needs the catalog
    if let Commands::Search { title } = &cli.command {
        let catalog = load_catalog(&config)?;
        return handle_search(&catalog, title);
    }

    let index = Arc::new(build_index(load_catalog(&config)?, config.index_config()).await?);

    match cli.command {
        Commands::Recommend {
            title,
            limit,
            posters,
        } => {
            let service = RecommendationService::new(index)
                .with_top_k(limit.unwrap_or(config.top_k))
                .with_poster_timeout(config.poster_timeout());
            handle_recommend(&service, &config, &title, posters).await?
        }
        Commands::Stats => handle_stats(&index),
        Commands::Benchmark { requests } => {
            let service = RecommendationService::new(index).with_top_k(config.top_k);
            handle_benchmark(service, requests).await?
        }
        Commands::Search { .. } => {}
    }

    Ok(())
}

fn load_catalog(config: &ServiceConfig) -> Result<MovieCatalog> {
    println!("Loading TMDB dataset from {}...", config.data_dir.display());
    let start = Instant::now();
    let catalog = MovieCatalog::load_from_files(&config.data_dir)
        .context("Failed to load TMDB dataset")?;
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );
    Ok(catalog)
}

/// Build the index off the async runtime; it is CPU-bound.
async fn build_index(catalog: MovieCatalog, index_config: IndexConfig) -> Result<ContentIndex> {
    println!("Building similarity index...");
    let index = tokio::task::spawn_blocking(move || ContentIndex::build(catalog, &index_config))
        .await
        .context("Index build task failed")?;
    println!(
        "{} Built index in {:?}",
        "✓".green(),
        index.stats().total_time()
    );
    Ok(index)
}

/// Handle the 'recommend' command
async fn handle_recommend(
    service: &RecommendationService,
    config: &ServiceConfig,
    title: &str,
    posters: bool,
) -> Result<()> {
    if posters {
        let Some(tmdb) = config.tmdb_config() else {
            bail!("--posters needs TMDB_API_KEY to be set");
        };
        let client = TmdbPosterClient::new(tmdb)?;
        let result = match service.recommend_with_posters(title, &client).await {
            Ok(result) => result,
            Err(RecommendError::NotFound { title }) => return report_not_found(service, &title),
            Err(e) => return Err(e.into()),
        };

        print!("{}", format!("Movies like '{}':\n", result.query_title).bold().blue());
        let urls = result.poster_urls(POSTER_PLACEHOLDER);
        for (rank, (entry, url)) in result.entries.iter().zip(urls).enumerate() {
            println!(
                "{}. {} - Score: {:.3}",
                (rank + 1).to_string().green(),
                entry.movie.title,
                entry.movie.score
            );
            println!("   {}", url.dimmed());
        }
        if result.failed_lookups() > 0 {
            println!(
                "{} {} poster lookups failed",
                "!".yellow(),
                result.failed_lookups()
            );
        }
        return Ok(());
    }

    let result = match service.recommend(title) {
        Ok(result) => result,
        Err(RecommendError::NotFound { title }) => return report_not_found(service, &title),
        Err(e) => return Err(e.into()),
    };

    print!("{}", format!("Movies like '{}':\n", result.query_title).bold().blue());
    for (rank, movie) in result.movies.iter().enumerate() {
        println!(
            "{}. {} (TMDB {}) - Score: {:.3}",
            (rank + 1).to_string().green(),
            movie.title,
            movie.movie_id,
            movie.score
        );
    }
    Ok(())
}

/// Print close matches for an unknown title, then fail.
fn report_not_found(service: &RecommendationService, title: &str) -> Result<()> {
    let suggestions = service.index().catalog().search(title);
    if !suggestions.is_empty() {
        println!("{}", "Did you mean:".yellow());
        for (_, movie) in suggestions.iter().take(SUGGESTION_LIMIT) {
            println!("  - {}", movie.title);
        }
    }
    bail!("No movie titled '{}'", title)
}

/// Handle the 'search' command
fn handle_search(catalog: &MovieCatalog, title: &str) -> Result<()> {
    let matches = catalog.search(title);
    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
        return Ok(());
    }
    for (_, movie) in matches.iter().take(SEARCH_LIMIT) {
        println!(
            "{}: {} [{}] {}",
            movie.id,
            movie.title,
            movie.genres.join(", "),
            movie
                .director
                .as_deref()
                .map(|d| format!("dir. {}", d))
                .unwrap_or_default()
        );
    }
    if matches.len() > SEARCH_LIMIT {
        println!("  ... and {} more", matches.len() - SEARCH_LIMIT);
    }
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(index: &ContentIndex) {
    let stats = index.stats();
    print!("{}", "Index statistics:\n".bold().blue());
    println!("{}Movies: {}", "• ".green(), stats.movies);
    println!("{}Vocabulary size: {}", "• ".green(), stats.vocabulary_size);
    println!("{}Zero vectors: {}", "• ".green(), stats.zero_vectors);
    println!("{}Tag extraction: {:?}", "• ".cyan(), stats.extract_time);
    println!("{}Vectorization: {:?}", "• ".cyan(), stats.vectorize_time);
    println!("{}Similarity matrix: {:?}", "• ".cyan(), stats.matrix_time);
    println!("{}Total build time: {:?}", "• ".cyan(), stats.total_time());
}

/// Handle the 'benchmark' command
async fn handle_benchmark(service: RecommendationService, requests: usize) -> Result<()> {
    let corpus_size = service.index().len();
    if corpus_size == 0 {
        bail!("Cannot benchmark an empty catalog");
    }
    if requests == 0 {
        bail!("--requests must be at least 1");
    }

    // Pick random titles from the catalog
    let titles: Vec<String> = (0..requests)
        .filter_map(|_| {
            let position = rand::random::<u64>() as usize % corpus_size;
            service.index().movie(position).map(|m| m.title.clone())
        })
        .collect();

    let wall_start = Instant::now();
    let mut handles = vec![];
    for title in titles {
        let service = service.clone();
        let handle = tokio::spawn(async move {
            let start = Instant::now();
            service.recommend(&title)?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    let mut timings = vec![];
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let wall_time = wall_start.elapsed();
    debug!("Completed {} benchmark requests", timings.len());

    timings.sort();
    let total: Duration = timings.iter().sum();
    let avg_latency = total / timings.len() as u32;
    let throughput = timings.len() as f64 / wall_time.as_secs_f64();

    print!("{}", "Benchmark results:\n".bold().blue());
    println!("Requests: {}", timings.len());
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(&timings, 0.50));
    println!("P95 latency: {:?}", percentile(&timings, 0.95));
    println!("P99 latency: {:?}", percentile(&timings, 0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Nearest-rank percentile of sorted timings
fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let rank = (sorted.len() as f64 * p).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_nearest_rank() {
        let timings: Vec<Duration> = (1..=100).map(Duration::from_millis).collect();
        assert_eq!(percentile(&timings, 0.50), Duration::from_millis(50));
        assert_eq!(percentile(&timings, 0.95), Duration::from_millis(95));
        assert_eq!(percentile(&timings, 0.99), Duration::from_millis(99));
        assert_eq!(percentile(&[], 0.5), Duration::ZERO);
        assert_eq!(percentile(&timings[..1], 0.99), Duration::from_millis(1));
    }

    #[test]
    fn test_cli_parses_recommend() {
        let cli = Cli::try_parse_from([
            "reel-match",
            "--data-dir",
            "/tmp/tmdb",
            "recommend",
            "--title",
            "Avatar",
            "--limit",
            "3",
            "--posters",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/tmdb")));
        match cli.command {
            Commands::Recommend {
                title,
                limit,
                posters,
            } => {
                assert_eq!(title, "Avatar");
                assert_eq!(limit, Some(3));
                assert!(posters);
            }
            _ => panic!("expected recommend"),
        }
    }
}

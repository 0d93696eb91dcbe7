//! Simple test harness for the recommendation service.
//!
//! Builds the content index from the configured data directory and prints
//! recommendations for one title (first argument, "Avatar" by default).

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use data_loader::MovieCatalog;
use poster_client::TmdbPosterClient;
use server::{RecommendationService, ServiceConfig};
use similarity::ContentIndex;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting reel-match server test harness");
    let config = ServiceConfig::from_env()?;

    info!("Loading catalog from {}", config.data_dir.display());
    let catalog = MovieCatalog::load_from_files(&config.data_dir)
        .with_context(|| format!("Loading TMDB data from {}", config.data_dir.display()))?;

    let index_config = config.index_config();
    let index = tokio::task::spawn_blocking(move || ContentIndex::build(catalog, &index_config))
        .await
        .context("Index build task failed")?;
    let service = RecommendationService::new(Arc::new(index))
        .with_top_k(config.top_k)
        .with_poster_timeout(config.poster_timeout());

    let title = std::env::args().nth(1).unwrap_or_else(|| "Avatar".to_string());
    info!("Getting recommendations for '{}'", title);

    match config.tmdb_config() {
        Some(tmdb) => {
            let client = TmdbPosterClient::new(tmdb)?;
            let result = service.recommend_with_posters(&title, &client).await?;
            let urls = result.poster_urls("(no poster)");
            for (i, (entry, url)) in result.entries.iter().zip(urls).enumerate() {
                info!(
                    "{}. {} - Score: {:.3} - {}",
                    i + 1,
                    entry.movie.title,
                    entry.movie.score,
                    url
                );
            }
        }
        None => {
            let result = service.recommend(&title)?;
            for (i, movie) in result.movies.iter().enumerate() {
                info!("{}. {} - Score: {:.3}", i + 1, movie.title, movie.score);
            }
        }
    }

    Ok(())
}

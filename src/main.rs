use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use marquee::cache::{CategoryListCache, SearchCache};
use marquee::catalog::CatalogClient;
use marquee::config::Config;
use marquee::model::Movie;
use marquee::store::{SelectionStore, StateDb};

/// Get the config directory path (~/.config/marquee/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("marquee"))
}

#[derive(Parser, Debug)]
#[command(name = "marquee", about = "Movie catalog browser backed by the TMDB API")]
struct Args {
    /// Path to a config file (default: ~/.config/marquee/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Reset persisted state (delete and recreate the state database)
    #[arg(long)]
    reset_state: bool,

    /// Search the catalog instead of listing the configured categories
    #[arg(long, value_name = "QUERY")]
    query: Option<String>,

    /// Select a movie by id: fetch its details and trailer, and persist it
    /// as the current selection
    #[arg(long, value_name = "ID")]
    movie: Option<u64>,
}

fn print_rows(lists: &CategoryListCache) {
    for row in lists.rows() {
        match &row.state.error {
            Some(error) if row.state.movies.is_empty() => {
                println!("{}: {}", row.header, error);
            }
            _ => {
                println!(
                    "{} ({} of {} movies)",
                    row.header,
                    row.state.movies.len(),
                    row.state.total_results
                );
                for movie in row.state.movies.iter().take(5) {
                    println!("  {:>4.1} {}", movie.vote_average, movie.title);
                }
            }
        }
    }
}

fn print_movie(movie: &Movie, trailer: Option<&str>) {
    println!("{} ({})", movie.title, movie.release_date);
    println!("  {:.1} stars, {} votes", movie.vote_average, movie.vote_count);
    if !movie.overview.is_empty() {
        println!("  {}", movie.overview);
    }
    if let Some(url) = trailer {
        println!("  Trailer: {}", url);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    let config_path = args
        .config
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path).context("Failed to load configuration")?;

    if config.resolved_api_key().is_none() {
        eprintln!("Warning: no API key configured (set MARQUEE_API_KEY or api_key in config.toml)");
        eprintln!("Requests to the catalog will likely be rejected.");
    }

    // Handle --reset-state flag
    let state_path = config_dir.join("state.db");
    if args.reset_state && state_path.exists() {
        std::fs::remove_file(&state_path).context("Failed to delete state database")?;
        println!("State reset.");
    }

    let state_path_str = state_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in state database path"))?;
    let state = StateDb::open(state_path_str)
        .await
        .context("Failed to open state database")?;
    let selection = SelectionStore::load(state).await;

    if let Some(movie) = selection.current() {
        println!("Previously selected: {} (id {})", movie.title, movie.id);
    }

    let client = CatalogClient::from_config(&config).context("Failed to build catalog client")?;

    if let Some(id) = args.movie {
        let movie = client
            .fetch_movie(id)
            .await
            .with_context(|| format!("Failed to fetch movie {id}"))?;
        let trailer = client.fetch_trailer_url(id).await.unwrap_or_else(|e| {
            tracing::warn!(movie_id = id, error = %e, "trailer lookup failed");
            None
        });
        print_movie(&movie, trailer.as_deref());
        selection.set(movie).await;
        return Ok(());
    }

    if let Some(query) = &args.query {
        let search = SearchCache::new(client);
        search.search(query).await;
        let snapshot = search.snapshot();
        if let Some(error) = &snapshot.state.error {
            eprintln!("Search failed: {error}");
            std::process::exit(1);
        }
        println!(
            "\"{}\": {} results ({} shown)",
            snapshot.query,
            snapshot.state.total_results,
            snapshot.state.movies.len()
        );
        for movie in &snapshot.state.movies {
            println!("  {:>4.1} {}", movie.vote_average, movie.title);
        }
        return Ok(());
    }

    let lists =
        CategoryListCache::new(client, config.categories.clone(), config.max_concurrent_fetches);
    lists.load_all().await;
    print_rows(&lists);

    Ok(())
}

use anyhow::Result;
use dotenvy::dotenv;
use inspiculture::books::{BooksStore, GoogleBooksClient};
use inspiculture::config::Config;
use inspiculture::http::build_client;
use inspiculture::music::{MusicStore, SpotifyClient};
use inspiculture::shows::{ShowMapper, ShowsStore, TmdbClient};
use std::env;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,inspiculture=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    match dotenv() {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }
    init_tracing();

    let config = Config::from_env()?;
    info!("All required environment variables are set");
    let client = build_client(config.http_timeout)?;
    let query = env::args().nth(1).unwrap_or_default();

    let books = BooksStore::new(
        Arc::new(GoogleBooksClient::new(client.clone(), &config.books)),
        config.books.page_size,
    );
    let shows = ShowsStore::new(
        Arc::new(TmdbClient::new(client.clone(), &config.tmdb)),
        ShowMapper::from_config(&config.tmdb),
    );
    let spotify = Arc::new(SpotifyClient::new(client, &config.spotify));
    if let Err(e) = spotify.authenticate().await {
        warn!("Spotify authentication failed, music requests will retry: {}", e);
    }
    let music = MusicStore::new(spotify, config.spotify.page_size);

    tokio::join!(
        books.fetch(&query),
        async {
            shows.load_categories().await;
            shows.fetch(&query).await;
        },
        async {
            music.load_categories().await;
            music.fetch(&query).await;
        },
    );

    let (b, s, m) = (books.state(), shows.state(), music.state());
    info!(count = b.books.len(), categories = b.categories.len(), error = %b.error, "Books ready");
    info!(count = s.shows.len(), categories = s.categories.len(), error = %s.error, "Shows ready");
    info!(count = m.tracks.len(), categories = m.categories.len(), error = %m.error, "Music ready");

    println!("{}", serde_json::to_string_pretty(&b)?);
    println!("{}", serde_json::to_string_pretty(&s)?);
    println!("{}", serde_json::to_string_pretty(&m)?);
    Ok(())
}

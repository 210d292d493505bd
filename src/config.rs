use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::time::Duration;

const GOOGLE_BOOKS_BASE: &str = "https://www.googleapis.com";
const TMDB_BASE: &str = "https://api.themoviedb.org";
const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
const SPOTIFY_API_BASE: &str = "https://api.spotify.com";
const SPOTIFY_ACCOUNTS_BASE: &str = "https://accounts.spotify.com";

pub const REQUIRED_VARS: [&str; 3] = ["TMDB_API_KEY", "SPOTIFY_CLIENT_ID", "SPOTIFY_CLIENT_SECRET"];

#[derive(Debug, Clone)]
pub struct BooksConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub page_size: u32,
}

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub api_key: String,
    pub watch_region: String,
}

#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub api_base_url: String,
    pub accounts_base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub page_size: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub books: BooksConfig,
    pub tmdb: TmdbConfig,
    pub spotify: SpotifyConfig,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup; `from_env` passes `std::env`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let missing: Vec<&str> = REQUIRED_VARS
            .into_iter()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            bail!("Missing required environment variable: {}", missing.join(", "));
        }
        let require = |key: &str| {
            get(key).ok_or_else(|| anyhow!("Missing required environment variable: {}", key))
        };
        let base = |key: &str, default: &str| {
            get(key)
                .unwrap_or_else(|| default.to_string())
                .trim_end_matches('/')
                .to_string()
        };
        let number = |key: &str, default: u32| -> Result<u32> {
            match get(key) {
                Some(raw) => raw
                    .parse::<u32>()
                    .with_context(|| format!("{} must be a positive integer, got '{}'", key, raw)),
                None => Ok(default),
            }
        };

        let books = BooksConfig {
            base_url: base("GOOGLE_BOOKS_BASE_URL", GOOGLE_BOOKS_BASE),
            api_key: get("GOOGLE_BOOKS_API_KEY"),
            page_size: number("BOOKS_PAGE_SIZE", 20)?.clamp(1, 40),
        };
        let tmdb = TmdbConfig {
            base_url: base("TMDB_BASE_URL", TMDB_BASE),
            image_base_url: base("TMDB_IMAGE_BASE_URL", TMDB_IMAGE_BASE),
            api_key: require("TMDB_API_KEY")?,
            watch_region: get("TMDB_WATCH_REGION")
                .map(|r| r.to_ascii_uppercase())
                .unwrap_or_else(|| "US".to_string()),
        };
        let spotify = SpotifyConfig {
            api_base_url: base("SPOTIFY_API_BASE_URL", SPOTIFY_API_BASE),
            accounts_base_url: base("SPOTIFY_ACCOUNTS_BASE_URL", SPOTIFY_ACCOUNTS_BASE),
            client_id: require("SPOTIFY_CLIENT_ID")?,
            client_secret: require("SPOTIFY_CLIENT_SECRET")?,
            page_size: number("MUSIC_PAGE_SIZE", 20)?.clamp(1, 50),
        };
        let timeout_secs = number("HTTP_TIMEOUT_SECS", 30)?.max(1);

        Ok(Self {
            books,
            tmdb,
            spotify,
            http_timeout: Duration::from_secs(u64::from(timeout_secs)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("TMDB_API_KEY", "tmdb-key"),
        ("SPOTIFY_CLIENT_ID", "client-id"),
        ("SPOTIFY_CLIENT_SECRET", "client-secret"),
    ];

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() {
        let cfg = Config::from_lookup(lookup(&REQUIRED)).expect("config");
        assert_eq!(cfg.books.base_url, GOOGLE_BOOKS_BASE);
        assert_eq!(cfg.books.api_key, None);
        assert_eq!(cfg.books.page_size, 20);
        assert_eq!(cfg.tmdb.watch_region, "US");
        assert_eq!(cfg.spotify.accounts_base_url, SPOTIFY_ACCOUNTS_BASE);
        assert_eq!(cfg.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_required_var_is_named() {
        let err = Config::from_lookup(lookup(&REQUIRED[..2])).unwrap_err();
        assert!(err.to_string().contains("SPOTIFY_CLIENT_SECRET"));
    }

    #[test]
    fn every_missing_required_var_is_reported() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err().to_string();
        for key in REQUIRED_VARS {
            assert!(err.contains(key), "{} not named in '{}'", key, err);
        }
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[0] = ("TMDB_API_KEY", "   ");
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("TMDB_API_KEY"));
    }

    #[test]
    fn overrides_are_trimmed_and_clamped() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("TMDB_BASE_URL", "http://127.0.0.1:9000/"),
            ("BOOKS_PAGE_SIZE", "500"),
            ("MUSIC_PAGE_SIZE", "0"),
            ("TMDB_WATCH_REGION", "gb"),
            ("GOOGLE_BOOKS_API_KEY", "books-key"),
        ]);
        let cfg = Config::from_lookup(lookup(&pairs)).expect("config");
        assert_eq!(cfg.tmdb.base_url, "http://127.0.0.1:9000");
        assert_eq!(cfg.books.page_size, 40);
        assert_eq!(cfg.spotify.page_size, 1);
        assert_eq!(cfg.tmdb.watch_region, "GB");
        assert_eq!(cfg.books.api_key.as_deref(), Some("books-key"));
    }

    #[test]
    fn malformed_number_fails_with_context() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("HTTP_TIMEOUT_SECS", "soon"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("HTTP_TIMEOUT_SECS"));
    }
}

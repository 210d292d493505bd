use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use super::{Genre, ShowsApi};
use crate::config::TmdbConfig;
use crate::error::ApiResult;
use crate::http::{redact, send_json};

const SERVICE: &str = "TMDb";

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoviePage {
    pub page: Option<u32>,
    pub results: Option<Vec<MovieSummary>>,
    pub total_pages: Option<u32>,
    pub total_results: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieSummary {
    pub id: i64,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub genre_ids: Option<Vec<i64>>,
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub favorite: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenreList {
    pub genres: Option<Vec<Genre>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub genres: Option<Vec<Genre>>,
    pub vote_average: Option<f32>,
    pub production_companies: Option<Vec<CompanyDto>>,
    pub credits: Option<CreditsDto>,
    #[serde(rename = "watch/providers")]
    pub watch_providers: Option<WatchProvidersDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreditsDto {
    pub cast: Option<Vec<CastDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CastDto {
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
    pub order: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyDto {
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchProvidersDto {
    pub results: Option<HashMap<String, RegionProvidersDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionProvidersDto {
    pub link: Option<String>,
    pub flatrate: Option<Vec<ProviderDto>>,
    pub rent: Option<Vec<ProviderDto>>,
    pub buy: Option<Vec<ProviderDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderDto {
    pub provider_id: i64,
    pub provider_name: String,
    pub logo_path: Option<String>,
}

impl TmdbClient {
    pub fn new(client: Client, config: &TmdbConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Every TMDb call goes through here so the key is always attached.
    fn url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}/3/{}?api_key={}&language=en-US",
            self.base_url,
            path.trim_start_matches('/'),
            urlencoding::encode(&self.api_key)
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> ApiResult<T> {
        debug!(url = %redact(url), "TMDb request");
        send_json(SERVICE, self.client.get(url)).await
    }
}

#[async_trait]
impl ShowsApi for TmdbClient {
    async fn popular_movies(&self, page: u32) -> ApiResult<MoviePage> {
        let page = page.max(1).to_string();
        let url = self.url("movie/popular", &[("page", page.as_str())]);
        self.get_json(&url).await
    }

    async fn search_movies(&self, query: &str, page: u32) -> ApiResult<MoviePage> {
        let page = page.max(1).to_string();
        let url = self.url(
            "search/movie",
            &[("query", query), ("page", page.as_str()), ("include_adult", "false")],
        );
        self.get_json(&url).await
    }

    async fn movie_genres(&self) -> ApiResult<GenreList> {
        let url = self.url("genre/movie/list", &[]);
        self.get_json(&url).await
    }

    async fn movie_details(&self, id: i64) -> ApiResult<MovieDetails> {
        let url = self.url(
            &format!("movie/{id}"),
            &[("append_to_response", "credits,watch/providers")],
        );
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> TmdbClient {
        TmdbClient::new(
            Client::new(),
            &TmdbConfig {
                base_url: "https://tmdb.test".to_string(),
                image_base_url: "https://img.test".to_string(),
                api_key: "k&y".to_string(),
                watch_region: "US".to_string(),
            },
        )
    }

    #[test]
    fn every_url_carries_the_api_key() {
        assert_eq!(
            client().url("movie/popular", &[("page", "2")]),
            "https://tmdb.test/3/movie/popular?api_key=k%26y&language=en-US&page=2"
        );
        assert_eq!(
            client().url("/genre/movie/list", &[]),
            "https://tmdb.test/3/genre/movie/list?api_key=k%26y&language=en-US"
        );
    }

    #[test]
    fn search_query_is_encoded() {
        let url = client().url("search/movie", &[("query", "amélie & co")]);
        assert!(url.ends_with("&query=am%C3%A9lie%20%26%20co"));
    }

    #[test]
    fn details_deserialize_appended_sections() {
        let details: MovieDetails = serde_json::from_value(json!({
            "id": 550,
            "title": "Fight Club",
            "runtime": 139,
            "genres": [{ "id": 18, "name": "Drama" }],
            "credits": { "cast": [{ "name": "Edward Norton", "character": "The Narrator", "order": 0 }] },
            "watch/providers": { "results": { "US": { "link": "https://tmdb/watch", "flatrate": [] } } }
        }))
        .expect("details deserialize");
        assert_eq!(details.runtime, Some(139));
        assert_eq!(details.credits.and_then(|c| c.cast).map(|c| c.len()), Some(1));
        let results = details.watch_providers.and_then(|w| w.results).unwrap_or_default();
        assert!(results.contains_key("US"));
    }
}

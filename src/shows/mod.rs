use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::filter::Catalogued;

mod client;
mod map;
mod store;

pub use client::{
    CastDto, CompanyDto, CreditsDto, GenreList, MovieDetails, MoviePage, MovieSummary,
    ProviderDto, RegionProvidersDto, TmdbClient, WatchProvidersDto,
};
pub use map::ShowMapper;
pub use store::{ShowsState, ShowsStore, NO_SHOWS_FOUND};

#[async_trait]
pub trait ShowsApi: Send + Sync {
    async fn popular_movies(&self, page: u32) -> ApiResult<MoviePage>;
    async fn search_movies(&self, query: &str, page: u32) -> ApiResult<MoviePage>;
    async fn movie_genres(&self) -> ApiResult<GenreList>;
    async fn movie_details(&self, id: i64) -> ApiResult<MovieDetails>;
}

/// TMDb genre; the wire shape and the display shape are the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Show {
    pub id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub genre_ids: Vec<i64>,
    /// Names resolved from `genre_ids`; ids missing from the genre list are skipped.
    pub genres: Vec<String>,
    pub vote_average: Option<f32>,
    pub favorite: bool,
}

impl Catalogued for Show {
    fn title(&self) -> &str {
        &self.title
    }

    fn tags(&self) -> &[String] {
        &self.genres
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowDetails {
    pub id: i64,
    pub title: String,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub release_date: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<String>,
    pub vote_average: Option<f32>,
    pub cast: Vec<CastMember>,
    pub production_companies: Vec<ProductionCompany>,
    pub watch_providers: Option<WatchProviders>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastMember {
    pub name: String,
    pub character: Option<String>,
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionCompany {
    pub name: String,
    pub logo_url: Option<String>,
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchProviders {
    pub region: String,
    pub link: Option<String>,
    pub streaming: Vec<Provider>,
    pub rent: Vec<Provider>,
    pub buy: Vec<Provider>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provider {
    pub id: i64,
    pub name: String,
    pub logo_url: Option<String>,
}

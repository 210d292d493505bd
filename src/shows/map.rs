use std::collections::HashMap;

use super::client::{MovieDetails, MoviePage, MovieSummary, ProviderDto, RegionProvidersDto};
use super::{
    CastMember, Genre, ProductionCompany, Provider, Show, ShowDetails, WatchProviders,
};
use crate::config::TmdbConfig;

const MAX_CAST: usize = 15;
const UNTITLED: &str = "Untitled";

/// Turns TMDb DTOs into display records; owns the image base and watch region.
#[derive(Debug, Clone)]
pub struct ShowMapper {
    image_base_url: String,
    watch_region: String,
}

impl ShowMapper {
    pub fn new(image_base_url: impl Into<String>, watch_region: impl Into<String>) -> Self {
        Self {
            image_base_url: image_base_url.into().trim_end_matches('/').to_string(),
            watch_region: watch_region.into(),
        }
    }

    pub fn from_config(config: &TmdbConfig) -> Self {
        Self::new(config.image_base_url.clone(), config.watch_region.clone())
    }

    pub fn shows(&self, page: MoviePage, genres: &[Genre]) -> Vec<Show> {
        let names: HashMap<i64, &str> = genres.iter().map(|g| (g.id, g.name.as_str())).collect();
        page.results
            .unwrap_or_default()
            .into_iter()
            .map(|movie| self.show(movie, &names))
            .collect()
    }

    fn show(&self, movie: MovieSummary, genre_names: &HashMap<i64, &str>) -> Show {
        let genre_ids = movie.genre_ids.unwrap_or_default();
        Show {
            id: movie.id,
            title: non_empty(movie.title).unwrap_or_else(|| UNTITLED.to_string()),
            overview: non_empty(movie.overview),
            poster_url: self.image(movie.poster_path.as_deref()),
            release_date: non_empty(movie.release_date),
            genres: resolve_genres(&genre_ids, genre_names),
            genre_ids,
            vote_average: movie.vote_average,
            favorite: movie.favorite,
        }
    }

    /// Re-resolve genre names after the genre list arrives later than the shows.
    pub fn rename_genres(&self, shows: &mut [Show], genres: &[Genre]) {
        let names: HashMap<i64, &str> = genres.iter().map(|g| (g.id, g.name.as_str())).collect();
        for show in shows {
            show.genres = resolve_genres(&show.genre_ids, &names);
        }
    }

    pub fn details(&self, movie: MovieDetails) -> ShowDetails {
        let mut cast = movie
            .credits
            .and_then(|c| c.cast)
            .unwrap_or_default();
        cast.sort_by_key(|c| c.order.unwrap_or(u32::MAX));
        let cast = cast
            .into_iter()
            .take(MAX_CAST)
            .map(|c| CastMember {
                name: c.name,
                character: non_empty(c.character),
                profile_url: self.image(c.profile_path.as_deref()),
            })
            .collect();

        let production_companies = movie
            .production_companies
            .unwrap_or_default()
            .into_iter()
            .map(|c| ProductionCompany {
                name: c.name,
                logo_url: self.image(c.logo_path.as_deref()),
                origin_country: non_empty(c.origin_country),
            })
            .collect();

        let watch_providers = movie
            .watch_providers
            .and_then(|w| w.results)
            .and_then(|mut regions| regions.remove(&self.watch_region))
            .map(|region| self.region_providers(region));

        ShowDetails {
            id: movie.id,
            title: non_empty(movie.title).unwrap_or_else(|| UNTITLED.to_string()),
            tagline: non_empty(movie.tagline),
            overview: non_empty(movie.overview),
            poster_url: self.image(movie.poster_path.as_deref()),
            backdrop_url: self.image(movie.backdrop_path.as_deref()),
            release_date: non_empty(movie.release_date),
            runtime_minutes: movie.runtime.filter(|r| *r > 0),
            genres: movie
                .genres
                .unwrap_or_default()
                .into_iter()
                .map(|g| g.name)
                .collect(),
            vote_average: movie.vote_average,
            cast,
            production_companies,
            watch_providers,
        }
    }

    fn region_providers(&self, region: RegionProvidersDto) -> WatchProviders {
        let providers = |list: Option<Vec<ProviderDto>>| -> Vec<Provider> {
            list.unwrap_or_default()
                .into_iter()
                .map(|p| Provider {
                    id: p.provider_id,
                    name: p.provider_name,
                    logo_url: self.image(p.logo_path.as_deref()),
                })
                .collect()
        };
        WatchProviders {
            region: self.watch_region.clone(),
            link: region.link,
            streaming: providers(region.flatrate),
            rent: providers(region.rent),
            buy: providers(region.buy),
        }
    }

    fn image(&self, path: Option<&str>) -> Option<String> {
        let path = path?.trim();
        if path.is_empty() {
            return None;
        }
        if path.starts_with('/') {
            Some(format!("{}{}", self.image_base_url, path))
        } else {
            Some(format!("{}/{}", self.image_base_url, path))
        }
    }
}

fn resolve_genres(ids: &[i64], names: &HashMap<i64, &str>) -> Vec<String> {
    ids.iter()
        .filter_map(|id| names.get(id))
        .map(|name| name.to_string())
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

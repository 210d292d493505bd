use async_trait::async_trait;
use serde::Serialize;

use crate::error::ApiResult;
use crate::filter::Catalogued;

mod client;
mod map;
mod store;

pub use client::{AccessInfo, GoogleBooksClient, ImageLinks, Volume, VolumeInfo, VolumesResponse};
pub use map::{map_volume, map_volumes};
pub use store::{BooksState, BooksStore, DEFAULT_BOOKS_QUERY, NO_BOOKS_FOUND};

#[async_trait]
pub trait BooksApi: Send + Sync {
    /// Full-text volume search; Google filters server-side.
    async fn search_volumes(
        &self,
        query: &str,
        start_index: u32,
        max_results: u32,
    ) -> ApiResult<VolumesResponse>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub categories: Vec<String>,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<u32>,
    pub preview_link: Option<String>,
    pub favorite: bool,
}

impl Catalogued for Book {
    fn title(&self) -> &str {
        &self.title
    }

    fn tags(&self) -> &[String] {
        &self.categories
    }
}

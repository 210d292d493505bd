use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::BooksApi;
use crate::config::BooksConfig;
use crate::error::ApiResult;
use crate::http::{redact, send_json};

const SERVICE: &str = "Google Books";

#[derive(Debug, Clone)]
pub struct GoogleBooksClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    pub total_items: Option<u32>,
    pub items: Option<Vec<Volume>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: String,
    pub volume_info: Option<VolumeInfo>,
    pub access_info: Option<AccessInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub description: Option<String>,
    pub categories: Option<Vec<String>>,
    pub image_links: Option<ImageLinks>,
    pub language: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<u32>,
    pub preview_link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub small_thumbnail: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessInfo {
    pub country: Option<String>,
    pub web_reader_link: Option<String>,
}

impl GoogleBooksClient {
    pub fn new(client: Client, config: &BooksConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn volumes_url(&self, query: &str, start_index: u32, max_results: u32) -> String {
        let mut url = format!(
            "{}/books/v1/volumes?q={}&startIndex={start_index}&maxResults={max_results}",
            self.base_url,
            urlencoding::encode(query)
        );
        if let Some(key) = &self.api_key {
            url.push_str("&key=");
            url.push_str(&urlencoding::encode(key));
        }
        url
    }
}

#[async_trait]
impl BooksApi for GoogleBooksClient {
    async fn search_volumes(
        &self,
        query: &str,
        start_index: u32,
        max_results: u32,
    ) -> ApiResult<VolumesResponse> {
        let url = self.volumes_url(query, start_index, max_results);
        debug!(url = %redact(&url), "Google Books volume search");
        send_json(SERVICE, self.client.get(&url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(api_key: Option<&str>) -> GoogleBooksClient {
        GoogleBooksClient::new(
            Client::new(),
            &BooksConfig {
                base_url: "https://books.test".to_string(),
                api_key: api_key.map(str::to_string),
                page_size: 20,
            },
        )
    }

    #[test]
    fn volumes_url_encodes_query_and_paging() {
        assert_eq!(
            client(None).volumes_url("the hobbit & co", 0, 20),
            "https://books.test/books/v1/volumes?q=the%20hobbit%20%26%20co&startIndex=0&maxResults=20"
        );
    }

    #[test]
    fn volumes_url_appends_key_when_configured() {
        let url = client(Some("k1")).volumes_url("dune", 40, 10);
        assert!(url.ends_with("&startIndex=40&maxResults=10&key=k1"));
    }

    #[test]
    fn empty_result_has_no_items_field() {
        let parsed: VolumesResponse =
            serde_json::from_value(json!({ "kind": "books#volumes", "totalItems": 0 }))
                .expect("volumes deserialize");
        assert_eq!(parsed.total_items, Some(0));
        assert!(parsed.items.is_none());
    }
}

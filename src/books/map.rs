use super::client::{Volume, VolumesResponse};
use super::Book;

const UNTITLED: &str = "Untitled";

pub fn map_volumes(response: VolumesResponse) -> Vec<Book> {
    response
        .items
        .unwrap_or_default()
        .into_iter()
        .map(map_volume)
        .collect()
}

pub fn map_volume(volume: Volume) -> Book {
    let info = volume.volume_info.unwrap_or_default();
    let access = volume.access_info.unwrap_or_default();

    let thumbnail = info
        .image_links
        .and_then(|links| links.thumbnail.or(links.small_thumbnail))
        .map(|url| secure_url(&url));

    Book {
        id: volume.id,
        title: info
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string()),
        authors: info.authors.unwrap_or_default(),
        categories: info.categories.unwrap_or_default(),
        thumbnail,
        description: info.description.filter(|d| !d.trim().is_empty()),
        language: info.language,
        country: access.country,
        published_date: info.published_date,
        page_count: info.page_count,
        preview_link: info.preview_link.or(access.web_reader_link),
        favorite: false,
    }
}

// Google still hands out plain-http thumbnail links.
fn secure_url(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_full_volume() {
        let response: VolumesResponse = serde_json::from_value(json!({
            "totalItems": 1,
            "items": [{
                "id": "zyTCAlFPjgYC",
                "volumeInfo": {
                    "title": "The Google Story",
                    "authors": ["David A. Vise", "Mark Malseed"],
                    "publishedDate": "2005-11-15",
                    "description": "Here is the story...",
                    "pageCount": 207,
                    "categories": ["Browsers (Computer programs)"],
                    "imageLinks": {
                        "smallThumbnail": "http://books.google.com/books?id=zyTCAlFPjgYC&zoom=5",
                        "thumbnail": "http://books.google.com/books?id=zyTCAlFPjgYC&zoom=1"
                    },
                    "language": "en",
                    "previewLink": "http://books.google.com/books?id=zyTCAlFPjgYC&pg=PP1"
                },
                "accessInfo": { "country": "US", "webReaderLink": "http://play.google.com/books/reader?id=zyTCAlFPjgYC" }
            }]
        }))
        .expect("volumes deserialize");

        let books = map_volumes(response);
        assert_eq!(books.len(), 1);
        let book = &books[0];
        assert_eq!(book.id, "zyTCAlFPjgYC");
        assert_eq!(book.title, "The Google Story");
        assert_eq!(book.authors, vec!["David A. Vise", "Mark Malseed"]);
        assert_eq!(book.categories, vec!["Browsers (Computer programs)"]);
        assert_eq!(
            book.thumbnail.as_deref(),
            Some("https://books.google.com/books?id=zyTCAlFPjgYC&zoom=1")
        );
        assert_eq!(book.country.as_deref(), Some("US"));
        assert_eq!(book.page_count, Some(207));
        assert!(!book.favorite);
    }

    #[test]
    fn tolerates_missing_volume_info() {
        let volume: Volume =
            serde_json::from_value(json!({ "id": "bare" })).expect("volume deserialize");
        let book = map_volume(volume);
        assert_eq!(book.title, UNTITLED);
        assert!(book.authors.is_empty());
        assert!(book.categories.is_empty());
        assert_eq!(book.thumbnail, None);
        assert_eq!(book.country, None);
    }

    #[test]
    fn falls_back_to_small_thumbnail_and_reader_link() {
        let volume: Volume = serde_json::from_value(json!({
            "id": "v2",
            "volumeInfo": {
                "title": "  Spaced  ",
                "description": "   ",
                "imageLinks": { "smallThumbnail": "https://img/small" }
            },
            "accessInfo": { "webReaderLink": "https://reader/v2" }
        }))
        .expect("volume deserialize");
        let book = map_volume(volume);
        assert_eq!(book.title, "Spaced");
        assert_eq!(book.description, None);
        assert_eq!(book.thumbnail.as_deref(), Some("https://img/small"));
        assert_eq!(book.preview_link.as_deref(), Some("https://reader/v2"));
    }

    #[test]
    fn null_items_map_to_empty_list() {
        let response: VolumesResponse =
            serde_json::from_value(json!({ "totalItems": 0, "items": null }))
                .expect("volumes deserialize");
        assert!(map_volumes(response).is_empty());
    }
}

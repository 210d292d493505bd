use super::client::{
    CategoriesResponse, ImageDto, Paging, PlaylistTrackItem, SearchResponse, TrackDto,
};
use super::{AlbumRef, ArtistRef, BrowseCategory, Track, TrackDetails};

const UNTITLED: &str = "Untitled";

pub fn map_search(response: SearchResponse) -> Vec<Track> {
    response
        .tracks
        .unwrap_or_default()
        .into_items()
        .into_iter()
        .filter_map(|t| map_track(t, None))
        .collect()
}

/// Playlist tracks, each tagged with the category they were browsed from.
pub fn map_playlist_tracks(page: Paging<PlaylistTrackItem>, category: &str) -> Vec<Track> {
    page.into_items()
        .into_iter()
        .filter_map(|item| item.track)
        .filter_map(|t| map_track(t, Some(category)))
        .collect()
}

/// `None` for tracks without a Spotify id (local files).
pub fn map_track(track: TrackDto, category: Option<&str>) -> Option<Track> {
    let id = track.id.filter(|id| !id.is_empty())?;
    let album = track.album.unwrap_or_default();
    Some(Track {
        id,
        title: title(track.name),
        artists: track
            .artists
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.name)
            .collect(),
        artwork_url: first_image(album.images.as_deref()),
        album: album.name.filter(|n| !n.trim().is_empty()),
        preview_url: track.preview_url,
        duration_ms: track.duration_ms,
        tags: category
            .map(|c| vec![c.to_string()])
            .unwrap_or_default(),
        favorite: false,
    })
}

pub fn map_track_details(track: TrackDto, requested_id: &str) -> TrackDetails {
    let album = track.album.map(|a| AlbumRef {
        artwork_url: first_image(a.images.as_deref()),
        id: a.id,
        name: a.name,
        release_date: a.release_date,
    });
    TrackDetails {
        id: track
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| requested_id.to_string()),
        title: title(track.name),
        artists: track
            .artists
            .unwrap_or_default()
            .into_iter()
            .map(|a| ArtistRef {
                id: a.id,
                name: a.name,
            })
            .collect(),
        album,
        duration_ms: track.duration_ms,
        popularity: track.popularity,
        explicit: track.explicit.unwrap_or(false),
        preview_url: track.preview_url,
        external_url: track.external_urls.and_then(|u| u.spotify),
    }
}

pub fn map_categories(response: CategoriesResponse) -> Vec<BrowseCategory> {
    response
        .categories
        .unwrap_or_default()
        .into_items()
        .into_iter()
        .filter(|c| !c.name.trim().is_empty())
        .map(|c| BrowseCategory {
            icon_url: first_image(c.icons.as_deref()),
            id: c.id,
            name: c.name.trim().to_string(),
        })
        .collect()
}

fn title(name: Option<String>) -> String {
    name.map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

// Spotify lists images widest first.
fn first_image(images: Option<&[ImageDto]>) -> Option<String> {
    images?.first().map(|i| i.url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track_json() -> serde_json::Value {
        json!({
            "id": "4uLU6hMCjMI75M1A2tKUQC",
            "name": "Never Gonna Give You Up",
            "artists": [{ "id": "0gxyHStUsqpMadRV0Di1Qt", "name": "Rick Astley" }],
            "album": {
                "id": "6XhjNHCyCDyyGJRM5mg40G",
                "name": "Whenever You Need Somebody",
                "release_date": "1987-11-12",
                "images": [
                    { "url": "https://i.scdn.co/image/640", "width": 640, "height": 640 },
                    { "url": "https://i.scdn.co/image/64", "width": 64, "height": 64 }
                ]
            },
            "duration_ms": 213573,
            "popularity": 77,
            "explicit": false,
            "preview_url": null,
            "external_urls": { "spotify": "https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC" }
        })
    }

    #[test]
    fn maps_search_results() {
        let response: SearchResponse = serde_json::from_value(json!({
            "tracks": { "items": [track_json()], "total": 1 }
        }))
        .expect("search deserialize");
        let tracks = map_search(response);
        assert_eq!(tracks.len(), 1);
        let t = &tracks[0];
        assert_eq!(t.title, "Never Gonna Give You Up");
        assert_eq!(t.artists, vec!["Rick Astley"]);
        assert_eq!(t.album.as_deref(), Some("Whenever You Need Somebody"));
        assert_eq!(t.artwork_url.as_deref(), Some("https://i.scdn.co/image/640"));
        assert!(t.tags.is_empty());
        assert!(!t.favorite);
    }

    #[test]
    fn missing_tracks_section_is_empty() {
        let response: SearchResponse =
            serde_json::from_value(json!({})).expect("search deserialize");
        assert!(map_search(response).is_empty());
    }

    #[test]
    fn playlist_tracks_are_tagged_and_local_files_dropped() {
        let page: Paging<PlaylistTrackItem> = serde_json::from_value(json!({
            "items": [
                { "track": track_json() },
                { "track": null },
                { "track": { "id": null, "name": "local.mp3" } }
            ]
        }))
        .expect("paging deserialize");
        let tracks = map_playlist_tracks(page, "Pop");
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].tags, vec!["Pop"]);
    }

    #[test]
    fn details_keep_artist_and_album_references() {
        let dto: TrackDto = serde_json::from_value(track_json()).expect("track deserialize");
        let d = map_track_details(dto, "ignored");
        assert_eq!(d.id, "4uLU6hMCjMI75M1A2tKUQC");
        assert_eq!(d.artists[0].id.as_deref(), Some("0gxyHStUsqpMadRV0Di1Qt"));
        let album = d.album.expect("album");
        assert_eq!(album.release_date.as_deref(), Some("1987-11-12"));
        assert_eq!(album.artwork_url.as_deref(), Some("https://i.scdn.co/image/640"));
        assert_eq!(d.popularity, Some(77));
        assert!(!d.explicit);
        assert!(d.external_url.is_some());
    }

    #[test]
    fn sparse_details_fall_back_to_requested_id() {
        let dto: TrackDto =
            serde_json::from_value(json!({ "name": " " })).expect("track deserialize");
        let d = map_track_details(dto, "abc");
        assert_eq!(d.id, "abc");
        assert_eq!(d.title, UNTITLED);
        assert!(d.artists.is_empty());
        assert_eq!(d.album, None);
    }

    #[test]
    fn categories_skip_blank_names() {
        let response: CategoriesResponse = serde_json::from_value(json!({
            "categories": { "items": [
                { "id": "toplists", "name": "Top Lists", "icons": [{ "url": "https://t.scdn.co/toplists.jpg" }] },
                { "id": "blank", "name": "  " },
                { "id": "pop", "name": "Pop" }
            ] }
        }))
        .expect("categories deserialize");
        let categories = map_categories(response);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].icon_url.as_deref(), Some("https://t.scdn.co/toplists.jpg"));
        assert_eq!(categories[1].id, "pop");
    }
}

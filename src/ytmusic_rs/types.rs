use serde::{Deserialize, Serialize};

/// A single image in a YouTube Music thumbnail list. Lists are ordered from
/// lowest to highest resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Artist reference as it appears in song runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtistRef {
    pub name: Option<String>,
    pub id: Option<String>,
}

/// Album reference as it appears in song runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlbumRef {
    pub name: Option<String>,
    pub id: Option<String>,
}

/// A song or video row from search results, playlists or the player.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackItem {
    /// `song`, `video`, `album`, ... as labelled by YouTube Music.
    pub result_type: Option<String>,
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub artists: Vec<ArtistRef>,
    pub album: Option<AlbumRef>,
    pub duration: Option<String>,
    pub thumbnails: Vec<Thumbnail>,
}

/// A playlist tile from the user's library.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LibraryPlaylist {
    pub playlist_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub count: Option<u64>,
    pub thumbnails: Vec<Thumbnail>,
}

/// Contents of a single playlist.
///
/// `tracks` is `None` when the response carried no track shelf at all, which
/// is what an unknown or empty playlist looks like.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaylistContents {
    pub id: String,
    pub title: Option<String>,
    pub track_count: Option<u64>,
    pub tracks: Option<Vec<TrackItem>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFilter {
    Songs,
    Videos,
}

impl SearchFilter {
    /// Encoded search params understood by the `search` endpoint.
    pub fn params(&self) -> &'static str {
        match self {
            SearchFilter::Songs => "EgWKAQIIAWoMEA4QChADEAQQCRAF",
            SearchFilter::Videos => "EgWKAQIQAWoMEA4QChADEAQQCRAF",
        }
    }

    /// Result type assigned to rows of a filtered search.
    pub fn result_type(&self) -> &'static str {
        match self {
            SearchFilter::Songs => "song",
            SearchFilter::Videos => "video",
        }
    }
}

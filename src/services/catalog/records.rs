use serde::Serialize;

use crate::ytmusic_rs::types::{ArtistRef, LibraryPlaylist, Thumbnail, TrackItem};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ARTIST_ENTRY: &str = "Unknown";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
pub const UNKNOWN_DURATION: &str = "0:00";
pub const UNTITLED_PLAYLIST: &str = "Untitled Playlist";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistName {
    pub name: String,
}

/// Normalized track shape returned by every track-producing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    pub id: Option<String>,
    pub video_id: Option<String>,
    pub title: String,
    pub artist: String,
    pub artists: Vec<ArtistName>,
    pub album: String,
    pub duration: String,
    pub thumbnail: Option<String>,
}

impl TrackRecord {
    /// Replace both identifier fields.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self.video_id = Some(id.to_string());
        self
    }
}

impl From<&TrackItem> for TrackRecord {
    fn from(item: &TrackItem) -> Self {
        Self {
            id: item.video_id.clone(),
            video_id: item.video_id.clone(),
            title: item
                .title
                .clone()
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            artist: primary_artist(&item.artists),
            artists: item
                .artists
                .iter()
                .map(|artist| ArtistName {
                    name: artist
                        .name
                        .clone()
                        .unwrap_or_else(|| UNKNOWN_ARTIST_ENTRY.to_string()),
                })
                .collect(),
            album: item
                .album
                .as_ref()
                .and_then(|album| album.name.clone())
                .unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
            duration: item
                .duration
                .clone()
                .unwrap_or_else(|| UNKNOWN_DURATION.to_string()),
            thumbnail: best_thumbnail(&item.thumbnails),
        }
    }
}

/// Normalized playlist shape. `playlistId`, `name` and `count` mirror `id`,
/// `title` and `trackCount` for older clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRecord {
    pub id: Option<String>,
    pub playlist_id: Option<String>,
    pub title: String,
    pub name: String,
    pub description: String,
    pub track_count: u64,
    pub count: u64,
    pub thumbnail: Option<String>,
}

impl From<&LibraryPlaylist> for PlaylistRecord {
    fn from(playlist: &LibraryPlaylist) -> Self {
        let title = playlist
            .title
            .clone()
            .unwrap_or_else(|| UNTITLED_PLAYLIST.to_string());
        let count = playlist.count.unwrap_or(0);
        Self {
            id: playlist.playlist_id.clone(),
            playlist_id: playlist.playlist_id.clone(),
            name: title.clone(),
            title,
            description: playlist.description.clone().unwrap_or_default(),
            track_count: count,
            count,
            thumbnail: best_thumbnail(&playlist.thumbnails),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedPlaylist {
    pub id: String,
    pub title: String,
    pub description: String,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddTracksOutcome {
    pub success: bool,
    pub result: serde_json::Value,
    pub tracks_before: u64,
    pub tracks_after: u64,
    pub tracks_added: i64,
}

/// First artist's name, or the placeholder.
pub fn primary_artist(artists: &[ArtistRef]) -> String {
    artists
        .first()
        .and_then(|artist| artist.name.clone())
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string())
}

/// Thumbnails are ordered by resolution, so the last one is the largest.
pub fn best_thumbnail(thumbnails: &[Thumbnail]) -> Option<String> {
    thumbnails.last().map(|thumbnail| thumbnail.url.clone())
}

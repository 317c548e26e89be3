use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr, eyre};

use crate::ports::catalog::CatalogClient;
use crate::ytmusic_rs::types::SearchFilter;

pub mod client;
pub mod records;

use client::YtMusicAdapter;
use records::{AddTracksOutcome, CreatedPlaylist, PlaylistRecord, TrackRecord};

pub const SEARCH_LIMIT: usize = 10;
pub const LIBRARY_PLAYLIST_LIMIT: usize = 100;

/// Catalog operations exposed over HTTP, reshaping upstream rows into
/// stable records.
#[derive(Clone)]
pub struct CatalogService {
    client: Arc<dyn CatalogClient>,
}

impl CatalogService {
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        Self { client }
    }

    /// Load credentials and build the production client.
    pub fn connect(credentials_file: &Path, timeout: Duration) -> Result<Self> {
        let adapter = YtMusicAdapter::from_credentials_file(credentials_file, timeout)
            .wrap_err("Failed to initialize YouTube Music API")?;
        Ok(Self::new(Arc::new(adapter)))
    }

    pub async fn search_tracks(&self, query: &str) -> Result<Vec<TrackRecord>> {
        tracing::info!(query, "Searching for tracks");
        let results = self
            .client
            .search(query, SearchFilter::Songs, SEARCH_LIMIT)
            .await?;

        let songs: Vec<TrackRecord> = results
            .iter()
            .filter(|result| result.result_type.as_deref() == Some("song"))
            .take(SEARCH_LIMIT)
            .map(TrackRecord::from)
            .collect();
        tracing::info!(query, count = songs.len(), "Found songs");
        Ok(songs)
    }

    pub async fn list_playlists(&self) -> Result<Vec<PlaylistRecord>> {
        let playlists = self
            .client
            .library_playlists(LIBRARY_PLAYLIST_LIMIT)
            .await?;

        let records: Vec<PlaylistRecord> = playlists
            .iter()
            .take(LIBRARY_PLAYLIST_LIMIT)
            .map(PlaylistRecord::from)
            .collect();
        tracing::info!(count = records.len(), "Found playlists");
        Ok(records)
    }

    /// Every track of a playlist; empty when upstream returned no track list.
    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<TrackRecord>> {
        tracing::info!(playlist_id, "Fetching playlist tracks");
        let playlist = self.client.playlist(playlist_id, None).await?;

        let Some(tracks) = playlist.tracks else {
            tracing::debug!(playlist_id, "Playlist response had no tracks");
            return Ok(Vec::new());
        };
        let records: Vec<TrackRecord> = tracks.iter().map(TrackRecord::from).collect();
        tracing::info!(playlist_id, count = records.len(), "Found playlist tracks");
        Ok(records)
    }

    pub async fn create_playlist(&self, title: &str, description: &str) -> Result<CreatedPlaylist> {
        tracing::info!(title, "Creating playlist");
        let id = self
            .client
            .create_playlist(title, description)
            .await?
            .ok_or_else(|| eyre!("Failed to create playlist"))?;

        tracing::info!(title, %id, "Created playlist");
        Ok(CreatedPlaylist {
            id,
            title: title.to_string(),
            description: description.to_string(),
            success: true,
        })
    }

    /// Add tracks and report how many actually landed, measured as the
    /// change in the playlist's track count.
    pub async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<AddTracksOutcome> {
        tracing::info!(playlist_id, requested = track_ids.len(), "Adding tracks");

        let tracks_before = self.probe_track_count(playlist_id).await.unwrap_or(0);
        let result = self
            .client
            .add_playlist_items(playlist_id, track_ids)
            .await?;
        let tracks_after = self
            .probe_track_count(playlist_id)
            .await
            .unwrap_or(tracks_before);

        let tracks_added = tracks_after as i64 - tracks_before as i64;
        tracing::info!(playlist_id, tracks_added, "Added tracks to playlist");
        Ok(AddTracksOutcome {
            success: true,
            result,
            tracks_before,
            tracks_after,
            tracks_added,
        })
    }

    /// Best-effort track count; `None` when the lookup failed.
    async fn probe_track_count(&self, playlist_id: &str) -> Option<u64> {
        match self.client.playlist(playlist_id, Some(1)).await {
            Ok(playlist) => Some(playlist.track_count.unwrap_or_else(|| {
                playlist
                    .tracks
                    .as_ref()
                    .map(|tracks| tracks.len() as u64)
                    .unwrap_or(0)
            })),
            Err(e) => {
                tracing::warn!(playlist_id, "Failed to read playlist track count: {e:#}");
                None
            }
        }
    }

    /// Direct song lookup first, then a video search on the id.
    pub async fn video_info(&self, video_id: &str) -> Result<Option<TrackRecord>> {
        tracing::info!(video_id, "Getting video info");
        match self.client.song(video_id).await {
            Ok(Some(song)) => return Ok(Some(TrackRecord::from(&song).with_id(video_id))),
            Ok(None) => tracing::debug!(video_id, "Song lookup returned nothing"),
            Err(e) => tracing::debug!(video_id, "Song lookup failed: {e:#}"),
        }

        let results = self
            .client
            .search(video_id, SearchFilter::Videos, 1)
            .await?;
        Ok(results
            .first()
            .map(|video| TrackRecord::from(video).with_id(video_id)))
    }
}

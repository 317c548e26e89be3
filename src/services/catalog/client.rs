use std::path::Path;
use std::time::Duration;

use color_eyre::eyre::Result;

use crate::ports::catalog::CatalogClient;
use crate::ytmusic_rs::YtMusic;
use crate::ytmusic_rs::types::{LibraryPlaylist, PlaylistContents, SearchFilter, TrackItem};

pub struct YtMusicAdapter {
    ytmusic: YtMusic,
}

impl YtMusicAdapter {
    pub fn new(ytmusic: YtMusic) -> Self {
        Self { ytmusic }
    }

    pub fn from_credentials_file(path: &Path, timeout: Duration) -> Result<Self> {
        Ok(Self::new(YtMusic::from_credentials_file(path, timeout)?))
    }
}

#[async_trait::async_trait]
impl CatalogClient for YtMusicAdapter {
    async fn search(
        &self,
        query: &str,
        filter: SearchFilter,
        limit: usize,
    ) -> Result<Vec<TrackItem>> {
        self.ytmusic.search(query, filter, limit).await
    }

    async fn library_playlists(&self, limit: usize) -> Result<Vec<LibraryPlaylist>> {
        self.ytmusic.get_library_playlists(limit).await
    }

    async fn playlist(&self, playlist_id: &str, limit: Option<usize>) -> Result<PlaylistContents> {
        self.ytmusic.get_playlist(playlist_id, limit).await
    }

    async fn create_playlist(&self, title: &str, description: &str) -> Result<Option<String>> {
        self.ytmusic.create_playlist(title, description).await
    }

    async fn add_playlist_items(
        &self,
        playlist_id: &str,
        video_ids: &[String],
    ) -> Result<serde_json::Value> {
        self.ytmusic.add_playlist_items(playlist_id, video_ids).await
    }

    async fn song(&self, video_id: &str) -> Result<Option<TrackItem>> {
        self.ytmusic.get_song(video_id).await
    }
}

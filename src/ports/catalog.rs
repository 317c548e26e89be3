use color_eyre::eyre::Result;

use crate::ytmusic_rs::types::{LibraryPlaylist, PlaylistContents, SearchFilter, TrackItem};

/// Port trait wrapping the YouTube Music capabilities used by the façade.
///
/// Implementations live in `services::catalog::client` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    async fn search(
        &self,
        query: &str,
        filter: SearchFilter,
        limit: usize,
    ) -> Result<Vec<TrackItem>>;

    async fn library_playlists(&self, limit: usize) -> Result<Vec<LibraryPlaylist>>;

    async fn playlist(&self, playlist_id: &str, limit: Option<usize>) -> Result<PlaylistContents>;

    async fn create_playlist(&self, title: &str, description: &str) -> Result<Option<String>>;

    async fn add_playlist_items(
        &self,
        playlist_id: &str,
        video_ids: &[String],
    ) -> Result<serde_json::Value>;

    async fn song(&self, video_id: &str) -> Result<Option<TrackItem>>;
}

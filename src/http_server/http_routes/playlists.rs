use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::Deserialize;

use crate::http_server::{error::ApiError, state::AppState};
use crate::services::catalog::records::{
    AddTracksOutcome, CreatedPlaylist, PlaylistRecord, TrackRecord,
};

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistInput {
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// `track_ids` may be a single id or a list of ids.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TrackIds {
    One(String),
    Many(Vec<String>),
}

impl TrackIds {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            TrackIds::One(id) => vec![id],
            TrackIds::Many(ids) => ids,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddTracksInput {
    track_ids: Option<TrackIds>,
}

pub async fn list_playlists(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<PlaylistRecord>>, ApiError> {
    let catalog = app_state.catalog.service()?;
    Ok(Json(catalog.list_playlists().await?))
}

pub async fn playlist_tracks(
    State(app_state): State<Arc<AppState>>,
    Path(playlist_id): Path<String>,
) -> Result<Json<Vec<TrackRecord>>, ApiError> {
    let catalog = app_state.catalog.service()?;
    Ok(Json(catalog.playlist_tracks(&playlist_id).await?))
}

pub async fn create_playlist(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<CreatePlaylistInput>, JsonRejection>,
) -> Result<Json<CreatedPlaylist>, ApiError> {
    let catalog = app_state.catalog.service()?;

    let Ok(Json(CreatePlaylistInput {
        title: Some(title),
        description,
    })) = payload
    else {
        return Err(ApiError::bad_request("Playlist title required"));
    };
    let description = description.unwrap_or_default();

    Ok(Json(catalog.create_playlist(&title, &description).await?))
}

pub async fn add_tracks(
    State(app_state): State<Arc<AppState>>,
    Path(playlist_id): Path<String>,
    payload: Result<Json<AddTracksInput>, JsonRejection>,
) -> Result<Json<AddTracksOutcome>, ApiError> {
    let catalog = app_state.catalog.service()?;

    let track_ids = match payload {
        Ok(Json(AddTracksInput {
            track_ids: Some(track_ids),
        })) => track_ids.into_vec(),
        _ => Vec::new(),
    };
    if track_ids.is_empty() {
        return Err(ApiError::bad_request("Track IDs required"));
    }

    Ok(Json(catalog.add_tracks(&playlist_id, &track_ids).await?))
}

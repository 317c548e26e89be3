use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::http_server::{error::ApiError, state::AppState};
use crate::services::catalog::records::TrackRecord;

pub async fn video_info(
    State(app_state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Json<TrackRecord>, ApiError> {
    let catalog = app_state.catalog.service()?;

    catalog
        .video_info(&video_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))
}

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::http_server::{error::ApiError, state::AppState};
use crate::services::catalog::records::TrackRecord;

/// First `q` value in the query string; repeated keys are allowed.
fn first_query(pairs: &[(String, String)]) -> Option<&str> {
    pairs
        .iter()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.trim())
}

pub async fn search_tracks(
    State(app_state): State<Arc<AppState>>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<TrackRecord>>, ApiError> {
    let catalog = app_state.catalog.service()?;

    let Query(pairs) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let query = first_query(&pairs).unwrap_or_default();
    if query.is_empty() {
        return Err(ApiError::bad_request("No search query provided"));
    }

    Ok(Json(catalog.search_tracks(query).await?))
}

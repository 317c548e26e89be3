use chrono::Utc;
use color_eyre::eyre::Result;
use serde_json::json;

use super::YtMusic;
use super::parsers::{parse_search_results, parse_song};
use super::types::{SearchFilter, TrackItem};

impl YtMusic {
    /// Filtered search; returns at most `limit` rows in upstream order.
    pub async fn search(
        &self,
        query: &str,
        filter: SearchFilter,
        limit: usize,
    ) -> Result<Vec<TrackItem>> {
        let body = json!({ "query": query, "params": filter.params() });
        let response = self.send_request("search", body, &[]).await?;

        let mut results = parse_search_results(&response, filter);
        results.truncate(limit);
        Ok(results)
    }

    /// Look up a single video through the player endpoint.
    pub async fn get_song(&self, video_id: &str) -> Result<Option<TrackItem>> {
        // Days since the epoch, one day behind to match the web player.
        let signature_timestamp = Utc::now().timestamp() / 86_400 - 1;
        let body = json!({
            "video_id": video_id,
            "playbackContext": {
                "contentPlaybackContext": { "signatureTimestamp": signature_timestamp }
            }
        });
        let response = self.send_request("player", body, &[]).await?;
        Ok(parse_song(&response))
    }
}

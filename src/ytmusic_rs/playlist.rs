use std::future::Future;

use color_eyre::eyre::Result;
use serde_json::{Value, json};

use super::YtMusic;
use super::parsers::{
    CONTINUATION_ITEMS, GRID_CONTINUATION, LIBRARY_GRID, PLAYLIST_SHELVES, first_of, items,
    parse_library_grid, parse_playlist_header, parse_playlist_items,
};
use super::types::{LibraryPlaylist, PlaylistContents, TrackItem};

fn browse_id(playlist_id: &str) -> String {
    if playlist_id.starts_with("VL") {
        playlist_id.to_string()
    } else {
        format!("VL{playlist_id}")
    }
}

/// Follow continuation tokens until `limit` tracks are collected or the
/// pages run out. Pages are never cut short.
async fn collect_pages<F, Fut>(
    first_page: (Vec<TrackItem>, Option<String>),
    limit: Option<usize>,
    mut next_page: F,
) -> Result<Vec<TrackItem>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<(Vec<TrackItem>, Option<String>)>>,
{
    let (mut tracks, mut continuation) = first_page;
    while !limit.is_some_and(|limit| tracks.len() >= limit) {
        let Some(token) = continuation.take() else {
            break;
        };
        let (more, next) = next_page(token).await?;
        if more.is_empty() {
            break;
        }
        tracks.extend(more);
        continuation = next;
    }
    Ok(tracks)
}

impl YtMusic {
    /// Playlists in the user's library, following grid continuations until
    /// `limit` is reached.
    pub async fn get_library_playlists(&self, limit: usize) -> Result<Vec<LibraryPlaylist>> {
        let response = self
            .send_request("browse", json!({ "browseId": "FEmusic_liked_playlists" }), &[])
            .await?;
        let Some(grid) = response.pointer(LIBRARY_GRID) else {
            tracing::warn!("Library response had no playlist grid");
            return Ok(Vec::new());
        };

        let (mut playlists, mut continuation) = parse_library_grid(grid);
        while playlists.len() < limit {
            let Some(token) = continuation.take() else {
                break;
            };
            let params = [
                ("ctoken", token.as_str()),
                ("continuation", token.as_str()),
                ("type", "next"),
            ];
            let response = self.send_request("browse", json!({}), &params).await?;
            let Some(grid) = response.pointer(GRID_CONTINUATION) else {
                break;
            };
            let (more, next) = parse_library_grid(grid);
            playlists.extend(more);
            continuation = next;
        }

        playlists.truncate(limit);
        Ok(playlists)
    }

    /// Fetch a playlist's header and tracks. `limit` only stops further pages
    /// from being requested once reached; the first page is always returned
    /// whole. `limit: None` reads every page.
    pub async fn get_playlist(
        &self,
        playlist_id: &str,
        limit: Option<usize>,
    ) -> Result<PlaylistContents> {
        let response = self
            .send_request("browse", json!({ "browseId": browse_id(playlist_id) }), &[])
            .await?;
        let (title, track_count) = parse_playlist_header(&response);

        let tracks = match first_of(&response, &PLAYLIST_SHELVES) {
            None => None,
            Some(shelf) => {
                let first_page = parse_playlist_items(items(shelf, "/contents"));
                let tracks = collect_pages(first_page, limit, |token| async move {
                    let response = self
                        .send_request("browse", json!({ "continuation": token }), &[])
                        .await?;
                    let page = parse_playlist_items(items(&response, CONTINUATION_ITEMS));
                    Ok::<_, color_eyre::Report>(page)
                })
                .await?;
                Some(tracks)
            }
        };

        Ok(PlaylistContents {
            id: playlist_id.strip_prefix("VL").unwrap_or(playlist_id).to_string(),
            title,
            track_count,
            tracks,
        })
    }

    /// Create a private playlist, returning its id if upstream reported one.
    pub async fn create_playlist(&self, title: &str, description: &str) -> Result<Option<String>> {
        let description: String = description
            .chars()
            .filter(|c| *c != '<' && *c != '>')
            .collect();
        let body = json!({
            "title": title,
            "description": description,
            "privacyStatus": "PRIVATE",
        });
        let response = self.send_request("playlist/create", body, &[]).await?;

        Ok(response
            .get("playlistId")
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    /// Append videos to a playlist, letting upstream skip ones already present.
    pub async fn add_playlist_items(&self, playlist_id: &str, video_ids: &[String]) -> Result<Value> {
        let actions: Vec<Value> = video_ids
            .iter()
            .map(|video_id| {
                json!({
                    "action": "ACTION_ADD_VIDEO",
                    "addedVideoId": video_id,
                    "dedupeOption": "DEDUPE_OPTION_CHECK",
                })
            })
            .collect();
        let body = json!({
            "playlistId": playlist_id.strip_prefix("VL").unwrap_or(playlist_id),
            "actions": actions,
        });
        let response = self.send_request("browse/edit_playlist", body, &[]).await?;

        let succeeded = response
            .get("status")
            .and_then(Value::as_str)
            .is_some_and(|status| status.contains("SUCCEEDED"));
        if !succeeded {
            return Ok(response);
        }

        let results: Vec<Value> = items(&response, "/playlistEditResults")
            .iter()
            .filter_map(|result| result.get("playlistEditVideoAddedResultData"))
            .cloned()
            .collect();
        Ok(json!({
            "status": response["status"],
            "playlistEditResults": results,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(prefix: &str, len: usize) -> Vec<TrackItem> {
        (0..len)
            .map(|i| TrackItem {
                video_id: Some(format!("{prefix}{i}")),
                ..Default::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_collect_pages_keeps_whole_first_page() {
        let tracks = collect_pages((page("a", 5), Some("next".into())), Some(1), |_| async {
            Ok((page("b", 5), None))
        })
        .await
        .unwrap();

        assert_eq!(tracks.len(), 5);
    }

    #[tokio::test]
    async fn test_collect_pages_follows_continuations() {
        let mut requested = Vec::new();
        let tracks = collect_pages((page("a", 2), Some("t1".into())), None, |token| {
            requested.push(token.clone());
            async move {
                match token.as_str() {
                    "t1" => Ok((page("b", 2), Some("t2".into()))),
                    _ => Ok((page("c", 1), None)),
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(tracks.len(), 5);
        assert_eq!(requested, vec!["t1", "t2"]);
    }

    #[tokio::test]
    async fn test_collect_pages_stops_on_empty_page() {
        let tracks = collect_pages((page("a", 2), Some("t1".into())), None, |_| async {
            Ok((Vec::new(), Some("loop".into())))
        })
        .await
        .unwrap();

        assert_eq!(tracks.len(), 2);
    }

    #[test]
    fn test_browse_id_prefix() {
        assert_eq!(browse_id("PL123"), "VLPL123");
        assert_eq!(browse_id("VLPL123"), "VLPL123");
    }
}

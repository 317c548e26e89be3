//! Parsers turning `youtubei/v1` renderer trees into flat records.
//!
//! Paths are JSON pointers into the response documents. Everything here is
//! best effort: missing nodes yield `None` or empty lists rather than errors,
//! since YouTube Music reshuffles its renderers regularly.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::types::{AlbumRef, ArtistRef, LibraryPlaylist, SearchFilter, Thumbnail, TrackItem};

const RUN_TEXT: &str = "/runs/0/text";
const FLEX_COLUMN_TEXT: &str = "/musicResponsiveListItemFlexColumnRenderer/text";
const FIXED_COLUMN_TEXT: &str = "/musicResponsiveListItemFixedColumnRenderer/text";
const THUMBNAILS: &str = "/musicThumbnailRenderer/thumbnail/thumbnails";
const BROWSE_ID: &str = "/navigationEndpoint/browseEndpoint/browseId";
const WATCH_VIDEO_ID: &str = "/navigationEndpoint/watchEndpoint/videoId";
const PLAY_BUTTON_VIDEO_ID: &str = "/overlay/musicItemThumbnailOverlayRenderer/content/musicPlayButtonRenderer/playNavigationEndpoint/watchEndpoint/videoId";
const CONTINUATION_TOKEN: &str = "/continuationItemRenderer/continuationEndpoint/continuationCommand/token";
const NEXT_CONTINUATION: &str = "/continuations/0/nextContinuationData/continuation";

pub const SEARCH_SECTIONS: [&str; 2] = [
    "/contents/tabbedSearchResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents",
    "/contents/sectionListRenderer/contents",
];

pub const LIBRARY_GRID: &str = "/contents/singleColumnBrowseResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents/0/gridRenderer";
pub const GRID_CONTINUATION: &str = "/continuationContents/gridContinuation";

pub const PLAYLIST_SHELVES: [&str; 2] = [
    "/contents/twoColumnBrowseResultsRenderer/secondaryContents/sectionListRenderer/contents/0/musicPlaylistShelfRenderer",
    "/contents/singleColumnBrowseResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents/0/musicPlaylistShelfRenderer",
];

const PLAYLIST_HEADERS: [&str; 4] = [
    "/contents/twoColumnBrowseResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents/0/musicResponsiveHeaderRenderer",
    "/contents/twoColumnBrowseResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents/0/musicEditablePlaylistDetailHeaderRenderer/header/musicResponsiveHeaderRenderer",
    "/header/musicDetailHeaderRenderer",
    "/header/musicEditablePlaylistDetailHeaderRenderer/header/musicDetailHeaderRenderer",
];

pub const CONTINUATION_ITEMS: &str =
    "/onResponseReceivedActions/0/appendContinuationItemsAction/continuationItems";

/// Labels YouTube Music puts in front of mixed search results.
const RESULT_TYPES: [&str; 8] = [
    "song", "video", "album", "artist", "playlist", "episode", "podcast", "profile",
];

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+:)*\d+(:\d+)+$").expect("valid duration regex"));
static VIEWS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d([^ ])* [^ ]*$").expect("valid views regex"));
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("valid year regex"));

fn text(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}

pub fn first_of<'a>(value: &'a Value, pointers: &[&str]) -> Option<&'a Value> {
    pointers.iter().find_map(|pointer| value.pointer(pointer))
}

pub fn items<'a>(value: &'a Value, pointer: &str) -> &'a [Value] {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

pub fn parse_thumbnails(value: Option<&Value>) -> Vec<Thumbnail> {
    value
        .and_then(|thumbnails| serde_json::from_value(thumbnails.clone()).ok())
        .unwrap_or_default()
}

/// `"1,234 songs"` → `1234`
pub fn parse_count(text: &str) -> Option<u64> {
    let digits: String = text
        .split_whitespace()
        .next()?
        .chars()
        .filter(|c| *c != ',' && *c != '.')
        .collect();
    digits.parse().ok()
}

fn is_track_count(text: &str) -> bool {
    text.contains("song") || text.contains("track")
}

/// `245` → `"4:05"`, `3725` → `"1:02:05"`
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct SongRuns {
    pub artists: Vec<ArtistRef>,
    pub album: Option<AlbumRef>,
    pub duration: Option<String>,
}

/// Parse the `Artist • Album • 3:45` style subtitle runs of a song row.
/// Odd positions are always separators.
pub fn parse_song_runs(runs: &[Value]) -> SongRuns {
    let mut parsed = SongRuns::default();

    for (i, run) in runs.iter().enumerate().step_by(2) {
        let Some(run_text) = run.get("text").and_then(Value::as_str) else {
            continue;
        };

        if run.get("navigationEndpoint").is_some() {
            let id = text(run, BROWSE_ID);
            let is_album = id
                .as_deref()
                .is_some_and(|id| id.starts_with("MPRE") || id.contains("release_detail"));
            if is_album {
                parsed.album = Some(AlbumRef {
                    name: Some(run_text.to_string()),
                    id,
                });
            } else {
                parsed.artists.push(ArtistRef {
                    name: Some(run_text.to_string()),
                    id,
                });
            }
        } else if i > 0 && VIEWS_RE.is_match(run_text) {
            continue;
        } else if DURATION_RE.is_match(run_text) {
            parsed.duration = Some(run_text.to_string());
        } else if YEAR_RE.is_match(run_text) {
            continue;
        } else {
            parsed.artists.push(ArtistRef {
                name: Some(run_text.to_string()),
                id: None,
            });
        }
    }

    parsed
}

fn flex_column(renderer: &Value, index: usize) -> Option<&Value> {
    renderer.pointer(&format!("/flexColumns/{index}{FLEX_COLUMN_TEXT}"))
}

fn row_video_id(renderer: &Value) -> Option<String> {
    flex_column(renderer, 0)
        .and_then(|column| text(column, &format!("/runs/0{WATCH_VIDEO_ID}")))
        .or_else(|| text(renderer, PLAY_BUTTON_VIDEO_ID))
        .or_else(|| text(renderer, "/playlistItemData/videoId"))
}

/// Parse one `musicResponsiveListItemRenderer` from a filtered search shelf.
pub fn parse_search_result(renderer: &Value, filter: SearchFilter) -> TrackItem {
    let title = flex_column(renderer, 0).and_then(|column| text(column, RUN_TEXT));
    let mut runs = flex_column(renderer, 1)
        .and_then(|column| column.get("runs"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut result_type = filter.result_type().to_string();
    if let Some(label) = runs
        .first()
        .filter(|run| run.get("navigationEndpoint").is_none())
        .and_then(|run| run.get("text"))
        .and_then(Value::as_str)
        .map(str::to_lowercase)
        && RESULT_TYPES.contains(&label.as_str())
    {
        result_type = label;
        runs = runs.get(2..).unwrap_or_default();
    }

    let song_runs = parse_song_runs(runs);

    TrackItem {
        result_type: Some(result_type),
        video_id: row_video_id(renderer),
        title,
        artists: song_runs.artists,
        album: song_runs.album,
        duration: song_runs.duration,
        thumbnails: parse_thumbnails(renderer.pointer(&format!("/thumbnail{THUMBNAILS}"))),
    }
}

/// Collect song rows from every shelf of a search response.
pub fn parse_search_results(response: &Value, filter: SearchFilter) -> Vec<TrackItem> {
    let Some(sections) = first_of(response, &SEARCH_SECTIONS).and_then(Value::as_array) else {
        return Vec::new();
    };

    sections
        .iter()
        .filter_map(|section| section.get("musicShelfRenderer"))
        .flat_map(|shelf| items(shelf, "/contents"))
        .filter_map(|item| item.get("musicResponsiveListItemRenderer"))
        .map(|renderer| parse_search_result(renderer, filter))
        .collect()
}

/// Parse one `musicResponsiveListItemRenderer` from a playlist shelf.
pub fn parse_playlist_item(renderer: &Value) -> TrackItem {
    let title = flex_column(renderer, 0).and_then(|column| text(column, RUN_TEXT));
    let artist_runs = flex_column(renderer, 1)
        .and_then(|column| column.get("runs"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let artists = parse_song_runs(artist_runs).artists;

    let album = flex_column(renderer, 2)
        .and_then(|column| column.pointer("/runs/0"))
        .filter(|run| run.get("navigationEndpoint").is_some())
        .map(|run| AlbumRef {
            name: text(run, "/text"),
            id: text(run, BROWSE_ID),
        });

    let duration = renderer
        .pointer(&format!("/fixedColumns/0{FIXED_COLUMN_TEXT}"))
        .and_then(|column| text(column, "/simpleText").or_else(|| text(column, RUN_TEXT)));

    TrackItem {
        result_type: Some("song".to_string()),
        video_id: row_video_id(renderer),
        title,
        artists,
        album,
        duration,
        thumbnails: parse_thumbnails(renderer.pointer(&format!("/thumbnail{THUMBNAILS}"))),
    }
}

/// Playlist rows plus the token for the next page, if any.
pub fn parse_playlist_items(contents: &[Value]) -> (Vec<TrackItem>, Option<String>) {
    let tracks = contents
        .iter()
        .filter_map(|item| item.get("musicResponsiveListItemRenderer"))
        .map(parse_playlist_item)
        .collect();
    let continuation = contents
        .last()
        .and_then(|item| text(item, CONTINUATION_TOKEN));
    (tracks, continuation)
}

/// Title and declared track count from a playlist page header.
pub fn parse_playlist_header(response: &Value) -> (Option<String>, Option<u64>) {
    let Some(header) = first_of(response, &PLAYLIST_HEADERS) else {
        return (None, None);
    };
    let title = text(header, "/title/runs/0/text");
    let track_count = items(header, "/secondSubtitle/runs")
        .iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .filter(|text| is_track_count(text))
        .find_map(parse_count);
    (title, track_count)
}

/// Parse one `musicTwoRowItemRenderer` playlist tile.
pub fn parse_library_playlist(renderer: &Value) -> Option<LibraryPlaylist> {
    let browse_id = text(renderer, &format!("/title/runs/0{BROWSE_ID}"))
        .or_else(|| text(renderer, BROWSE_ID))?;
    let playlist_id = browse_id
        .strip_prefix("VL")
        .map(str::to_string)
        .unwrap_or(browse_id);

    let subtitle: Vec<&str> = items(renderer, "/subtitle/runs")
        .iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .collect();
    let count = subtitle
        .iter()
        .filter(|text| is_track_count(text))
        .find_map(|text| parse_count(text));
    let description = (!subtitle.is_empty()).then(|| subtitle.concat());

    Some(LibraryPlaylist {
        playlist_id: Some(playlist_id),
        title: text(renderer, "/title/runs/0/text"),
        description,
        count,
        thumbnails: parse_thumbnails(
            renderer.pointer(&format!("/thumbnailRenderer{THUMBNAILS}")),
        ),
    })
}

/// Playlist tiles of a grid plus the token for the next page, if any.
pub fn parse_library_grid(grid: &Value) -> (Vec<LibraryPlaylist>, Option<String>) {
    let playlists = items(grid, "/items")
        .iter()
        .filter_map(|item| item.get("musicTwoRowItemRenderer"))
        .filter_map(parse_library_playlist)
        .collect();
    (playlists, text(grid, NEXT_CONTINUATION))
}

/// Parse the `player` response of a single video.
pub fn parse_song(response: &Value) -> Option<TrackItem> {
    let details = response.get("videoDetails")?;
    let video_id = text(details, "/videoId")?;

    let artists = text(details, "/author")
        .map(|name| {
            vec![ArtistRef {
                name: Some(name),
                id: text(details, "/channelId"),
            }]
        })
        .unwrap_or_default();
    let duration = text(details, "/lengthSeconds")
        .and_then(|seconds| seconds.parse::<u64>().ok())
        .map(format_duration);

    Some(TrackItem {
        result_type: Some("song".to_string()),
        video_id: Some(video_id),
        title: text(details, "/title"),
        artists,
        album: None,
        duration,
        thumbnails: parse_thumbnails(details.pointer("/thumbnail/thumbnails")),
    })
}

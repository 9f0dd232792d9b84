use ribbon_core::state::{PlaybackInfo, TrackInfo};
use std::collections::HashMap;
use std::path::PathBuf;
use zbus::zvariant::{OwnedValue, Value};

/// Well-known MPRIS bus-name prefix.
pub const MPRIS_PREFIX: &str = "org.mpris.MediaPlayer2.";

/// Notifications delivered by the media session task.
///
/// One ordered channel carries all three streams; each event fully
/// supersedes the previous one of its kind.
#[derive(Debug, Clone)]
pub enum MediaEvent {
    /// A session appeared (`true`) or the active one went away (`false`).
    Session(bool),
    /// Playback status / control capabilities changed.
    Playback(PlaybackInfo),
    /// Track metadata changed (`None` = metadata cleared).
    Track(Option<TrackInfo>),
}

/// Commands accepted by the media session task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCommand {
    PlayPause,
    Previous,
    Next,
    /// Re-emit session, playback and track state from current properties.
    ForceUpdate,
}

/// Build a [`TrackInfo`] from an MPRIS `Metadata` property map.
///
/// Album art is left unset — the caller decides whether and how to load it.
pub fn track_from_metadata(
    meta: &HashMap<String, OwnedValue>,
    player: Option<String>,
) -> TrackInfo {
    let artists = meta.get("xesam:artist").map(string_list_value).unwrap_or_default();

    TrackInfo {
        title: meta.get("xesam:title").and_then(string_value),
        artist: if artists.is_empty() {
            None
        } else {
            Some(artists.join(", "))
        },
        album: meta.get("xesam:album").and_then(string_value),
        player,
        art: None,
    }
}

/// Album-art URL from an MPRIS `Metadata` property map.
pub fn art_url(meta: &HashMap<String, OwnedValue>) -> Option<String> {
    meta.get("mpris:artUrl").and_then(string_value).filter(|u| !u.is_empty())
}

/// Local filesystem path for a `file://` art URL; `None` for other schemes.
pub fn art_path(url: &str) -> Option<PathBuf> {
    let rest = url.strip_prefix("file://")?;
    Some(PathBuf::from(percent_decode(rest)))
}

/// Display name for an MPRIS bus name,
/// e.g. `"org.mpris.MediaPlayer2.spotify"` → `"Spotify"`.
pub fn player_label(bus_name: &str) -> String {
    let id = bus_name
        .strip_prefix(MPRIS_PREFIX)
        .map(|s| s.split('.').next().unwrap_or(s))
        .unwrap_or(bus_name);

    let mut chars = id.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn string_value(v: &OwnedValue) -> Option<String> {
    match &**v {
        Value::Str(s) => Some(s.as_str().to_owned()),
        _ => None,
    }
}

fn string_list_value(v: &OwnedValue) -> Vec<String> {
    match &**v {
        Value::Array(arr) => arr
            .iter()
            .filter_map(|item| match item {
                Value::Str(s) => Some(s.as_str().to_owned()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = [bytes[i + 1], bytes[i + 2]];
            if let Some(b) = std::str::from_utf8(&hex)
                .ok()
                .and_then(|h| u8::from_str_radix(h, 16).ok())
            {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use zbus::zvariant::Value;

    fn owned(v: Value<'_>) -> OwnedValue {
        OwnedValue::try_from(v).unwrap()
    }

    #[test]
    fn track_from_full_metadata() {
        let mut meta = HashMap::new();
        meta.insert("xesam:title".to_string(), owned(Value::from("Song")));
        meta.insert(
            "xesam:artist".to_string(),
            owned(Value::from(vec!["Artist A", "Artist B"])),
        );
        meta.insert("xesam:album".to_string(), owned(Value::from("Album")));

        let track = track_from_metadata(&meta, Some("Spotify".to_string()));
        assert_eq!(track.title.as_deref(), Some("Song"));
        assert_eq!(track.artist.as_deref(), Some("Artist A, Artist B"));
        assert_eq!(track.album.as_deref(), Some("Album"));
        assert_eq!(track.player.as_deref(), Some("Spotify"));
        assert!(track.art.is_none());
    }

    #[test]
    fn track_from_empty_metadata() {
        let meta = HashMap::new();
        let track = track_from_metadata(&meta, None);
        assert!(track.title.is_none());
        assert!(track.artist.is_none());
    }

    #[test]
    fn art_url_ignores_empty_strings() {
        let mut meta = HashMap::new();
        meta.insert("mpris:artUrl".to_string(), owned(Value::from("")));
        assert!(art_url(&meta).is_none());
    }

    #[test]
    fn art_path_decodes_file_urls() {
        let path = art_path("file:///tmp/cover%20art.png").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/cover art.png"));
    }

    #[test]
    fn art_path_rejects_other_schemes() {
        assert!(art_path("https://example.com/cover.png").is_none());
    }

    #[test]
    fn player_label_from_bus_name() {
        assert_eq!(player_label("org.mpris.MediaPlayer2.spotify"), "Spotify");
        assert_eq!(
            player_label("org.mpris.MediaPlayer2.firefox.instance123"),
            "Firefox"
        );
        assert_eq!(player_label("weird"), "Weird");
    }
}

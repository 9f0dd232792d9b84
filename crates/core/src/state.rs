use image::RgbaImage;
use std::fmt;

/// Playback state reported by the active media session.
///
/// Parsed from the session's `PlaybackStatus` string; anything the player
/// reports outside the known values maps to [`PlaybackStatus::Stopped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    Playing,
    Paused,
    #[default]
    Stopped,
}

impl From<&str> for PlaybackStatus {
    fn from(s: &str) -> Self {
        match s {
            "Playing" => Self::Playing,
            "Paused" => Self::Paused,
            _ => Self::Stopped,
        }
    }
}

/// Per-button capability flags reported by the media session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlFlags {
    pub prev_enabled: bool,
    /// Play/pause toggle — enabled when the session can play *or* pause.
    pub toggle_enabled: bool,
    pub next_enabled: bool,
}

/// Playback snapshot delivered on every playback-state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackInfo {
    pub status: PlaybackStatus,
    pub controls: ControlFlags,
}

/// Transient track metadata delivered on every media-metadata change.
///
/// Not cached beyond the current display cycle — each delivery fully
/// supersedes the previous one.
#[derive(Clone, Default)]
pub struct TrackInfo {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Display name of the player that owns the session (e.g. `"Spotify"`).
    pub player: Option<String>,
    /// Decoded album art, if the session supplied any.
    pub art: Option<RgbaImage>,
}

impl fmt::Debug for TrackInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackInfo")
            .field("title", &self.title)
            .field("artist", &self.artist)
            .field("album", &self.album)
            .field("player", &self.player)
            .field("art", &self.art.as_ref().map(|a| (a.width(), a.height())))
            .finish()
    }
}

/// Result of a keyboard-layout query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageInfo {
    /// ISO 639 language code, e.g. `"en"`.
    pub language_code: String,
    /// ISO 3166 country code, e.g. `"US"`.  Empty when unknown.
    pub country_code: String,
    /// Human-readable layout name, e.g. `"English (US)"`.
    pub full_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_status_from_known_strings() {
        assert_eq!(PlaybackStatus::from("Playing"), PlaybackStatus::Playing);
        assert_eq!(PlaybackStatus::from("Paused"), PlaybackStatus::Paused);
        assert_eq!(PlaybackStatus::from("Stopped"), PlaybackStatus::Stopped);
    }

    #[test]
    fn playback_status_unknown_maps_to_stopped() {
        assert_eq!(PlaybackStatus::from("Buffering"), PlaybackStatus::Stopped);
        assert_eq!(PlaybackStatus::from(""), PlaybackStatus::Stopped);
    }
}

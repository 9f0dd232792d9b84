use crate::state::{LanguageInfo, PlaybackInfo, TrackInfo};

/// All messages (events) that can flow through the application event bus.
///
/// Sources:
/// - Media session task    → `MediaSessionChanged`, `MediaPlaybackChanged`, `MediaTrackChanged`
/// - Language poll / IPC   → `LanguageUpdated`, `LanguageRefreshRequested`
/// - Config watcher task   → `ConfigReloaded`
/// - User clicks           → `Media*` actions, `*LabelToggled`
#[derive(Debug, Clone)]
pub enum Message {
    // ── Media session ─────────────────────────────────────────────────────────
    /// A media session appeared (`true`) or the last one went away (`false`).
    MediaSessionChanged(bool),
    /// Playback status or control capabilities changed.
    MediaPlaybackChanged(PlaybackInfo),
    /// Track metadata changed (`None` = metadata cleared).
    MediaTrackChanged(Option<TrackInfo>),

    // ── Keyboard language ─────────────────────────────────────────────────────
    /// Fresh keyboard-layout query result (`None` = query failed).
    LanguageUpdated(Option<LanguageInfo>),
    /// Poll timer fired or the compositor reported a layout switch —
    /// re-query the active keyboard language.
    LanguageRefreshRequested,

    // ── User actions ──────────────────────────────────────────────────────────
    /// Click on the play/pause button.
    MediaPlayPause,
    /// Click on the next-track button.
    MediaNext,
    /// Click on the previous-track button.
    MediaPrev,
    /// Click on the media text — toggle the alternate field-size set.
    MediaLabelToggled,
    /// Click on the language widget — toggle the alternate label template.
    LanguageLabelToggled,

    // ── Config ────────────────────────────────────────────────────────────────
    /// Config file changed on disk — triggers a live reload.
    ConfigReloaded,
}

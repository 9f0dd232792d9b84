use crate::template::{self, Segment};
use iced::{
    widget::{column, image as picture, mouse_area, row, stack, text},
    Alignment, Element, Length,
};
use ribbon_artwork::{compose, ComposeOptions, RoundedSide};
use ribbon_config::MediaConfig;
use ribbon_core::{
    event::Message,
    state::{ControlFlags, PlaybackInfo, PlaybackStatus, TrackInfo},
};
use ribbon_theme::{SegmentRole, Theme};
use std::collections::HashMap;
use tracing::warn;

/// Now-playing widget: transport controls plus track text over an optional
/// album-art thumbnail.
///
/// All mutation happens through the `on_*` reactions, driven by media
/// session messages on the UI thread.  Each notification fully supersedes
/// the previous display state.
#[derive(Debug)]
pub struct MediaWidget {
    cfg: MediaConfig,
    main_segments: Vec<Segment>,
    sub_segments: Vec<Segment>,
    /// Alternate field-size set active (toggled by clicking the text).
    show_alt: bool,
    /// Widget frame visibility (driven by `hide_empty`).
    visible: bool,
    session_active: bool,
    play_icon: String,
    controls: ControlFlags,
    main_text: Vec<String>,
    sub_text: Vec<String>,
    thumbnail: Option<Thumbnail>,
    last_track: Option<TrackInfo>,
}

#[derive(Debug)]
struct Thumbnail {
    handle: picture::Handle,
    width: u32,
    height: u32,
}

impl MediaWidget {
    pub fn new(cfg: &MediaConfig) -> Self {
        let main_segments = template::parse(&cfg.label_main);
        let sub_segments = template::parse(&cfg.label_sub);

        Self {
            main_text: vec![String::new(); main_segments.len()],
            sub_text: vec![String::new(); sub_segments.len()],
            main_segments,
            sub_segments,
            show_alt: false,
            visible: !cfg.hide_empty,
            session_active: false,
            play_icon: cfg.icons.play.clone(),
            controls: ControlFlags::default(),
            thumbnail: None,
            last_track: None,
            cfg: cfg.clone(),
        }
    }

    /// A media session appeared or the active one went away.
    pub fn on_session(&mut self, active: bool) {
        self.session_active = active;

        if active {
            self.visible = true;
            return;
        }

        // Degrade to the safe empty state: no thumbnail, cleared text,
        // play glyph reset.
        self.thumbnail = None;
        self.last_track = None;
        self.clear_text();
        self.play_icon = self.cfg.icons.play.clone();
        if self.cfg.hide_empty {
            self.visible = false;
        }
    }

    /// Playback status or control capabilities changed.
    pub fn on_playback(&mut self, info: &PlaybackInfo) {
        self.play_icon = if info.status == PlaybackStatus::Playing {
            self.cfg.icons.pause.clone()
        } else {
            self.cfg.icons.play.clone()
        };
        self.controls = info.controls;
    }

    /// Track metadata changed (`None` = metadata cleared).
    pub fn on_track(&mut self, track: Option<&TrackInfo>, theme: &Theme, bar_height: u32) {
        if self.cfg.controls_only {
            return;
        }

        self.last_track = track.cloned();
        self.render_track(theme, bar_height);
    }

    /// Switch between the primary and alternate field-size set and
    /// re-render the current track with the new limits.
    pub fn toggle(&mut self, theme: &Theme, bar_height: u32) {
        self.show_alt = !self.show_alt;
        if !self.cfg.controls_only {
            self.render_track(theme, bar_height);
        }
    }

    pub fn view<'a>(&'a self, theme: &'a Theme) -> Option<Element<'a, Message>> {
        if !self.visible {
            return None;
        }

        let button = |icon: &'a str, enabled: bool, msg: Message| {
            mouse_area(
                text(icon)
                    .size(theme.font_size)
                    .color(theme.control_color(enabled.into()).to_iced()),
            )
            .on_press(msg)
        };

        let controls = row![
            button(&self.cfg.icons.prev_track, self.controls.prev_enabled, Message::MediaPrev),
            button(&self.play_icon, self.controls.toggle_enabled, Message::MediaPlayPause),
            button(&self.cfg.icons.next_track, self.controls.next_enabled, Message::MediaNext),
        ]
        .spacing(theme.gap as f32)
        .align_y(Alignment::Center);

        if self.cfg.controls_only {
            return Some(controls.into());
        }

        let main_line = segment_row(&self.main_segments, &self.main_text, theme, false);
        let sub_line = segment_row(&self.sub_segments, &self.sub_text, theme, true);
        let text_col = column![main_line, sub_line].align_x(Alignment::End);

        let panel: Element<'a, Message> = match &self.thumbnail {
            Some(t) => stack![
                picture(t.handle.clone())
                    .width(Length::Fixed(t.width as f32))
                    .height(Length::Fixed(t.height as f32)),
                text_col,
            ]
            .into(),
            None => text_col.into(),
        };
        let panel = mouse_area(panel).on_press(Message::MediaLabelToggled);

        let content = if self.cfg.controls_left {
            row![controls, panel]
        } else {
            row![panel, controls]
        }
        .spacing(theme.gap as f32)
        .align_y(Alignment::Center);

        Some(content.into())
    }

    fn clear_text(&mut self) {
        self.main_text = vec![String::new(); self.main_segments.len()];
        self.sub_text = vec![String::new(); self.sub_segments.len()];
    }

    /// Substitute the current track into both label sets and refresh the
    /// thumbnail.  A compositing failure hides the thumbnail surface only —
    /// the text lines stay.
    fn render_track(&mut self, theme: &Theme, bar_height: u32) {
        let Some(track) = self.last_track.clone() else {
            self.clear_text();
            self.thumbnail = None;
            return;
        };

        let max = if self.show_alt {
            self.cfg.max_field_size.label_alt
        } else {
            self.cfg.max_field_size.label
        };

        let field = |v: &Option<String>| template::truncate(v.as_deref().unwrap_or(""), max);
        let mut vars: HashMap<&str, String> = HashMap::new();
        vars.insert("title", field(&track.title));
        vars.insert("artist", field(&track.artist));
        vars.insert("album", field(&track.album));
        vars.insert("player", field(&track.player));

        self.main_text = template::render(&self.main_segments, &vars);
        self.sub_text = template::render(&self.sub_segments, &vars);

        if !self.cfg.show_thumbnail {
            return;
        }
        let Some(art) = &track.art else {
            self.thumbnail = None;
            return;
        };

        let target_width = self
            .text_width(theme)
            .max(1);
        let opts = ComposeOptions {
            target_width,
            crop_height: bar_height,
            padding: self.cfg.thumbnail_padding,
            alpha_multiplier: self.cfg.thumbnail_alpha_multiplier,
            alpha_range: self.cfg.thumbnail_alpha_range,
            corner_radius: self.cfg.thumbnail_corner_radius,
            // Controls on the left leave the right edge free to round.
            rounded_side: if self.cfg.controls_left {
                RoundedSide::Right
            } else {
                RoundedSide::Left
            },
        };

        match compose(art, &opts) {
            Ok(img) => {
                let (width, height) = img.dimensions();
                self.thumbnail = Some(Thumbnail {
                    handle: picture::Handle::from_rgba(width, height, img.into_raw()),
                    width,
                    height,
                });
            }
            Err(e) => {
                warn!("thumbnail compositing failed: {e}");
                self.thumbnail = None;
            }
        }
    }

    /// Width of the wider rendered text line.
    fn text_width(&self, theme: &Theme) -> u32 {
        let main = estimate_text_width(&self.main_text.join(" "), theme.font_size);
        let sub = estimate_text_width(&self.sub_text.join(" "), theme.font_size);
        main.max(sub)
    }
}

/// Rendered segment texts as one styled row.  Sub lines use the muted
/// color for their text runs.
fn segment_row<'a>(
    segments: &'a [Segment],
    texts: &'a [String],
    theme: &'a Theme,
    muted: bool,
) -> Element<'a, Message> {
    let mut line = row![].spacing(theme.gap as f32).align_y(Alignment::Center);
    for (segment, rendered) in segments.iter().zip(texts) {
        let color = if muted && segment.role == SegmentRole::Label {
            theme.muted
        } else {
            theme.segment_color(segment.role)
        };
        line = line.push(text(rendered.as_str()).size(theme.font_size).color(color.to_iced()));
    }
    line.into()
}

/// Estimated pixel width of a rendered text run.
///
/// There is no layout pass to ask at update time, so a deterministic
/// char-count heuristic stands in for the font metrics.
fn estimate_text_width(text: &str, font_size: f32) -> u32 {
    (text.chars().count() as f32 * font_size * 0.6).ceil() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn config() -> MediaConfig {
        MediaConfig::default()
    }

    fn track(title: &str) -> TrackInfo {
        TrackInfo {
            title: Some(title.to_string()),
            artist: Some("Artist".to_string()),
            ..TrackInfo::default()
        }
    }

    fn track_with_art(title: &str) -> TrackInfo {
        TrackInfo {
            art: Some(RgbaImage::from_pixel(100, 100, Rgba([40, 40, 40, 255]))),
            ..track(title)
        }
    }

    #[test]
    fn session_absent_resets_the_display() {
        let mut widget = MediaWidget::new(&config());
        let theme = Theme::default();
        widget.on_session(true);
        widget.on_playback(&PlaybackInfo {
            status: PlaybackStatus::Playing,
            controls: ControlFlags::default(),
        });
        widget.on_track(Some(&track_with_art("Song")), &theme, 40);

        widget.on_session(false);
        assert!(widget.thumbnail.is_none());
        assert!(widget.main_text.iter().all(String::is_empty));
        assert!(widget.sub_text.iter().all(String::is_empty));
        assert_eq!(widget.play_icon, widget.cfg.icons.play);
    }

    #[test]
    fn hide_empty_hides_the_widget_without_a_session() {
        let mut cfg = config();
        cfg.hide_empty = true;
        let mut widget = MediaWidget::new(&cfg);
        assert!(!widget.visible);

        widget.on_session(true);
        assert!(widget.visible);

        widget.on_session(false);
        assert!(!widget.visible);
    }

    #[test]
    fn playing_status_shows_the_pause_glyph() {
        let mut widget = MediaWidget::new(&config());
        let playing = PlaybackInfo {
            status: PlaybackStatus::Playing,
            controls: ControlFlags {
                prev_enabled: true,
                toggle_enabled: true,
                next_enabled: false,
            },
        };
        widget.on_playback(&playing);
        assert_eq!(widget.play_icon, widget.cfg.icons.pause);
        assert_eq!(widget.controls, playing.controls);

        widget.on_playback(&PlaybackInfo::default());
        assert_eq!(widget.play_icon, widget.cfg.icons.play);
    }

    #[test]
    fn track_fields_are_truncated_to_the_active_limit() {
        let mut cfg = config();
        cfg.max_field_size.label = 10;
        let mut widget = MediaWidget::new(&cfg);
        widget.on_track(Some(&track("A very long title")), &Theme::default(), 40);
        assert_eq!(widget.main_text, vec!["A very ...".to_string()]);
    }

    #[test]
    fn toggle_re_renders_with_the_alternate_limit() {
        let mut cfg = config();
        cfg.max_field_size.label = 10;
        cfg.max_field_size.label_alt = 30;
        let mut widget = MediaWidget::new(&cfg);
        let theme = Theme::default();
        widget.on_track(Some(&track("A very long title")), &theme, 40);

        widget.toggle(&theme, 40);
        assert_eq!(widget.main_text, vec!["A very long title".to_string()]);

        widget.toggle(&theme, 40);
        assert_eq!(widget.main_text, vec!["A very ...".to_string()]);
    }

    #[test]
    fn thumbnail_is_composited_from_track_art() {
        let mut widget = MediaWidget::new(&config());
        let theme = Theme::default();
        widget.on_track(Some(&track_with_art("Song")), &theme, 20);

        let thumb = widget.thumbnail.as_ref().expect("thumbnail set");
        assert_eq!(thumb.height, 20);
        assert_eq!(thumb.width, widget.text_width(&theme) + widget.cfg.thumbnail_padding);
    }

    #[test]
    fn thumbnails_can_be_disabled() {
        let mut cfg = config();
        cfg.show_thumbnail = false;
        let mut widget = MediaWidget::new(&cfg);
        widget.on_track(Some(&track_with_art("Song")), &Theme::default(), 20);
        assert!(widget.thumbnail.is_none());
    }

    #[test]
    fn controls_only_skips_text_and_thumbnail() {
        let mut cfg = config();
        cfg.controls_only = true;
        let mut widget = MediaWidget::new(&cfg);
        widget.on_track(Some(&track_with_art("Song")), &Theme::default(), 20);
        assert!(widget.main_text.iter().all(String::is_empty));
        assert!(widget.thumbnail.is_none());
    }

    #[test]
    fn cleared_metadata_clears_the_display() {
        let mut widget = MediaWidget::new(&config());
        let theme = Theme::default();
        widget.on_track(Some(&track_with_art("Song")), &theme, 20);
        widget.on_track(None, &theme, 20);
        assert!(widget.main_text.iter().all(String::is_empty));
        assert!(widget.thumbnail.is_none());
    }
}

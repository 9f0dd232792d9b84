use serde::{Deserialize, Serialize};

/// Root configuration structure parsed from `ribbon.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BarConfig {
    /// Global settings for the bar surface.
    pub global: GlobalConfig,
    /// Theme / visual settings.
    pub theme: ThemeConfig,
    /// Keyboard-language widget.
    pub language: LanguageConfig,
    /// Now-playing media widget.
    pub media: MediaConfig,
}

/// Global bar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Bar height in logical pixels.
    pub height: u32,
    /// Whether the bar sits at the top or the bottom.
    pub position: Position,
    /// Reserve an exclusive zone so windows don't overlap the bar.
    pub exclusive_zone: bool,
    /// Overall background opacity (0.0 – 1.0).
    pub opacity: f32,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            height: 40,
            position: Position::Top,
            exclusive_zone: true,
            opacity: 0.95,
        }
    }
}

/// Bar position on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Top,
    Bottom,
}

/// Keyboard-language widget settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    pub enabled: bool,
    /// Primary label template.  `<span>` segments render as icons; plain
    /// fragments accept `{lang}`, `{country}` and `{full_name}` placeholders.
    pub label: String,
    /// Alternate template shown after a click toggle.
    pub label_alt: String,
    /// Keyboard-layout poll interval in seconds.
    pub update_interval: u64,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            label: "<span class='icon'>\u{f030c}</span> {lang}".to_string(),
            label_alt: "{full_name}".to_string(),
            update_interval: 5,
        }
    }
}

/// Now-playing media widget settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub enabled: bool,
    /// Main text template; accepts `{title}`, `{artist}`, `{album}`, `{player}`.
    pub label_main: String,
    /// Sub text template, rendered below the main line.
    pub label_sub: String,
    /// Hide the whole widget while no media session exists.
    pub hide_empty: bool,
    /// Render only the transport buttons, no text or thumbnail.
    pub controls_only: bool,
    /// Put the transport buttons left of the text (rounds the right
    /// thumbnail corners) instead of right of it.
    pub controls_left: bool,
    /// Composite album art behind the text.
    pub show_thumbnail: bool,
    /// Field truncation limits for the primary and alternate label sets.
    pub max_field_size: MaxFieldSize,
    pub thumbnail_alpha_multiplier: f32,
    pub thumbnail_alpha_range: f32,
    pub thumbnail_padding: u32,
    pub thumbnail_corner_radius: u32,
    pub icons: MediaIcons,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            label_main: "{title}".to_string(),
            label_sub: "{artist}".to_string(),
            hide_empty: false,
            controls_only: false,
            controls_left: true,
            show_thumbnail: true,
            max_field_size: MaxFieldSize::default(),
            thumbnail_alpha_multiplier: 0.8,
            thumbnail_alpha_range: 0.3,
            thumbnail_padding: 8,
            thumbnail_corner_radius: 8,
            icons: MediaIcons::default(),
        }
    }
}

/// Maximum field lengths, in characters including the ellipsis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaxFieldSize {
    pub label: usize,
    pub label_alt: usize,
}

impl Default for MaxFieldSize {
    fn default() -> Self {
        Self {
            label: 15,
            label_alt: 30,
        }
    }
}

/// Glyphs for the transport buttons.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaIcons {
    pub prev_track: String,
    pub play: String,
    pub pause: String,
    pub next_track: String,
}

impl Default for MediaIcons {
    fn default() -> Self {
        Self {
            prev_track: "\u{f04ae}".to_string(),
            play: "\u{f040a}".to_string(),
            pause: "\u{f03e4}".to_string(),
            next_track: "\u{f04ad}".to_string(),
        }
    }
}

/// Theme / styling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Bar background color (hex, e.g. `"#1e1e2e"`).
    pub background: String,
    /// Primary text/foreground color.
    pub foreground: String,
    /// Accent / highlight color.
    pub accent: String,
    /// Dimmed color for disabled controls and sub text.
    pub muted: String,
    /// Font family name.
    pub font: String,
    /// Font size in points.
    pub font_size: f32,
    /// Inner padding for each widget (pixels).
    pub padding: u16,
    /// Gap between widgets (pixels).
    pub gap: u16,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#1e1e2e".to_string(), // Catppuccin Mocha — base
            foreground: "#cdd6f4".to_string(), // Catppuccin Mocha — text
            accent:     "#cba6f7".to_string(), // Catppuccin Mocha — mauve
            muted:      "#6c7086".to_string(), // Catppuccin Mocha — overlay0
            font:       "JetBrains Mono".to_string(),
            font_size:  13.0,
            padding:    8,
            gap:        4,
        }
    }
}

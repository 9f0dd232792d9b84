use crate::client::HyprlandIpc;
use ribbon_core::{state::LanguageInfo, Result, RibbonError};
use serde::Deserialize;

/// JSON shape returned by `hyprctl devices -j` (keyboards only).
#[derive(Debug, Clone, Deserialize)]
struct DevicesReply {
    #[serde(default)]
    keyboards: Vec<KeyboardDevice>,
}

#[derive(Debug, Clone, Deserialize)]
struct KeyboardDevice {
    #[serde(default)]
    main: bool,
    active_keymap: String,
}

/// Query the compositor for the active keyboard language.
///
/// Uses the main keyboard's active keymap; falls back to the first keyboard
/// when none is flagged as main.  Errors when Hyprland reports no keyboards
/// at all — callers treat any failure as "no language available".
pub async fn fetch_keyboard_language(ipc: &HyprlandIpc) -> Result<LanguageInfo> {
    let raw = ipc.command("j/devices").await?;
    let reply: DevicesReply = serde_json::from_str(&raw)
        .map_err(|e| RibbonError::Ipc(format!("parse devices: {e}")))?;

    let keyboard = reply
        .keyboards
        .iter()
        .find(|k| k.main)
        .or_else(|| reply.keyboards.first())
        .ok_or_else(|| RibbonError::Ipc("no keyboards reported".into()))?;

    Ok(keymap_to_language(&keyboard.active_keymap))
}

/// ISO codes for the keymap names Hyprland commonly reports.
const KEYMAP_TABLE: &[(&str, &str, &str)] = &[
    ("English (US)",        "en", "US"),
    ("English (UK)",        "en", "GB"),
    ("English (intl.)",     "en", "US"),
    ("German",              "de", "DE"),
    ("German (Austria)",    "de", "AT"),
    ("German (Switzerland)","de", "CH"),
    ("French",              "fr", "FR"),
    ("French (Canada)",     "fr", "CA"),
    ("Spanish",             "es", "ES"),
    ("Spanish (Latin American)", "es", "MX"),
    ("Portuguese",          "pt", "PT"),
    ("Portuguese (Brazil)", "pt", "BR"),
    ("Italian",             "it", "IT"),
    ("Dutch",               "nl", "NL"),
    ("Polish",              "pl", "PL"),
    ("Russian",             "ru", "RU"),
    ("Ukrainian",           "uk", "UA"),
    ("Czech",               "cs", "CZ"),
    ("Swedish",             "sv", "SE"),
    ("Norwegian",           "nb", "NO"),
    ("Danish",              "da", "DK"),
    ("Finnish",             "fi", "FI"),
    ("Turkish",             "tr", "TR"),
    ("Greek",               "el", "GR"),
    ("Japanese",            "ja", "JP"),
    ("Korean",              "ko", "KR"),
];

/// Map a keymap name to a [`LanguageInfo`].
///
/// Unknown keymaps fall back to a derived guess: the first two letters of
/// the name as the language code, and the parenthesised region (when it is
/// a short code like `US`) as the country code.
pub fn keymap_to_language(keymap: &str) -> LanguageInfo {
    if let Some((_, lang, country)) = KEYMAP_TABLE.iter().find(|(name, _, _)| *name == keymap) {
        return LanguageInfo {
            language_code: (*lang).to_string(),
            country_code: (*country).to_string(),
            full_name: keymap.to_string(),
        };
    }

    let base = keymap.split(" (").next().unwrap_or(keymap);
    let language_code: String = base.chars().take(2).flat_map(char::to_lowercase).collect();

    let country_code = keymap
        .split_once('(')
        .and_then(|(_, rest)| rest.split_once(')'))
        .map(|(region, _)| region.trim())
        .filter(|r| r.len() <= 3 && r.chars().all(|c| c.is_ascii_alphabetic()))
        .map(|r| r.to_uppercase())
        .unwrap_or_default();

    LanguageInfo {
        language_code,
        country_code,
        full_name: keymap.to_string(),
    }
}

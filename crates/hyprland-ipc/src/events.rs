/// Events emitted by the Hyprland IPC event socket (`socket2.sock`) that the
/// bar cares about.
#[derive(Debug, Clone)]
pub enum HyprlandEvent {
    /// Active keyboard layout changed.  Carries the layout name string.
    ActiveLayout(String),
    /// An event we don't handle — carries the raw line for debugging.
    Unknown(String),
}

/// Parse a raw IPC event line into a typed [`HyprlandEvent`].
///
/// Hyprland events have the format `event_name>>event_data`.
pub fn parse_event(line: &str) -> HyprlandEvent {
    let Some((event, data)) = line.split_once(">>") else {
        return HyprlandEvent::Unknown(line.to_string());
    };

    match event {
        "activelayout" => {
            // Format: "keyboard-name,layout-name"
            let layout = data
                .split_once(',')
                .map(|(_, l)| l.trim().to_string())
                .unwrap_or_else(|| data.trim().to_string());
            HyprlandEvent::ActiveLayout(layout)
        }
        _ => HyprlandEvent::Unknown(line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_active_layout_event() {
        let event = parse_event("activelayout>>at-translated-set-2-keyboard,German");
        if let HyprlandEvent::ActiveLayout(layout) = event {
            assert_eq!(layout, "German");
        } else {
            panic!("wrong variant");
        }
    }

    #[test]
    fn parse_active_layout_without_keyboard_name() {
        let event = parse_event("activelayout>>English (US)");
        assert!(matches!(event, HyprlandEvent::ActiveLayout(l) if l == "English (US)"));
    }

    #[test]
    fn parse_unknown_event() {
        let event = parse_event("workspacev2>>3,coding");
        assert!(matches!(event, HyprlandEvent::Unknown(_)));
    }

    #[test]
    fn parse_garbage_line() {
        assert!(matches!(parse_event("no separator"), HyprlandEvent::Unknown(_)));
    }
}

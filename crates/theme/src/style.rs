use crate::{colors::Color, Theme};

/// Display role of one parsed label segment.
///
/// An explicit enum consumed here, in the styling layer — widgets never
/// carry style-class strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    /// Glyph span from the template markup.
    Icon,
    /// Plain text run.
    Label,
}

/// Enablement state of a transport-control button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Enabled,
    Disabled,
}

impl From<bool> for ControlState {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

impl Theme {
    /// Foreground color for a label segment of the given role.
    pub fn segment_color(&self, role: SegmentRole) -> Color {
        match role {
            SegmentRole::Icon => self.accent,
            SegmentRole::Label => self.foreground,
        }
    }

    /// Foreground color for a transport-control button.
    pub fn control_color(&self, state: ControlState) -> Color {
        match state {
            ControlState::Enabled => self.foreground,
            ControlState::Disabled => self.muted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_controls_are_muted() {
        let theme = Theme::default();
        assert_eq!(theme.control_color(ControlState::Disabled), theme.muted);
        assert_eq!(theme.control_color(false.into()), theme.muted);
        assert_eq!(theme.control_color(true.into()), theme.foreground);
    }
}

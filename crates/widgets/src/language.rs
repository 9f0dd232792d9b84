use crate::template::{self, Segment};
use iced::{
    widget::{mouse_area, row, text},
    Alignment, Element,
};
use ribbon_config::LanguageConfig;
use ribbon_core::{event::Message, state::LanguageInfo};
use ribbon_theme::Theme;
use std::collections::HashMap;

/// Displays the active keyboard language.
///
/// Two label templates are parsed once at construction; a click toggles
/// between them.  The poll adapter pushes query results in via
/// [`LanguageWidget::set_language`]; a failed query shows the template
/// text unsubstituted.
#[derive(Debug)]
pub struct LanguageWidget {
    primary: Vec<Segment>,
    alternate: Vec<Segment>,
    show_alt: bool,
    language: Option<LanguageInfo>,
}

impl LanguageWidget {
    pub fn new(cfg: &LanguageConfig) -> Self {
        Self {
            primary: template::parse(&cfg.label),
            alternate: template::parse(&cfg.label_alt),
            show_alt: false,
            language: None,
        }
    }

    /// Store the latest keyboard-language query result (`None` = failed).
    pub fn set_language(&mut self, language: Option<LanguageInfo>) {
        self.language = language;
    }

    /// Switch between the primary and alternate label set.
    pub fn toggle(&mut self) {
        self.show_alt = !self.show_alt;
    }

    /// Active segment set with its rendered text, index-aligned.
    pub fn rendered(&self) -> Vec<(&Segment, String)> {
        let segments = if self.show_alt {
            &self.alternate
        } else {
            &self.primary
        };
        segments.iter().zip(template::render(segments, &self.vars())).collect()
    }

    pub fn view<'a>(&'a self, theme: &'a Theme) -> Element<'a, Message> {
        let mut content = row![].spacing(theme.gap as f32).align_y(Alignment::Center);
        for (segment, rendered) in self.rendered() {
            content = content.push(
                text(rendered)
                    .size(theme.font_size)
                    .color(theme.segment_color(segment.role).to_iced()),
            );
        }

        mouse_area(content)
            .on_press(Message::LanguageLabelToggled)
            .into()
    }

    fn vars(&self) -> HashMap<&'static str, String> {
        let mut vars = HashMap::new();
        if let Some(lang) = &self.language {
            vars.insert("lang", lang.language_code.clone());
            vars.insert("country", lang.country_code.clone());
            vars.insert("full_name", lang.full_name.clone());
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LanguageConfig {
        LanguageConfig {
            label: "<span class='icon'>K</span> {lang}".to_string(),
            label_alt: "{full_name}".to_string(),
            ..LanguageConfig::default()
        }
    }

    fn english() -> LanguageInfo {
        LanguageInfo {
            language_code: "en".to_string(),
            country_code: "US".to_string(),
            full_name: "English (US)".to_string(),
        }
    }

    #[test]
    fn renders_language_into_label_segments() {
        let mut widget = LanguageWidget::new(&config());
        widget.set_language(Some(english()));

        let rendered = widget.rendered();
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].1, "K");
        assert_eq!(rendered[1].1, "en");
    }

    #[test]
    fn failed_query_shows_unsubstituted_text() {
        let widget = LanguageWidget::new(&config());
        let rendered = widget.rendered();
        assert_eq!(rendered[1].1, "{lang}");
    }

    #[test]
    fn toggle_switches_to_the_alternate_set() {
        let mut widget = LanguageWidget::new(&config());
        widget.set_language(Some(english()));
        widget.toggle();

        let rendered = widget.rendered();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].1, "English (US)");

        widget.toggle();
        assert_eq!(widget.rendered().len(), 2);
    }

    #[test]
    fn segment_count_is_fixed_across_updates() {
        let mut widget = LanguageWidget::new(&config());
        let before = widget.rendered().len();
        widget.set_language(Some(english()));
        widget.set_language(None);
        assert_eq!(widget.rendered().len(), before);
    }
}

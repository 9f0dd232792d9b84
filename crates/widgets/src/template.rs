//! Label templates parsed into independently updatable segments.
//!
//! A template mixes plain text runs with inline `<span>` icon markup:
//!
//! ```text
//! <span class='icon'>󰌌</span> {lang}
//! ```
//!
//! Parsing happens once, at widget construction; the segment count is fixed
//! for the widget's lifetime and updates only re-render text into the
//! existing segments, by position.

use ribbon_theme::SegmentRole;
use std::collections::HashMap;

/// One independently updatable unit of a parsed label template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub role: SegmentRole,
    /// Style class from the span markup (`"icon"` when untagged) or
    /// `"label"` for plain text runs.
    pub class: String,
    /// Template body; labels may contain `{name}` placeholders.
    pub body: String,
}

/// Split a template into icon and label segments.
///
/// Fragments that are empty after trimming are discarded.  Malformed span
/// markup (an unterminated tag) is kept verbatim as plain text.
pub fn parse(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = template;

    loop {
        let Some(start) = rest.find("<span") else { break };
        let Some(tag_end) = rest[start..].find('>') else { break };
        let tag_end = start + tag_end;
        let Some(span_end) = rest[tag_end..].find("</span>") else { break };
        let span_end = tag_end + span_end;

        push_label(&mut segments, &rest[..start]);

        let attrs = &rest[start + 5..tag_end];
        let body = rest[tag_end + 1..span_end].trim();
        if !body.is_empty() {
            segments.push(Segment {
                role: SegmentRole::Icon,
                class: span_class(attrs).unwrap_or_else(|| "icon".to_string()),
                body: body.to_string(),
            });
        }

        rest = &rest[span_end + "</span>".len()..];
    }

    push_label(&mut segments, rest);
    segments
}

/// Render every segment of `segments` against `vars`.
///
/// Icon segments pass through untouched; label segments get `{name}`
/// placeholders substituted.  The output is index-aligned with the input —
/// the caller writes each string into the display element at that position.
pub fn render(segments: &[Segment], vars: &HashMap<&str, String>) -> Vec<String> {
    segments
        .iter()
        .map(|seg| match seg.role {
            SegmentRole::Icon => seg.body.clone(),
            SegmentRole::Label => substitute(&seg.body, vars),
        })
        .collect()
}

/// Replace `{name}` placeholders from `vars`, leaving unknown ones verbatim.
pub fn substitute(text: &str, vars: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('}') else {
            rest = &rest[open..];
            break;
        };
        let close = open + close;
        match vars.get(&rest[open + 1..close]) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[open..=close]),
        }
        rest = &rest[close + 1..];
    }

    out.push_str(rest);
    out
}

/// Truncate `text` to at most `max` characters, ellipsis included.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

fn push_label(segments: &mut Vec<Segment>, fragment: &str) {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return;
    }
    segments.push(Segment {
        role: SegmentRole::Label,
        class: "label".to_string(),
        body: fragment.to_string(),
    });
}

/// Extract the quoted `class=` attribute value from a span tag, if any.
fn span_class(attrs: &str) -> Option<String> {
    let idx = attrs.find("class=")?;
    let rest = &attrs[idx + "class=".len()..];
    let quote = rest.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let rest = &rest[1..];
    let end = rest.find(quote)?;
    let class = rest[..end].trim();
    (!class.is_empty()).then(|| class.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn parse_icon_and_label_segments() {
        let segments = parse("<span class='icon'>A</span> B {lang}");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].role, SegmentRole::Icon);
        assert_eq!(segments[0].body, "A");
        assert_eq!(segments[1].role, SegmentRole::Label);
        assert_eq!(segments[1].body, "B {lang}");
    }

    #[test]
    fn render_substitutes_labels_and_leaves_icons_untouched() {
        let segments = parse("<span class='icon'>A</span> B {lang}");
        let texts = render(&segments, &vars(&[("lang", "en")]));
        assert_eq!(texts, vec!["A".to_string(), "B en".to_string()]);
    }

    #[test]
    fn untagged_span_defaults_to_icon_class() {
        let segments = parse("<span>X</span>");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].class, "icon");
        assert_eq!(segments[0].role, SegmentRole::Icon);
    }

    #[test]
    fn tagged_span_keeps_its_class() {
        let segments = parse("<span class=\"flag\">X</span>");
        assert_eq!(segments[0].class, "flag");
    }

    #[test]
    fn empty_fragments_are_discarded() {
        let segments = parse("  <span>X</span>   ");
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn plain_template_is_a_single_label() {
        let segments = parse("{full_name}");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].role, SegmentRole::Label);
    }

    #[test]
    fn malformed_span_is_kept_as_text() {
        let segments = parse("<span>X no closing tag");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].role, SegmentRole::Label);
        assert_eq!(segments[0].body, "<span>X no closing tag");
    }

    #[test]
    fn unknown_placeholders_stay_verbatim() {
        assert_eq!(substitute("a {missing} b", &vars(&[])), "a {missing} b");
    }

    #[test]
    fn unterminated_placeholder_stays_verbatim() {
        assert_eq!(substitute("a {open", &vars(&[])), "a {open");
    }

    #[test]
    fn truncate_counts_the_ellipsis() {
        assert_eq!(truncate("A very long title", 10), "A very ...");
        assert_eq!(truncate("A very long title", 10).chars().count(), 10);
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly-10", 10), "exactly-10");
    }

    #[test]
    fn truncate_is_char_based() {
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }
}

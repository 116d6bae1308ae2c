//! Two-section extraction from free text.
//!
//! # Invariants
//! - Missing, repeated or out-of-order markers produce `Extraction::Miss`.
//! - Extracted sections never contain marker text.
//! - Extraction never panics and never returns an error.

use crate::model::content::DayContent;

/// "Today's progress" section marker.
pub const MARK_TODAY: &str = "（一）今日进展";
/// "Tomorrow's plan" section marker.
pub const MARK_TOMORROW: &str = "（二）明日计划";
/// "This week's progress" section marker used by weekly prompts.
pub const MARK_THIS_WEEK: &str = "（一）本周进展";
/// "Next week's plan" section marker used by weekly prompts.
pub const MARK_NEXT_WEEK: &str = "（二）下周计划";

/// Ordered pair of section markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMarkers {
    pub first: &'static str,
    pub second: &'static str,
}

/// Markers of the daily report format.
pub const DAILY_MARKERS: SectionMarkers = SectionMarkers {
    first: MARK_TODAY,
    second: MARK_TOMORROW,
};

/// Markers of the weekly report format.
pub const WEEKLY_MARKERS: SectionMarkers = SectionMarkers {
    first: MARK_THIS_WEEK,
    second: MARK_NEXT_WEEK,
};

/// Outcome of one extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Both markers found in order; sections are trimmed.
    Matched(DayContent),
    /// Markers absent or malformed; no structured content.
    Miss,
}

impl Extraction {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// Collapses the outcome into a pair; `Miss` becomes `("", "")`.
    pub fn into_content(self) -> DayContent {
        match self {
            Self::Matched(content) => content,
            Self::Miss => DayContent::default(),
        }
    }
}

/// Extracts the daily `today` / `tomorrow` sections from `text`.
pub fn extract(text: &str) -> Extraction {
    extract_with(text, DAILY_MARKERS)
}

/// Extracts two sections delimited by `markers`.
pub fn extract_with(text: &str, markers: SectionMarkers) -> Extraction {
    let (Some(first_at), Some(second_at)) = (text.find(markers.first), text.find(markers.second))
    else {
        return Extraction::Miss;
    };

    let first_end = first_at + markers.first.len();
    if first_end > second_at {
        return Extraction::Miss;
    }
    if occurs_again(text, markers.first, first_end)
        || occurs_again(text, markers.second, second_at + markers.second.len())
    {
        return Extraction::Miss;
    }

    let first = &text[first_end..second_at];
    let second = &text[second_at + markers.second.len()..];
    Extraction::Matched(DayContent::new(first.trim(), second.trim()))
}

fn occurs_again(text: &str, marker: &str, from: usize) -> bool {
    text[from..].contains(marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_text_splits_into_trimmed_sections() {
        let text = format!("好的，如下：\n{MARK_TODAY}\n1. 完成接口联调。\n{MARK_TOMORROW}\n1. 编写测试。\n");
        assert_eq!(
            extract(&text),
            Extraction::Matched(DayContent::new("1. 完成接口联调。", "1. 编写测试。"))
        );
    }

    #[test]
    fn text_without_markers_is_a_miss() {
        for text in ["", "no valid format here", MARK_TODAY, MARK_TOMORROW] {
            let extraction = extract(text);
            assert_eq!(extraction, Extraction::Miss, "text: {text:?}");
            assert_eq!(extraction.into_content(), DayContent::default());
        }
    }

    #[test]
    fn out_of_order_markers_are_a_miss() {
        let text = format!("{MARK_TOMORROW} b {MARK_TODAY} a");
        assert_eq!(extract(&text), Extraction::Miss);
    }

    #[test]
    fn repeated_tomorrow_marker_is_a_miss() {
        let text = format!("{MARK_TODAY} a {MARK_TOMORROW} b {MARK_TOMORROW} c");
        assert_eq!(extract(&text), Extraction::Miss);
        assert_eq!(extract(&text).into_content(), DayContent::default());
    }

    #[test]
    fn repeated_today_marker_is_a_miss() {
        for text in [
            format!("{MARK_TODAY} a {MARK_TODAY} b {MARK_TOMORROW} c"),
            format!("{MARK_TODAY} a {MARK_TOMORROW} b {MARK_TODAY} c"),
        ] {
            assert_eq!(extract(&text), Extraction::Miss, "text: {text:?}");
        }
    }

    #[test]
    fn adjacent_markers_give_empty_today_but_still_match() {
        let text = format!("{MARK_TODAY}{MARK_TOMORROW} plan");
        assert_eq!(
            extract(&text),
            Extraction::Matched(DayContent::new("", "plan"))
        );
    }

    #[test]
    fn weekly_markers_use_the_same_rules() {
        let text = format!("{MARK_THIS_WEEK}\n1. x\n{MARK_NEXT_WEEK}\n1. y");
        assert_eq!(
            extract_with(&text, WEEKLY_MARKERS).into_content(),
            DayContent::new("1. x", "1. y")
        );
        assert_eq!(extract(&text), Extraction::Miss);
    }
}

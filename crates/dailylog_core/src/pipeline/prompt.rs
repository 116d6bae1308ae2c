//! Shared prompt-formatting helpers.
//!
//! Every prompt embeds the section markers it expects back, so the reply can
//! be parsed by `sections::extract_with` using the same constants.

use crate::model::content::DayContent;
use crate::pipeline::sections::{SectionMarkers, DAILY_MARKERS};

/// Stand-in for an empty field inside prompts.
pub const EMPTY_PLACEHOLDER: &str = "（无内容）";

const LABEL_TODAY: &str = "今日进展";
const LABEL_TOMORROW: &str = "明日计划";

/// Returns `value` trimmed, or the placeholder when it is blank.
pub fn or_placeholder(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        EMPTY_PLACEHOLDER
    } else {
        trimmed
    }
}

/// Renders the expected reply skeleton, e.g. `“（一）今日进展\n1. xxx。\n（二）明日计划\n1. xxx。”`.
pub fn output_template(markers: SectionMarkers) -> String {
    format!(
        "“{}\n1. xxx。\n{}\n1. xxx。”",
        markers.first, markers.second
    )
}

/// Renders the formatting rules appended to every prompt.
pub fn format_rules(markers: SectionMarkers) -> String {
    format!(
        "输出要求：\n\
         1. 必须且只能包含“{first}”和“{second}”两个小标题，顺序不可调换，小标题原样输出。\n\
         2. 每个小标题下的内容逐条列出，使用阿拉伯数字编号（1. 2. 3.）。\n\
         3. 不要输出任何额外的说明、解释、寒暄或总结，不要使用 Markdown 等标记符号。",
        first = markers.first,
        second = markers.second
    )
}

/// Renders one labelled day block with placeholders for empty fields.
pub fn day_block(label: &str, content: &DayContent) -> String {
    format!(
        "{label}：\n{LABEL_TODAY}：{}\n{LABEL_TOMORROW}：{}\n",
        or_placeholder(&content.today),
        or_placeholder(&content.tomorrow)
    )
}

/// Builds the prompt that polishes one day's raw input.
///
/// Empty input is sent as-is; the placeholder is kept out so it cannot be
/// echoed back as content.
pub fn optimization_prompt(original_today: &str, original_tomorrow: &str) -> String {
    format!(
        "请优化以下内容并输出成如下格式：\n{}\n\n{}\n\n{LABEL_TODAY}：{}\n{LABEL_TOMORROW}：{}",
        output_template(DAILY_MARKERS),
        format_rules(DAILY_MARKERS),
        original_today.trim(),
        original_tomorrow.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::sections::{MARK_TODAY, MARK_TOMORROW, WEEKLY_MARKERS};

    #[test]
    fn placeholder_replaces_blank_values_only() {
        assert_eq!(or_placeholder("  "), EMPTY_PLACEHOLDER);
        assert_eq!(or_placeholder(" done "), "done");
    }

    #[test]
    fn optimization_prompt_embeds_markers_and_inputs() {
        let prompt = optimization_prompt("修复登录问题", "");
        assert!(prompt.contains(MARK_TODAY));
        assert!(prompt.contains(MARK_TOMORROW));
        assert!(prompt.contains("今日进展：修复登录问题"));
        assert!(prompt.ends_with("明日计划："));
        assert!(!prompt.contains(EMPTY_PLACEHOLDER));
    }

    #[test]
    fn rules_name_the_requested_markers() {
        let rules = format_rules(WEEKLY_MARKERS);
        assert!(rules.contains(WEEKLY_MARKERS.first));
        assert!(rules.contains(WEEKLY_MARKERS.second));
        assert!(!rules.contains(MARK_TODAY));
    }

    #[test]
    fn day_block_lists_both_fields_under_label() {
        let block = day_block("第1天", &DayContent::new("a", ""));
        assert_eq!(
            block,
            format!("第1天：\n今日进展：a\n明日计划：{EMPTY_PLACEHOLDER}\n")
        );
    }
}

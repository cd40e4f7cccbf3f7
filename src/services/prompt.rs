/// Builds the natural-language instruction sent to the grounded AI model
///
/// A non-empty custom prompt (user-entered free-text "vibe") wins verbatim.
/// Otherwise the template asks for 8-10 specific nearby places fitting the
/// mood, each with a brief rationale, an estimated rating, and open/closed
/// status, plus mood-specific guidance. Pure string construction, no I/O.
pub fn build_prompt(mood: &str, custom_prompt: Option<&str>) -> String {
    if let Some(custom) = custom_prompt {
        if !custom.trim().is_empty() {
            return custom.to_string();
        }
    }

    format!(
        r#"I am in a "{mood}" mood.
Find 8-10 specific places near me that fit this mood perfectly.
For each place, provide a very brief reason why it fits the mood, its estimated rating (e.g. 4.5), and if it's open.

Requirements:
- Prioritize high-rated places.
- If the mood is "Budget", prioritize low cost ($ or $$).
- If the mood is "Date", prioritize ambiance.
- If the mood is "Work", prioritize wifi/quiet."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_embeds_mood() {
        let prompt = build_prompt("Date Night", None);
        assert!(prompt.contains(r#""Date Night" mood"#));
        assert!(prompt.contains("8-10 specific places"));
        assert!(prompt.contains("estimated rating"));
    }

    #[test]
    fn test_template_carries_mood_guidance() {
        let prompt = build_prompt("Work Mode", None);
        assert!(prompt.contains("low cost ($ or $$)"));
        assert!(prompt.contains("ambiance"));
        assert!(prompt.contains("wifi/quiet"));
    }

    #[test]
    fn test_custom_prompt_wins_verbatim() {
        let prompt = build_prompt("Budget", Some("find me rooftop bars with a view"));
        assert_eq!(prompt, "find me rooftop bars with a view");
    }

    #[test]
    fn test_blank_custom_prompt_falls_back_to_template() {
        let prompt = build_prompt("Budget", Some("   "));
        assert!(prompt.contains(r#""Budget" mood"#));
    }
}

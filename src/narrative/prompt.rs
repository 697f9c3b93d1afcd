//! Prompt template rendered once per ranked row.

use crate::data::StatRow;

const DEFAULT_TEMPLATE: &str = "Write a detailed cricket analysis about Nathan Lyon vs {batter}.
Focus on:
1. Key matches where Lyon dominated
2. Technical weaknesses exploited
3. Career impact
Statistics: {dismissals} dismissals, average {average} between {span}.
Write in ESPN-style sports journalism.";

/// Opaque prompt text with `{batter}`, `{dismissals}`, `{average}` and `{span}` slots.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Substitute every placeholder occurrence with the row's values.
    pub fn render(&self, row: &StatRow) -> String {
        self.text
            .replace("{batter}", &row.subject)
            .replace("{dismissals}", &row.dismissal_count.to_string())
            .replace("{average}", &format_decimal(row.average))
            .replace("{span}", &row.span)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

/// Render a decimal so whole numbers keep one fractional digit (`20.0`).
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smith() -> StatRow {
        StatRow {
            subject: "SPD Smith".into(),
            dismissal_count: 6,
            average: 42.5,
            span: "2013-2023".into(),
        }
    }

    #[test]
    fn default_template_mentions_all_stats() {
        let prompt = PromptTemplate::default().render(&smith());
        assert!(prompt.contains("Nathan Lyon vs SPD Smith."));
        assert!(prompt.contains("Statistics: 6 dismissals, average 42.5 between 2013-2023."));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn repeated_placeholders_are_all_replaced() {
        let prompt = PromptTemplate::new("{batter}/{batter}: {average}").render(&StatRow {
            average: 20.0,
            ..smith()
        });
        assert_eq!(prompt, "SPD Smith/SPD Smith: 20.0");
    }

    #[test]
    fn decimals_keep_their_digits() {
        assert_eq!(format_decimal(20.0), "20.0");
        assert_eq!(format_decimal(31.25), "31.25");
    }
}

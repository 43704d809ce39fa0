//! Keyword-driven policy summarization.
//!
//! Scans policy text line by line and keeps the lines whose lowercase
//! form contains a keyword from the requested focus area. No language
//! model is involved; the output is fully determined by the input text
//! and the keyword tables below.

use tracing::debug;

const TIMEFRAME_KEYWORDS: [&str; 6] = ["days", "day", "within", "deadline", "period", "window"];
const REQUIREMENT_KEYWORDS: [&str; 5] = ["must", "required", "need", "necessary", "should"];
const PROCESS_KEYWORDS: [&str; 5] = ["step", "process", "procedure", "how to", "contact"];
const CONDITION_KEYWORDS: [&str; 5] = ["if", "unless", "provided", "condition", "eligible"];

/// Lines shorter than this are treated as noise and never summarized.
const MIN_LINE_CHARS: usize = 20;

/// At most this many key points are returned.
const MAX_POINTS: usize = 10;

/// When no line matches the focus keywords, fall back to the first few
/// substantial lines instead.
const FALLBACK_POINTS: usize = 5;
const FALLBACK_MIN_CHARS: usize = 30;

/// The aspect of a policy a summary should concentrate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusArea {
    /// Match any keyword from any table, including condition words.
    #[default]
    General,
    Timeframes,
    Requirements,
    Process,
}

impl FocusArea {
    /// Parse a focus string case-insensitively. Anything other than the
    /// three named areas, including unrecognized values, selects
    /// [`FocusArea::General`].
    pub fn parse(focus: &str) -> Self {
        match focus.to_lowercase().as_str() {
            "timeframes" => Self::Timeframes,
            "requirements" => Self::Requirements,
            "process" => Self::Process,
            _ => Self::General,
        }
    }

    /// Whether an already-lowercased line belongs to this focus area.
    fn matches_line(self, line: &str) -> bool {
        match self {
            Self::Timeframes => contains_any(line, &TIMEFRAME_KEYWORDS),
            Self::Requirements => contains_any(line, &REQUIREMENT_KEYWORDS),
            Self::Process => contains_any(line, &PROCESS_KEYWORDS),
            Self::General => {
                contains_any(line, &TIMEFRAME_KEYWORDS)
                    || contains_any(line, &REQUIREMENT_KEYWORDS)
                    || contains_any(line, &PROCESS_KEYWORDS)
                    || contains_any(line, &CONDITION_KEYWORDS)
            }
        }
    }
}

fn contains_any(line: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| line.contains(keyword))
}

/// Extract the key points of a policy text for one focus area.
///
/// Lines are trimmed and matched case-insensitively against the focus
/// keyword table, bulleted, given terminal punctuation if missing, and
/// capped at ten in document order. If nothing matches, the first five
/// substantial lines are returned verbatim as bullets so the caller
/// never receives an empty summary of a non-empty document.
pub fn summarize(text: &str, focus: FocusArea) -> Vec<String> {
    debug!(?focus, "summarizing policy text");

    let mut points = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.chars().count() < MIN_LINE_CHARS {
            continue;
        }
        if !focus.matches_line(&line.to_lowercase()) {
            continue;
        }
        let mut point = line.to_string();
        if !point.ends_with(['.', '!', '?']) {
            point.push('.');
        }
        points.push(format!("• {point}"));
        if points.len() == MAX_POINTS {
            break;
        }
    }

    if points.is_empty() {
        return text
            .lines()
            .map(str::trim)
            .filter(|line| line.chars().count() > FALLBACK_MIN_CHARS)
            .take(FALLBACK_POINTS)
            .map(|line| format!("• {line}"))
            .collect();
    }
    points
}

/// Summarize and render as a ready-to-display block.
///
/// The header echoes the focus string exactly as given; matching still
/// goes through [`FocusArea::parse`].
pub fn render(text: &str, focus: &str) -> String {
    let points = summarize(text, FocusArea::parse(focus));
    format!("KEY POINTS (Focus: {focus}):\n{}", points.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: &str = "\
        Returns are accepted within 30 days of purchase for most items.\n\
        Receipts must be presented for all refund requests at the counter.\n\
        Step one: contact our support team to open a return case.\n\
        Refunds are only issued if the item is unused and sealed.\n\
        Shipping fees are non-refundable in every circumstance!\n\
        Thanks.\n";

    #[test]
    fn timeframes_focus_keeps_only_timeframe_lines() {
        let points = summarize(POLICY, FocusArea::Timeframes);
        assert_eq!(
            points,
            vec!["• Returns are accepted within 30 days of purchase for most items."]
        );
    }

    #[test]
    fn requirements_focus_keeps_only_requirement_lines() {
        let points = summarize(POLICY, FocusArea::Requirements);
        assert_eq!(
            points,
            vec!["• Receipts must be presented for all refund requests at the counter."]
        );
    }

    #[test]
    fn process_focus_keeps_only_process_lines() {
        let points = summarize(POLICY, FocusArea::Process);
        assert_eq!(points, vec!["• Step one: contact our support team to open a return case."]);
    }

    #[test]
    fn general_focus_also_matches_condition_words() {
        let points = summarize(POLICY, FocusArea::General);
        assert_eq!(
            points,
            vec![
                "• Returns are accepted within 30 days of purchase for most items.",
                "• Receipts must be presented for all refund requests at the counter.",
                "• Step one: contact our support team to open a return case.",
                "• Refunds are only issued if the item is unused and sealed.",
            ]
        );
    }

    #[test]
    fn missing_terminal_punctuation_gets_a_period() {
        let points = summarize("Exchanges are honored within 14 days", FocusArea::Timeframes);
        assert_eq!(points, vec!["• Exchanges are honored within 14 days."]);
    }

    #[test]
    fn existing_terminal_punctuation_is_kept() {
        let points =
            summarize("Act before the deadline passes, okay?", FocusArea::Timeframes);
        assert_eq!(points, vec!["• Act before the deadline passes, okay?"]);
    }

    #[test]
    fn output_is_capped_at_ten_points() {
        let text = (1..=12)
            .map(|i| format!("Rule {i}: items ship back within 30 days of delivery"))
            .collect::<Vec<_>>()
            .join("\n");
        let points = summarize(&text, FocusArea::Timeframes);
        assert_eq!(points.len(), 10);
        assert_eq!(points[0], "• Rule 1: items ship back within 30 days of delivery.");
        assert_eq!(points[9], "• Rule 10: items ship back within 30 days of delivery.");
    }

    #[test]
    fn no_matches_falls_back_to_first_substantial_lines() {
        let text = "\
            The original downtown location opened back in nineteen sixty\n\
            Every shelf gets restocked each morning by the opening crew\n\
            A short remark sits here\n\
            Customers often praise the bakery corner and its fresh loaves\n\
            Seasonal decorations go up early and come down rather late\n\
            Our loyalty club mails a paper newsletter four times a year\n\
            Parking behind the building stays free for anyone who visits\n";
        let points = summarize(text, FocusArea::Timeframes);
        assert_eq!(points.len(), FALLBACK_POINTS);
        // Fallback lines are taken verbatim, without added punctuation.
        assert_eq!(points[0], "• The original downtown location opened back in nineteen sixty");
        assert_eq!(points[4], "• Our loyalty club mails a paper newsletter four times a year");
        assert!(!points.iter().any(|p| p.contains("A short remark")));
        assert!(!points.iter().any(|p| p.contains("Parking")));
    }

    #[test]
    fn short_lines_are_ignored() {
        let points = summarize("within days\nok.", FocusArea::Timeframes);
        assert!(points.is_empty());
    }

    #[test]
    fn unrecognized_focus_parses_as_general() {
        assert_eq!(FocusArea::parse("conditions"), FocusArea::General);
        assert_eq!(FocusArea::parse("everything"), FocusArea::General);
        assert_eq!(FocusArea::parse(""), FocusArea::General);
        assert_eq!(FocusArea::parse("TIMEFRAMES"), FocusArea::Timeframes);
        assert_eq!(FocusArea::parse("Process"), FocusArea::Process);
    }

    #[test]
    fn render_echoes_the_raw_focus_string() {
        let block = render(POLICY, "Requirements");
        assert!(block.starts_with("KEY POINTS (Focus: Requirements):\n• Receipts must"));

        let block = render(POLICY, "something else");
        assert!(block.starts_with("KEY POINTS (Focus: something else):\n"));
    }

    #[test]
    fn render_of_empty_text_is_just_the_header() {
        assert_eq!(render("", "general"), "KEY POINTS (Focus: general):\n");
    }
}

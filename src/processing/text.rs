use std::num::IntErrorKind;

use crate::domain::item::ObservedItem;
use crate::domain::profile::{ReferenceProfile, ReferenceValue};
use crate::processing::sequence;

/// Characters used as thousands separators in displayed counts.
const THOUSANDS_SEPARATORS: [char; 5] = [',', ' ', '\u{a0}', '\u{202f}', '\''];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Observed count is not an unsigned integer.
    MalformedCount,
    /// Reference count is zero, negative or not finite.
    InvalidReference,
}

/// Per-field outcome of the text comparison.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldScore {
    Scored(f64),
    Skipped(SkipReason),
}

/// Aggregate text similarity together with the per-field breakdown.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextScore {
    pub score: f64,
    pub fields: Vec<(String, FieldScore)>,
}

impl TextScore {
    /// Number of fields that contributed weight.
    pub fn weight(&self) -> usize {
        self.fields
            .iter()
            .filter(|(_, field)| matches!(field, FieldScore::Scored(_)))
            .count()
    }

    pub fn field(&self, name: &str) -> Option<FieldScore> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, score)| *score)
    }
}

/// Scores every field tracked by the profile and present in `observed`.
///
/// The aggregate is the mean over scored fields, 0 when nothing was scored.
pub fn score_text(observed: &ObservedItem, reference: &ReferenceProfile) -> TextScore {
    let mut fields = Vec::new();
    let mut total = 0.0;
    let mut weight = 0usize;

    for (name, expected) in reference.fields() {
        let Some(value) = observed.get(name) else {
            continue;
        };
        let field = score_field(value, expected);
        if let FieldScore::Scored(score) = field {
            total += score;
            weight += 1;
        }
        fields.push((name.to_string(), field));
    }

    let score = if weight == 0 {
        0.0
    } else {
        total / weight as f64
    };

    TextScore { score, fields }
}

pub fn score_field(observed: &str, expected: &ReferenceValue) -> FieldScore {
    match expected {
        ReferenceValue::Texts(examples) => FieldScore::Scored(
            examples
                .iter()
                .map(|example| sequence::ratio(observed, example))
                .fold(0.0, f64::max),
        ),
        ReferenceValue::Count(reference) => {
            if !reference.is_finite() || *reference <= 0.0 {
                return FieldScore::Skipped(SkipReason::InvalidReference);
            }
            match parse_count(observed) {
                Some(count) => FieldScore::Scored((count as f64 / reference).min(1.0)),
                None => FieldScore::Skipped(SkipReason::MalformedCount),
            }
        }
    }
}

/// Parses a displayed count such as `"12,345"` into an integer.
///
/// Digit strings too large for `u64` saturate instead of failing.
pub fn parse_count(raw: &str) -> Option<u64> {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|ch| !THOUSANDS_SEPARATORS.contains(ch))
        .collect();
    match digits.parse::<u64>() {
        Ok(count) => Some(count),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u64::MAX),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(entries: Vec<(&str, ReferenceValue)>) -> ReferenceProfile {
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }

    fn texts(values: &[&str]) -> ReferenceValue {
        ReferenceValue::Texts(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn exact_match_on_every_field_scores_one() {
        let reference = profile(vec![
            ("title", texts(&["cute cat"])),
            ("description", texts(&["猫咪日常"])),
            ("likes", ReferenceValue::Count(100.0)),
            ("comments", ReferenceValue::Count(7.0)),
        ]);
        let observed = ObservedItem::new()
            .with("title", "cute cat")
            .with("description", "猫咪日常")
            .with("likes", "100")
            .with("comments", "7");

        let result = score_text(&observed, &reference);

        assert_eq!(result.score, 1.0);
        assert_eq!(result.weight(), 4);
    }

    #[test]
    fn closest_reference_example_wins() {
        let reference = profile(vec![("title", texts(&["dog video", "cute cat"]))]);
        let observed = ObservedItem::new().with("title", "cute cat");

        assert_eq!(
            score_text(&observed, &reference).field("title"),
            Some(FieldScore::Scored(1.0))
        );
    }

    #[test]
    fn counts_are_capped_ratios() {
        let reference = ReferenceValue::Count(1000.0);

        assert_eq!(score_field("1,500", &reference), FieldScore::Scored(1.0));
        assert_eq!(score_field("1000", &reference), FieldScore::Scored(1.0));
        assert_eq!(score_field("0", &reference), FieldScore::Scored(0.0));
        assert_eq!(score_field("250", &reference), FieldScore::Scored(0.25));
    }

    #[test]
    fn malformed_count_is_skipped_without_weight() {
        let reference = profile(vec![
            ("title", texts(&["cute cat"])),
            ("likes", ReferenceValue::Count(100.0)),
        ]);
        let observed = ObservedItem::new()
            .with("title", "cute cat")
            .with("likes", "1.2万");

        let result = score_text(&observed, &reference);

        assert_eq!(
            result.field("likes"),
            Some(FieldScore::Skipped(SkipReason::MalformedCount))
        );
        assert_eq!(result.weight(), 1);
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn zero_reference_count_is_skipped() {
        assert_eq!(
            score_field("10", &ReferenceValue::Count(0.0)),
            FieldScore::Skipped(SkipReason::InvalidReference)
        );
    }

    #[test]
    fn untracked_fields_are_ignored() {
        let reference = profile(vec![("likes", ReferenceValue::Count(10.0))]);
        let observed = ObservedItem::new()
            .with("likes", "5")
            .with("title", "anything at all");

        let result = score_text(&observed, &reference);

        assert_eq!(result.score, 0.5);
        assert_eq!(result.fields.len(), 1);
    }

    #[test]
    fn empty_profile_scores_zero() {
        let observed = ObservedItem::new()
            .with("title", "cute cat")
            .with("likes", "150");

        let result = score_text(&observed, &ReferenceProfile::default());

        assert_eq!(result.score, 0.0);
        assert!(result.fields.is_empty());
    }

    #[test]
    fn empty_example_list_counts_as_zero() {
        let reference = profile(vec![("title", texts(&[]))]);
        let observed = ObservedItem::new().with("title", "cute cat");

        let result = score_text(&observed, &reference);

        assert_eq!(result.weight(), 1);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn counts_beyond_u64_still_score_one() {
        let reference = ReferenceValue::Count(1000.0);

        assert_eq!(parse_count("99999999999999999999999"), Some(u64::MAX));
        assert_eq!(
            score_field("99,999,999,999,999,999,999,999", &reference),
            FieldScore::Scored(1.0)
        );
        assert_eq!(parse_count("99999999999999999999999x"), None);
    }

    #[test]
    fn parses_counts_with_separators() {
        assert_eq!(parse_count("12,345"), Some(12345));
        assert_eq!(parse_count(" 1 204 "), Some(1204));
        assert_eq!(parse_count("-3"), None);
        assert_eq!(parse_count("abc"), None);
        assert_eq!(parse_count(""), None);
    }
}

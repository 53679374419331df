//! Pair scoring: one pure function from a (lost, found) pair to a point total
//! and a human-readable reason.
//!
//! Four independent signals contribute additive, individually capped points.
//! The total is the plain sum and is **not** clamped to 100: a maximal pair
//! scores 40 + 30 + 30 + 10 = 110, and clamping would silently change
//! behavior at the match threshold.

use std::collections::BTreeSet;

use crate::reports::{FoundReport, LostReport};

/// Points for an exact category tag match.
pub const CATEGORY_POINTS: u32 = 40;
/// Points for substring-contained item names.
pub const NAME_POINTS: u32 = 30;
/// Points per shared description keyword.
pub const KEYWORD_POINTS: u32 = 5;
/// Cap on the keyword-overlap contribution.
pub const KEYWORD_POINTS_CAP: u32 = 30;
/// Points when the report dates fall within [`DATE_WINDOW_DAYS`].
pub const DATE_POINTS: u32 = 10;
/// Maximum whole-day gap for the date-proximity signal.
pub const DATE_WINDOW_DAYS: i64 = 7;

/// Shared description words shorter than this do not count as keywords.
const MIN_KEYWORD_CHARS: usize = 4;

/// Similarity verdict for one (lost, found) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairScore {
    /// Sum of the triggered signal contributions.
    pub points: u32,
    /// Comma-joined fragments for each triggered signal, in signal order.
    /// Empty when nothing fired.
    pub reason: String,
}

/// Score one lost report against one found report.
///
/// Deterministic and side-effect free; the engine calls this once per pair in
/// the cross product of the pending sets.
pub fn score(lost: &LostReport, found: &FoundReport) -> PairScore {
    let mut points = 0;
    let mut reasons: Vec<String> = Vec::new();

    // Signal 1: category tags, compared exactly as stored.
    if lost.category == found.category {
        points += CATEGORY_POINTS;
        reasons.push(format!("Same category ({})", lost.category));
    }

    // Signal 2: case-insensitive substring containment in either direction.
    // A strict containment test, not edit distance or token overlap.
    let lost_name = lost.item_name.to_lowercase();
    let found_name = found.item_name.to_lowercase();
    if lost_name.contains(&found_name) || found_name.contains(&lost_name) {
        points += NAME_POINTS;
        reasons.push("Similar item name".to_string());
    }

    // Signal 3: description keyword overlap, 5 points per shared word of at
    // least 4 characters, capped at 30.
    let shared = shared_keywords(&lost.description, &found.description);
    if shared > 0 {
        points += KEYWORD_POINTS_CAP.min(shared as u32 * KEYWORD_POINTS);
        reasons.push(format!("{shared} matching keywords in description"));
    }

    // Signal 4: report dates within a week of each other.
    let gap = (lost.date_lost - found.date_found).num_days().abs();
    if gap <= DATE_WINDOW_DAYS {
        points += DATE_POINTS;
        reasons.push("Dates are close".to_string());
    }

    PairScore {
        points,
        reason: reasons.join(", "),
    }
}

/// Count words of at least [`MIN_KEYWORD_CHARS`] characters that appear in
/// both descriptions, lowercased and split on whitespace.
fn shared_keywords(lost_description: &str, found_description: &str) -> usize {
    let lost_words: BTreeSet<String> = lost_description
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let found_words: BTreeSet<String> = found_description
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    lost_words
        .intersection(&found_words)
        .filter(|word| word.chars().count() >= MIN_KEYWORD_CHARS)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::ReportStatus;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn lost(name: &str, category: &str, description: &str, date: NaiveDate) -> LostReport {
        LostReport {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            item_name: name.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            location_lost: "Library".to_string(),
            date_lost: date,
            image_url: None,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
        }
    }

    fn found(name: &str, category: &str, description: &str, date: NaiveDate) -> FoundReport {
        FoundReport {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            item_name: name.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            location_found: "Cafeteria".to_string(),
            date_found: date,
            image_url: None,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn disjoint_pair_scores_zero_with_empty_reason() {
        let l = lost("Umbrella", "Accessories", "plain red", day(1));
        let f = found("Calculator", "Electronics", "casio solar", day(20));
        let verdict = score(&l, &f);
        assert_eq!(verdict.points, 0);
        assert_eq!(verdict.reason, "");
    }

    #[test]
    fn category_match_contributes_forty() {
        let l = lost("Umbrella", "Accessories", "plain red", day(1));
        let f = found("Calculator", "Accessories", "casio solar", day(20));
        let verdict = score(&l, &f);
        assert_eq!(verdict.points, CATEGORY_POINTS);
        assert_eq!(verdict.reason, "Same category (Accessories)");
    }

    #[test]
    fn category_comparison_is_case_sensitive() {
        let l = lost("Umbrella", "accessories", "plain red", day(1));
        let f = found("Calculator", "Accessories", "casio solar", day(20));
        assert_eq!(score(&l, &f).points, 0);
    }

    #[test]
    fn name_containment_works_in_both_directions() {
        let l = lost("iPhone 13", "A", "x", day(1));
        let f = found("IPHONE", "B", "y", day(20));
        assert_eq!(score(&l, &f).points, NAME_POINTS);

        let l = lost("Wallet", "A", "x", day(1));
        let f = found("brown leather wallet", "B", "y", day(20));
        assert_eq!(score(&l, &f).points, NAME_POINTS);
    }

    #[test]
    fn name_similarity_is_substring_only() {
        // One transposed letter defeats the containment test.
        let l = lost("Wallte", "A", "x", day(1));
        let f = found("Wallet", "B", "y", day(20));
        assert_eq!(score(&l, &f).points, 0);
    }

    #[test]
    fn keyword_overlap_counts_distinct_long_words() {
        // Shared: "black", "cracked", "screen" (3); "the"/"a" are too short,
        // repeated words count once.
        let l = lost(
            "x",
            "A",
            "black black cracked screen near the gym",
            day(1),
        );
        let f = found("y", "B", "a black cracked screen", day(20));
        let verdict = score(&l, &f);
        assert_eq!(verdict.points, 15);
        assert_eq!(verdict.reason, "3 matching keywords in description");
    }

    #[test]
    fn keyword_contribution_caps_at_thirty() {
        let words = "alpha bravo charlie delta echo foxtrot golf hotel";
        let l = lost("x", "A", words, day(1));
        let f = found("y", "B", words, day(20));
        let verdict = score(&l, &f);
        assert_eq!(verdict.points, KEYWORD_POINTS_CAP);
        assert_eq!(verdict.reason, "8 matching keywords in description");
    }

    #[test]
    fn date_window_is_inclusive_at_seven_days() {
        let l = lost("x", "A", "p", day(1));
        assert_eq!(score(&l, &found("y", "B", "q", day(8))).points, DATE_POINTS);
        assert_eq!(score(&l, &found("y", "B", "q", day(9))).points, 0);
        // Direction does not matter.
        let l = lost("x", "A", "p", day(10));
        assert_eq!(score(&l, &found("y", "B", "q", day(3))).points, DATE_POINTS);
    }

    #[test]
    fn maximal_pair_exceeds_one_hundred_uncapped() {
        let words = "alpha bravo charlie delta echo foxtrot";
        let l = lost("iPhone 13", "Electronics", words, day(1));
        let f = found("iPhone", "Electronics", words, day(3));
        let verdict = score(&l, &f);
        assert_eq!(verdict.points, 110);
        assert_eq!(
            verdict.reason,
            "Same category (Electronics), Similar item name, \
             6 matching keywords in description, Dates are close"
        );
    }

    #[test]
    fn scoring_is_deterministic() {
        let l = lost("iPhone 13", "Electronics", "black iphone cracked", day(1));
        let f = found("iPhone", "Electronics", "black phone cracked", day(3));
        let first = score(&l, &f);
        let second = score(&l, &f);
        assert_eq!(first, second);
    }

    #[test]
    fn each_signal_adds_its_fixed_contribution() {
        // Start from a zero-scoring pair and flip one signal at a time.
        let base_l = lost("Umbrella", "Accessories", "plain red", day(1));
        let base_f = found("Calculator", "Electronics", "casio solar", day(20));
        let base = score(&base_l, &base_f).points;
        assert_eq!(base, 0);

        let mut f = base_f.clone();
        f.category = base_l.category.clone();
        assert_eq!(score(&base_l, &f).points, base + CATEGORY_POINTS);

        let mut f = base_f.clone();
        f.item_name = "red Umbrella".to_string();
        assert_eq!(score(&base_l, &f).points, base + NAME_POINTS);

        let mut f = base_f.clone();
        f.description = "plain canvas".to_string();
        assert_eq!(score(&base_l, &f).points, base + KEYWORD_POINTS);

        let mut f = base_f.clone();
        f.date_found = day(5);
        assert_eq!(score(&base_l, &f).points, base + DATE_POINTS);
    }

    #[test]
    fn scenario_a_iphone_pair_scores_high() {
        let l = lost(
            "iPhone 13",
            "Electronics",
            "black iphone with cracked screen",
            day(10),
        );
        let f = found(
            "iPhone",
            "Electronics",
            "found a black phone cracked screen near library",
            day(12),
        );
        let verdict = score(&l, &f);
        // 40 category + 30 name + 15 keywords (black, cracked, screen) + 10 dates.
        assert!(verdict.points >= 70);
        assert_eq!(verdict.points, 95);
        assert!(verdict.reason.starts_with("Same category (Electronics)"));
        assert!(verdict.reason.contains("Similar item name"));
    }

    #[test]
    fn scenario_b_differing_categories_score_zero() {
        let l = lost("iPhone 13", "Electronics", "slim case", day(1));
        let f = found("Charging brick", "Accessories", "white cube", day(20));
        assert_eq!(score(&l, &f).points, 0);
    }
}

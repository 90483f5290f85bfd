//! Partial-ratio similarity scoring.
//!
//! The score compares the shorter string against every window of the longer one
//! that lines up with a matching block, and keeps the best window. Windows are
//! scored as `2 * matched / total_len` using the same longest-block decomposition
//! as Python's `difflib.SequenceMatcher`, including its "popular character" rule
//! for sequences of 200 or more characters, so scores agree with the classic
//! `partial_ratio` for long names too.

/// Scores at or below this value do not count as a fuzzy match.
pub const FUZZY_THRESHOLD: u8 = 75;

/// Sequences at least this long ignore their most frequent characters when
/// looking for matching blocks.
const POPULAR_MIN_LEN: usize = 200;

use std::collections::HashMap;

/// A run of `len` equal characters starting at `a[a_start]` and `b[b_start]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct MatchingBlock {
    a_start: usize,
    b_start: usize,
    len: usize,
}

/// Returns the partial-ratio similarity between `left` and `right`, in `0..=100`.
///
/// Either string being empty scores 0.
pub fn partial_ratio(left: &str, right: &str) -> u8 {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();

    if left.is_empty() || right.is_empty() {
        return 0;
    }

    let (shorter, longer) = if left.len() <= right.len() {
        (left.as_slice(), right.as_slice())
    } else {
        (right.as_slice(), left.as_slice())
    };

    let mut best = 0.0_f64;
    for block in matching_blocks(shorter, longer) {
        let long_start = block.b_start.saturating_sub(block.a_start);
        let long_end = (long_start + shorter.len()).min(longer.len());
        let window = &longer[long_start..long_end];

        let score = ratio(shorter, window);
        if score > 0.995 {
            return 100;
        }
        best = best.max(score);
    }

    (100.0 * best).round_ties_even() as u8
}

/// Returns true when `partial_ratio` clears [`FUZZY_THRESHOLD`].
pub fn is_fuzzy_match(query: &str, candidate: &str) -> bool {
    partial_ratio(query, candidate) > FUZZY_THRESHOLD
}

fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched: usize = matching_blocks(a, b).iter().map(|block| block.len).sum();
    2.0 * matched as f64 / total as f64
}

/// Longest-block-first decomposition of `a` against `b`, sorted by position,
/// with adjacent blocks merged and a zero-length sentinel at `(a.len(), b.len())`.
fn matching_blocks(a: &[char], b: &[char]) -> Vec<MatchingBlock> {
    let popular = popular_positions(b);
    let mut found = Vec::new();
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let block = longest_match(a, b, &popular, (a_lo, a_hi), (b_lo, b_hi));
        if block.len == 0 {
            continue;
        }
        if a_lo < block.a_start && b_lo < block.b_start {
            pending.push((a_lo, block.a_start, b_lo, block.b_start));
        }
        if block.a_start + block.len < a_hi && block.b_start + block.len < b_hi {
            pending.push((
                block.a_start + block.len,
                a_hi,
                block.b_start + block.len,
                b_hi,
            ));
        }
        found.push(block);
    }
    found.sort();

    let mut merged: Vec<MatchingBlock> = Vec::with_capacity(found.len() + 1);
    for block in found {
        match merged.last_mut() {
            Some(last)
                if last.a_start + last.len == block.a_start
                    && last.b_start + last.len == block.b_start =>
            {
                last.len += block.len;
            }
            _ => merged.push(block),
        }
    }
    merged.push(MatchingBlock {
        a_start: a.len(),
        b_start: b.len(),
        len: 0,
    });
    merged
}

/// Marks the positions of `b` holding a character that occurs in more than
/// 1% of a long `b`. Shorter sequences have no popular characters.
fn popular_positions(b: &[char]) -> Vec<bool> {
    if b.len() < POPULAR_MIN_LEN {
        return vec![false; b.len()];
    }
    let limit = b.len() / 100 + 1;
    let mut counts: HashMap<char, usize> = HashMap::new();
    for &c in b {
        *counts.entry(c).or_default() += 1;
    }
    b.iter().map(|c| counts[c] > limit).collect()
}

/// Longest common run inside `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
///
/// Runs may not start or continue on a popular position of `b`; the winner is
/// then stretched over equal neighbours on both sides, popular or not. Ties go
/// to the run that ends earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    popular: &[bool],
    (a_lo, a_hi): (usize, usize),
    (b_lo, b_hi): (usize, usize),
) -> MatchingBlock {
    let mut best = MatchingBlock {
        a_start: a_lo,
        b_start: b_lo,
        len: 0,
    };
    // run_len[j - b_lo] = length of the run ending at (i - 1, j)
    let mut previous = vec![0usize; b_hi - b_lo];
    let mut current = vec![0usize; b_hi - b_lo];

    for i in a_lo..a_hi {
        for j in b_lo..b_hi {
            let slot = j - b_lo;
            if a[i] != b[j] || popular[j] {
                current[slot] = 0;
                continue;
            }
            let run = if slot == 0 { 1 } else { previous[slot - 1] + 1 };
            current[slot] = run;
            if run > best.len {
                best = MatchingBlock {
                    a_start: i + 1 - run,
                    b_start: j + 1 - run,
                    len: run,
                };
            }
        }
        std::mem::swap(&mut previous, &mut current);
    }

    while best.a_start > a_lo && best.b_start > b_lo && a[best.a_start - 1] == b[best.b_start - 1] {
        best.a_start -= 1;
        best.b_start -= 1;
        best.len += 1;
    }
    while best.a_start + best.len < a_hi
        && best.b_start + best.len < b_hi
        && a[best.a_start + best.len] == b[best.b_start + best.len]
    {
        best.len += 1;
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_100() {
        assert_eq!(partial_ratio("report", "report"), 100);
        assert!(is_fuzzy_match("report", "report"));
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        assert_eq!(partial_ratio("abc", "xyz.txt"), 0);
        assert!(!is_fuzzy_match("abc", "xyz.txt"));
    }

    #[test]
    fn test_empty_input_scores_zero() {
        assert_eq!(partial_ratio("", "anything"), 0);
        assert_eq!(partial_ratio("anything", ""), 0);
    }

    #[test]
    fn test_substring_scores_100() {
        assert_eq!(partial_ratio("budget", "2024_budget_final.xlsx"), 100);
    }

    #[test]
    fn test_argument_order_does_not_matter() {
        assert_eq!(
            partial_ratio("invoice", "invoce_march.pdf"),
            partial_ratio("invoce_march.pdf", "invoice")
        );
    }

    #[test]
    fn test_score_of_exactly_75_is_not_a_match() {
        // 3 of 4 characters line up: 2 * 3 / 8
        assert_eq!(partial_ratio("abcd", "abcx"), 75);
        assert!(!is_fuzzy_match("abcd", "abcx"));
    }

    #[test]
    fn test_score_of_76_is_a_match() {
        // 19 of 25 characters line up: 2 * 19 / 50
        let query = "abcdefghijklmnopqrstuvwxy";
        let candidate = "abcdefghijklmnopqrs123456";
        assert_eq!(partial_ratio(query, candidate), 76);
        assert!(is_fuzzy_match(query, candidate));
    }

    #[test]
    fn test_typo_in_short_query_still_matches() {
        // "reprot" against the "report" window: "rep" + "o"/"t" blocks
        assert!(partial_ratio("reprot", "quarterly_report.docx") > 60);
    }

    #[test]
    fn test_long_names_ignore_popular_characters() {
        // Every character of a 240-char name is popular, so only the block
        // grown from the first position and the final sentinel are scored.
        let long_name = "photo_".repeat(40);
        assert_eq!(partial_ratio("to_ph", &long_name), 60);
        assert_eq!(partial_ratio("hoto_p", &long_name), 83);
        assert_eq!(partial_ratio("photo", &long_name), 100);

        assert_eq!(partial_ratio("to_ph", &"photo_".repeat(2)), 100);
    }

    #[test]
    fn test_matching_blocks_end_with_sentinel() {
        let a: Vec<char> = "abxcd".chars().collect();
        let b: Vec<char> = "abcd".chars().collect();
        let blocks = matching_blocks(&a, &b);
        assert_eq!(
            blocks,
            vec![
                MatchingBlock { a_start: 0, b_start: 0, len: 2 },
                MatchingBlock { a_start: 3, b_start: 2, len: 2 },
                MatchingBlock { a_start: 5, b_start: 4, len: 0 },
            ]
        );
    }
}

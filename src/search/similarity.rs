//! String similarity measures on a 0-100 scale
//!
//! - `ratio`: indel similarity, `2 * LCS / (len1 + len2)`
//! - `partial_ratio`: best `ratio` of the shorter string against every
//!   equal-length window of the longer one
//! - `token_sort_ratio`: `ratio` after normalising, tokenizing and sorting
//!   words, so word order does not matter
//!
//! Scores are rounded to whole numbers so ties are exact.

use unicode_normalization::UnicodeNormalization;

/// Similarity score between 0 and 100
pub type Similarity = u8;

/// Indel similarity of two strings
pub fn ratio(a: &str, b: &str) -> Similarity {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

fn ratio_chars(a: &[char], b: &[char]) -> Similarity {
    let total = a.len() + b.len();
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let lcs = lcs_length(a, b);
    to_percent((2 * lcs) as f64 / total as f64)
}

/// Best-aligned-substring similarity
pub fn partial_ratio(a: &str, b: &str) -> Similarity {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    if shorter.len() == longer.len() {
        return ratio_chars(shorter, longer);
    }

    let mut best = 0;
    for window in longer.windows(shorter.len()) {
        best = best.max(ratio_chars(shorter, window));
        if best == 100 {
            break;
        }
    }
    best
}

/// Word-order-insensitive similarity
pub fn token_sort_ratio(a: &str, b: &str) -> Similarity {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Canonical form used before fuzzy comparison: NFC, lower case,
/// non-alphanumeric characters folded to spaces, whitespace trimmed
pub fn full_process(text: &str) -> String {
    let folded: String = text
        .nfc()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    folded.trim().to_string()
}

fn sorted_tokens(text: &str) -> String {
    let processed = full_process(text);
    let mut tokens: Vec<&str> = processed.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn lcs_length(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn to_percent(fraction: f64) -> Similarity {
    (fraction * 100.0).round().clamp(0.0, 100.0) as Similarity
}

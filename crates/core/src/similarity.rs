//! Textual similarity between a transcript and its target phrase.
//!
//! The score is a normalized inverse Levenshtein distance. It compares what
//! the recognizer wrote down, not the audio itself.

/// Similarity of `user_text` to `target_text` in `[0, 1]`.
///
/// Both inputs are trimmed and lowercased first. Identical strings score 1.0,
/// two empty strings score 1.0, and one empty against one non-empty scores 0.0.
/// The measure is symmetric.
#[must_use]
pub fn score(user_text: &str, target_text: &str) -> f64 {
    let a = normalize(user_text);
    let b = normalize(target_text);

    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }

    let distance = levenshtein_chars(&a, &b);
    #[allow(clippy::cast_precision_loss)]
    let ratio = (longest - distance) as f64 / longest as f64;
    ratio.clamp(0.0, 1.0)
}

/// Levenshtein edit distance counted in Unicode scalar values.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    levenshtein_chars(&a, &b)
}

fn normalize(text: &str) -> Vec<char> {
    text.trim().to_lowercase().chars().collect()
}

fn levenshtein_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rolling rows of the edit matrix, indexed by position in `b`.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0_usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

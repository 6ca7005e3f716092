use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::Tag;

/// Lowercase and keep `[a-z0-9]` only. Comparison functions below assume
/// their inputs have already been normalized this way.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .collect()
}

pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = levenshtein(a, b);
    (max_len - distance) as f64 / max_len as f64
}

pub fn is_duplicate(a: &str, b: &str, threshold: f64) -> bool {
    similarity(a, b) >= threshold
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateMatch {
    pub tag_id: String,
    pub name: String,
    pub score: f64,
}

/// Scan candidate tags for near-duplicates of `name`. Both sides are
/// normalized before comparison; results are sorted by score descending.
pub fn find_duplicates(name: &str, candidates: &[Tag], threshold: f64) -> Vec<DuplicateMatch> {
    let normalized = normalize(name);
    let mut matches = Vec::new();

    for candidate in candidates {
        let score = similarity(&normalized, &normalize(&candidate.name));
        if score >= threshold {
            matches.push(DuplicateMatch {
                tag_id: candidate.id.clone(),
                name: candidate.name.clone(),
                score,
            });
        }
    }

    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    tracing::debug!(
        name,
        candidates = candidates.len(),
        matches = matches.len(),
        "duplicate scan finished"
    );
    matches
}

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::similarity;
use crate::{check_unit_range, clamp01, Tag};

pub const CATEGORY_BASE_CONFIDENCE: f64 = 0.6;
pub const CO_OCCURRENCE_BASE_CONFIDENCE: f64 = 0.7;
pub const PERSONAL_HISTORY_BASE_CONFIDENCE: f64 = 0.5;
pub const RANK_DECAY: f64 = 0.9;
pub const MIN_CONFIDENCE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    ContentMatch,
    CategoryMatch,
    Trending,
    CoOccurrence,
    PersonalHistory,
}

impl SuggestionSource {
    pub fn label(self) -> &'static str {
        match self {
            SuggestionSource::ContentMatch => "content_match",
            SuggestionSource::CategoryMatch => "category_match",
            SuggestionSource::Trending => "trending",
            SuggestionSource::CoOccurrence => "co_occurrence",
            SuggestionSource::PersonalHistory => "personal_history",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionCandidate {
    pub tag: Tag,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionBatch {
    pub source: SuggestionSource,
    pub entries: Vec<SuggestionCandidate>,
}

impl SuggestionBatch {
    pub fn new(source: SuggestionSource, entries: Vec<SuggestionCandidate>) -> Self {
        Self { source, entries }
    }

    /// Confidence for a content match is the string similarity between the
    /// query and the candidate name, both normalized.
    pub fn from_content_match(query: &str, candidates: Vec<Tag>) -> Self {
        let normalized_query = similarity::normalize(query);
        let entries = candidates
            .into_iter()
            .map(|tag| {
                let confidence =
                    similarity::similarity(&normalized_query, &similarity::normalize(&tag.name));
                SuggestionCandidate { tag, confidence }
            })
            .collect();
        Self::new(SuggestionSource::ContentMatch, entries)
    }

    /// Trending candidates carry their last computed trend score, scaled
    /// back into [0,1].
    pub fn from_trending(candidates: Vec<Tag>) -> Self {
        let entries = candidates
            .into_iter()
            .map(|tag| {
                let confidence = clamp01(tag.trend_score / 100.0);
                SuggestionCandidate { tag, confidence }
            })
            .collect();
        Self::new(SuggestionSource::Trending, entries)
    }

    /// Rank-ordered sources get a base confidence that decays down the
    /// caller-supplied list, so their head entries stay competitive with
    /// similarity-scored entries without dominating them.
    pub fn from_category_match(candidates: Vec<Tag>) -> Self {
        Self::ranked(SuggestionSource::CategoryMatch, CATEGORY_BASE_CONFIDENCE, candidates)
    }

    pub fn from_co_occurrence(candidates: Vec<Tag>) -> Self {
        Self::ranked(
            SuggestionSource::CoOccurrence,
            CO_OCCURRENCE_BASE_CONFIDENCE,
            candidates,
        )
    }

    pub fn from_personal_history(candidates: Vec<Tag>) -> Self {
        Self::ranked(
            SuggestionSource::PersonalHistory,
            PERSONAL_HISTORY_BASE_CONFIDENCE,
            candidates,
        )
    }

    fn ranked(source: SuggestionSource, base: f64, candidates: Vec<Tag>) -> Self {
        let entries = candidates
            .into_iter()
            .enumerate()
            .map(|(rank, tag)| SuggestionCandidate {
                tag,
                confidence: ranked_confidence(base, rank),
            })
            .collect();
        Self::new(source, entries)
    }
}

pub fn ranked_confidence(base: f64, rank: usize) -> f64 {
    let decayed = base * RANK_DECAY.powi(rank as i32);
    decayed.max(MIN_CONFIDENCE)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub tag: Tag,
    pub source: SuggestionSource,
    pub confidence: f64,
    pub corroborated_by: Vec<SuggestionSource>,
}

struct ProposedTag {
    tag: Tag,
    proposals: Vec<(SuggestionSource, f64)>,
}

/// Merge candidate batches into one deduplicated, confidence-ranked list.
///
/// A tag proposed by several sources keeps its highest-confidence entry and
/// records the other proposing sources in `corroborated_by`. Ties on
/// confidence break on usage count, then trending, then verified; the sort
/// is stable, so identical inputs always produce identical output.
pub fn aggregate(batches: Vec<SuggestionBatch>, limit: usize) -> Result<Vec<Suggestion>> {
    for batch in &batches {
        for entry in &batch.entries {
            check_unit_range("confidence", entry.confidence)?;
        }
    }

    let total: usize = batches.iter().map(|batch| batch.entries.len()).sum();

    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, ProposedTag> = HashMap::new();

    for batch in batches {
        for entry in batch.entries {
            match grouped.get_mut(&entry.tag.id) {
                Some(proposed) => {
                    proposed.proposals.push((batch.source, entry.confidence));
                }
                None => {
                    order.push(entry.tag.id.clone());
                    grouped.insert(
                        entry.tag.id.clone(),
                        ProposedTag {
                            tag: entry.tag,
                            proposals: vec![(batch.source, entry.confidence)],
                        },
                    );
                }
            }
        }
    }

    let mut merged: Vec<Suggestion> = Vec::with_capacity(order.len());
    for id in order {
        let Some(proposed) = grouped.remove(&id) else {
            continue;
        };

        let mut best = proposed.proposals[0];
        for proposal in &proposed.proposals[1..] {
            if proposal.1 > best.1 {
                best = *proposal;
            }
        }

        let mut corroborated_by = Vec::new();
        for (source, _) in &proposed.proposals {
            if *source != best.0 && !corroborated_by.contains(source) {
                corroborated_by.push(*source);
            }
        }

        merged.push(Suggestion {
            tag: proposed.tag,
            source: best.0,
            confidence: best.1,
            corroborated_by,
        });
    }

    merged.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.tag.usage_count.cmp(&a.tag.usage_count))
            .then_with(|| b.tag.is_trending.cmp(&a.tag.is_trending))
            .then_with(|| b.tag.is_verified.cmp(&a.tag.is_verified))
    });
    merged.truncate(limit);

    tracing::debug!(total, returned = merged.len(), limit, "suggestions aggregated");
    Ok(merged)
}

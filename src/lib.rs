pub mod config;
pub mod error;
pub mod moderation;
pub mod risk;
pub mod scoring;
pub mod similarity;
pub mod suggest;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::moderation::{ModerationDecision, ModerationEngine, ModerationScore};
use crate::risk::{ContentRiskScorer, RiskScore};
use crate::scoring::{growth, TrendObservation, TrendSnapshot, TrendingScorer};
use crate::similarity::DuplicateMatch;
use crate::suggest::{Suggestion, SuggestionBatch};

pub const MIN_TAG_NAME_LEN: usize = 2;
pub const MAX_TAG_NAME_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    Environment,
    Politics,
    SocialJustice,
    Education,
    Health,
    Economy,
    Technology,
    Community,
    Other,
}

impl TagCategory {
    pub fn label(self) -> &'static str {
        match self {
            TagCategory::Environment => "environment",
            TagCategory::Politics => "politics",
            TagCategory::SocialJustice => "social_justice",
            TagCategory::Education => "education",
            TagCategory::Health => "health",
            TagCategory::Economy => "economy",
            TagCategory::Technology => "technology",
            TagCategory::Community => "community",
            TagCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub category: TagCategory,
    pub usage_count: u64,
    pub follower_count: u64,
    pub is_trending: bool,
    pub is_verified: bool,
    pub is_featured: bool,
    pub trend_score: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Tag {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: TagCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            usage_count: 0,
            follower_count: 0,
            is_trending: false,
            is_verified: false,
            is_featured: false,
            trend_score: 0.0,
            created_at: 0,
            updated_at: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageEvent {
    pub tag_id: String,
    pub actor_id: String,
    pub occurred_at: i64,
}

pub fn validate_tag_name(name: &str) -> Result<()> {
    let length = name.chars().count();
    if length < MIN_TAG_NAME_LEN {
        return Err(EngineError::InvalidTagName {
            name: name.to_string(),
            reason: "must be at least 2 characters",
        });
    }
    if length > MAX_TAG_NAME_LEN {
        return Err(EngineError::InvalidTagName {
            name: name.to_string(),
            reason: "must be at most 50 characters",
        });
    }
    let allowed = name
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' || ch == '-');
    if !allowed {
        return Err(EngineError::InvalidTagName {
            name: name.to_string(),
            reason: "may only contain lowercase letters, digits, '_' and '-'",
        });
    }
    Ok(())
}

pub(crate) fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.max(0.0).min(1.0)
}

pub(crate) fn check_unit_range(field: &'static str, value: f64) -> Result<()> {
    if value.is_nan() || !(0.0..=1.0).contains(&value) {
        return Err(EngineError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct TagEngine {
    risk: ContentRiskScorer,
    trending: TrendingScorer,
    moderation: ModerationEngine,
    duplicate_threshold: f64,
}

impl TagEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        Ok(Self {
            risk: ContentRiskScorer::new(config.risk)?,
            trending: TrendingScorer::new(config.trending),
            moderation: ModerationEngine::new(config.moderation),
            duplicate_threshold: config.similarity.duplicate_threshold,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(EngineConfig::default())
    }

    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        similarity::similarity(a, b)
    }

    pub fn find_duplicates(&self, name: &str, candidates: &[Tag]) -> Vec<DuplicateMatch> {
        similarity::find_duplicates(name, candidates, self.duplicate_threshold)
    }

    pub fn content_risk_score(&self, name: &str) -> Result<RiskScore> {
        self.risk.score(name)
    }

    pub fn growth_rate(&self, current: u64, previous: u64) -> f64 {
        growth::growth_rate(current, previous)
    }

    pub fn trending_score(
        &self,
        usage_count: u64,
        growth_rate_pct: f64,
        recency: f64,
        engagement_rate: f64,
    ) -> Result<f64> {
        self.trending
            .score(usage_count, growth_rate_pct, recency, engagement_rate)
    }

    pub fn trend_snapshot(&self, tag: &Tag, observation: &TrendObservation) -> Result<TrendSnapshot> {
        self.trending.snapshot(tag, observation)
    }

    pub fn moderation_decision(
        &self,
        risk_score: f64,
        pending_flags: u32,
    ) -> Result<ModerationDecision> {
        self.moderation.decide(risk_score, pending_flags)
    }

    pub fn moderation_score(
        &self,
        tag_id: &str,
        name: &str,
        pending_flags: u32,
    ) -> Result<ModerationScore> {
        self.moderation
            .evaluate(&self.risk, tag_id, name, pending_flags)
    }

    pub fn aggregate_suggestions(
        &self,
        batches: Vec<SuggestionBatch>,
        limit: usize,
    ) -> Result<Vec<Suggestion>> {
        suggest::aggregate(batches, limit)
    }
}

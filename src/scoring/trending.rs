use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::scoring::growth;
use crate::{check_unit_range, clamp01, Tag};

pub const USAGE_NORMALIZATION_CEILING: f64 = 1000.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingWeights {
    pub usage: f64,
    pub growth: f64,
    pub recency: f64,
    pub engagement: f64,
}

impl Default for TrendingWeights {
    fn default() -> Self {
        Self {
            usage: 0.3,
            growth: 0.3,
            recency: 0.2,
            engagement: 0.2,
        }
    }
}

/// Caller-supplied facts for one tag, read from a single consistent
/// snapshot of the event store. `recency` and `engagement_rate` are
/// already normalized to [0,1] by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendObservation {
    pub usage_24h: u64,
    pub usage_7d: u64,
    pub previous_7d: u64,
    pub recency: f64,
    pub engagement_rate: f64,
    pub current_position: Option<u32>,
    pub peak_position: Option<u32>,
}

impl Default for TrendObservation {
    fn default() -> Self {
        Self {
            usage_24h: 0,
            usage_7d: 0,
            previous_7d: 0,
            recency: 0.0,
            engagement_rate: 0.0,
            current_position: None,
            peak_position: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendSnapshot {
    pub tag_id: String,
    pub trend_score: f64,
    pub growth_rate: f64,
    pub usage_24h: u64,
    pub usage_7d: u64,
    pub current_position: Option<u32>,
    pub peak_position: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct TrendingScorer {
    weights: TrendingWeights,
}

impl TrendingScorer {
    pub fn new(weights: TrendingWeights) -> Self {
        Self { weights }
    }

    /// Composite 0-100 momentum score. Usage is log-compressed against a
    /// 1000-use ceiling; negative growth contributes zero rather than
    /// pulling a popular tag below its usage-driven floor.
    pub fn score(
        &self,
        usage_count: u64,
        growth_rate_pct: f64,
        recency: f64,
        engagement_rate: f64,
    ) -> Result<f64> {
        check_unit_range("recency", recency)?;
        check_unit_range("engagement_rate", engagement_rate)?;

        let norm_usage = clamp01((usage_count as f64 + 1.0).ln() / USAGE_NORMALIZATION_CEILING.ln());
        let norm_growth = clamp01(growth_rate_pct / 100.0);

        let score = self.weights.usage * norm_usage
            + self.weights.growth * norm_growth
            + self.weights.recency * recency
            + self.weights.engagement * engagement_rate;

        Ok((score * 100.0).clamp(0.0, 100.0))
    }

    /// Assemble a full snapshot for one tag from a windowed observation.
    /// Snapshots are rebuilt whole on every call, never patched.
    pub fn snapshot(&self, tag: &Tag, observation: &TrendObservation) -> Result<TrendSnapshot> {
        let growth_rate = growth::growth_rate(observation.usage_7d, observation.previous_7d);
        let trend_score = self.score(
            observation.usage_7d,
            growth_rate,
            observation.recency,
            observation.engagement_rate,
        )?;

        Ok(TrendSnapshot {
            tag_id: tag.id.clone(),
            trend_score,
            growth_rate,
            usage_24h: observation.usage_24h,
            usage_7d: observation.usage_7d,
            current_position: observation.current_position,
            peak_position: observation.peak_position,
        })
    }
}

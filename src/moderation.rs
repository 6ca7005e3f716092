use serde::{Deserialize, Serialize};

use crate::check_unit_range;
use crate::config::ModerationConfig;
use crate::error::Result;
use crate::risk::ContentRiskScorer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
    Flagged,
}

impl ModerationStatus {
    pub fn label(self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
            ModerationStatus::Flagged => "flagged",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ModerationStatus::Approved | ModerationStatus::Rejected)
    }

    /// Pending routes to any outcome; flagged items can be re-reviewed into
    /// a terminal state; terminal states never transition.
    pub fn can_transition_to(self, next: ModerationStatus) -> bool {
        match self {
            ModerationStatus::Pending => matches!(
                next,
                ModerationStatus::Approved | ModerationStatus::Rejected | ModerationStatus::Flagged
            ),
            ModerationStatus::Flagged => {
                matches!(next, ModerationStatus::Approved | ModerationStatus::Rejected)
            }
            ModerationStatus::Approved | ModerationStatus::Rejected => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagReason {
    Spam,
    Inappropriate,
    Misleading,
    Duplicate,
    Other,
}

/// A user-submitted report. The engine only ever counts pending flags;
/// flag content stays with the host. Identifiers come from the storage
/// layer, never minted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flag {
    pub id: String,
    pub tag_id: String,
    pub reporter_id: String,
    pub reason: FlagReason,
    pub detail: String,
    pub status: ModerationStatus,
}

pub fn count_pending(flags: &[Flag]) -> u32 {
    flags
        .iter()
        .filter(|flag| flag.status == ModerationStatus::Pending)
        .count() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModerationDecision {
    pub status: ModerationStatus,
    pub human_review_required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationScore {
    pub tag_id: String,
    pub risk_score: f64,
    pub human_review_required: bool,
    pub contributing_signals: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ModerationEngine {
    config: ModerationConfig,
}

impl ModerationEngine {
    pub fn new(config: ModerationConfig) -> Self {
        Self { config }
    }

    /// Pure routing decision: approve outright, or hold as flagged for
    /// human action. Rejection is always a human call, never automated.
    pub fn decide(&self, risk_score: f64, pending_flags: u32) -> Result<ModerationDecision> {
        check_unit_range("risk_score", risk_score)?;

        let human_review_required = risk_score > self.config.review_risk_threshold
            || pending_flags >= self.config.flag_review_threshold;

        let status = if !human_review_required && pending_flags == 0 {
            ModerationStatus::Approved
        } else {
            ModerationStatus::Flagged
        };

        tracing::debug!(
            risk_score,
            pending_flags,
            status = status.label(),
            "moderation routing decided"
        );
        Ok(ModerationDecision {
            status,
            human_review_required,
        })
    }

    /// Full evaluation for one tag: risk scoring plus routing, with the
    /// fired signals rendered for the caller to persist or display.
    pub fn evaluate(
        &self,
        scorer: &ContentRiskScorer,
        tag_id: &str,
        name: &str,
        pending_flags: u32,
    ) -> Result<ModerationScore> {
        let risk = scorer.score(name)?;
        let decision = self.decide(risk.score, pending_flags)?;

        Ok(ModerationScore {
            tag_id: tag_id.to_string(),
            risk_score: risk.score,
            human_review_required: decision.human_review_required,
            contributing_signals: risk.signals.iter().map(ToString::to_string).collect(),
        })
    }
}

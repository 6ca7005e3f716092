use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::config::RiskConfig;
use crate::error::{EngineError, Result};
use crate::validate_tag_name;

pub const SPAM_KEYWORD_WEIGHT: f64 = 0.3;
pub const INAPPROPRIATE_KEYWORD_WEIGHT: f64 = 0.4;
pub const MISLEADING_PATTERN_WEIGHT: f64 = 0.2;
pub const SPECIAL_CHAR_WEIGHT: f64 = 0.2;
pub const REPETITION_WEIGHT: f64 = 0.3;
pub const SHORT_NAME_WEIGHT: f64 = 0.2;
pub const LONG_NAME_WEIGHT: f64 = 0.1;

pub const SPECIAL_CHAR_RATIO: f64 = 0.3;
pub const SHORT_NAME_LEN: usize = 3;
pub const LONG_NAME_LEN: usize = 30;
pub const REPETITION_RUN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSignal {
    SpamKeyword(String),
    InappropriateKeyword(String),
    MisleadingPattern(String),
    SpecialCharRatio,
    RepeatedCharacters,
    TooShort,
    TooLong,
}

impl fmt::Display for RiskSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskSignal::SpamKeyword(term) => write!(f, "spam_keyword:{}", term),
            RiskSignal::InappropriateKeyword(term) => write!(f, "inappropriate_keyword:{}", term),
            RiskSignal::MisleadingPattern(pattern) => write!(f, "misleading_pattern:{}", pattern),
            RiskSignal::SpecialCharRatio => write!(f, "special_char_ratio"),
            RiskSignal::RepeatedCharacters => write!(f, "repeated_characters"),
            RiskSignal::TooShort => write!(f, "short_name"),
            RiskSignal::TooLong => write!(f, "long_name"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskScore {
    pub score: f64,
    pub signals: Vec<RiskSignal>,
}

#[derive(Debug, Clone)]
pub struct ContentRiskScorer {
    spam_keywords: Vec<String>,
    inappropriate_keywords: Vec<String>,
    misleading_patterns: Vec<Regex>,
}

impl ContentRiskScorer {
    pub fn new(config: RiskConfig) -> Result<Self> {
        let mut misleading_patterns = Vec::with_capacity(config.misleading_patterns.len());
        for pattern in config.misleading_patterns {
            let compiled = Regex::new(&pattern).map_err(|source| EngineError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            misleading_patterns.push(compiled);
        }
        Ok(Self {
            spam_keywords: config.spam_keywords,
            inappropriate_keywords: config.inappropriate_keywords,
            misleading_patterns,
        })
    }

    /// Additive, order-independent heuristic checks. Same name always yields
    /// the same score and the same fired signals.
    pub fn score(&self, name: &str) -> Result<RiskScore> {
        validate_tag_name(name)?;

        let mut score = 0.0;
        let mut signals = Vec::new();

        for keyword in &self.spam_keywords {
            if name.contains(keyword.as_str()) {
                score += SPAM_KEYWORD_WEIGHT;
                signals.push(RiskSignal::SpamKeyword(keyword.clone()));
            }
        }

        for keyword in &self.inappropriate_keywords {
            if name.contains(keyword.as_str()) {
                score += INAPPROPRIATE_KEYWORD_WEIGHT;
                signals.push(RiskSignal::InappropriateKeyword(keyword.clone()));
            }
        }

        for pattern in &self.misleading_patterns {
            if pattern.is_match(name) {
                score += MISLEADING_PATTERN_WEIGHT;
                signals.push(RiskSignal::MisleadingPattern(pattern.as_str().to_string()));
            }
        }

        let length = name.chars().count();
        let special = name.chars().filter(|ch| !ch.is_ascii_alphanumeric()).count();
        if length > 0 && special as f64 / length as f64 > SPECIAL_CHAR_RATIO {
            score += SPECIAL_CHAR_WEIGHT;
            signals.push(RiskSignal::SpecialCharRatio);
        }

        if has_repeated_run(name, REPETITION_RUN) {
            score += REPETITION_WEIGHT;
            signals.push(RiskSignal::RepeatedCharacters);
        }

        if length < SHORT_NAME_LEN {
            score += SHORT_NAME_WEIGHT;
            signals.push(RiskSignal::TooShort);
        }
        if length > LONG_NAME_LEN {
            score += LONG_NAME_WEIGHT;
            signals.push(RiskSignal::TooLong);
        }

        let score = score.min(1.0);
        tracing::debug!(name, score, fired = signals.len(), "content risk scored");
        Ok(RiskScore { score, signals })
    }
}

fn has_repeated_run(name: &str, run: usize) -> bool {
    let mut count = 0;
    let mut prev: Option<char> = None;

    for ch in name.chars() {
        if Some(ch) == prev {
            count += 1;
            if count >= run {
                return true;
            }
        } else {
            prev = Some(ch);
            count = 1;
        }
    }

    false
}

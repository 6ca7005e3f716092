use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::scoring::TrendingWeights;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityConfig {
    pub duplicate_threshold: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            duplicate_threshold: 0.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    pub spam_keywords: Vec<String>,
    pub inappropriate_keywords: Vec<String>,
    pub misleading_patterns: Vec<String>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            spam_keywords: keyword_list(&[
                "free", "win", "click", "buy", "promo", "discount", "giveaway", "cash",
            ]),
            inappropriate_keywords: keyword_list(&["nsfw", "xxx", "porn", "nude", "explicit"]),
            misleading_patterns: keyword_list(&[
                "scam",
                "fraud",
                "fake[_-]?news",
                "hoax",
                "get[_-]?rich",
                "pyramid",
                "ponzi",
            ]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    pub review_risk_threshold: f64,
    pub flag_review_threshold: u32,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            review_risk_threshold: 0.5,
            flag_review_threshold: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub similarity: SimilarityConfig,
    pub risk: RiskConfig,
    pub moderation: ModerationConfig,
    pub trending: TrendingWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similarity: SimilarityConfig::default(),
            risk: RiskConfig::default(),
            moderation: ModerationConfig::default(),
            trending: TrendingWeights::default(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                EngineConfig::default()
            }
        } else {
            EngineConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload).map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(threshold) = env::var("TAG_ENGINE_DUPLICATE_THRESHOLD") {
            if let Ok(value) = threshold.parse::<f64>() {
                self.similarity.duplicate_threshold = value.clamp(0.0, 1.0);
            }
        }
        if let Ok(threshold) = env::var("TAG_ENGINE_REVIEW_RISK_THRESHOLD") {
            if let Ok(value) = threshold.parse::<f64>() {
                self.moderation.review_risk_threshold = value.clamp(0.0, 1.0);
            }
        }
        if let Ok(threshold) = env::var("TAG_ENGINE_FLAG_REVIEW_THRESHOLD") {
            if let Ok(value) = threshold.parse::<u32>() {
                self.moderation.flag_review_threshold = value;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("TAG_ENGINE_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/tag_engine.toml")))
}

fn keyword_list(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|term| (*term).to_string()).collect()
}

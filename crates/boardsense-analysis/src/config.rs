//! Analysis configuration
//!
//! Every option has a default, so an empty YAML/JSON document is a valid
//! configuration. Environment variables prefixed with `BOARDSENSE_` override
//! file values.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AnalysisError, AnalysisResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Escalate circular logic findings to high severity
    #[serde(default)]
    pub strict_mode: bool,

    #[serde(default = "default_true")]
    pub check_terminology: bool,

    /// Generate remediation patches
    #[serde(default = "default_true")]
    pub suggest_fixes: bool,

    /// Seed radius for spatial clustering
    #[serde(default = "default_cluster_distance")]
    pub cluster_distance: f64,

    /// Node centres closer than this overlap
    #[serde(default = "default_overlap_distance")]
    pub overlap_distance: f64,

    /// Fuzzy duplicates must score strictly above this
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    #[serde(default = "default_max_topics")]
    pub max_topics: usize,

    /// Element-count guard for the pairwise duplicate and overlap scans
    #[serde(default = "default_max_pairwise_elements")]
    pub max_pairwise_elements: usize,

    #[serde(default = "default_enrichment_timeout_ms")]
    pub enrichment_timeout_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_cluster_distance() -> f64 {
    300.0
}

fn default_overlap_distance() -> f64 {
    50.0
}

fn default_similarity_threshold() -> f64 {
    0.8
}

fn default_max_topics() -> usize {
    20
}

fn default_max_pairwise_elements() -> usize {
    500
}

fn default_enrichment_timeout_ms() -> u64 {
    5000
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            strict_mode: false,
            check_terminology: true,
            suggest_fixes: true,
            cluster_distance: default_cluster_distance(),
            overlap_distance: default_overlap_distance(),
            similarity_threshold: default_similarity_threshold(),
            max_topics: default_max_topics(),
            max_pairwise_elements: default_max_pairwise_elements(),
            enrichment_timeout_ms: default_enrichment_timeout_ms(),
        }
    }
}

impl AnalysisConfig {
    /// Load a YAML or JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| AnalysisError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;

        // JSON documents are valid YAML
        let config: AnalysisConfig = if content.trim().is_empty() {
            AnalysisConfig::default()
        } else {
            serde_yaml::from_str(&content)?
        };

        debug!(path = %path.display(), "Loaded analysis config");
        config.validate()?;
        Ok(config)
    }

    /// Apply `BOARDSENSE_*` environment overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| env::var(name).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = parse_var(&lookup, "BOARDSENSE_STRICT_MODE", parse_bool) {
            self.strict_mode = value;
        }
        if let Some(value) = parse_var(&lookup, "BOARDSENSE_CHECK_TERMINOLOGY", parse_bool) {
            self.check_terminology = value;
        }
        if let Some(value) = parse_var(&lookup, "BOARDSENSE_SUGGEST_FIXES", parse_bool) {
            self.suggest_fixes = value;
        }
        if let Some(value) = parse_var(&lookup, "BOARDSENSE_CLUSTER_DISTANCE", parse_from_str) {
            self.cluster_distance = value;
        }
        if let Some(value) = parse_var(&lookup, "BOARDSENSE_OVERLAP_DISTANCE", parse_from_str) {
            self.overlap_distance = value;
        }
        if let Some(value) = parse_var(&lookup, "BOARDSENSE_SIMILARITY_THRESHOLD", parse_from_str) {
            self.similarity_threshold = value;
        }
        if let Some(value) = parse_var(&lookup, "BOARDSENSE_MAX_PAIRWISE_ELEMENTS", parse_from_str) {
            self.max_pairwise_elements = value;
        }
        if let Some(value) = parse_var(&lookup, "BOARDSENSE_ENRICHMENT_TIMEOUT_MS", parse_from_str) {
            self.enrichment_timeout_ms = value;
        }
        self
    }

    /// Reject values the analysis cannot run with
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(self.cluster_distance > 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "clusterDistance must be positive, got {}",
                self.cluster_distance
            )));
        }
        if !(self.overlap_distance > 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "overlapDistance must be positive, got {}",
                self.overlap_distance
            )));
        }
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "similarityThreshold must be in (0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.max_topics == 0 {
            return Err(AnalysisError::InvalidConfig("maxTopics must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_millis(self.enrichment_timeout_ms)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, parse: fn(&str) -> Option<T>) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        warn!("Invalid {} value: {}", name, raw);
    }
    parsed
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_from_str<T: FromStr>(value: &str) -> Option<T> {
    value.parse().ok()
}

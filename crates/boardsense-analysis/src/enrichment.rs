//! Optional enrichment collaborator.
//!
//! A provider may add a qualitative assessment and extra patches on top of
//! the heuristic report. It is never required: a missing, failing or slow
//! provider leaves the heuristic report as it was.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use boardsense_model::CanonicalGraph;

use crate::patches::{sort_by_priority, Patch, PatchSource};
use crate::report::AnalysisReport;

/// What a provider contributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrichment {
    pub assessment: Option<String>,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub patches: Vec<Patch>,
}

#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("Enrichment timed out after {0:?}")]
    Timeout(Duration),

    #[error("Enrichment provider failed: {0}")]
    Provider(String),
}

impl EnrichmentError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            EnrichmentError::Timeout(_) => "ERR_ENRICHMENT_TIMEOUT",
            EnrichmentError::Provider(_) => "ERR_ENRICHMENT_PROVIDER",
        }
    }
}

/// An external source of qualitative insight about a board
#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
    /// `Ok(None)` means the provider has nothing to add
    async fn enrich(
        &self,
        graph: &CanonicalGraph,
        report: &AnalysisReport,
    ) -> Result<Option<Enrichment>, EnrichmentError>;
}

/// Merge an enrichment into a heuristic report. External patches are
/// appended with their own ids, tagged as external and re-sorted by
/// priority; heuristic patch ids are left as they are.
pub fn apply_enrichment(report: &mut AnalysisReport, enrichment: Enrichment, include_patches: bool) {
    if let Some(assessment) = enrichment.assessment {
        report.assessment = Some(assessment);
    }
    report.insights.extend(enrichment.insights);

    if include_patches && !enrichment.patches.is_empty() {
        for (n, mut patch) in enrichment.patches.into_iter().enumerate() {
            patch.id = format!("external-patch-{}", n + 1);
            patch.source = PatchSource::External;
            report.recommended_patches.push(patch);
        }
        sort_by_priority(&mut report.recommended_patches);
    }

    report.refresh_summary();
}

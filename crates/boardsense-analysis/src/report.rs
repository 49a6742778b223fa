use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use boardsense_model::BoardStats;

use crate::chains::DependencyAnalysis;
use crate::clustering::Cluster;
use crate::cycles::Cycle;
use crate::diagnostics::{Diagnostic, Severity};
use crate::duplicates::DuplicateReport;
use crate::hierarchy::Hierarchy;
use crate::patches::{Patch, PatchSource};
use crate::terminology::TerminologyIssue;
use crate::topics::Topic;

/// Findings per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }

    /// `100 - 20*critical - 10*high - 5*medium - 2*low`, clamped to `0..=100`
    pub fn health_score(&self) -> u32 {
        let penalty: usize = Severity::ALL
            .iter()
            .map(|&severity| self.get(severity).saturating_mul(severity.penalty() as usize))
            .fold(0usize, usize::saturating_add);
        100usize.saturating_sub(penalty) as u32
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Diagnostics plus terminology issues
    pub total_issues: usize,
    pub severity: SeverityCounts,
    pub health_score: u32,
    /// Diagnostic count per type code
    pub issues_by_type: BTreeMap<String, usize>,
    pub terminology_issues: usize,
    pub exact_duplicates: usize,
    pub similar_pairs: usize,
    pub cluster_count: usize,
    pub topic_count: usize,
    pub hierarchy_count: usize,
    pub cycle_count: usize,
    pub patch_count: usize,
    pub auto_applicable_patches: usize,
    pub external_patches: usize,
    /// Checks not run on this board, with the reason in the logs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_checks: Vec<String>,
}

/// Complete analysis output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub topics: Vec<Topic>,
    pub clusters: Vec<Cluster>,
    pub hierarchies: Vec<Hierarchy>,
    pub cycles: Vec<Cycle>,
    pub dependencies: DependencyAnalysis,
    pub issues: Vec<Diagnostic>,
    pub terminology: Vec<TerminologyIssue>,
    pub duplicates: DuplicateReport,
    pub recommended_patches: Vec<Patch>,
    pub stats: BoardStats,
    pub summary: Summary,
    /// Qualitative assessment from an enrichment provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub insights: Vec<String>,
}

impl AnalysisReport {
    /// Most severe finding on the board, if any
    pub fn worst_severity(&self) -> Option<Severity> {
        self.issues
            .iter()
            .map(|issue| issue.severity)
            .chain(self.terminology.iter().map(|issue| issue.severity))
            .min()
    }

    pub fn issues_of_type<'r>(&'r self, code: &'r str) -> impl Iterator<Item = &'r Diagnostic> + 'r {
        self.issues.iter().filter(move |issue| issue.code() == code)
    }

    /// Recount everything derived from the collections
    pub fn refresh_summary(&mut self) {
        let mut severity = SeverityCounts::default();
        let mut issues_by_type = BTreeMap::new();

        for issue in &self.issues {
            severity.record(issue.severity);
            *issues_by_type.entry(issue.code().to_string()).or_insert(0) += 1;
        }
        for issue in &self.terminology {
            severity.record(issue.severity);
        }

        let skipped_checks = std::mem::take(&mut self.summary.skipped_checks);
        self.summary = Summary {
            total_issues: severity.total(),
            health_score: severity.health_score(),
            severity,
            issues_by_type,
            terminology_issues: self.terminology.len(),
            exact_duplicates: self.duplicates.exact.len(),
            similar_pairs: self.duplicates.similar.len(),
            cluster_count: self.clusters.len(),
            topic_count: self.topics.len(),
            hierarchy_count: self.hierarchies.len(),
            cycle_count: self.cycles.len(),
            patch_count: self.recommended_patches.len(),
            auto_applicable_patches: self.recommended_patches.iter().filter(|p| p.auto_applicable).count(),
            external_patches: self
                .recommended_patches
                .iter()
                .filter(|p| p.source == PatchSource::External)
                .count(),
            skipped_checks,
        };
    }
}

/// Every sub-analysis result, ready to be compiled into a report
#[derive(Debug, Default)]
pub struct ReportParts {
    pub topics: Vec<Topic>,
    pub clusters: Vec<Cluster>,
    pub hierarchies: Vec<Hierarchy>,
    pub cycles: Vec<Cycle>,
    pub dependencies: DependencyAnalysis,
    pub issues: Vec<Diagnostic>,
    pub terminology: Vec<TerminologyIssue>,
    pub duplicates: DuplicateReport,
    pub patches: Vec<Patch>,
    pub stats: BoardStats,
    pub skipped_checks: Vec<String>,
}

/// Assemble the report. Never fails; empty parts give an empty report with a
/// perfect score.
pub fn compile_report(parts: ReportParts) -> AnalysisReport {
    let mut report = AnalysisReport {
        topics: parts.topics,
        clusters: parts.clusters,
        hierarchies: parts.hierarchies,
        cycles: parts.cycles,
        dependencies: parts.dependencies,
        issues: parts.issues,
        terminology: parts.terminology,
        duplicates: parts.duplicates,
        recommended_patches: parts.patches,
        stats: parts.stats,
        summary: Summary {
            skipped_checks: parts.skipped_checks,
            ..Summary::default()
        },
        assessment: None,
        insights: Vec::new(),
    };
    report.refresh_summary();
    report
}

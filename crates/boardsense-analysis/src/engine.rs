use tracing::{info, instrument, warn};

use boardsense_model::{extract, parse_snapshot_json, BoardSnapshot, CanonicalGraph};

use crate::chains::analyze_chains;
use crate::clustering::cluster_elements;
use crate::config::AnalysisConfig;
use crate::cycles::detect_cycles;
use crate::diagnostics::{run_diagnostics, RuleContext};
use crate::duplicates::find_duplicates;
use crate::enrichment::{apply_enrichment, EnrichmentError, EnrichmentProvider};
use crate::error::AnalysisResult;
use crate::graph::GraphIndex;
use crate::hierarchy::build_hierarchies;
use crate::patches::generate_patches;
use crate::report::{compile_report, AnalysisReport, ReportParts};
use crate::terminology::check_terminology;
use crate::topics::extract_topics;

/// Name recorded when the fuzzy duplicate pass is skipped
const SIMILAR_DUPLICATES_CHECK: &str = "similar_duplicates";

/// Runs the full analysis pipeline. Holds only configuration, so one analyzer
/// can serve any number of concurrent boards.
#[derive(Debug, Clone, Default)]
pub struct BoardAnalyzer {
    config: AnalysisConfig,
}

impl BoardAnalyzer {
    pub fn new(config: AnalysisConfig) -> AnalysisResult<Self> {
        config.validate()?;
        Ok(BoardAnalyzer { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(&self, snapshot: &BoardSnapshot) -> AnalysisReport {
        let graph = extract(snapshot);
        self.analyze_graph(&graph)
    }

    /// Heuristic analysis of an already extracted graph
    #[instrument(skip_all, fields(nodes = graph.nodes.len(), connections = graph.connections.len()))]
    pub fn analyze_graph(&self, graph: &CanonicalGraph) -> AnalysisReport {
        let config = &self.config;

        let topics = extract_topics(&graph.text_elements, config.max_topics);
        let clusters = cluster_elements(&graph.visual_elements, config.cluster_distance);

        let index = GraphIndex::build(graph);
        let hierarchies = build_hierarchies(&index);
        let cycles = detect_cycles(&index);
        let duplicates = find_duplicates(
            &graph.text_elements,
            config.similarity_threshold,
            config.max_pairwise_elements,
        );
        let dependencies = analyze_chains(&index);

        let run = run_diagnostics(&RuleContext {
            index: &index,
            cycles: &cycles,
            config,
        });

        let terminology = if config.check_terminology {
            check_terminology(&graph.text_elements)
        } else {
            Vec::new()
        };

        let patches = if config.suggest_fixes {
            generate_patches(&index, &run.diagnostics, &duplicates, &terminology, config)
        } else {
            Vec::new()
        };

        let mut skipped_checks = run.skipped;
        if duplicates.fuzzy_skipped {
            skipped_checks.push(SIMILAR_DUPLICATES_CHECK.to_string());
        }

        let report = compile_report(ReportParts {
            topics,
            clusters,
            hierarchies,
            cycles,
            dependencies,
            issues: run.diagnostics,
            terminology,
            duplicates,
            patches,
            stats: graph.stats.clone(),
            skipped_checks,
        });

        info!(
            issues = report.summary.total_issues,
            patches = report.summary.patch_count,
            health_score = report.summary.health_score,
            "Board analysis complete"
        );
        report
    }

    /// Heuristic analysis followed by a time-bounded call to `provider`.
    /// A timeout or provider error degrades to the heuristic report.
    pub async fn analyze_with_enrichment(
        &self,
        snapshot: &BoardSnapshot,
        provider: &dyn EnrichmentProvider,
    ) -> AnalysisReport {
        let graph = extract(snapshot);
        let mut report = self.analyze_graph(&graph);
        let timeout = self.config.enrichment_timeout();

        let outcome = match tokio::time::timeout(timeout, provider.enrich(&graph, &report)).await {
            Ok(result) => result,
            Err(_) => Err(EnrichmentError::Timeout(timeout)),
        };

        match outcome {
            Ok(Some(enrichment)) => {
                apply_enrichment(&mut report, enrichment, self.config.suggest_fixes);
                info!(
                    external_patches = report.summary.external_patches,
                    "Applied board enrichment"
                );
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, code = err.error_code(), "Enrichment unavailable, using heuristic report");
            }
        }

        report
    }
}

/// Parse a JSON snapshot and analyze it
pub fn analyze_json(input: &str, config: &AnalysisConfig) -> AnalysisResult<AnalysisReport> {
    let analyzer = BoardAnalyzer::new(config.clone())?;
    let snapshot = parse_snapshot_json(input)?;
    Ok(analyzer.analyze(&snapshot))
}

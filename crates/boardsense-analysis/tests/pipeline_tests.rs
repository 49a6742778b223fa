use boardsense_analysis::diagnostics::DecisionIssue;
use boardsense_analysis::{
    analyze_json, AnalysisConfig, BoardAnalyzer, DiagnosticKind, PatchType, Severity,
};
use boardsense_model::{parse_snapshot_json, BoardSnapshot, Connection, Element};
use pretty_assertions::assert_eq;

fn analyze(snapshot: &BoardSnapshot) -> boardsense_analysis::AnalysisReport {
    BoardAnalyzer::default().analyze(snapshot)
}

fn codes(report: &boardsense_analysis::AnalysisReport) -> Vec<&'static str> {
    report.issues.iter().map(|issue| issue.code()).collect()
}

#[test]
fn test_three_node_cycle() {
    let snapshot = BoardSnapshot::new()
        .with_element(Element::node("A", Some("Plan sprint"), 0.0, 0.0))
        .with_element(Element::node("B", Some("Build features"), 400.0, 0.0))
        .with_element(Element::node("C", Some("Retrospective"), 800.0, 0.0))
        .with_connection(Connection::new("e1", "A", "B"))
        .with_connection(Connection::new("e2", "B", "C"))
        .with_connection(Connection::new("e3", "C", "A"));

    let report = analyze(&snapshot);

    assert_eq!(report.cycles.len(), 1);
    assert_eq!(report.cycles[0].nodes, vec!["A", "B", "C"]);
    assert!(report.hierarchies.is_empty(), "no node lacks an incoming edge");
    assert_eq!(report.issues_of_type("circular_dependencies").count(), 1);

    let breaks: Vec<_> = report
        .recommended_patches
        .iter()
        .filter(|patch| patch.patch_type == PatchType::BreakCycle)
        .collect();
    assert_eq!(breaks.len(), 1);
    assert_eq!(breaks[0].edge_ids, vec!["e3"]);
}

#[test]
fn test_start_to_end_board() {
    let snapshot = BoardSnapshot::new()
        .with_element(Element::node("s", Some("Receive order"), 0.0, 0.0).with_shape("start"))
        .with_element(Element::node("e", Some("Order shipped"), 400.0, 0.0).with_shape("end"))
        .with_connection(Connection::new("e1", "s", "e"));

    let report = analyze(&snapshot);

    let codes = codes(&report);
    for absent in ["dead_ends", "isolated_nodes", "no_end_points", "unreachable_nodes"] {
        assert!(!codes.contains(&absent), "unexpected {} in {:?}", absent, codes);
    }
    assert_eq!(report.hierarchies.len(), 1);
    assert_eq!(report.dependencies.longest_chain, 2);
}

#[test]
fn test_single_branch_decision() {
    let snapshot = BoardSnapshot::new()
        .with_element(Element::node("s", Some("Start"), 0.0, 0.0).with_shape("start"))
        .with_element(Element::node("d", Some("Credit ok?"), 400.0, 0.0).with_shape("decision"))
        .with_element(Element::node("e", Some("Approve"), 800.0, 0.0).with_shape("end"))
        .with_connection(Connection::new("e1", "s", "d"))
        .with_connection(Connection::new("e2", "d", "e").with_label("Yes"));

    let report = analyze(&snapshot);

    let too_few: Vec<_> = report
        .issues
        .iter()
        .filter(|issue| {
            matches!(
                issue.kind,
                DiagnosticKind::InvalidDecision {
                    issue: DecisionIssue::TooFewBranches,
                    ..
                }
            )
        })
        .collect();
    assert_eq!(too_few.len(), 1);
    assert_eq!(too_few[0].element_ids, vec!["d"]);
    assert_eq!(too_few[0].severity, Severity::High);
}

#[test]
fn test_proximity_group_with_outlier() {
    let snapshot = BoardSnapshot::new()
        .with_element(Element::node("a", Some("Idea one"), 0.0, 0.0))
        .with_element(Element::node("b", Some("Idea two"), 20.0, 10.0))
        .with_element(Element::node("c", Some("Idea three"), 10.0, 30.0))
        .with_element(Element::node("d", Some("Idea four"), 35.0, 20.0))
        .with_element(Element::node("e", Some("Idea five"), 25.0, 40.0))
        .with_element(Element::node("far", Some("Parking lot"), 1000.0, 1000.0));

    let report = analyze(&snapshot);

    assert_eq!(report.clusters.len(), 1);
    let members = report.clusters[0].size();
    assert!((4..=5).contains(&members));
    assert!(!report.clusters[0].element_ids.contains(&"far".to_string()));
    assert_eq!(report.topics[0].keyword, "idea");
    assert_eq!(report.topics[0].frequency, 5);
}

#[test]
fn test_broken_connection_is_critical() {
    let input = r#"{
        "elements": [
            { "id": "s", "text": "Start", "type": "start", "x": 0, "y": 0 },
            { "id": "e", "text": "End", "type": "end", "x": 400, "y": 0 }
        ],
        "connections": [
            { "id": "e1", "from": "s", "to": "e" },
            { "id": "e2", "from": "e", "to": "deleted-node" }
        ],
        "strokes": [ { "points": [[0, 0], [10, 10]] } ]
    }"#;

    let report = analyze_json(input, &AnalysisConfig::default()).unwrap();

    assert_eq!(codes(&report), vec!["broken_connections"]);
    assert_eq!(report.summary.severity.critical, 1);
    assert_eq!(report.summary.health_score, 80);
    assert_eq!(report.stats.stroke_count, 1);
    assert_eq!(report.recommended_patches[0].patch_type, PatchType::RemoveBrokenConnection);
    assert!(report.recommended_patches[0].auto_applicable);
}

#[test]
fn test_report_is_deterministic() {
    let input = r#"{
        "elements": [
            { "id": "a", "text": "Validate order", "x": 0, "y": 0 },
            { "id": "b", "text": "Validate orders", "x": 30, "y": 0 },
            { "id": "c", "text": "Step 2", "x": 600, "y": 0, "shape": "diamond" },
            { "id": "d", "x": 900, "y": 0 }
        ],
        "connections": [
            { "id": "e1", "source": "a", "target": "c" },
            { "id": "e2", "source": "c", "target": "d" }
        ]
    }"#;
    let snapshot = parse_snapshot_json(input).unwrap();
    let analyzer = BoardAnalyzer::default();

    let first = serde_json::to_value(analyzer.analyze(&snapshot)).unwrap();
    let second = serde_json::to_value(analyzer.analyze(&snapshot)).unwrap();

    assert_eq!(first, second);
    assert_eq!(first["duplicates"]["similar"][0]["similarity"], 93);
}

#[test]
fn test_strict_mode_escalates_cycle() {
    let snapshot = BoardSnapshot::new()
        .with_element(Element::node("a", Some("Ping"), 0.0, 0.0))
        .with_element(Element::node("b", Some("Pong"), 400.0, 0.0))
        .with_connection(Connection::new("e1", "a", "b"))
        .with_connection(Connection::new("e2", "b", "a"));

    let relaxed = analyze(&snapshot);
    let strict = BoardAnalyzer::new(AnalysisConfig {
        strict_mode: true,
        ..AnalysisConfig::default()
    })
    .unwrap()
    .analyze(&snapshot);

    let severity = |report: &boardsense_analysis::AnalysisReport| {
        report.issues_of_type("circular_dependencies").next().map(|issue| issue.severity)
    };
    assert_eq!(severity(&relaxed), Some(Severity::Medium));
    assert_eq!(severity(&strict), Some(Severity::High));
    assert!(strict.summary.health_score < relaxed.summary.health_score);
}

#[test]
fn test_declared_start_and_extra_root_are_multiple_starts() {
    let snapshot = BoardSnapshot::new()
        .with_element(Element::node("s", Some("Web signup"), 0.0, 0.0).with_shape("start"))
        .with_element(Element::node("r", Some("Phone signup"), 0.0, 400.0))
        .with_element(Element::node("m", Some("Create account"), 400.0, 200.0))
        .with_element(Element::node("e", Some("Welcome email"), 800.0, 200.0).with_shape("end"))
        .with_connection(Connection::new("e1", "s", "m"))
        .with_connection(Connection::new("e2", "r", "m"))
        .with_connection(Connection::new("e3", "m", "e"));

    let report = analyze(&snapshot);

    assert_eq!(codes(&report), vec!["multiple_starts"]);
    assert_eq!(
        report.issues[0].kind,
        DiagnosticKind::MultipleStarts {
            starts: vec!["s".into(), "r".into()]
        }
    );
    assert!(report
        .recommended_patches
        .iter()
        .any(|patch| patch.patch_type == PatchType::AddSingleStart));
}

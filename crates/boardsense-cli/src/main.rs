use anyhow::{Context, Result};
use boardsense_analysis::{AnalysisConfig, AnalysisReport, BoardAnalyzer, Severity};
use boardsense_model::{parse_snapshot_json, parse_snapshot_yaml, BoardSnapshot};
use boardsense_monitoring::{BoardLogExt, MonitoringConfig};
use clap::{Parser, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

/// Exit status when `--fail-on` finds an issue at or above the threshold
const EXIT_ISSUES_FOUND: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "boardsense")]
#[command(about = "Analyze a whiteboard snapshot and report structural issues", long_about = None)]
#[command(version)]
struct Cli {
    /// Snapshot file, or "-" for stdin
    snapshot: String,

    /// Snapshot encoding; `auto` goes by file extension, or by content on stdin
    #[arg(long, value_enum, default_value = "auto")]
    input_format: InputFormat,

    /// YAML analysis config; BOARDSENSE_* environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Escalate circular flows to high severity
    #[arg(long)]
    strict: bool,

    /// Skip the terminology checks
    #[arg(long)]
    no_terminology: bool,

    /// Do not generate patches
    #[arg(long)]
    no_fixes: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Single-line JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Exit with status 2 when any issue is this severe or worse
    #[arg(long, value_parser = parse_severity)]
    fail_on: Option<Severity>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_filter: String,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Auto,
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn parse_severity(value: &str) -> Result<Severity, String> {
    value.parse().map_err(|e: boardsense_analysis::AnalysisError| e.to_string())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    boardsense_monitoring::init_logging(&MonitoringConfig {
        service_name: "boardsense".to_string(),
        log_filter: cli.log_filter.clone(),
        enable_json_logging: cli.json_logs,
        log_file: None,
    })
    .context("Failed to initialize logging")?;

    let board = cli.snapshot.as_str();
    let config = build_config(&cli).log_board_err(board, "load config")?;
    let snapshot = load_snapshot(board, cli.input_format).log_board_err(board, "load snapshot")?;

    let analyzer = BoardAnalyzer::new(config)
        .context("Invalid analysis configuration")
        .log_board_err(board, "configure analyzer")?;
    let report = analyzer.analyze(&snapshot);
    info!(
        board,
        issues = report.summary.total_issues,
        health_score = report.summary.health_score,
        "Analysis finished"
    );

    println!("{}", render(&report, cli.format, cli.compact)?);

    Ok(exit_code(&report, cli.fail_on))
}

/// Config file first, then environment, then command-line flags
fn build_config(cli: &Cli) -> Result<AnalysisConfig> {
    let base = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let mut config = base.with_env_overrides();
    if cli.strict {
        config.strict_mode = true;
    }
    if cli.no_terminology {
        config.check_terminology = false;
    }
    if cli.no_fixes {
        config.suggest_fixes = false;
    }
    debug!(?config, "Resolved analysis config");
    Ok(config)
}

fn load_snapshot(source: &str, format: InputFormat) -> Result<BoardSnapshot> {
    if source == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read snapshot from stdin")?;
        return parse_snapshot_input("stdin", None, &input, format);
    }

    let path = Path::new(source);
    let input = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_snapshot_input(source, Some(path), &input, format)
}

/// Settle `auto` to a concrete encoding: the file extension when there is one,
/// otherwise JSON for input opening with `{` and YAML for anything else
fn resolve_format(requested: InputFormat, path: Option<&Path>, input: &str) -> InputFormat {
    if requested != InputFormat::Auto {
        return requested;
    }

    let extension = path.and_then(|path| path.extension()).and_then(|ext| ext.to_str());
    match extension {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => InputFormat::Yaml,
        Some(_) => InputFormat::Json,
        None if input.trim_start().starts_with('{') => InputFormat::Json,
        None => InputFormat::Yaml,
    }
}

fn parse_snapshot_input(
    name: &str,
    path: Option<&Path>,
    input: &str,
    requested: InputFormat,
) -> Result<BoardSnapshot> {
    let format = resolve_format(requested, path, input);
    debug!(source = name, ?format, "Parsing snapshot");

    let snapshot = match format {
        InputFormat::Yaml => parse_snapshot_yaml(input),
        InputFormat::Json | InputFormat::Auto => parse_snapshot_json(input),
    };
    snapshot.with_context(|| format!("Invalid snapshot in {}", name))
}

fn render(report: &AnalysisReport, format: OutputFormat, compact: bool) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json if compact => serde_json::to_string(report)?,
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Yaml => serde_yaml::to_string(report)?,
    };
    Ok(rendered)
}

fn exit_code(report: &AnalysisReport, fail_on: Option<Severity>) -> ExitCode {
    match (fail_on, report.worst_severity()) {
        (Some(threshold), Some(worst)) if worst.at_least(threshold) => ExitCode::from(EXIT_ISSUES_FOUND),
        _ => ExitCode::SUCCESS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BROKEN_BOARD: &str = r#"{
        "elements": [
            { "id": "s", "text": "Start", "type": "start", "x": 0, "y": 0 },
            { "id": "e", "text": "End", "type": "end", "x": 400, "y": 0 }
        ],
        "connections": [
            { "id": "e1", "from": "s", "to": "e" },
            { "id": "e2", "from": "e", "to": "deleted-node" }
        ]
    }"#;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("boardsense").chain(args.iter().copied())).unwrap()
    }

    fn report_for(json: &str) -> AnalysisReport {
        let snapshot = parse_snapshot_json(json).unwrap();
        BoardAnalyzer::default().analyze(&snapshot)
    }

    #[test]
    fn test_parses_flags() {
        let cli = cli(&["board.yaml", "--strict", "--no-fixes", "--format", "yaml", "--fail-on", "high"]);

        assert_eq!(cli.snapshot, "board.yaml");
        assert!(cli.strict);
        assert!(cli.no_fixes);
        assert!(!cli.no_terminology);
        assert_eq!(cli.format, OutputFormat::Yaml);
        assert_eq!(cli.fail_on, Some(Severity::High));
    }

    #[test]
    fn test_rejects_unknown_severity() {
        let result = Cli::try_parse_from(["boardsense", "board.json", "--fail-on", "urgent"]);
        assert!(result.is_err(), "unknown severity should be rejected");
    }

    #[test]
    fn test_flags_override_config() {
        let config = build_config(&cli(&["-", "--strict", "--no-terminology", "--no-fixes"])).unwrap();

        assert!(config.strict_mode);
        assert!(!config.check_terminology);
        assert!(!config.suggest_fixes);
    }

    const YAML_BOARD: &str = "elements:\n  - id: a\n    text: Start\n    x: 0\n    y: 0\n";

    #[test]
    fn test_yaml_chosen_by_extension() {
        let path = Path::new("board.YML");
        let snapshot = parse_snapshot_input("board.YML", Some(path), YAML_BOARD, InputFormat::Auto).unwrap();
        assert_eq!(snapshot.elements.len(), 1);

        let path = Path::new("board.json");
        let err = parse_snapshot_input("board.json", Some(path), YAML_BOARD, InputFormat::Auto).unwrap_err();
        assert!(err.to_string().contains("board.json"));
    }

    #[test]
    fn test_stdin_format_sniffed_or_forced() {
        assert_eq!(resolve_format(InputFormat::Auto, None, "  {\"elements\": []}"), InputFormat::Json);
        assert_eq!(resolve_format(InputFormat::Auto, None, YAML_BOARD), InputFormat::Yaml);
        assert_eq!(
            resolve_format(InputFormat::Yaml, Some(Path::new("board.json")), "{}"),
            InputFormat::Yaml
        );

        let snapshot = parse_snapshot_input("stdin", None, YAML_BOARD, InputFormat::Auto).unwrap();
        assert_eq!(snapshot.elements.len(), 1);

        let snapshot = parse_snapshot_input("stdin", None, BROKEN_BOARD, InputFormat::Auto).unwrap();
        assert_eq!(snapshot.connections.len(), 2);
    }

    #[test]
    fn test_input_format_flag() {
        assert_eq!(cli(&["-"]).input_format, InputFormat::Auto);
        assert_eq!(cli(&["-", "--input-format", "yaml"]).input_format, InputFormat::Yaml);
    }

    #[test]
    fn test_fail_on_threshold() {
        let report = report_for(BROKEN_BOARD);
        assert_eq!(report.worst_severity(), Some(Severity::Critical));

        assert_eq!(exit_code(&report, Some(Severity::High)), ExitCode::from(EXIT_ISSUES_FOUND));
        assert_eq!(exit_code(&report, None), ExitCode::SUCCESS);

        let clean = report_for(
            r#"{
                "elements": [
                    { "id": "s", "text": "Start", "type": "start", "x": 0, "y": 0 },
                    { "id": "e", "text": "End", "type": "end", "x": 400, "y": 0 }
                ],
                "connections": [ { "id": "e1", "from": "s", "to": "e" } ]
            }"#,
        );
        assert_eq!(exit_code(&clean, Some(Severity::Low)), ExitCode::SUCCESS);
    }

    #[test]
    fn test_render_formats() {
        let report = report_for(BROKEN_BOARD);

        let compact = render(&report, OutputFormat::Json, true).unwrap();
        assert!(!compact.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(value["summary"]["healthScore"], 80);

        let yaml = render(&report, OutputFormat::Yaml, false).unwrap();
        assert!(yaml.contains("healthScore: 80"));
    }
}

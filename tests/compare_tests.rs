//! End-to-end comparison runs against the fixture schema directories.

use std::fs;
use std::path::{Path, PathBuf};

use schema_compare::config::ToolConfig;
use schema_compare::{
    comparator, report, ChecksumShortcut, CompareConfig, CompareError, ComparisonSession,
    Convention, Engine, JsonDiffTool, OutcomeKind, SchemaNaming, Side, TextDiffEngine,
};
use tempfile::tempdir;

fn fixtures_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/api")
}

fn side(dir: &str, prefix: &str) -> Side {
    Side::new(fixtures_path().join(dir), SchemaNaming::new(prefix, "_schema.json"))
}

fn builtin_session(output: &Path) -> ComparisonSession<ChecksumShortcut<TextDiffEngine>> {
    ComparisonSession::new(
        side("v1", "v1_"),
        side("v2", "v2_"),
        output,
        ChecksumShortcut::new(TextDiffEngine::new()),
    )
}

/// Copy the fixtures into `<root>/<token>/` renaming the `vN_` prefix to `<token>_`
fn copy_versioned(root: &Path, source: &str, token: &str) -> PathBuf {
    let target = root.join(token);
    fs::create_dir_all(&target).unwrap();
    for entry in fs::read_dir(fixtures_path().join(source)).unwrap() {
        let entry = entry.unwrap();
        let name = entry.file_name().to_string_lossy().into_owned();
        let renamed = match name.strip_prefix(&format!("{}_", source)) {
            Some(rest) => format!("{}_{}", token, rest),
            None => name,
        };
        fs::copy(entry.path(), target.join(renamed)).unwrap();
    }
    target
}

#[test]
fn test_full_report_layout() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("results.txt");

    let summary = builtin_session(&output).run().unwrap();
    assert_eq!(summary.first_only, vec!["order".to_string()]);
    assert_eq!(summary.second_only, vec!["invoice".to_string()]);
    let compared: Vec<_> = summary
        .compared
        .iter()
        .map(|p| (p.identifier.as_str(), p.outcome))
        .collect();
    assert_eq!(
        compared,
        vec![("address", OutcomeKind::Identical), ("user", OutcomeKind::Different)]
    );

    let text = fs::read_to_string(&output).unwrap();
    let rule = "-".repeat(75);
    let order: [&str; 12] = [
        "First directory - ",
        "Second directory - ",
        "Found the next 1 unique schemas in ",
        "  · order",
        "  · invoice",
        "Found the next 2 matching schemas.",
        "💠 Comparing schema 'address'...",
        "    First directory file - v1_address_schema.json",
        report::IDENTICAL_MARKER,
        rule.as_str(),
        "💠 Comparing schema 'user'...",
        "+    \"email\": {",
    ];
    let mut cursor = 0;
    for needle in order {
        let found = text[cursor..]
            .find(needle)
            .unwrap_or_else(|| panic!("'{}' missing after offset {} in:\n{}", needle, cursor, text));
        cursor += found + needle.len();
    }
    assert_eq!(text.matches(rule.as_str()).count(), 1);
    assert!(!text.contains("README"));
}

#[test]
fn test_rerun_overwrites_report() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("results.txt");
    fs::write(&output, "stale content from an old run\n").unwrap();

    builtin_session(&output).run().unwrap();
    builtin_session(&output).run().unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(!text.contains("stale content"));
    assert_eq!(text.matches("Found the next 2 matching schemas.").count(), 1);
}

#[test]
fn test_missing_directory_written_to_report() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("results.txt");
    let session = ComparisonSession::new(
        side("v1", "v1_"),
        side("v9", "v9_"),
        &output,
        TextDiffEngine::new(),
    );

    let err = session.run().unwrap_err();
    assert!(matches!(err, CompareError::DirectoryNotFound { ref path } if path.ends_with("v9")));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("Second directory - "));
    assert!(!text.contains("Comparing schema"));
    assert!(text.trim_end().ends_with("not found."));
}

#[test]
fn test_missing_tool_aborts_after_identical_pairs() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("results.txt");
    let tool = JsonDiffTool::new(&ToolConfig {
        program: "json-diff-missing-for-tests".to_string(),
        ..ToolConfig::default()
    });
    let session = ComparisonSession::new(
        side("v1", "v1_"),
        side("v2", "v2_"),
        &output,
        ChecksumShortcut::new(tool),
    );

    let err = session.run().unwrap_err();
    assert!(matches!(err, CompareError::ToolNotFound { .. }));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("Comparing schema 'address'"));
    assert!(text.contains(report::IDENTICAL_MARKER));
    assert!(!text.contains("Comparing schema 'user'"));
    assert!(text.trim_end().ends_with("Please install it using 'npm install -g json-diff'."));
}

#[test]
fn test_no_matches_is_success() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("results.txt");
    let session = ComparisonSession::new(
        side("v1", "v1_"),
        side("v2", "v7_"),
        &output,
        TextDiffEngine::new(),
    );

    let summary = session.run().unwrap();
    assert!(!summary.has_matches());
    assert!(summary.second_only.is_empty());

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.trim_end().ends_with(report::NO_MATCHES));
}

#[test]
fn test_version_substitution_from_config() {
    let dir = tempdir().unwrap();
    let first = copy_versioned(dir.path(), "v1", "release-1.0");
    copy_versioned(dir.path(), "v2", "release-2.0");

    let mut config = CompareConfig::default();
    config.report.engine = Engine::Builtin;
    config.report.output_dir = Some(dir.path().join("reports"));

    let convention = Convention::VersionSubstitution {
        first_directory: first,
        version: "release-1.0".to_string(),
        next_version: "release-2.0".to_string(),
    };
    let session = ComparisonSession::from_config(
        &convention,
        &config,
        Some(Path::new("versions.txt")),
        comparator::from_config(&config),
    )
    .unwrap();

    let summary = session.run().unwrap();
    assert_eq!(summary.second_prefix, "release-2.0_");
    assert_eq!(summary.count(OutcomeKind::Identical), 1);
    assert_eq!(summary.count(OutcomeKind::Different), 1);

    let report_path = dir.path().join("reports/versions.txt");
    let text = fs::read_to_string(report_path).unwrap();
    assert!(text.contains("    Second directory file - release-2.0_user_schema.json"));
}

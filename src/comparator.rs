//! Pairwise schema comparison
//!
//! A [`Comparator`] turns two file paths into a [`ComparisonOutcome`]. The default
//! implementation shells out to `json-diff`; [`TextDiffEngine`] is an in-process
//! alternative and [`ChecksumShortcut`] short-circuits byte-identical files.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output};

use serde::Serialize;
use similar::TextDiff;
use tracing::debug;

use crate::checksum;
use crate::config::{CompareConfig, Engine, ToolConfig};
use crate::error::{CompareError, Result};

/// Result of comparing one matched pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonOutcome {
    /// No differences
    Identical,
    /// Printable diff text
    Different(String),
    /// The comparison itself failed; carries the tool's message
    Failed(String),
}

/// Outcome kind without the payload, for summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Identical,
    Different,
    Failed,
}

impl ComparisonOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            ComparisonOutcome::Identical => OutcomeKind::Identical,
            ComparisonOutcome::Different(_) => OutcomeKind::Different,
            ComparisonOutcome::Failed(_) => OutcomeKind::Failed,
        }
    }

    /// Build an outcome from diff text, treating blank output as identical
    pub fn from_diff_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            ComparisonOutcome::Identical
        } else {
            ComparisonOutcome::Different(trimmed.to_string())
        }
    }
}

/// Capability to compare two schema files
pub trait Comparator {
    /// Compare two files.
    ///
    /// `Err` is reserved for problems that make every further comparison pointless
    /// (missing tool, I/O failure); per-pair failures are `Ok(Failed(..))`.
    fn compare(&self, first: &Path, second: &Path) -> Result<ComparisonOutcome>;
}

impl<C: Comparator + ?Sized> Comparator for Box<C> {
    fn compare(&self, first: &Path, second: &Path) -> Result<ComparisonOutcome> {
        (**self).compare(first, second)
    }
}

impl<C: Comparator + ?Sized> Comparator for &C {
    fn compare(&self, first: &Path, second: &Path) -> Result<ComparisonOutcome> {
        (**self).compare(first, second)
    }
}

/// External `json-diff` process
#[derive(Debug, Clone)]
pub struct JsonDiffTool {
    program: String,
    args: Vec<String>,
    install_hint: String,
}

/// Exit status json-diff uses when the inputs differ
const DIFFERENCES_FOUND: i32 = 1;

impl JsonDiffTool {
    pub fn new(config: &ToolConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            install_hint: config.install_hint.clone(),
        }
    }

    fn interpret(output: Output) -> ComparisonOutcome {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        match output.status.code() {
            Some(0) | Some(DIFFERENCES_FOUND) => ComparisonOutcome::from_diff_text(&stdout),
            code => {
                let message = if stderr.trim().is_empty() {
                    stdout.trim().to_string()
                } else {
                    stderr.trim().to_string()
                };
                let message = if message.is_empty() {
                    match code {
                        Some(code) => format!("exited with status {}", code),
                        None => "terminated by signal".to_string(),
                    }
                } else {
                    message
                };
                ComparisonOutcome::Failed(message)
            }
        }
    }
}

impl Default for JsonDiffTool {
    fn default() -> Self {
        Self::new(&ToolConfig::default())
    }
}

impl Comparator for JsonDiffTool {
    fn compare(&self, first: &Path, second: &Path) -> Result<ComparisonOutcome> {
        debug!(program = %self.program, first = %first.display(), second = %second.display(), "running diff tool");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(first)
            .arg(second)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => CompareError::ToolNotFound {
                    program: self.program.clone(),
                    hint: self.install_hint.clone(),
                },
                _ => CompareError::Io(e),
            })?;

        Ok(Self::interpret(output))
    }
}

/// In-process unified diff of normalized JSON
///
/// Both documents are re-serialized with sorted keys before diffing, so key order
/// and whitespace never show up as differences.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextDiffEngine;

/// Unchanged lines shown around each hunk
const CONTEXT_RADIUS: usize = 3;

impl TextDiffEngine {
    pub fn new() -> Self {
        Self
    }

    fn normalize(path: &Path) -> std::result::Result<String, String> {
        let content = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse JSON in {}: {}", path.display(), e))?;
        let mut pretty = serde_json::to_string_pretty(&value).map_err(|e| e.to_string())?;
        pretty.push('\n');
        Ok(pretty)
    }
}

impl Comparator for TextDiffEngine {
    fn compare(&self, first: &Path, second: &Path) -> Result<ComparisonOutcome> {
        let (old, new) = match (Self::normalize(first), Self::normalize(second)) {
            (Ok(old), Ok(new)) => (old, new),
            (Err(message), _) | (_, Err(message)) => return Ok(ComparisonOutcome::Failed(message)),
        };

        if old == new {
            return Ok(ComparisonOutcome::Identical);
        }

        let old_name = first.file_name().unwrap_or_default().to_string_lossy();
        let new_name = second.file_name().unwrap_or_default().to_string_lossy();
        let diff = TextDiff::from_lines(&old, &new);
        let rendered = diff
            .unified_diff()
            .context_radius(CONTEXT_RADIUS)
            .header(&old_name, &new_name)
            .to_string();

        Ok(ComparisonOutcome::from_diff_text(&rendered))
    }
}

/// Reports byte-identical files without consulting the inner comparator
#[derive(Debug, Clone)]
pub struct ChecksumShortcut<C> {
    inner: C,
}

impl<C> ChecksumShortcut<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: Comparator> Comparator for ChecksumShortcut<C> {
    fn compare(&self, first: &Path, second: &Path) -> Result<ComparisonOutcome> {
        match checksum::same_content(first, second) {
            Ok(true) => {
                debug!(first = %first.display(), second = %second.display(), "byte-identical, skipping engine");
                return Ok(ComparisonOutcome::Identical);
            }
            Ok(false) => {}
            // The engine reports unreadable files as a failed pair
            Err(e) => {
                debug!(error = %e, first = %first.display(), "checksum unavailable, running engine")
            }
        }
        self.inner.compare(first, second)
    }
}

/// Build the comparator selected by configuration
pub fn from_config(config: &CompareConfig) -> Box<dyn Comparator> {
    let engine: Box<dyn Comparator> = match config.report.engine {
        Engine::JsonDiff => Box::new(JsonDiffTool::new(&config.tool)),
        Engine::Builtin => Box::new(TextDiffEngine::new()),
    };
    if config.report.skip_identical_bytes {
        Box::new(ChecksumShortcut::new(engine))
    } else {
        engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn write_pair(first: &str, second: &str) -> (TempDir, PathBuf, PathBuf) {
        let dir = tempdir().unwrap();
        let a = dir.path().join("v1_user_schema.json");
        let b = dir.path().join("v2_user_schema.json");
        fs::write(&a, first).unwrap();
        fs::write(&b, second).unwrap();
        (dir, a, b)
    }

    fn shell_tool(script: &str) -> JsonDiffTool {
        JsonDiffTool::new(&ToolConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string(), "sh".to_string()],
            install_hint: String::new(),
        })
    }

    struct Counting<'a>(&'a Cell<usize>);

    impl Comparator for Counting<'_> {
        fn compare(&self, _: &Path, _: &Path) -> Result<ComparisonOutcome> {
            self.0.set(self.0.get() + 1);
            Ok(ComparisonOutcome::Different("changed".to_string()))
        }
    }

    #[test]
    fn test_from_diff_text() {
        assert_eq!(ComparisonOutcome::from_diff_text("  \n"), ComparisonOutcome::Identical);
        assert_eq!(
            ComparisonOutcome::from_diff_text(" -a\n+b \n"),
            ComparisonOutcome::Different("-a\n+b".to_string())
        );
    }

    #[test]
    fn test_missing_tool() {
        let (_dir, a, b) = write_pair("{}", "{}");
        let tool = JsonDiffTool::new(&ToolConfig {
            program: "definitely-not-a-json-diff-binary".to_string(),
            ..ToolConfig::default()
        });
        match tool.compare(&a, &b) {
            Err(CompareError::ToolNotFound { program, hint }) => {
                assert_eq!(program, "definitely-not-a-json-diff-binary");
                assert!(hint.contains("npm install -g json-diff"));
            }
            other => panic!("Expected ToolNotFound, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_exit_codes() {
        let (_dir, a, b) = write_pair("{}", "{}");

        assert_eq!(shell_tool("exit 0").compare(&a, &b).unwrap(), ComparisonOutcome::Identical);
        assert_eq!(shell_tool("exit 1").compare(&a, &b).unwrap(), ComparisonOutcome::Identical);
        assert_eq!(
            shell_tool("printf '  \\n'; exit 1").compare(&a, &b).unwrap(),
            ComparisonOutcome::Identical
        );
        assert_eq!(
            shell_tool("printf ' {\\n-  a: 1\\n }\\n'; exit 1").compare(&a, &b).unwrap(),
            ComparisonOutcome::Different("{\n-  a: 1\n }".to_string())
        );
        assert_eq!(
            shell_tool("echo 'cannot read' >&2; exit 2").compare(&a, &b).unwrap(),
            ComparisonOutcome::Failed("cannot read".to_string())
        );
        assert_eq!(
            shell_tool("exit 3").compare(&a, &b).unwrap(),
            ComparisonOutcome::Failed("exited with status 3".to_string())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_receives_both_paths() {
        let (_dir, a, b) = write_pair("{}", "{}");
        let outcome = shell_tool("echo \"$(basename \"$1\") $(basename \"$2\")\"")
            .compare(&a, &b)
            .unwrap();
        assert_eq!(
            outcome,
            ComparisonOutcome::Different("v1_user_schema.json v2_user_schema.json".to_string())
        );
    }

    #[test]
    fn test_text_engine_ignores_formatting() {
        let (_dir, a, b) = write_pair(
            r#"{"type": "object", "title": "User"}"#,
            "{\n  \"title\": \"User\",\n  \"type\": \"object\"\n}",
        );
        assert_eq!(TextDiffEngine::new().compare(&a, &b).unwrap(), ComparisonOutcome::Identical);
    }

    #[test]
    fn test_text_engine_reports_changes() {
        let (_dir, a, b) = write_pair(r#"{"type": "object"}"#, r#"{"type": "array"}"#);
        match TextDiffEngine::new().compare(&a, &b).unwrap() {
            ComparisonOutcome::Different(text) => {
                assert!(text.contains("--- v1_user_schema.json"));
                assert!(text.contains("-  \"type\": \"object\""));
                assert!(text.contains("+  \"type\": \"array\""));
            }
            other => panic!("Expected Different, got {:?}", other),
        }
    }

    #[test]
    fn test_text_engine_invalid_json_fails_pair() {
        let (_dir, a, b) = write_pair("{not json", "{}");
        match TextDiffEngine::new().compare(&a, &b).unwrap() {
            ComparisonOutcome::Failed(message) => assert!(message.contains("Failed to parse JSON")),
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_checksum_shortcut_skips_identical() {
        let calls = Cell::new(0);
        let shortcut = ChecksumShortcut::new(Counting(&calls));

        let (_dir, a, b) = write_pair(r#"{"a": 1}"#, r#"{"a": 1}"#);
        assert_eq!(shortcut.compare(&a, &b).unwrap(), ComparisonOutcome::Identical);
        assert_eq!(calls.get(), 0);

        let (_dir2, c, d) = write_pair(r#"{"a": 1}"#, r#"{"a": 2}"#);
        assert_eq!(shortcut.compare(&c, &d).unwrap().kind(), OutcomeKind::Different);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_checksum_shortcut_defers_unreadable_files_to_engine() {
        let (dir, a, _b) = write_pair("{}", "{}");
        let gone = dir.path().join("v2_gone_schema.json");

        match ChecksumShortcut::new(TextDiffEngine::new()).compare(&a, &gone).unwrap() {
            ComparisonOutcome::Failed(message) => assert!(message.contains("v2_gone_schema.json")),
            other => panic!("Expected Failed, got {:?}", other),
        }

        let calls = Cell::new(0);
        let shortcut = ChecksumShortcut::new(Counting(&calls));
        assert_eq!(shortcut.compare(&gone, &a).unwrap().kind(), OutcomeKind::Different);
        assert_eq!(calls.get(), 1);
    }
}

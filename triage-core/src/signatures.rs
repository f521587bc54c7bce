//! The built-in defect signature catalog.
//!
//! Twelve textual heuristics over the application's source files, one per
//! previously identified defect. Each rule is a pure function of file
//! content so it can be exercised against crafted fixtures; the registry
//! binds rules to their static metadata in catalog order.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::domain::Severity;
use crate::error::Result;
use crate::signature::{SignatureCheck, SignatureMatch, line_number_at};

/// Static metadata for one catalogued signature.
#[derive(Debug, Clone)]
struct SignatureSpec {
    id: &'static str,
    severity: Severity,
    target: &'static str,
    description: &'static str,
    recommendation: &'static str,
    max_findings: Option<usize>,
}

type RuleFn = fn(&str) -> Result<Vec<SignatureMatch>>;

/// A catalogued signature: static metadata plus a detection rule.
struct Signature {
    spec: SignatureSpec,
    target: PathBuf,
    rule: RuleFn,
}

impl Signature {
    fn new(spec: SignatureSpec, rule: RuleFn) -> Self {
        let target = PathBuf::from(spec.target);
        Self { spec, target, rule }
    }
}

impl SignatureCheck for Signature {
    fn id(&self) -> &str {
        self.spec.id
    }

    fn severity(&self) -> Severity {
        self.spec.severity
    }

    fn target(&self) -> &Path {
        &self.target
    }

    fn description(&self) -> &str {
        self.spec.description
    }

    fn recommendation(&self) -> &str {
        self.spec.recommendation
    }

    fn max_findings(&self) -> Option<usize> {
        self.spec.max_findings
    }

    fn evaluate(&self, content: &str) -> Result<Vec<SignatureMatch>> {
        (self.rule)(content)
    }
}

/// Build the signature catalog in declaration order (BUG-001..BUG-012).
///
/// Order is stable and caller-visible: findings are aggregated in this
/// order, and the idempotence of scan output depends on it.
pub fn build_signature_checks() -> Vec<Box<dyn SignatureCheck>> {
    vec![
        Box::new(Signature::new(
            SignatureSpec {
                id: "BUG-001",
                severity: Severity::Critical,
                target: "app/lib/GeminiClient.cpp",
                description: "Detached thread captures member variable address. Use-after-free if object destroyed before thread completes.",
                recommendation: "Use std::shared_ptr or make thread joinable. Store thread in member variable and join in destructor.",
                max_findings: Some(1),
            },
            detached_thread_rule,
        )),
        Box::new(Signature::new(
            SignatureSpec {
                id: "BUG-002",
                severity: Severity::Critical,
                target: "app/lib/WhitelistTreeEditor.cpp",
                description: "topLevelItem() can return nullptr but code dereferences without checking",
                recommendation: "Add null check: if (item) { ... } before dereferencing",
                max_findings: None,
            },
            unchecked_top_level_item_rule,
        )),
        Box::new(Signature::new(
            SignatureSpec {
                id: "BUG-003",
                severity: Severity::High,
                target: "app/lib/GeminiClient.cpp",
                description: "std::stol can throw exceptions but uses bare catch(...) that swallows all errors",
                recommendation: "Catch specific exceptions: catch(const std::invalid_argument&) and catch(const std::out_of_range&). Log errors.",
                max_findings: None,
            },
            stol_bare_catch_rule,
        )),
        Box::new(Signature::new(
            SignatureSpec {
                id: "BUG-004",
                severity: Severity::High,
                target: "app/lib/GeminiClient.cpp",
                description: "ProgressData::last_activity_ms accessed from multiple threads without synchronization (data race)",
                recommendation: "Change to: std::atomic<uint64_t> last_activity_ms{0};",
                max_findings: Some(1),
            },
            non_atomic_progress_rule,
        )),
        Box::new(Signature::new(
            SignatureSpec {
                id: "BUG-005",
                severity: Severity::High,
                target: "app/lib/WhitelistTreeEditor.cpp",
                description: "Manual delete of Qt-owned tree item. Can cause double-free or memory leak.",
                recommendation: "Let Qt manage lifetime. Either don't delete, or ensure item ownership is properly transferred.",
                max_findings: None,
            },
            manual_tree_item_delete_rule,
        )),
        Box::new(Signature::new(
            SignatureSpec {
                id: "BUG-006",
                severity: Severity::Medium,
                target: "app/lib/FileTinderDialog.cpp",
                description: "Database operation return value ignored. Failures go undetected.",
                recommendation: "Check return value: if (!db_.method(...)) { /* handle error */ }",
                max_findings: Some(3),
            },
            unchecked_db_call_rule,
        )),
        Box::new(Signature::new(
            SignatureSpec {
                id: "BUG-007",
                severity: Severity::Medium,
                target: "app/lib/DatabaseManager.cpp",
                description: "sqlite3_prepare_v2 may partially allocate statement on error. Not finalized on error path.",
                recommendation: "Add: if (raw) sqlite3_finalize(raw); before returning on error",
                max_findings: Some(1),
            },
            sql_statement_leak_rule,
        )),
        Box::new(Signature::new(
            SignatureSpec {
                id: "BUG-008",
                severity: Severity::Medium,
                target: "app/lib/GeminiClient.cpp",
                description: "Static PersistentState shared across all GeminiClient instances. Thread safety concerns with detached threads.",
                recommendation: "Make PersistentState a member variable or use thread-safe singleton with proper lifetime management",
                max_findings: Some(1),
            },
            static_state_rule,
        )),
        Box::new(Signature::new(
            SignatureSpec {
                id: "BUG-009",
                severity: Severity::Medium,
                target: "app/lib/CacheManagerDialog.cpp",
                description: "Success message shown before checking if optimize_database() succeeds",
                recommendation: "Check operation result before showing success message",
                max_findings: Some(1),
            },
            premature_success_rule,
        )),
        Box::new(Signature::new(
            SignatureSpec {
                id: "BUG-010",
                severity: Severity::Medium,
                target: "app/lib/WhitelistTreeEditor.cpp",
                description: "item->child(i) can return nullptr but passed to item_to_node without check",
                recommendation: "Check if child is null before recursive call",
                max_findings: Some(1),
            },
            unchecked_child_rule,
        )),
        Box::new(Signature::new(
            SignatureSpec {
                id: "BUG-011",
                severity: Severity::Low,
                target: "app/lib/FileTinderDialog.cpp",
                description: "Generic error message without logging specific failure reason",
                recommendation: "Log file.errorString() or specific error reason for debugging",
                max_findings: Some(1),
            },
            generic_file_error_rule,
        )),
        Box::new(Signature::new(
            SignatureSpec {
                id: "BUG-012",
                severity: Severity::Low,
                target: "app/lib/GeminiClient.cpp",
                description: "Bare catch(...) swallows all exceptions including system errors",
                recommendation: "Catch specific exceptions: catch(const std::exception& e) and log error",
                max_findings: None,
            },
            bare_catch_rule,
        )),
    ]
}

/// BUG-001: a detached thread launched after taking the address of a member
/// flag, the classic use-after-free shape.
fn detached_thread_rule(content: &str) -> Result<Vec<SignatureMatch>> {
    let re = Regex::new(r"(?s)std::atomic<bool>\*\s+\w+\s*=\s*&\w+;.*?\.detach\(\);")?;
    let Some(found) = re.find(content) else {
        return Ok(Vec::new());
    };

    let detach_offset = found
        .as_str()
        .find(".detach()")
        .map(|inner| found.start() + inner)
        .unwrap_or(found.start());
    Ok(vec![SignatureMatch::new(
        line_number_at(content, detach_offset),
        found.as_str(),
    )])
}

/// BUG-002: `topLevelItem(i)->` dereferences with no null check in the three
/// preceding lines.
fn unchecked_top_level_item_rule(content: &str) -> Result<Vec<SignatureMatch>> {
    let deref = Regex::new(r"topLevelItem\(\w+\)->")?;
    let guard = Regex::new(r"if\s*\(")?;
    let lines: Vec<&str> = content.lines().collect();

    let mut matches = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let Some(found) = deref.find(line) else {
            continue;
        };
        if guard.is_match(&line[found.end()..]) {
            continue;
        }
        let has_null_check = lines[idx.saturating_sub(3)..idx]
            .iter()
            .any(|prev| prev.contains("if") && (prev.contains("nullptr") || prev.contains("!item")));
        if !has_null_check {
            matches.push(SignatureMatch::new(idx + 1, line.trim()));
        }
    }
    Ok(matches)
}

/// BUG-003: `std::stol(` followed within ten lines by a bare `catch (...)`.
fn stol_bare_catch_rule(content: &str) -> Result<Vec<SignatureMatch>> {
    let lines: Vec<&str> = content.lines().collect();

    let mut matches = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if !line.contains("std::stol(") {
            continue;
        }
        let window_end = (idx + 1 + 10).min(lines.len());
        let has_bare_catch = lines[idx + 1..window_end]
            .iter()
            .any(|next| next.contains("catch") && next.contains("..."));
        if has_bare_catch {
            matches.push(SignatureMatch::new(idx + 1, line.trim()));
        }
    }
    Ok(matches)
}

/// BUG-004: `ProgressData::last_activity_ms` declared without an atomic
/// wrapper while the struct is shared with worker threads.
fn non_atomic_progress_rule(content: &str) -> Result<Vec<SignatureMatch>> {
    if !content.contains("struct ProgressData")
        || !content.contains("last_activity_ms")
        || content.contains("std::atomic<uint64_t>")
    {
        return Ok(Vec::new());
    }

    let lines: Vec<&str> = content.lines().collect();
    let line_number = lines
        .iter()
        .enumerate()
        .find(|(idx, line)| {
            line.contains("last_activity_ms")
                && lines[idx.saturating_sub(4)..=*idx]
                    .iter()
                    .any(|ctx| ctx.contains("struct ProgressData"))
        })
        .map(|(idx, _)| idx + 1)
        .unwrap_or(0);

    Ok(vec![SignatureMatch::new(
        line_number,
        "uint64_t last_activity_ms = 0;  // Not atomic!",
    )])
}

/// BUG-005: manual `delete` of a tree item that Qt owns.
fn manual_tree_item_delete_rule(content: &str) -> Result<Vec<SignatureMatch>> {
    let re = Regex::new(r"delete\s+tree_widget_->takeTopLevelItem")?;
    Ok(content
        .lines()
        .enumerate()
        .filter(|(_, line)| re.is_match(line))
        .map(|(idx, line)| SignatureMatch::new(idx + 1, line.trim()))
        .collect())
}

/// BUG-006: whole-statement `db_.method(...);` lines whose result is
/// discarded and whose preceding line carries no `if`.
fn unchecked_db_call_rule(content: &str) -> Result<Vec<SignatureMatch>> {
    let re = Regex::new(r"^\s*db_\.\w+\([^;]+\);\s*$")?;
    let lines: Vec<&str> = content.lines().collect();

    let mut matches = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if !re.is_match(line) {
            continue;
        }
        if idx == 0 || lines[idx - 1].contains("if") {
            continue;
        }
        matches.push(SignatureMatch::new(idx + 1, line.trim()));
    }
    Ok(matches)
}

/// BUG-007: prepared statement not finalized on the error path.
fn sql_statement_leak_rule(content: &str) -> Result<Vec<SignatureMatch>> {
    if !content.contains("sqlite3_prepare_v2") || !content.contains("prepare_statement") {
        return Ok(Vec::new());
    }
    if content.contains("sqlite3_finalize(raw)") {
        return Ok(Vec::new());
    }

    Ok(content
        .lines()
        .enumerate()
        .find(|(_, line)| line.contains("sqlite3_prepare_v2"))
        .map(|(idx, line)| vec![SignatureMatch::new(idx + 1, line.trim())])
        .unwrap_or_default())
}

/// BUG-008: process-wide `static PersistentState` shared across instances.
fn static_state_rule(content: &str) -> Result<Vec<SignatureMatch>> {
    Ok(content
        .lines()
        .enumerate()
        .find(|(_, line)| line.contains("static PersistentState"))
        .map(|(idx, line)| vec![SignatureMatch::new(idx + 1, line.trim())])
        .unwrap_or_default())
}

/// BUG-009: success dialog raised inside `on_optimize_clicked` before the
/// optimize call's result is known.
fn premature_success_rule(content: &str) -> Result<Vec<SignatureMatch>> {
    if !content.contains("on_optimize_clicked") {
        return Ok(Vec::new());
    }

    let lines: Vec<&str> = content.lines().collect();
    let mut in_optimize = false;
    for (idx, line) in lines.iter().enumerate() {
        if line.contains("on_optimize_clicked") {
            in_optimize = true;
        }
        if in_optimize && line.contains("QMessageBox::information") {
            let window_end = (idx + 1 + 10).min(lines.len());
            let calls_optimize_later = lines[idx + 1..window_end]
                .iter()
                .any(|next| next.contains("optimize_database()"));
            if calls_optimize_later && !line.contains("if") {
                return Ok(vec![SignatureMatch::new(idx + 1, line.trim())]);
            }
        }
        if in_optimize && line.trim() == "}" {
            break;
        }
    }
    Ok(Vec::new())
}

/// BUG-010: `item->child(i)` fed straight into the recursive conversion with
/// no null check in the surrounding context, two lines before through three
/// after.
fn unchecked_child_rule(content: &str) -> Result<Vec<SignatureMatch>> {
    if !content.contains("item_to_node") {
        return Ok(Vec::new());
    }

    let lines: Vec<&str> = content.lines().collect();
    for (idx, line) in lines.iter().enumerate() {
        if !line.contains("item->child(") || !line.contains("item_to_node") {
            continue;
        }
        let context = &lines[idx.saturating_sub(2)..(idx + 4).min(lines.len())];
        let guarded = context.iter().any(|ctx| ctx.contains("if"))
            && context.iter().any(|ctx| ctx.contains("nullptr"));
        if !guarded {
            return Ok(vec![SignatureMatch::new(idx + 1, line.trim())]);
        }
    }
    Ok(Vec::new())
}

/// BUG-011: a generic "Unable to read file" message with no specific error
/// reason logged nearby.
fn generic_file_error_rule(content: &str) -> Result<Vec<SignatureMatch>> {
    if !content.contains("preview_file") || !content.contains("Unable to read file") {
        return Ok(Vec::new());
    }

    let lines: Vec<&str> = content.lines().collect();
    for (idx, line) in lines.iter().enumerate() {
        if !line.contains("Unable to read file") {
            continue;
        }
        let context = &lines[idx.saturating_sub(4)..=idx];
        let logs_reason = context
            .iter()
            .any(|ctx| ctx.contains("errorString") || ctx.contains("error()"));
        if !logs_reason {
            return Ok(vec![SignatureMatch::new(idx + 1, line.trim())]);
        }
    }
    Ok(Vec::new())
}

/// BUG-012: empty bare `catch (...)` blocks.
fn bare_catch_rule(content: &str) -> Result<Vec<SignatureMatch>> {
    let lines: Vec<&str> = content.lines().collect();

    let mut matches = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if !line.contains("catch") || !line.contains("...") {
            continue;
        }
        if lines.get(idx + 1).map(|next| next.trim()) == Some("}") {
            matches.push(SignatureMatch::new(idx + 1, line.trim()));
        }
    }
    Ok(matches)
}

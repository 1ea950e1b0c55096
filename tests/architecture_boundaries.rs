use std::fs;
use std::path::{Path, PathBuf};

fn rs_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|s| s.to_str()) == Some("rs") {
                out.push(path);
            }
        }
    }
    out.sort();
    out
}

fn rel(path: &Path) -> String {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let rel = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string();
    rel.replace('\\', "/")
}

fn violations_in(dir: &str, forbidden: &[&str]) -> Vec<String> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join(dir);
    let mut violations = Vec::new();
    for file in rs_files(&root) {
        let content = fs::read_to_string(&file).unwrap_or_default();
        for needle in forbidden {
            if content.contains(needle) {
                violations.push(format!(
                    "{} uses forbidden dependency `{}`",
                    rel(&file),
                    needle
                ));
            }
        }
    }
    violations
}

#[test]
fn plot_module_is_pure() {
    let violations = violations_in(
        "src/plot",
        &[
            "crate::ui",
            "crate::app",
            "crate::report",
            "ratatui",
            "crossterm",
            "tokio",
            "std::fs",
            "std::io",
        ],
    );
    assert!(
        violations.is_empty(),
        "Plot layering violations:\n{}",
        violations.join("\n")
    );
}

#[test]
fn snapshot_module_does_not_know_about_plots_or_ui() {
    let violations = violations_in("src/snapshot", &["crate::plot", "crate::ui", "ratatui"]);
    assert!(
        violations.is_empty(),
        "Snapshot layering violations:\n{}",
        violations.join("\n")
    );
}

#[test]
fn ui_module_does_not_read_the_log() {
    let violations = violations_in("src/ui", &["LogTail", "read_log", "std::fs"]);
    assert!(
        violations.is_empty(),
        "UI/log boundary violations:\n{}",
        violations.join("\n")
    );
}

//! Hygiene: source-scan budgets for the tracker core.
//!
//! The tracker is a pure core. It must not crash, must not swallow errors,
//! and must not reach for a clock or a console of its own; time and I/O come
//! from the host. Each pattern below has a budget (ideally zero) that may
//! only shrink.

use std::fs;
use std::path::{Path, PathBuf};

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const PANICS: &[Budget] = &[
    Budget { pattern: ".unwrap()", max: 0, why: "propagate or handle the error" },
    Budget { pattern: ".expect(", max: 0, why: "propagate or handle the error" },
    Budget { pattern: "panic!(", max: 0, why: "the frame loop must not crash" },
    Budget { pattern: "unreachable!(", max: 0, why: "encode the case in the type instead" },
    Budget { pattern: "todo!(", max: 0, why: "no stubs in the core" },
    Budget { pattern: "unimplemented!(", max: 0, why: "no stubs in the core" },
];

const SILENT_LOSS: &[Budget] = &[
    Budget { pattern: "let _ =", max: 0, why: "inspect the result" },
    Budget { pattern: ".ok()", max: 0, why: "inspect the error before dropping it" },
];

const PURITY: &[Budget] = &[
    Budget { pattern: "Instant::now", max: 0, why: "time is passed in as now_ms" },
    Budget { pattern: "SystemTime", max: 0, why: "time is passed in as now_ms" },
    Budget { pattern: "println!(", max: 0, why: "the core does no I/O" },
    Budget { pattern: "eprintln!(", max: 0, why: "the core does no I/O" },
    Budget { pattern: "#[allow(dead_code)]", max: 0, why: "delete it instead" },
];

/// Production `.rs` files under `src/`, excluding sibling `_test.rs` files.
fn production_files() -> Vec<(PathBuf, String)> {
    let mut out = Vec::new();
    walk(Path::new("src"), &mut out);
    out
}

fn walk(dir: &Path, out: &mut Vec<(PathBuf, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            walk(&path, out);
            continue;
        }
        let is_rs = path.extension().is_some_and(|e| e == "rs");
        let is_test = path.to_string_lossy().ends_with("_test.rs");
        if is_rs && !is_test {
            if let Ok(content) = fs::read_to_string(&path) {
                out.push((path, content));
            }
        }
    }
}

/// Count code lines containing `pattern`; comment lines are skipped.
fn hits(files: &[(PathBuf, String)], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|(path, content)| {
            let count = content
                .lines()
                .filter(|line| !line.trim_start().starts_with("//"))
                .filter(|line| line.contains(pattern))
                .count();
            (count > 0).then(|| (path.display().to_string(), count))
        })
        .collect()
}

fn enforce(budgets: &[Budget]) {
    let files = production_files();
    assert!(!files.is_empty(), "no production sources found under src/");

    let mut failures = Vec::new();
    for budget in budgets {
        let found = hits(&files, budget.pattern);
        let count: usize = found.iter().map(|(_, c)| c).sum();
        if count > budget.max {
            let detail = found.iter().map(|(p, c)| format!("    {p}: {c}")).collect::<Vec<_>>().join("\n");
            failures.push(format!(
                "`{}` budget exceeded: found {count}, max {} ({})\n{detail}",
                budget.pattern, budget.max, budget.why
            ));
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn panic_budget() {
    enforce(PANICS);
}

#[test]
fn silent_loss_budget() {
    enforce(SILENT_LOSS);
}

#[test]
fn purity_budget() {
    enforce(PURITY);
}

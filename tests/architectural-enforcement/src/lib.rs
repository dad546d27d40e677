//! Architectural Enforcement
//!
//! Source scanners backing the workspace's architectural tests:
//! - No sleep calls in production code (scroll animation is frame-scheduled)
//! - No blocking HTTP client in the inspector core
//!
//! Scanning is line based. Comments are ignored, and everything after the
//! first `#[cfg(test)]` of a file is treated as test code.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// A forbidden construct found in production code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File the construct was found in
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// The offending line, trimmed
    pub text: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line, self.text)
    }
}

/// A set of forbidden code fragments
#[derive(Debug, Clone, Copy)]
pub struct Prohibition {
    /// Short name used in reports
    pub name: &'static str,
    /// Substrings that must not appear in production code
    pub patterns: &'static [&'static str],
    /// Allow matches in a `tokio::time::interval` context
    pub allow_interval: bool,
}

/// Sleep calls of any flavour
pub const NO_SLEEP: Prohibition = Prohibition {
    name: "sleep",
    patterns: &["::sleep(", ".sleep(", "sleep_until("],
    allow_interval: true,
};

/// Blocking HTTP clients
pub const NO_BLOCKING_HTTP: Prohibition = Prohibition {
    name: "blocking http",
    patterns: &["reqwest::blocking", "ureq::"],
    allow_interval: false,
};

/// Scan every `.rs` file under `dir`
///
/// A missing directory yields no violations.
#[must_use]
pub fn scan_dir(dir: &Path, prohibition: &Prohibition) -> Vec<Violation> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .flat_map(|entry| {
            let path = entry.path().to_path_buf();
            match fs::read_to_string(&path) {
                Ok(content) => scan_source(&path, &content, prohibition),
                Err(_) => Vec::new(),
            }
        })
        .collect()
}

/// Scan one file's contents
#[must_use]
pub fn scan_source(path: &Path, content: &str, prohibition: &Prohibition) -> Vec<Violation> {
    let lines: Vec<&str> = content.lines().collect();
    let production_end = test_module_start(&lines).unwrap_or(lines.len());

    let mut violations = Vec::new();
    for (idx, line) in lines[..production_end].iter().enumerate() {
        let code = line.split("//").next().unwrap_or(line);
        if !prohibition.patterns.iter().any(|p| code.contains(p)) {
            continue;
        }
        if prohibition.allow_interval && is_interval_pattern(&lines, idx) {
            continue;
        }

        violations.push(Violation {
            path: path.to_path_buf(),
            line: idx + 1,
            text: line.trim().to_string(),
        });
    }
    violations
}

/// Index of the first `#[cfg(test)]` line
#[must_use]
pub fn test_module_start(lines: &[&str]) -> Option<usize> {
    lines
        .iter()
        .position(|line| line.trim_start().starts_with("#[cfg(test)]"))
}

/// Whether the line sits in a loop paced by `tokio::time::interval`
#[must_use]
pub fn is_interval_pattern(lines: &[&str], current_idx: usize) -> bool {
    let before = current_idx.saturating_sub(20)..current_idx;
    let after = current_idx..lines.len().min(current_idx + 5);

    lines[before]
        .iter()
        .any(|line| line.contains(".tick()") || line.contains("time::interval("))
        || lines[after].iter().any(|line| line.contains(".tick()"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(code: &str, prohibition: &Prohibition) -> Vec<Violation> {
        scan_source(Path::new("demo.rs"), code, prohibition)
    }

    #[test]
    fn test_sleep_is_detected() {
        let code = "fn poll() {\n    tokio::time::sleep(Duration::from_millis(10)).await;\n}\n";
        let violations = scan(code, &NO_SLEEP);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 2);
        assert!(violations[0].to_string().starts_with("demo.rs:2 - tokio::time::sleep"));
    }

    #[test]
    fn test_comments_and_test_modules_are_skipped() {
        let code = "// std::thread::sleep(d) is forbidden\n\
                    fn ok() {}\n\
                    #[cfg(test)]\n\
                    mod tests {\n\
                        fn t() { std::thread::sleep(d); }\n\
                    }\n";
        assert!(scan(code, &NO_SLEEP).is_empty());
    }

    #[test]
    fn test_interval_paced_loop_is_allowed() {
        let code = "let mut ticker = time::interval(frame);\n\
                    loop {\n\
                        ticker.tick().await;\n\
                        tokio::time::sleep_until(deadline).await;\n\
                    }\n";
        assert!(scan(code, &NO_SLEEP).is_empty());
        assert_eq!(
            scan("let c = reqwest::blocking::Client::new();", &NO_BLOCKING_HTTP).len(),
            1
        );
    }
}

//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code in the inspector core MUST NOT sleep or use a
//! blocking HTTP client. Scroll animation is paced by a frame clock and the
//! completion call is async.
//!
//! **Exceptions**: loops paced by `tokio::time::interval`, test code.

use std::path::PathBuf;

use architectural_enforcement::{scan_dir, Prohibition, Violation, NO_BLOCKING_HTTP, NO_SLEEP};

fn core_src() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../inspector/core/src")
}

fn report(prohibition: &Prohibition, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\nForbidden {} calls found in production code:", prohibition.name);
    for violation in violations {
        eprintln!("  {violation}");
    }
    eprintln!("\nAcceptable:");
    eprintln!("  - Frame pacing with tokio::time::interval()");
    eprintln!("  - Test code (after #[cfg(test)])");

    panic!(
        "\nFound {} {} violation(s) in production code.",
        violations.len(),
        prohibition.name
    );
}

#[test]
fn test_core_sources_are_present() {
    assert!(
        core_src().join("lib.rs").exists(),
        "inspector core sources not found at {}",
        core_src().display()
    );
}

#[test]
fn test_no_sleep_in_inspector_core() {
    let violations = scan_dir(&core_src(), &NO_SLEEP);
    report(&NO_SLEEP, &violations);
}

#[test]
fn test_no_blocking_http_in_inspector_core() {
    let violations = scan_dir(&core_src(), &NO_BLOCKING_HTTP);
    report(&NO_BLOCKING_HTTP, &violations);
}

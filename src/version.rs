//! Version-gate comparison.
//!
//! Plugin versions arrive as loose dotted strings ("4.11", "4.11.0",
//! "4.12.0-beta.1"). They are normalized to three components before a
//! `semver` comparison; anything that still fails to parse never trips a
//! gate.

use semver::Version;

/// True when both a minimum and a detected version are present and the
/// detected version is older than the minimum.
pub fn below_minimum(detected: &str, minimum: &str) -> bool {
    if detected.is_empty() || minimum.is_empty() {
        return false;
    }

    match (parse_loose(detected), parse_loose(minimum)) {
        (Some(detected), Some(minimum)) => detected < minimum,
        _ => false,
    }
}

/// Parse a loose dotted version, padding missing minor/patch components.
fn parse_loose(raw: &str) -> Option<Version> {
    let raw = raw.trim().trim_start_matches('v');
    if raw.is_empty() {
        return None;
    }

    if let Ok(version) = Version::parse(raw) {
        return Some(version);
    }

    // Split off any pre-release/build suffix before padding.
    let (core, suffix) = match raw.find(|c| c == '-' || c == '+') {
        Some(index) => raw.split_at(index),
        None => (raw, ""),
    };

    let mut parts: Vec<&str> = core.split('.').collect();
    while parts.len() < 3 {
        parts.push("0");
    }
    if parts.len() > 3 {
        return None;
    }

    Version::parse(&format!("{}{}", parts.join("."), suffix)).ok()
}

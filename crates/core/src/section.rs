//! Locating and splicing top-level sections in a line-oriented document
//!
//! The project document may contain YAML constructs the codec would
//! reformat or reject, so the section boundaries are found with a plain
//! linear scan over lines instead of a structural parse. Everything
//! outside the located range is passed through byte-for-byte.

use std::collections::BTreeMap;

use crate::error::Error;
use crate::model::{MaterializedTarget, TargetConfig};

/// The half-open line range `[start, end)` of a top-level section,
/// including its sentinel line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBounds {
    pub start: usize,
    pub end: usize,
}

/// Find the section introduced by `sentinel` (an exact line match, e.g.
/// `targets:`).
///
/// The section ends at the first subsequent line that is non-empty and
/// does not start with whitespace, or at the end of the document. Fails
/// if the sentinel is absent or is the last line of the document.
pub fn locate_section(lines: &[String], sentinel: &str) -> Result<SectionBounds, Error> {
    let start = lines
        .iter()
        .position(|line| line == sentinel)
        .ok_or_else(|| Error::SectionMissing(sentinel.to_string()))?;

    if start + 1 >= lines.len() {
        return Err(Error::SectionEmpty(sentinel.to_string()));
    }

    let end = lines[start + 1..]
        .iter()
        .position(|line| line.chars().next().is_some_and(|c| !c.is_whitespace()))
        .map(|offset| start + 1 + offset)
        .unwrap_or(lines.len());

    Ok(SectionBounds { start, end })
}

/// Join the lines of a located section back into a single document.
pub fn section_text(lines: &[String], bounds: SectionBounds) -> String {
    lines[bounds.start..bounds.end].join("\n")
}

/// Remove the located section, returning the remaining lines.
///
/// The returned insertion index (`bounds.start`) is where a replacement
/// body must later be spliced to restore the original layout.
pub fn remove_section(lines: &[String], bounds: SectionBounds) -> Vec<String> {
    let mut remaining = Vec::with_capacity(lines.len() - (bounds.end - bounds.start));
    remaining.extend_from_slice(&lines[..bounds.start]);
    remaining.extend_from_slice(&lines[bounds.end..]);
    remaining
}

/// Insert `body` at `index`, returning a new line sequence.
///
/// Never mutates the input; lines outside the insertion point are
/// carried over unchanged.
pub fn splice_section(lines: &[String], index: usize, body: &[String]) -> Vec<String> {
    let mut spliced = Vec::with_capacity(lines.len() + body.len());
    spliced.extend_from_slice(&lines[..index]);
    spliced.extend_from_slice(body);
    spliced.extend_from_slice(&lines[index..]);
    spliced
}

/// Encode a target set as a replacement `targets:` section body.
///
/// Targets are keyed by their qualified name under a single top-level
/// `targets` key; `BTreeMap` keeps map keys lexicographically sorted so
/// the encoding is canonical and diff-friendly.
pub fn encode_targets(targets: &[MaterializedTarget]) -> Result<Vec<String>, Error> {
    let mapping: BTreeMap<&str, &TargetConfig> = targets
        .iter()
        .map(|target| (target.name.as_str(), &target.config))
        .collect();
    let document = BTreeMap::from([("targets", mapping)]);

    let yaml = serde_yaml::to_string(&document)?;
    Ok(yaml.lines().map(String::from).collect())
}

//! The operation surface: `regenerate` and `add_dependency`
//!
//! Each operation is one sequential pipeline over the two documents.
//! All parsing and resolution completes before anything is written, so
//! a structural failure leaves both files exactly as they were.
//! Filesystem migration runs against the project document's parent
//! directory.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::Error;
use crate::migrate;
use crate::shell::Shell;
use crate::{intent, project, resolve, section};

/// What a [`regenerate`] run materialized.
#[derive(Debug, Clone, Default)]
pub struct RegenerateOutcome {
    /// Qualified names of newly synthesized targets, in the order they
    /// were resolved. Empty when the document pair was already a fixed
    /// point.
    pub new_targets: Vec<String>,
}

impl RegenerateOutcome {
    pub fn is_noop(&self) -> bool {
        self.new_targets.is_empty()
    }
}

/// Synthesize missing targets, splice the regenerated section into the
/// project document, migrate stolen sources, and persist both
/// documents.
pub fn regenerate(intent_path: &Path, project_path: &Path) -> Result<RegenerateOutcome, Error> {
    let intent_text = fs::read_to_string(intent_path)?;
    let project_text = fs::read_to_string(project_path)?;

    let declared = intent::parse(&intent_text)?;
    let intent_lines: Vec<String> = intent_text.lines().map(String::from).collect();
    let document = project::parse(&project_text)?;

    let new_targets = resolve::resolve(&declared, &document.targets);
    info!(count = new_targets.len(), "synthesized targets");

    let mut all_targets = document.targets.clone();
    all_targets.extend(new_targets.iter().cloned());

    let body = section::encode_targets(&all_targets)?;
    let project_lines = section::splice_section(&document.lines, document.insert_at, &body);
    let rewritten_intent = intent::rewrite_lines(&intent_lines, &declared)?;

    let shell = Shell::new(project_root(project_path));
    migrate::create_source_dirs(&shell, &new_targets);
    migrate::steal_files(&shell, &declared, &new_targets);

    write_lines(project_path, &project_lines)?;
    write_lines(intent_path, &rewritten_intent)?;

    Ok(RegenerateOutcome {
        new_targets: new_targets.into_iter().map(|target| target.name).collect(),
    })
}

/// Append a dependency reference to every declared target's
/// materialized entry and persist the project document.
pub fn add_dependency(
    name: &str,
    intent_path: &Path,
    project_path: &Path,
) -> Result<(), Error> {
    let intent_text = fs::read_to_string(intent_path)?;
    let project_text = fs::read_to_string(project_path)?;

    let declared = intent::parse(&intent_text)?;
    let document = project::parse(&project_text)?;
    let packages = project::known_packages(&project_text);

    let updated = resolve::inject_dependency(name, &declared, &document.targets, &packages)?;

    let body = section::encode_targets(&updated)?;
    let project_lines = section::splice_section(&document.lines, document.insert_at, &body);

    write_lines(project_path, &project_lines)?;
    Ok(())
}

fn project_root(project_path: &Path) -> &Path {
    match project_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn write_lines(path: &Path, lines: &[String]) -> Result<(), Error> {
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}

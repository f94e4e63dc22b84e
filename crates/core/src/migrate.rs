//! Migrating source files into a newly materialized target's tree
//!
//! Migration is opportunistic: a steal pattern with no matches, or a
//! failing copy, degrades to a warning and never aborts the run. All
//! path arithmetic works on `/`-separated relative paths as they appear
//! in the documents; resolution against the filesystem goes through
//! [`Shell`].

use tracing::{debug, warn};

use crate::intent::DeclaredConfig;
use crate::model::MaterializedTarget;
use crate::shell::Shell;

/// Create the source directories of newly materialized targets.
///
/// Only entries whose last path segment has no extension are treated as
/// directories; anything else is left for the copy step.
pub fn create_source_dirs(shell: &Shell, targets: &[MaterializedTarget]) {
    for target in targets {
        let Some(sources) = &target.config.sources else {
            continue;
        };
        for source in sources {
            if looks_like_dir(source) {
                if let Err(err) = shell.mkdir_p(source) {
                    warn!(source, %err, "failed to create source directory");
                }
            }
        }
    }
}

/// Copy steal-pattern matches from donor directories into each new
/// target's tree.
///
/// For each pattern the migration root is the matched directory itself
/// when the pattern names one exactly, otherwise the parent directory
/// of the first match. The destination swaps the root's second path
/// segment for the new target's bare name.
pub fn steal_files(
    shell: &Shell,
    declared: &DeclaredConfig,
    new_targets: &[MaterializedTarget],
) {
    for target in declared.targets.iter().filter(|declared_target| {
        let qualified = declared.qualified_name(&declared_target.name);
        new_targets.iter().any(|new| new.name == qualified)
    }) {
        let Some(steals) = &target.steals else {
            debug!(target_name = %target.name, "target has nothing to steal");
            continue;
        };

        for pattern in steals {
            let full_pattern = format!("{}/{}", declared.project_name, pattern);
            let matches = match shell.glob(&full_pattern) {
                Ok(matches) => matches,
                Err(err) => {
                    warn!(pattern = %full_pattern, %err, "glob expansion failed");
                    continue;
                }
            };
            let Some(first) = matches.first() else {
                continue;
            };

            let root = if *first == full_pattern && shell.is_dir(first) {
                first.clone()
            } else {
                parent_dir(first)
            };

            copy_into_target(shell, &matches, &target.name, &root);
        }
    }
}

fn copy_into_target(shell: &Shell, paths: &[String], target_name: &str, root: &str) {
    let mut segments = components(root);
    if segments.len() < 2 {
        warn!(root, "migration root has no target segment to substitute");
        return;
    }
    segments[1] = target_name;
    let destination = segments.join("/");

    if let Err(err) = shell.mkdir_p(&destination) {
        warn!(%destination, %err, "failed to create destination directory");
        return;
    }

    for path in paths {
        let recursive = shell.is_dir(path);
        if let Err(err) = shell.copy(recursive, path, &destination) {
            warn!(%path, %destination, %err, "copy failed");
        }
    }
}

fn components(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

fn parent_dir(path: &str) -> String {
    let segments = components(path);
    segments[..segments.len().saturating_sub(1)].join("/")
}

fn looks_like_dir(path: &str) -> bool {
    components(path)
        .last()
        .is_some_and(|segment| !segment.contains('.'))
}

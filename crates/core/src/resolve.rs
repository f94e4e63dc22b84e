//! Inheritance resolution and dependency injection
//!
//! The resolver synthesizes materialized targets for declared targets
//! that are not yet present in the project document, cloning a donor's
//! configuration. Pending targets are processed in sorted declared-name
//! order so resolution is deterministic regardless of how the intent
//! mapping was authored.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::Error;
use crate::intent::DeclaredConfig;
use crate::model::MaterializedTarget;

/// Synthesize materialized targets for declared targets absent from the
/// project document.
///
/// For each pending target the donor is the materialized counterpart of
/// its `inherit` pointer, or, when no pointer is given, the first
/// materialized target (in document order) corresponding to any
/// declared target. A pending target with no donor is skipped with a
/// warning; partial materialization is valid.
///
/// The returned targets are not merged into `materialized`; merging is
/// the caller's responsibility.
pub fn resolve(
    declared: &DeclaredConfig,
    materialized: &[MaterializedTarget],
) -> Vec<MaterializedTarget> {
    let mut pending: Vec<_> = declared
        .targets
        .iter()
        .filter(|target| {
            let qualified = declared.qualified_name(&target.name);
            !materialized.iter().any(|existing| existing.name == qualified)
        })
        .collect();
    pending.sort_unstable_by(|a, b| a.name.cmp(&b.name));

    pending
        .into_iter()
        .filter_map(|target| {
            let donor = match &target.inherit {
                Some(inherit) => {
                    let wanted = declared.qualified_name(inherit);
                    materialized.iter().find(|existing| existing.name == wanted)
                }
                None => materialized.iter().find(|existing| {
                    declared
                        .targets
                        .iter()
                        .any(|decl| existing.name == declared.qualified_name(&decl.name))
                }),
            };

            let Some(donor) = donor else {
                warn!(
                    target_name = %target.name,
                    "can't find a target to inherit from, skipping"
                );
                return None;
            };

            Some(synthesize(declared, &target.name, donor))
        })
        .collect()
}

/// Clone the donor's configuration for a pending target.
///
/// `sources` is always overridden with the shared COMMON path and the
/// target's own path. When the donor carries `settings.base`, the
/// Info.plist location is pointed at the new target's directory; a
/// donor with no base settings gets no override, and no settings block
/// is ever synthesized just to hold one.
fn synthesize(
    declared: &DeclaredConfig,
    bare_name: &str,
    donor: &MaterializedTarget,
) -> MaterializedTarget {
    let project = &declared.project_name;
    let mut config = donor.config.clone();

    config.sources = Some(vec![
        format!("{project}/COMMON"),
        format!("{project}/{bare_name}"),
    ]);

    if let Some(base) = config.settings.as_mut().and_then(|s| s.base.as_mut()) {
        base.insert(
            "INFOPLIST_FILE".to_string(),
            format!("{project}/{bare_name}/Resources/Info.plist"),
        );
    }

    MaterializedTarget {
        original_name: bare_name.to_string(),
        name: declared.qualified_name(bare_name),
        config,
    }
}

/// The two reference kinds a dependency entry can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DependencyKind {
    Package,
    Target,
}

impl DependencyKind {
    fn key(self) -> &'static str {
        match self {
            DependencyKind::Package => "package",
            DependencyKind::Target => "target",
        }
    }
}

/// Append a dependency reference to every materialized target that
/// traces back to a declared target.
///
/// `name` is classified as a package when present in `known_packages`,
/// else as a target when it matches a declared target's bare name; an
/// unclassifiable name fails with [`Error::DependencyNotFound`] and
/// nothing is modified. Pre-existing targets with no declaration are
/// never touched. Injection is idempotent: a target already carrying
/// the exact entry is left as is.
pub fn inject_dependency(
    name: &str,
    declared: &DeclaredConfig,
    materialized: &[MaterializedTarget],
    known_packages: &[String],
) -> Result<Vec<MaterializedTarget>, Error> {
    let kind = if known_packages.iter().any(|package| package == name) {
        DependencyKind::Package
    } else if declared.declared(name).is_some() {
        DependencyKind::Target
    } else {
        return Err(Error::DependencyNotFound(name.to_string()));
    };

    let entry: BTreeMap<String, String> =
        BTreeMap::from([(kind.key().to_string(), name.to_string())]);

    let updated = materialized
        .iter()
        .map(|target| {
            let from_declaration = declared
                .targets
                .iter()
                .any(|decl| target.name == declared.qualified_name(&decl.name));
            if !from_declaration {
                return target.clone();
            }

            let mut target = target.clone();
            let dependencies = target.config.dependencies.get_or_insert_with(Vec::new);
            if !dependencies.contains(&entry) {
                dependencies.push(entry.clone());
            }
            target
        })
        .collect();

    Ok(updated)
}

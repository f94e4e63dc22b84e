//! Parsing the generated project document
//!
//! Only the `targets:` section is decoded; the rest of the document is
//! kept as an opaque line sequence so unrelated sections survive a
//! round-trip untouched. The optional `packages:` section is scanned
//! separately for the dependency injector's known-package list.

use serde_yaml::Value;

use crate::error::Error;
use crate::model::MaterializedTarget;
use crate::section;

/// A project document with its `targets:` section lifted out.
#[derive(Debug, Clone)]
pub struct ProjectDocument {
    /// All lines outside the targets section, in original order.
    pub lines: Vec<String>,
    /// Where the targets section previously lived, and where the
    /// regenerated section must be spliced back.
    pub insert_at: usize,
    /// Targets decoded from the removed section, in document order.
    pub targets: Vec<MaterializedTarget>,
}

/// Parse the project document, extracting and decoding its targets.
///
/// Targets with a missing required field are dropped with a warning;
/// structural problems (no `targets:` sentinel, no body) are fatal.
pub fn parse(text: &str) -> Result<ProjectDocument, Error> {
    let lines: Vec<String> = text.lines().map(String::from).collect();

    let bounds = section::locate_section(&lines, "targets:")?;
    let body = section::section_text(&lines, bounds);

    let root: Value = serde_yaml::from_str(&body)?;
    let Value::Mapping(root) = root else {
        return Err(Error::NotAMapping);
    };
    let Some(Value::Mapping(entries)) = root.get("targets") else {
        return Err(Error::MissingTargets);
    };

    let targets = entries
        .iter()
        .filter_map(|(key, value)| {
            let name = key.as_str()?;
            MaterializedTarget::from_value(name, value)
        })
        .collect();

    Ok(ProjectDocument {
        lines: section::remove_section(&lines, bounds),
        insert_at: bounds.start,
        targets,
    })
}

/// Collect the package names declared in the project document.
///
/// A missing or empty `packages:` section yields an empty list, never
/// an error; the section is optional.
pub fn known_packages(text: &str) -> Vec<String> {
    let lines: Vec<String> = text.lines().map(String::from).collect();

    let Ok(bounds) = section::locate_section(&lines, "packages:") else {
        return Vec::new();
    };
    let body = section::section_text(&lines, bounds);

    let Ok(Value::Mapping(root)) = serde_yaml::from_str::<Value>(&body) else {
        return Vec::new();
    };
    let Some(Value::Mapping(packages)) = root.get("packages") else {
        return Vec::new();
    };

    packages
        .keys()
        .filter_map(|key| key.as_str().map(String::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = "\
name: Demo
options:
    bundleIdPrefix: com.example
packages:
    Networking:
        url: https://example.com/networking
        from: 1.0.0
targets:
    DemoBase:
        type: application
        platform: iOS
        sources:
            - Demo/COMMON
            - Demo/Base
    Legacy:
        platform: iOS
schemes:
    DemoBase:
        build: {}
";

    #[test]
    fn extracts_targets_and_preserves_surroundings() {
        let doc = parse(PROJECT).unwrap();

        assert_eq!(doc.targets.len(), 1);
        assert_eq!(doc.targets[0].name, "DemoBase");
        assert_eq!(doc.insert_at, 7);

        // Everything outside the section survives, in order.
        let rest = doc.lines.join("\n");
        assert!(rest.contains("bundleIdPrefix: com.example"));
        assert!(rest.contains("schemes:"));
        assert!(!rest.contains("DemoBase:\n        type"));
    }

    #[test]
    fn malformed_target_is_dropped_not_fatal() {
        let doc = parse(PROJECT).unwrap();
        assert!(doc.targets.iter().all(|target| target.name != "Legacy"));
    }

    #[test]
    fn document_without_targets_section_is_fatal() {
        assert!(matches!(
            parse("name: Demo\nschemes:\n    A: {}\n"),
            Err(Error::SectionMissing(_))
        ));
    }

    #[test]
    fn known_packages_lists_package_names() {
        assert_eq!(known_packages(PROJECT), vec!["Networking"]);
    }

    #[test]
    fn missing_packages_section_is_empty_not_fatal() {
        assert!(known_packages("name: Demo\ntargets:\n    A:\n        type: app\n").is_empty());
    }
}

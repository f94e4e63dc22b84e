//! The in-memory target model and its tolerant decode
//!
//! Decoding is two-phase: the section text is first loaded into a
//! generic [`serde_yaml::Value`] tree, then adapted into the typed model
//! here. A target missing a required field is dropped with a warning so
//! a single malformed entry never blocks the rest; optional fields of
//! unexpected shape are treated as absent. The tool stays usable on
//! partially-authored documents.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_yaml::Value;
use tracing::warn;

/// A fully-specified target entry in the project document.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedTarget {
    /// The bare declared name, used to compute derived paths.
    pub original_name: String,
    /// The name the target carries in the project document. Equals
    /// `projectName + original_name` for synthesized targets and
    /// `original_name` verbatim for pre-existing ones.
    pub name: String,
    pub config: TargetConfig,
}

/// The configuration block of a materialized target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetConfig {
    #[serde(rename = "type")]
    pub target_type: String,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<TargetSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<BTreeMap<String, String>>>,
    #[serde(rename = "postCompileScripts", skip_serializing_if = "Option::is_none")]
    pub post_compile_scripts: Option<Vec<PostCompileScript>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostCompileScript {
    pub name: String,
    pub script: String,
}

impl MaterializedTarget {
    /// Adapt a decoded target entry into the typed model.
    ///
    /// Returns `None` (with a warning) when the entry is not a mapping
    /// or a required field is missing.
    pub fn from_value(name: &str, value: &Value) -> Option<Self> {
        let Value::Mapping(entry) = value else {
            warn!(target_name = name, "target entry is not a mapping, dropping it");
            return None;
        };

        let Some(target_type) = str_field(entry, "type") else {
            warn!(target_name = name, "`type` not found, dropping target");
            return None;
        };

        let Some(platform) = str_field(entry, "platform") else {
            warn!(target_name = name, "`platform` not found, dropping target");
            return None;
        };

        let settings = match entry.get("settings") {
            Some(value) => decode_settings(name, value),
            None => {
                warn!(target_name = name, "no settings found for target");
                None
            }
        };

        let sources = entry.get("sources").and_then(string_seq);
        if sources.is_none() {
            warn!(target_name = name, "sources not found for target");
        }

        let dependencies = entry.get("dependencies").and_then(decode_dependencies);
        let post_compile_scripts = entry
            .get("postCompileScripts")
            .and_then(|value| decode_scripts(name, value));

        Some(Self {
            original_name: name.to_string(),
            name: name.to_string(),
            config: TargetConfig {
                target_type,
                platform,
                settings,
                sources,
                dependencies,
                post_compile_scripts,
            },
        })
    }
}

fn str_field(entry: &serde_yaml::Mapping, key: &str) -> Option<String> {
    entry.get(key).and_then(Value::as_str).map(String::from)
}

/// Render a YAML scalar as the string the project document expects.
/// Build settings are stringly typed even when authored as `1` or `true`.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_seq(value: &Value) -> Option<Vec<String>> {
    let Value::Sequence(items) = value else {
        return None;
    };
    items
        .iter()
        .map(|item| item.as_str().map(String::from))
        .collect()
}

fn decode_settings(name: &str, value: &Value) -> Option<TargetSettings> {
    let Value::Mapping(settings) = value else {
        warn!(target_name = name, "settings is not a mapping, ignoring it");
        return None;
    };

    let groups = settings.get("groups").and_then(string_seq);
    let base = settings.get("base").and_then(|base| {
        let Value::Mapping(base) = base else {
            return None;
        };
        base.iter()
            .map(|(key, value)| Some((key.as_str()?.to_string(), scalar_string(value)?)))
            .collect::<Option<BTreeMap<_, _>>>()
    });

    if groups.is_none() && base.is_none() {
        return None;
    }

    Some(TargetSettings { groups, base })
}

fn decode_dependencies(value: &Value) -> Option<Vec<BTreeMap<String, String>>> {
    let Value::Sequence(items) = value else {
        return None;
    };
    items
        .iter()
        .map(|item| {
            let Value::Mapping(entry) = item else {
                return None;
            };
            entry
                .iter()
                .map(|(key, value)| Some((key.as_str()?.to_string(), value.as_str()?.to_string())))
                .collect::<Option<BTreeMap<_, _>>>()
        })
        .collect()
}

fn decode_scripts(name: &str, value: &Value) -> Option<Vec<PostCompileScript>> {
    let Value::Sequence(items) = value else {
        return None;
    };

    let scripts: Vec<PostCompileScript> = items
        .iter()
        .filter_map(|item| {
            let Value::Mapping(entry) = item else {
                return None;
            };
            let Some(script) = str_field(entry, "script") else {
                warn!(target_name = name, "postCompileScripts entry has no script field");
                return None;
            };
            let Some(script_name) = str_field(entry, "name") else {
                warn!(target_name = name, "postCompileScripts entry has no name field");
                return None;
            };
            Some(PostCompileScript {
                name: script_name,
                script,
            })
        })
        .collect();

    Some(scripts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn decodes_a_full_target() {
        let entry = value(
            "type: application\n\
             platform: iOS\n\
             settings:\n\
             \x20 groups:\n\
             \x20   - Shared\n\
             \x20 base:\n\
             \x20   SWIFT_VERSION: '5.7'\n\
             sources:\n\
             \x20 - Demo/COMMON\n\
             \x20 - Demo/Base\n\
             dependencies:\n\
             \x20 - package: Networking\n\
             postCompileScripts:\n\
             \x20 - name: lint\n\
             \x20   script: swiftlint\n",
        );

        let target = MaterializedTarget::from_value("DemoBase", &entry).unwrap();
        assert_eq!(target.name, "DemoBase");
        assert_eq!(target.config.target_type, "application");
        assert_eq!(target.config.platform, "iOS");

        let settings = target.config.settings.unwrap();
        assert_eq!(settings.groups.unwrap(), vec!["Shared"]);
        assert_eq!(settings.base.unwrap()["SWIFT_VERSION"], "5.7");

        assert_eq!(
            target.config.sources.unwrap(),
            vec!["Demo/COMMON", "Demo/Base"]
        );
        assert_eq!(target.config.dependencies.unwrap()[0]["package"], "Networking");
        assert_eq!(
            target.config.post_compile_scripts.unwrap(),
            vec![PostCompileScript {
                name: "lint".into(),
                script: "swiftlint".into()
            }]
        );
    }

    #[test]
    fn missing_type_drops_the_target() {
        let entry = value("platform: iOS\n");
        assert!(MaterializedTarget::from_value("Broken", &entry).is_none());
    }

    #[test]
    fn missing_platform_drops_the_target() {
        let entry = value("type: application\n");
        assert!(MaterializedTarget::from_value("Broken", &entry).is_none());
    }

    #[test]
    fn numeric_base_values_are_stringified() {
        let entry = value(
            "type: framework\nplatform: iOS\nsettings:\n  base:\n    ENABLE_BITCODE: 1\n    STRIP: true\n",
        );
        let target = MaterializedTarget::from_value("T", &entry).unwrap();
        let base = target.config.settings.unwrap().base.unwrap();
        assert_eq!(base["ENABLE_BITCODE"], "1");
        assert_eq!(base["STRIP"], "true");
    }

    #[test]
    fn empty_settings_mapping_decodes_as_absent() {
        let entry = value("type: framework\nplatform: iOS\nsettings: {}\n");
        let target = MaterializedTarget::from_value("T", &entry).unwrap();
        assert!(target.config.settings.is_none());
    }

    #[test]
    fn malformed_optional_fields_are_treated_as_absent() {
        let entry = value(
            "type: framework\nplatform: iOS\nsources: notalist\ndependencies:\n  - justastring\n",
        );
        let target = MaterializedTarget::from_value("T", &entry).unwrap();
        assert!(target.config.sources.is_none());
        assert!(target.config.dependencies.is_none());
    }

    #[test]
    fn script_entries_missing_fields_are_skipped() {
        let entry = value(
            "type: framework\nplatform: iOS\npostCompileScripts:\n  - name: lint\n  - name: ok\n    script: run\n",
        );
        let target = MaterializedTarget::from_value("T", &entry).unwrap();
        let scripts = target.config.post_compile_scripts.unwrap();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].name, "ok");
    }

    #[test]
    fn serializes_with_project_document_field_names() {
        let config = TargetConfig {
            target_type: "application".into(),
            platform: "iOS".into(),
            settings: None,
            sources: None,
            dependencies: None,
            post_compile_scripts: Some(vec![PostCompileScript {
                name: "lint".into(),
                script: "swiftlint".into(),
            }]),
        };

        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("type: application"));
        assert!(yaml.contains("postCompileScripts:"));
        assert!(!yaml.contains("settings"));
        assert!(!yaml.contains("sources"));
    }
}

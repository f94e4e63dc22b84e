//! The declared-targets document (intent file)
//!
//! The intent file is the user-authored counterpart of the generated
//! project document: a `project` name plus a sparse `targets` mapping
//! whose entries may carry an `inherit` pointer and a list of `steals`
//! patterns. Both are declaration-only hints, stripped again by
//! [`rewrite_lines`] once a target has been materialized.

use serde_yaml::Value;

use crate::error::Error;

/// A sparse target description from the intent document.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredTarget {
    pub name: String,
    /// Glob-like path patterns naming files to copy from the donor.
    pub steals: Option<Vec<String>>,
    /// Bare name of the declared target to clone configuration from.
    pub inherit: Option<String>,
}

/// The intent document as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredConfig {
    pub project_name: String,
    pub targets: Vec<DeclaredTarget>,
}

impl DeclaredConfig {
    /// The name a declared target carries once materialized.
    pub fn qualified_name(&self, bare: &str) -> String {
        format!("{}{}", self.project_name, bare)
    }

    /// Look up a declared target by its bare name.
    pub fn declared(&self, bare: &str) -> Option<&DeclaredTarget> {
        self.targets.iter().find(|target| target.name == bare)
    }
}

/// Parse the intent document.
///
/// Fails when the document is not a mapping or the `project`/`targets`
/// keys are absent. Entries without a body (the rewritten bare-key form)
/// decode as targets with no steals and no inherit pointer.
pub fn parse(text: &str) -> Result<DeclaredConfig, Error> {
    let root: Value = serde_yaml::from_str(text)?;
    let Value::Mapping(root) = root else {
        return Err(Error::NotAMapping);
    };

    let project_name = root
        .get("project")
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or(Error::MissingProjectName)?;

    let Some(Value::Mapping(entries)) = root.get("targets") else {
        return Err(Error::MissingTargets);
    };

    let targets = entries
        .iter()
        .filter_map(|(key, value)| {
            let name = key.as_str()?.to_string();
            let body = value.as_mapping();
            let steals = body
                .and_then(|body| body.get("steals"))
                .and_then(|value| {
                    let Value::Sequence(items) = value else {
                        return None;
                    };
                    items
                        .iter()
                        .map(|item| item.as_str().map(String::from))
                        .collect()
                });
            let inherit = body
                .and_then(|body| body.get("inherit"))
                .and_then(Value::as_str)
                .map(String::from);
            Some(DeclaredTarget {
                name,
                steals,
                inherit,
            })
        })
        .collect();

    Ok(DeclaredConfig {
        project_name,
        targets,
    })
}

/// Rewrite the intent document after materialization.
///
/// Every line up to and including the `targets:` sentinel is kept
/// verbatim; the body is replaced with one bare `    name:` key per
/// declared target, sorted, dropping the ephemeral `steals`/`inherit`
/// fields so repeated runs start from a clean declaration.
pub fn rewrite_lines(lines: &[String], config: &DeclaredConfig) -> Result<Vec<String>, Error> {
    let sentinel = lines
        .iter()
        .position(|line| line == "targets:")
        .ok_or(Error::MissingTargets)?;

    let mut names: Vec<&str> = config.targets.iter().map(|t| t.name.as_str()).collect();
    names.sort_unstable();

    let mut rewritten: Vec<String> = lines[..=sentinel].to_vec();
    rewritten.extend(names.iter().map(|name| format!("    {name}:")));
    Ok(rewritten)
}

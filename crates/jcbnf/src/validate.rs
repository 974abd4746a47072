//! Validation routines for grammar registries.
//!
//! The match engine only discovers an undefined reference when it reaches
//! it, which may be deep into an input or never. [`validate`] walks every
//! pattern up front so a broken grammar is rejected before any input is
//! read. Compiles clauses are not checked: they are never matched.

use std::collections::HashSet;

use thiserror::Error;

use crate::definition::Registry;

/// Represents a validation failure encountered when checking a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// The descriptive human-readable error message.
    pub message: String,
}

impl ValidationError {
    fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

/// Performs semantic validation of a [`Registry`] rooted at `main`.
///
/// - Checks that `main` is defined.
/// - Checks that every referenced definition is defined.
/// - Warns about definitions unreachable from `main`.
///
/// # Errors
///
/// Returns a [`ValidationError`] for a missing `main` or the first undefined
/// reference found, naming the referencing definition.
pub fn validate(registry: &Registry, main: &str) -> Result<(), ValidationError> {
    if !registry.contains(main) {
        return Err(ValidationError::new(format!(
            "main definition '{main}' is not defined"
        )));
    }
    check_undefined_references(registry)?;
    check_unreachable_definitions(registry, main);
    Ok(())
}

fn check_undefined_references(registry: &Registry) -> Result<(), ValidationError> {
    for definition in registry.iter() {
        let Some(pattern) = &definition.pattern else {
            continue;
        };
        if let Some(name) = pattern
            .references()
            .into_iter()
            .find(|name| !registry.contains(name))
        {
            return Err(ValidationError::new(format!(
                "undefined definition '{name}' referenced in '{}'",
                definition.name
            )));
        }
    }
    Ok(())
}

fn check_unreachable_definitions(registry: &Registry, main: &str) {
    for name in unreachable_from(registry, main) {
        log::warn!("unreachable definition '{name}'");
    }
}

/// Definitions that no chain of references from `main` reaches, in
/// registry order.
fn unreachable_from<'r>(registry: &'r Registry, main: &str) -> Vec<&'r str> {
    let mut reachable = HashSet::new();
    let mut to_visit = vec![main.to_owned()];

    while let Some(name) = to_visit.pop() {
        let Some(definition) = registry.get(&name) else {
            continue;
        };
        if !reachable.insert(name) {
            continue; // Already visited
        }
        if let Some(pattern) = &definition.pattern {
            to_visit.extend(pattern.references().into_iter().map(str::to_owned));
        }
    }

    registry
        .names()
        .filter(|name| !reachable.contains(*name))
        .collect()
}

//! Grammar definitions and the registry that holds them.
//!
//! A [`Definition`] is one named rule of a JCBNF grammar: its match pattern,
//! the output it compiles to, and the diagnostics its author attached. The
//! [`Registry`] maps rule names to definitions and is immutable once built,
//! so one registry can back any number of independent matches.

use std::collections::HashMap;
use std::sync::Arc;

use facet::Facet;

use crate::error::RegistryError;
use crate::grammar::{compile_pattern, GrammarElement};

/// One named rule of a grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definition {
    /// The name as written, including any leading or trailing `@`.
    pub name: String,
    /// What the rule matches. `None` matches the empty string.
    pub pattern: Option<GrammarElement>,
    /// What the rule compiles to. Carried for consumers; never matched.
    pub compiles: Option<GrammarElement>,
    /// Non-fatal error messages (`<--`).
    pub oopses: Vec<String>,
    /// Fatal error messages (`<==`).
    pub panics: Vec<String>,
    /// Warning messages (`w--`).
    pub warnings: Vec<String>,
    /// Warnings to report at most once (`w==`).
    pub uniques: Vec<String>,
}

impl Definition {
    /// Creates a definition with no clauses.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns this definition with `pattern` as its match pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: GrammarElement) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// The registry key: the name without its `@` morphology markers.
    #[must_use]
    pub fn key(&self) -> &str {
        registry_key(&self.name)
    }

    /// Whether the name starts with `@`, marking a prefix.
    #[must_use]
    pub fn prepends(&self) -> bool {
        self.name.len() > 1 && self.name.starts_with('@')
    }

    /// Whether the name ends with `@`, marking a suffix.
    #[must_use]
    pub fn appends(&self) -> bool {
        self.name.len() > 1 && self.name.ends_with('@')
    }
}

/// Strips the leading and trailing `@` markers from a definition name.
#[must_use]
pub fn registry_key(name: &str) -> &str {
    if name.len() < 2 {
        return name;
    }
    let name = name.strip_prefix('@').unwrap_or(name);
    name.strip_suffix('@').unwrap_or(name)
}

/// Checks a definition name against the naming rules.
///
/// ASCII letters and `_` may appear anywhere. Digits may appear from the
/// third character on (the fourth if the name starts with `@`). `@` may
/// only be the first or last character, and `@` and `@@` on their own are
/// not names.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let chars: Vec<char> = name.chars().collect();
    if chars.is_empty() || chars == ['@'] || chars == ['@', '@'] {
        return false;
    }
    let first_digit = if chars[0] == '@' { 3 } else { 2 };
    chars.iter().enumerate().all(|(i, c)| match c {
        'a'..='z' | 'A'..='Z' | '_' => true,
        '@' => i == 0 || i + 1 == chars.len(),
        '0'..='9' => i >= first_digit,
        _ => false,
    })
}

/// A definition as it appears in a JSON grammar.
///
/// Clauses are JCBNF pattern text and are compiled on import.
#[derive(Debug, Clone, Default, Facet)]
pub struct DefinitionSource {
    /// The definition name.
    pub name: String,
    /// Pattern clause text.
    #[facet(default)]
    pub pattern: Option<String>,
    /// Compiles clause text.
    #[facet(default)]
    pub compiles: Option<String>,
    /// Non-fatal error messages.
    #[facet(default)]
    pub oopses: Vec<String>,
    /// Fatal error messages.
    #[facet(default)]
    pub panics: Vec<String>,
    /// Warning messages.
    #[facet(default)]
    pub warnings: Vec<String>,
    /// Warnings to report at most once.
    #[facet(default)]
    pub uniques: Vec<String>,
}

impl DefinitionSource {
    /// Compiles both clauses into a [`Definition`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Compile`] if either clause is malformed.
    pub fn compile(self) -> Result<Definition, RegistryError> {
        let compile = |text: Option<String>| {
            text.map(|text| compile_pattern(&text))
                .transpose()
                .map_err(|source| RegistryError::Compile {
                    name: self.name.clone(),
                    source,
                })
        };
        let pattern = compile(self.pattern)?;
        let compiles = compile(self.compiles)?;
        Ok(Definition {
            pattern,
            compiles,
            oopses: self.oopses,
            panics: self.panics,
            warnings: self.warnings,
            uniques: self.uniques,
            name: self.name,
        })
    }
}

/// An immutable map from rule names to definitions.
///
/// Keys are names with their `@` markers stripped. Iteration follows the
/// order definitions were added.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    definitions: HashMap<String, Arc<Definition>>,
    order: Vec<String>,
}

impl Registry {
    /// Builds a registry, rejecting invalid names and duplicate keys.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidName`] or [`RegistryError::Duplicate`]
    /// for the first offending definition.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = Definition>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for definition in definitions {
            registry.insert(definition)?;
        }
        Ok(registry)
    }

    /// Builds a registry from a JSON array of [`DefinitionSource`] records.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::JsonParse`] if the JSON is malformed, or any
    /// error [`Registry::from_definitions`] and [`DefinitionSource::compile`]
    /// can return.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let sources: Vec<DefinitionSource> =
            facet_json::from_str(json).map_err(|e| RegistryError::JsonParse(e.to_string()))?;
        let definitions = sources
            .into_iter()
            .map(DefinitionSource::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_definitions(definitions)
    }

    pub(crate) fn insert(&mut self, definition: Definition) -> Result<(), RegistryError> {
        if !is_valid_name(&definition.name) {
            return Err(RegistryError::InvalidName {
                name: definition.name,
            });
        }
        let key = definition.key().to_owned();
        if self.definitions.contains_key(&key) {
            return Err(RegistryError::Duplicate { name: key });
        }
        self.order.push(key.clone());
        self.definitions.insert(key, Arc::new(definition));
        Ok(())
    }

    /// Looks a definition up by key.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Definition>> {
        self.definitions.get(name)
    }

    /// Returns `true` if a definition with this key exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the registry holds no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Definition keys in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Definition>> {
        self.order
            .iter()
            .filter_map(|name| self.definitions.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_rules() {
        for name in ["expr", "_x", "ab1", "@ab1", "@pre", "post@", "@both@", "a_b_c9"] {
            assert!(is_valid_name(name), "{name}");
        }
        for name in ["", "@", "@@", "a1", "1ab", "@a1", "a@b", "fo#o", "naïve"] {
            assert!(!is_valid_name(name), "{name}");
        }
    }

    #[test]
    fn keys_strip_markers() {
        assert_eq!(registry_key("@suffix@"), "suffix");
        assert_eq!(registry_key("@pre"), "pre");
        assert_eq!(registry_key("post@"), "post");
        assert_eq!(registry_key("plain"), "plain");

        let definition = Definition::new("@pre");
        assert!(definition.prepends());
        assert!(!definition.appends());
    }

    #[test]
    fn duplicates_are_rejected() {
        let result = Registry::from_definitions([Definition::new("word"), Definition::new("word@")]);
        assert_eq!(
            result.unwrap_err(),
            RegistryError::Duplicate {
                name: "word".into()
            }
        );
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let registry = Registry::from_definitions(
            ["zeta", "alpha", "mid"].into_iter().map(Definition::new),
        )
        .unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("alpha"));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn json_import_compiles_clauses() {
        let json = r#"[
            {"name": "main", "pattern": "greeting \" world\"", "warnings": ["informal"]},
            {"name": "greeting", "pattern": "'hello' | 'hi'"}
        ]"#;
        let registry = Registry::from_json(json).unwrap();
        let main = registry.get("main").unwrap();
        assert_eq!(main.warnings, ["informal"]);
        assert_eq!(
            main.pattern.as_ref().unwrap().to_string(),
            "greeting \" world\""
        );
        assert!(registry.get("greeting").unwrap().compiles.is_none());
    }

    #[test]
    fn json_import_reports_compile_errors() {
        let json = r#"[{"name": "bad", "pattern": "$nothing"}]"#;
        assert!(matches!(
            Registry::from_json(json),
            Err(RegistryError::Compile { ref name, .. }) if name == "bad"
        ));
        assert!(matches!(
            Registry::from_json("{"),
            Err(RegistryError::JsonParse(_))
        ));
    }
}

//! A compiler and backtracking matcher for JCBNF grammars.
//!
//! JCBNF is a BNF dialect with ordered choice, word-bounded literals,
//! character sets with exceptions, bounded repetition, and named captures
//! that later parts of a pattern can refer back to. A grammar is loaded
//! into an immutable [`Registry`], and a [`MatchEngine`] matches inputs
//! against it into a [`ParseTree`].
//!
//! ```rust
//! use jcbnf::{load_grammar, validate, MatchEngine};
//!
//! let registry = load_grammar(
//!     "main ::= <tag={$letter}> \":\" body \"/\" <tag>\nbody ::= {$digit}\n",
//! )
//! .unwrap();
//! validate(&registry, "main").unwrap();
//!
//! let engine = MatchEngine::new(&registry);
//! let tree = engine.parse_str("main", "ab:12/ab").unwrap().unwrap();
//! assert_eq!(tree.node(tree.root()).span().len(), 8);
//! assert!(engine.parse_str("main", "ab:12/ba").unwrap().is_none());
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::multiple_crate_versions)]

/// Conversions from host text to codepoint slices.
pub mod codepoints;

/// Limits for the match engine.
pub mod config;

/// Grammar definitions and the immutable registry that holds them.
pub mod definition;

/// Error types, one per failure domain.
pub mod error;

/// The pattern language: element tree, character sets, compiler and
/// normalizer.
///
/// This module defines how a pattern is understood before any input is
/// seen. Everything the matcher does is phrased in terms of these types.
pub mod grammar;

/// The line-oriented grammar file format.
pub mod loader;

/// The backtracking match engine, capture scopes and the parse tree.
pub mod matcher;

/// Serializable views of a parse tree.
pub mod report;

/// Registry validation.
///
/// Validation exists to reject grammars with undefined references before
/// matching starts, rather than when the engine happens to reach them.
pub mod validate;

pub use config::MatchConfig;
pub use definition::{Definition, DefinitionSource, Registry};
pub use error::{CompileError, GrammarError, MatchError, RegistryError};
pub use grammar::{compile_pattern, GrammarElement};
pub use loader::load_grammar;
pub use matcher::{MatchEngine, NodeId, ParseNode, ParseTree, Span};
pub use report::ParseReport;
pub use validate::{validate, ValidationError};

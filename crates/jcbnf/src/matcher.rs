//! The backtracking match engine.
//!
//! [`MatchEngine`] walks normalized grammar elements over a slice of
//! codepoints. Alternation is ordered choice, repetition is greedy, and a
//! failed alternative or repetition is rolled back completely: nodes it
//! added to the parse tree are dropped, and captures its backreferences
//! consumed are put back.
//!
//! Captures are recorded in scopes. Every sequence, bounded repetition and
//! definition call opens one; a sequence or repetition merges its scope into
//! the enclosing one when it succeeds, while a definition call keeps its
//! scope as the captures of its own [`ParseNode`]. A backreference consumes
//! the most recently entered capture of its name from the innermost scope
//! that has one, so a definition can refer back to captures made by the
//! definitions that called it.

mod scope;
mod tree;

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

pub use scope::{Capture, CaptureTable, Span};
pub use tree::{NodeId, ParseNode, ParseTree};

use crate::codepoints::codepoints;
use crate::config::MatchConfig;
use crate::definition::{Definition, Registry};
use crate::error::MatchError;
use crate::grammar::charset::{is_word_boundary, is_word_char};
use crate::grammar::normalize::normalize_deep;
use crate::grammar::{normalize, Assertion, GrammarElement, Repetition};

/// Matches inputs against the definitions of one [`Registry`].
///
/// Patterns are normalized once when the engine is built. The engine itself
/// is immutable, so it can be shared between threads and reused for any
/// number of inputs.
#[derive(Debug)]
pub struct MatchEngine<'r> {
    registry: &'r Registry,
    config: MatchConfig,
    patterns: HashMap<&'r str, Option<GrammarElement>>,
}

impl<'r> MatchEngine<'r> {
    /// Creates an engine with the default [`MatchConfig`].
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_config(registry, MatchConfig::default())
    }

    /// Creates an engine with explicit limits.
    #[must_use]
    pub fn with_config(registry: &'r Registry, config: MatchConfig) -> Self {
        let patterns = registry
            .names()
            .zip(registry.iter())
            .map(|(key, definition)| (key, definition.pattern.as_ref().and_then(normalize_deep)))
            .collect();
        Self {
            registry,
            config,
            patterns,
        }
    }

    /// The registry this engine matches against.
    #[must_use]
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// The limits in effect.
    #[must_use]
    pub fn config(&self) -> MatchConfig {
        self.config
    }

    /// Matches the definition `main` at the start of `input`.
    ///
    /// The match may stop short of the end of the input; anchor the main
    /// pattern with `\Z` to require a full match. Returns `Ok(None)` when
    /// the pattern does not match.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::UnresolvedReference`] if `main` or any
    /// definition reached while matching is missing from the registry, and
    /// [`MatchError::TooDeep`] if evaluation nests deeper than
    /// [`MatchConfig::max_depth`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use jcbnf::{load_grammar, MatchEngine};
    ///
    /// let registry = load_grammar("main ::= <x={$letter}> \"-\" <x>\n").unwrap();
    /// let engine = MatchEngine::new(&registry);
    /// let input: Vec<char> = "abc-abc".chars().collect();
    /// let tree = engine.parse_root("main", &input).unwrap().unwrap();
    /// assert_eq!(tree.node(tree.root()).span().end, 7);
    /// ```
    pub fn parse_root(&self, main: &str, input: &[char]) -> Result<Option<ParseTree>, MatchError> {
        let definition = self
            .registry
            .get(main)
            .ok_or_else(|| MatchError::UnresolvedReference {
                name: main.to_owned(),
            })?;
        log::debug!("matching `{main}` against {} codepoints", input.len());

        let mut run = Run::new(self, input);
        let matched = run.call(Arc::clone(definition), None, 0)?;
        match matched {
            Some(root) => {
                log::debug!("`{main}` matched {} codepoints", run.nodes[root.0].span.len());
                Ok(Some(ParseTree { nodes: run.nodes }))
            }
            None => {
                log::debug!("`{main}` did not match");
                Ok(None)
            }
        }
    }

    /// [`parse_root`](Self::parse_root) over the codepoints of a string.
    ///
    /// # Errors
    ///
    /// As for [`parse_root`](Self::parse_root).
    pub fn parse_str(&self, main: &str, input: &str) -> Result<Option<ParseTree>, MatchError> {
        self.parse_root(main, &codepoints(input))
    }
}

/// Length of the longest prefix of `literal` found in `input` at `offset`.
///
/// This is what a partial literal `[["..."]]` consumes.
#[must_use]
pub fn probe_partial(literal: &[char], input: &[char], offset: usize) -> usize {
    input
        .get(offset..)
        .unwrap_or_default()
        .iter()
        .zip(literal)
        .take_while(|(found, expected)| found == expected)
        .count()
}

/// Replaces every non-overlapping occurrence of `from` in `text`, scanning
/// left to right.
fn substitute(text: &[char], from: &[char], to: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        if text[i..].starts_with(from) {
            out.extend_from_slice(to);
            i += from.len();
        } else {
            out.push(text[i]);
            i += 1;
        }
    }
    out
}

/// A capture consumed by a backreference that may need to be put back.
#[derive(Debug)]
struct Consumed {
    scope: usize,
    name: String,
    capture: Capture,
}

/// Everything needed to roll back to an earlier point of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Mark {
    journal: usize,
    nodes: usize,
    children: usize,
}

/// The mutable state of one match.
struct Run<'a, 'r> {
    engine: &'a MatchEngine<'r>,
    input: &'a [char],
    nodes: Vec<ParseNode>,
    scopes: Vec<CaptureTable>,
    journal: Vec<Consumed>,
    current: NodeId,
    order: usize,
    depth: usize,
}

impl<'a, 'r> Run<'a, 'r> {
    fn new(engine: &'a MatchEngine<'r>, input: &'a [char]) -> Self {
        Self {
            engine,
            input,
            nodes: Vec::new(),
            scopes: Vec::new(),
            journal: Vec::new(),
            current: NodeId(0),
            order: 0,
            depth: 0,
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            journal: self.journal.len(),
            nodes: self.nodes.len(),
            children: self.nodes[self.current.0].children.len(),
        }
    }

    fn rewind(&mut self, mark: Mark) {
        for consumed in self.journal.drain(mark.journal..).rev() {
            // Scopes opened after the mark are already gone with their captures.
            if let Some(scope) = self.scopes.get_mut(consumed.scope) {
                scope.record(&consumed.name, consumed.capture);
            }
        }
        self.nodes.truncate(mark.nodes);
        self.nodes[self.current.0].children.truncate(mark.children);
    }

    /// Number of captures held by the innermost scope.
    fn captured(&self) -> usize {
        self.scopes.last().map_or(0, CaptureTable::len)
    }

    /// Pops the innermost scope and merges it into its parent.
    fn close_scope(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            if let Some(parent) = self.scopes.last_mut() {
                parent.merge(scope);
            }
        }
    }

    /// Matches `definition`'s pattern at `offset` as a new node under `parent`.
    fn call(
        &mut self,
        definition: Arc<Definition>,
        parent: Option<NodeId>,
        offset: usize,
    ) -> Result<Option<NodeId>, MatchError> {
        let engine = self.engine;
        let id = NodeId(self.nodes.len());
        let pattern = engine
            .patterns
            .get(definition.key())
            .and_then(Option::as_ref);
        self.nodes.push(ParseNode::new(parent, definition, offset));
        let caller = std::mem::replace(&mut self.current, id);
        self.scopes.push(CaptureTable::default());

        let result = match pattern {
            Some(pattern) => self.element(pattern, offset),
            None => Ok(Some(0)),
        };

        let scope = self.scopes.pop().unwrap_or_default();
        self.current = caller;
        if let Some(len) = result? {
            let node = &mut self.nodes[id.0];
            node.span = Span::new(offset, offset + len);
            node.captures = (!scope.is_empty()).then_some(scope);
            Ok(Some(id))
        } else {
            self.nodes.truncate(id.0);
            Ok(None)
        }
    }

    /// Matches `element` at `offset`, returning the number of codepoints
    /// consumed on success.
    fn element(
        &mut self,
        element: &GrammarElement,
        offset: usize,
    ) -> Result<Option<usize>, MatchError> {
        let Some(element) = normalize(element) else {
            return Ok(Some(0));
        };
        self.depth += 1;
        if self.depth > self.engine.config.max_depth {
            return Err(MatchError::TooDeep {
                limit: self.engine.config.max_depth,
            });
        }
        let result = self.dispatch(&element, offset);
        self.depth -= 1;
        result
    }

    fn dispatch(
        &mut self,
        element: &GrammarElement,
        offset: usize,
    ) -> Result<Option<usize>, MatchError> {
        let input = self.input;
        let rest = input.get(offset..).unwrap_or_default();
        match element {
            GrammarElement::Literal(text) => Ok(rest.starts_with(text).then_some(text.len())),
            GrammarElement::WordLiteral(text) => Ok(self.word_literal(text, offset)),
            GrammarElement::PartialLiteral(text) => {
                let len = probe_partial(text, input, offset);
                Ok((len > 0 || text.is_empty()).then_some(len))
            }
            GrammarElement::CharacterSet(set) => {
                Ok(rest.first().is_some_and(|c| set.contains(*c)).then_some(1))
            }
            GrammarElement::Assertion(assertion) => {
                Ok(self.assertion(*assertion, offset).then_some(0))
            }
            GrammarElement::NamedCapture { name, element } => self.capture(name, element, offset),
            GrammarElement::Backreference { name, substitution } => {
                Ok(self.backreference(name, substitution.as_ref(), offset))
            }
            GrammarElement::BoundedRepeat(repetition) => self.repeat(repetition, offset),
            GrammarElement::Sequence(elements) => self.sequence(elements, offset),
            GrammarElement::Alternation(elements) => self.alternation(elements, offset),
            GrammarElement::Reference(name) => self.reference(name, offset),
            GrammarElement::Group(inner) => self.element(inner, offset),
            // Normalizing rewrites both into a bounded repetition.
            GrammarElement::Option(_) | GrammarElement::Repeat(_) => self.element(element, offset),
        }
    }

    fn before(&self, offset: usize) -> Option<char> {
        offset.checked_sub(1).and_then(|i| self.input.get(i)).copied()
    }

    fn word_literal(&self, text: &[char], offset: usize) -> Option<usize> {
        let rest = self.input.get(offset..).unwrap_or_default();
        if !rest.starts_with(text) {
            return None;
        }
        let before = self.before(offset);
        let after = rest.get(text.len()).copied();
        let bounded = match (text.first(), text.last()) {
            (Some(first), Some(last)) => {
                is_word_boundary(before, Some(*first)) && is_word_boundary(Some(*last), after)
            }
            _ => is_word_boundary(before, after),
        };
        bounded.then_some(text.len())
    }

    fn assertion(&self, assertion: Assertion, offset: usize) -> bool {
        match assertion {
            Assertion::StartOfInput => offset == 0,
            Assertion::EndOfInput => offset == self.input.len(),
            Assertion::WordBoundaryBefore => !self.before(offset).is_some_and(is_word_char),
            Assertion::WordBoundaryAfter => {
                !self.input.get(offset).copied().is_some_and(is_word_char)
            }
        }
    }

    fn capture(
        &mut self,
        name: &str,
        element: &GrammarElement,
        offset: usize,
    ) -> Result<Option<usize>, MatchError> {
        let order = self.order;
        self.order += 1;
        let Some(len) = self.element(element, offset)? else {
            return Ok(None);
        };
        if let Some(scope) = self.scopes.last_mut() {
            scope.record(
                name,
                Capture {
                    span: Span::new(offset, offset + len),
                    order,
                },
            );
        }
        Ok(Some(len))
    }

    fn backreference(
        &mut self,
        name: &str,
        substitution: Option<&(Vec<char>, Vec<char>)>,
        offset: usize,
    ) -> Option<usize> {
        let scope = self
            .scopes
            .iter()
            .rposition(|scope| scope.latest(name).is_some())?;
        let capture = self.scopes[scope].pop_latest(name)?;

        let input = self.input;
        let captured = &input[capture.span.range()];
        let expected: Cow<'_, [char]> = match substitution {
            Some((from, to)) if !from.is_empty() => Cow::Owned(substitute(captured, from, to)),
            _ => Cow::Borrowed(captured),
        };

        if input.get(offset..).unwrap_or_default().starts_with(&expected) {
            self.journal.push(Consumed {
                scope,
                name: name.to_owned(),
                capture,
            });
            Some(expected.len())
        } else {
            self.scopes[scope].record(name, capture);
            None
        }
    }

    fn repeat(
        &mut self,
        repetition: &Repetition,
        offset: usize,
    ) -> Result<Option<usize>, MatchError> {
        self.scopes.push(CaptureTable::default());
        let mut cursor = offset;
        let mut count = 0;

        while count < repetition.min {
            let before = (self.mark(), self.captured());
            match self.element(&repetition.element, cursor)? {
                // Nothing changed, so every remaining iteration would repeat this one.
                Some(0) if (self.mark(), self.captured()) == before => count = repetition.min,
                Some(len) => {
                    cursor += len;
                    count += 1;
                }
                None => {
                    self.scopes.pop();
                    return Ok(None);
                }
            }
        }

        while repetition.max.is_none_or(|max| count < max) {
            let mark = self.mark();
            match self.element(&repetition.element, cursor)? {
                Some(0) => break,
                Some(len) => {
                    cursor += len;
                    count += 1;
                }
                None => {
                    self.rewind(mark);
                    break;
                }
            }
        }

        self.close_scope();
        Ok(Some(cursor - offset))
    }

    fn sequence(
        &mut self,
        elements: &[GrammarElement],
        offset: usize,
    ) -> Result<Option<usize>, MatchError> {
        self.scopes.push(CaptureTable::default());
        let mut cursor = offset;
        for element in elements {
            if let Some(len) = self.element(element, cursor)? {
                cursor += len;
            } else {
                self.scopes.pop();
                return Ok(None);
            }
        }
        self.close_scope();
        Ok(Some(cursor - offset))
    }

    fn alternation(
        &mut self,
        elements: &[GrammarElement],
        offset: usize,
    ) -> Result<Option<usize>, MatchError> {
        for element in elements {
            let mark = self.mark();
            if let Some(len) = self.element(element, offset)? {
                return Ok(Some(len));
            }
            self.rewind(mark);
        }
        Ok(None)
    }

    fn reference(&mut self, name: &str, offset: usize) -> Result<Option<usize>, MatchError> {
        let engine = self.engine;
        let definition =
            engine
                .registry
                .get(name)
                .ok_or_else(|| MatchError::UnresolvedReference {
                    name: name.to_owned(),
                })?;
        log::trace!("trying `{name}` at {offset}");

        let caller = self.current;
        let Some(id) = self.call(Arc::clone(definition), Some(caller), offset)? else {
            return Ok(None);
        };
        self.nodes[caller.0].children.push(id);
        Ok(Some(self.nodes[id.0].span.len()))
    }
}

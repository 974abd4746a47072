//! The in-memory representation of JCBNF patterns.
//!
//! Every clause of a grammar definition compiles into a tree of
//! [`GrammarElement`]s. The tree is plain data: it is built once by the
//! [`compile`] module, rewritten into a canonical subset by [`normalize()`],
//! and interpreted by the [`matcher`](crate::matcher). Nothing mutates it
//! after compilation.
//!
//! Each element renders back to JCBNF-like text through [`Display`](fmt::Display),
//! which is what diagnostics and test fixtures print.

use std::fmt::{self, Write as _};

pub mod charset;
pub mod compile;
pub mod normalize;
pub(crate) mod tables;

pub use charset::{CharacterSet, NamedClass, SetKind};
pub use compile::{compile_pattern, GrammarCompiler};
pub use normalize::normalize;

/// A zero-width test against the codepoints around the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assertion {
    /// `\A`: the cursor is at the start of the input.
    StartOfInput,
    /// `\Z` or `\z`: the cursor is at the end of the input.
    EndOfInput,
    /// `\W`: the codepoint before the cursor is not a word character.
    WordBoundaryBefore,
    /// `\w`: the codepoint after the cursor is not a word character.
    WordBoundaryAfter,
}

impl Assertion {
    /// The escape sequence that compiles to this assertion.
    #[must_use]
    pub fn escape(self) -> &'static str {
        match self {
            Self::StartOfInput => "\\A",
            Self::EndOfInput => "\\Z",
            Self::WordBoundaryBefore => "\\W",
            Self::WordBoundaryAfter => "\\w",
        }
    }
}

/// A repetition with explicit bounds.
///
/// `min` repetitions are mandatory; after those the element is repeated
/// greedily until it fails or `max` is reached. A `max` of `None` is
/// unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repetition {
    /// Mandatory repetitions.
    pub min: usize,
    /// Upper bound on the total number of repetitions, if any.
    pub max: Option<usize>,
    /// Separator pattern, present only before normalization.
    pub separator: Option<Box<GrammarElement>>,
    /// The repeated element.
    pub element: Box<GrammarElement>,
}

impl Repetition {
    /// A repetition of `element` between `min` and `max` times, without separator.
    #[must_use]
    pub fn new(min: usize, max: Option<usize>, element: GrammarElement) -> Self {
        Self {
            min,
            max,
            separator: None,
            element: Box::new(element),
        }
    }

    /// Returns this repetition with `separator` attached.
    #[must_use]
    pub fn with_separator(mut self, separator: GrammarElement) -> Self {
        self.separator = Some(Box::new(separator));
        self
    }
}

/// One node of a compiled JCBNF pattern.
///
/// `Group`, `Option`, `Repeat` and separated `BoundedRepeat`s are surface
/// forms: [`normalize`] rewrites them before the matcher sees them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GrammarElement {
    /// `"..."`: an exact run of codepoints.
    Literal(Vec<char>),
    /// `'...'`: an exact run of codepoints that may not be glued to
    /// surrounding word characters.
    WordLiteral(Vec<char>),
    /// `[["..."]]`: matches the longest available prefix of the literal.
    PartialLiteral(Vec<char>),
    /// A single-codepoint character set.
    CharacterSet(CharacterSet),
    /// A zero-width assertion.
    Assertion(Assertion),
    /// Grouping only. The compiler unwraps `(...)`, so this appears only in
    /// hand-built trees.
    Group(Box<GrammarElement>),
    /// `[...]`: zero or one occurrence.
    Option(Box<GrammarElement>),
    /// `{...}`: one or more occurrences.
    Repeat(Box<GrammarElement>),
    /// `(N | ...)` and the forms `Option` and `Repeat` normalize into.
    BoundedRepeat(Repetition),
    /// Juxtaposed elements, matched left to right.
    Sequence(Vec<GrammarElement>),
    /// `a | b | ...`: ordered choice.
    Alternation(Vec<GrammarElement>),
    /// A call to another definition by name.
    Reference(String),
    /// `<name=...>`: records the span matched by `element` under `name`.
    NamedCapture {
        /// The capture name.
        name: String,
        /// The captured pattern.
        element: Box<GrammarElement>,
    },
    /// `<name>` or `<name|"replacee"|"replacer">`: repeats an earlier capture.
    Backreference {
        /// The capture name.
        name: String,
        /// Optional `(replacee, replacer)` applied to the captured text.
        substitution: Option<(Vec<char>, Vec<char>)>,
    },
}

impl GrammarElement {
    /// Builds a [`GrammarElement::Literal`] from a string.
    #[must_use]
    pub fn literal(text: &str) -> Self {
        Self::Literal(text.chars().collect())
    }

    /// Builds a [`GrammarElement::WordLiteral`] from a string.
    #[must_use]
    pub fn word(text: &str) -> Self {
        Self::WordLiteral(text.chars().collect())
    }

    /// Builds a [`GrammarElement::Reference`].
    #[must_use]
    pub fn reference(name: &str) -> Self {
        Self::Reference(name.to_owned())
    }

    /// Builds a [`GrammarElement::NamedCapture`].
    #[must_use]
    pub fn capture(name: &str, element: GrammarElement) -> Self {
        Self::NamedCapture {
            name: name.to_owned(),
            element: Box::new(element),
        }
    }

    /// Builds a plain [`GrammarElement::Backreference`].
    #[must_use]
    pub fn backreference(name: &str) -> Self {
        Self::Backreference {
            name: name.to_owned(),
            substitution: None,
        }
    }

    /// Returns `true` for elements the matcher tests directly, without recursion.
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            Self::Literal(_)
                | Self::WordLiteral(_)
                | Self::PartialLiteral(_)
                | Self::CharacterSet(_)
                | Self::Assertion(_)
        )
    }

    /// Returns the referenced definition name, if this is a reference.
    #[must_use]
    pub fn reference_name(&self) -> Option<&str> {
        match self {
            Self::Reference(name) => Some(name),
            _ => None,
        }
    }

    /// Calls `visit` on this element and every element below it, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a GrammarElement)) {
        visit(self);
        match self {
            Self::Group(element) | Self::Option(element) | Self::Repeat(element) => {
                element.walk(visit);
            }
            Self::NamedCapture { element, .. } => element.walk(visit),
            Self::BoundedRepeat(repetition) => {
                if let Some(separator) = &repetition.separator {
                    separator.walk(visit);
                }
                repetition.element.walk(visit);
            }
            Self::Sequence(elements) | Self::Alternation(elements) => {
                for element in elements {
                    element.walk(visit);
                }
            }
            Self::Literal(_)
            | Self::WordLiteral(_)
            | Self::PartialLiteral(_)
            | Self::CharacterSet(_)
            | Self::Assertion(_)
            | Self::Reference(_)
            | Self::Backreference { .. } => {}
        }
    }

    /// Collects the names of all definitions referenced below this element,
    /// in first-seen order and without duplicates.
    #[must_use]
    pub fn references(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        self.walk(&mut |element| {
            if let Some(name) = element.reference_name() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        });
        names
    }

    // Sequences need brackets when they appear as the operand of something
    // that would otherwise bind tighter than juxtaposition.
    fn write_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequence(elements) if elements.len() > 1 => write!(f, "({self})"),
            _ => write!(f, "{self}"),
        }
    }
}

impl fmt::Display for GrammarElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write_quoted(f, '"', text),
            Self::WordLiteral(text) => write_quoted(f, '\'', text),
            Self::PartialLiteral(text) => {
                f.write_str("[[")?;
                write_quoted(f, '"', text)?;
                f.write_str("]]")
            }
            Self::CharacterSet(set) => write!(f, "{set}"),
            Self::Assertion(assertion) => f.write_str(assertion.escape()),
            Self::Group(element) => match **element {
                Self::Alternation(_) => write!(f, "{element}"),
                _ => write!(f, "({element})"),
            },
            Self::Option(element) => write!(f, "[{element}]"),
            Self::Repeat(element) => write!(f, "{{{element}}}"),
            Self::BoundedRepeat(repetition) => {
                write!(f, "{{{}..", repetition.min)?;
                if let Some(max) = repetition.max {
                    write!(f, "{max}")?;
                }
                if let Some(separator) = &repetition.separator {
                    f.write_char(' ')?;
                    separator.write_operand(f)?;
                }
                f.write_str("} ")?;
                repetition.element.write_operand(f)
            }
            Self::Sequence(elements) => {
                if elements.is_empty() {
                    return f.write_str("()");
                }
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_char(' ')?;
                    }
                    element.write_operand(f)?;
                }
                Ok(())
            }
            Self::Alternation(elements) => {
                f.write_char('(')?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_char(')')
            }
            Self::Reference(name) => f.write_str(name),
            Self::NamedCapture { name, element } => write!(f, "<{name}={element}>"),
            Self::Backreference { name, substitution } => {
                write!(f, "<{name}")?;
                if let Some((replacee, replacer)) = substitution {
                    f.write_char('|')?;
                    write_quoted(f, '"', replacee)?;
                    f.write_char('|')?;
                    write_quoted(f, '"', replacer)?;
                }
                f.write_char('>')
            }
        }
    }
}

/// Writes `text` between two `quote`s. Literals carry no escapes.
fn write_quoted(f: &mut fmt::Formatter<'_>, quote: char, text: &[char]) -> fmt::Result {
    f.write_char(quote)?;
    for c in text {
        write_codepoint(f, *c)?;
    }
    f.write_char(quote)
}

pub(crate) fn write_codepoint(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    f.write_char(c)
}

/// Writes `c` as the escape that compiles back to a single-codepoint set.
pub(crate) fn write_escaped_char(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    match c {
        '\u{07}' => f.write_str("\\a"),
        '\u{08}' => f.write_str("\\b"),
        '\u{1B}' => f.write_str("\\e"),
        '\u{0C}' => f.write_str("\\f"),
        '\n' => f.write_str("\\n"),
        '\r' => f.write_str("\\r"),
        '\t' => f.write_str("\\t"),
        '\u{0B}' => f.write_str("\\v"),
        c if u32::from(c) <= 0xFFFF => write!(f, "\\u{:04X}", u32::from(c)),
        c => write!(f, "\\U{:06X}", u32::from(c)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternation_renders_with_bars() {
        let alt = GrammarElement::Alternation(vec![
            GrammarElement::reference("a"),
            GrammarElement::reference("b"),
            GrammarElement::reference("c"),
        ]);
        assert_eq!(alt.to_string(), "(a | b | c)");
    }

    #[test]
    fn bounded_repeat_renders_bounds() {
        let exact = GrammarElement::BoundedRepeat(Repetition::new(
            3,
            Some(3),
            GrammarElement::reference("x"),
        ));
        assert_eq!(exact.to_string(), "{3..3} x");

        let open = GrammarElement::BoundedRepeat(
            Repetition::new(
                1,
                None,
                GrammarElement::Sequence(vec![
                    GrammarElement::reference("a"),
                    GrammarElement::reference("b"),
                ]),
            )
            .with_separator(GrammarElement::literal(",")),
        );
        assert_eq!(open.to_string(), "{1.. \",\"} (a b)");
    }

    #[test]
    fn captures_and_backreferences() {
        let capture = GrammarElement::capture("x", GrammarElement::literal("ab"));
        assert_eq!(capture.to_string(), "<x=\"ab\">");

        let substitution = GrammarElement::Backreference {
            name: "x".into(),
            substitution: Some((vec!['f', 'o', 'o'], vec!['b', 'a', 'r'])),
        };
        assert_eq!(substitution.to_string(), "<x|\"foo\"|\"bar\">");
    }

    #[test]
    fn misc_forms() {
        assert_eq!(GrammarElement::Sequence(Vec::new()).to_string(), "()");
        assert_eq!(
            GrammarElement::PartialLiteral(vec!['i', 'f']).to_string(),
            "[[\"if\"]]"
        );
        assert_eq!(
            GrammarElement::Assertion(Assertion::StartOfInput).to_string(),
            "\\A"
        );
        assert_eq!(
            GrammarElement::CharacterSet(CharacterSet::single('\u{1F600}')).to_string(),
            "\\U01F600"
        );
    }

    #[test]
    fn references_are_deduplicated_in_order() {
        let element = GrammarElement::Sequence(vec![
            GrammarElement::reference("b"),
            GrammarElement::Option(Box::new(GrammarElement::reference("a"))),
            GrammarElement::capture("n", GrammarElement::reference("b")),
        ]);
        assert_eq!(element.references(), vec!["b", "a"]);
    }
}

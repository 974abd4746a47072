//! Error types for grammar loading and matching.
//!
//! Each failure domain has its own type. Ordinary match failure is not an
//! error at all: the engine reports it as `Ok(None)`. Only conditions that
//! must abort a whole load or a whole match are represented here.

use thiserror::Error;

/// A malformed pattern clause handed to the grammar compiler.
///
/// Offsets are codepoint indices into the pattern text the compiler was
/// given, pointing at the token that could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A `"..."` or `'...'` literal is missing its closing quote.
    #[error("unterminated {quote}-quoted literal at offset {offset}")]
    UnterminatedLiteral {
        /// The opening quote character.
        quote: char,
        /// Offset of the opening quote.
        offset: usize,
    },

    /// A `<name...` backreference or capture is missing its `=`, `|` or `>`.
    #[error("unterminated capture or backreference at offset {offset}")]
    UnterminatedCapture {
        /// Offset of the opening `<`.
        offset: usize,
    },

    /// A `<name|...>` substitution is not exactly two string literals.
    #[error("substitution backreference at offset {offset} must be <name|\"replacee\"|\"replacer\">")]
    InvalidSubstitution {
        /// Offset of the opening `<`.
        offset: usize,
    },

    /// A backslash at the very end of the pattern.
    #[error("dangling escape at offset {offset}")]
    DanglingEscape {
        /// Offset of the backslash.
        offset: usize,
    },

    /// A `\uXXXX` or `\UXXXXXX` escape with missing or non-hexadecimal digits,
    /// or naming something that is not a Unicode scalar value.
    #[error("invalid codepoint escape at offset {offset}")]
    InvalidCodepoint {
        /// Offset of the backslash.
        offset: usize,
    },

    /// A `$name` that is not one of the known character classes.
    #[error("unknown character class `${name}` at offset {offset}")]
    UnknownClass {
        /// The class name as written.
        name: String,
        /// Offset of the name.
        offset: usize,
    },

    /// A `^` exception whose operands are not both character sets.
    #[error("`^` at offset {offset} must join two character sets")]
    InvalidException {
        /// Offset of the right-hand operand.
        offset: usize,
    },

    /// A bounded-repetition count that does not fit in memory.
    #[error("repetition count `{count}` at offset {offset} is too large")]
    RepeatCountOverflow {
        /// The digits as written.
        count: String,
        /// Offset of the group.
        offset: usize,
    },

    /// A closing bracket with no matching opener at the top level of a pattern.
    #[error("unbalanced `{bracket}` at offset {offset}")]
    UnbalancedBracket {
        /// The stray bracket.
        bracket: char,
        /// Offset of the bracket.
        offset: usize,
    },

    /// A `(N: | ...)` bounded repetition that declares a separator but has none.
    #[error("bounded repetition at offset {offset} is missing its separator")]
    MissingSeparator {
        /// Offset of the group.
        offset: usize,
    },
}

/// A structural error in a grammar file.
///
/// Raised while loading; fatal to the whole load. The line number is 1-based
/// and `text` is the offending line with its leading blanks removed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{description} @ line {line}: {text}")]
pub struct GrammarError {
    /// What went wrong.
    pub description: String,
    /// The 1-based line number.
    pub line: usize,
    /// The raw text of the line.
    pub text: String,
}

impl GrammarError {
    /// Creates a new [`GrammarError`].
    #[must_use]
    pub fn new(description: impl Into<String>, line: usize, text: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            line,
            text: text.into(),
        }
    }
}

/// Errors raised while assembling a [`Registry`](crate::definition::Registry)
/// outside of the grammar-file loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two definitions share the same registry key.
    #[error("definition `{name}` is already defined")]
    Duplicate {
        /// The registry key.
        name: String,
    },

    /// A definition name breaks the naming rules.
    #[error("invalid definition name `{name}`")]
    InvalidName {
        /// The name as written.
        name: String,
    },

    /// One of a definition's clauses failed to compile.
    #[error("definition `{name}`: {source}")]
    Compile {
        /// The definition name.
        name: String,
        /// The underlying compile failure.
        source: CompileError,
    },

    /// The JSON grammar could not be deserialized.
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

/// Unrecoverable outcomes of a match.
///
/// These abort the whole match rather than the current alternative.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// A reference names a definition that is not in the registry.
    #[error("reference to undefined definition `{name}`")]
    UnresolvedReference {
        /// The missing definition name.
        name: String,
    },

    /// Evaluation nested deeper than the configured limit.
    #[error("grammar too deep: nesting exceeded {limit} levels")]
    TooDeep {
        /// The configured limit.
        limit: usize,
    },
}

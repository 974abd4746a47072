//! Compiles JCBNF pattern text into [`GrammarElement`] trees.
//!
//! The notation is flat: juxtaposition builds sequences, `|` separates
//! ordered alternatives, and the bracket pairs `()`, `[]`, `{}` and `<>`
//! open nested levels. A nested level ends at the first closing bracket of
//! any kind, and the compiler does not check that it matches the opener.
//!
//! A few constructs are sugar resolved here rather than in the matcher:
//!
//! - `(x)` compiles to `x`; only hand-built trees contain a `Group`.
//! - `'a'..'z'` collapses two single-codepoint word literals (or escapes)
//!   into a range.
//! - `@"abc"` turns a string literal into a character group.
//! - `(N | x)`, `(N+ | x)`, `(N- | x)` and `(N: | sep | x)` build bounded
//!   repetitions when the first alternative of a group is a decimal number.
//! - `[["if"]]` (an option of an option of a string) is a partial literal.
//! - `set ^ other` subtracts `other` from the character set before it.

use super::{Assertion, CharacterSet, GrammarElement, NamedClass, Repetition, SetKind};
use crate::error::CompileError;

/// Recursive-descent compiler over one pattern's codepoints.
#[derive(Debug, Clone, Copy)]
pub struct GrammarCompiler<'a> {
    text: &'a [char],
}

/// Compiles a complete pattern.
///
/// # Errors
///
/// Returns a [`CompileError`] if the pattern is malformed, including a
/// closing bracket that has no opener.
pub fn compile_pattern(text: &str) -> Result<GrammarElement, CompileError> {
    let chars: Vec<char> = text.chars().collect();
    match GrammarCompiler::new(&chars).level(0)? {
        (element, Stop::End) => Ok(element),
        (_, Stop::Closer(offset)) => Err(CompileError::UnbalancedBracket {
            bracket: chars[offset],
            offset,
        }),
    }
}

/// Where a nesting level ended.
#[derive(Debug, Clone, Copy)]
enum Stop {
    /// At the closing bracket with this offset.
    Closer(usize),
    /// At the end of the text.
    End,
}

/// State of one nesting level.
#[derive(Debug, Default)]
struct Level {
    elements: Vec<GrammarElement>,
    alternatives: Vec<GrammarElement>,
    last: Option<char>,
    range_open: bool,
    exception_at: Option<usize>,
}

impl Level {
    /// Closes the current run of juxtaposed elements as one alternative.
    fn flush(&mut self) {
        let mut run = std::mem::take(&mut self.elements);
        let alternative = if run.len() == 1 {
            run.remove(0)
        } else {
            GrammarElement::Sequence(run)
        };
        self.alternatives.push(alternative);
    }

    fn finish(mut self) -> GrammarElement {
        if !self.alternatives.is_empty() {
            if !self.elements.is_empty() {
                self.flush();
            }
            return GrammarElement::Alternation(self.alternatives);
        }
        if self.elements.len() == 1 {
            self.elements.remove(0)
        } else {
            GrammarElement::Sequence(self.elements)
        }
    }

    /// Pushes a completed operand, resolving a pending `^` against it.
    fn push(&mut self, element: GrammarElement) -> Result<(), CompileError> {
        self.elements.push(element);
        match self.exception_at.take() {
            Some(offset) => self.attach_exception(offset),
            None => Ok(()),
        }
    }

    fn attach_exception(&mut self, offset: usize) -> Result<(), CompileError> {
        let invalid = CompileError::InvalidException { offset };
        let operand = self.elements.pop().ok_or_else(|| invalid.clone())?;
        let exception = into_charset(operand).ok_or_else(|| invalid.clone())?;
        let target = self
            .elements
            .last_mut()
            .and_then(charset_mut)
            .ok_or(invalid)?;
        target.exceptions.push(exception);
        Ok(())
    }

    /// Replaces the last two elements with a range if both are single
    /// codepoints, written as word literals or escapes.
    fn collapse_range(&mut self) {
        let len = self.elements.len();
        if len < 2 {
            return;
        }
        if let (Some(min), Some(max)) = (
            range_endpoint(&self.elements[len - 2]),
            range_endpoint(&self.elements[len - 1]),
        ) {
            self.elements.truncate(len - 2);
            self.elements
                .push(GrammarElement::CharacterSet(CharacterSet::range(min, max)));
        }
    }
}

impl<'a> GrammarCompiler<'a> {
    /// Creates a compiler over `text`.
    #[must_use]
    pub fn new(text: &'a [char]) -> Self {
        Self { text }
    }

    /// Compiles one level of pattern starting at `start`.
    ///
    /// Returns the element and the offset just past the closing bracket
    /// that ended the level, or the end of the text.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] describing the first malformed token.
    pub fn compile(&self, start: usize) -> Result<(GrammarElement, usize), CompileError> {
        let (element, stop) = self.level(start)?;
        let end = match stop {
            Stop::Closer(offset) => offset + 1,
            Stop::End => self.text.len(),
        };
        Ok((element, end))
    }

    fn level(&self, start: usize) -> Result<(GrammarElement, Stop), CompileError> {
        let text = self.text;
        let mut level = Level::default();
        let mut i = start;

        while i < text.len() {
            let c = text[i];
            if c == ' ' || c == '\t' {
                i += 1;
                continue;
            }
            if is_closer(c) {
                return Ok((level.finish(), Stop::Closer(i)));
            }

            let range_open = std::mem::take(&mut level.range_open);
            match c {
                '"' => {
                    let (string, end) = self.read_quoted(i)?;
                    let element = if level.last == Some('@') {
                        GrammarElement::CharacterSet(CharacterSet::group(string))
                    } else {
                        GrammarElement::Literal(string)
                    };
                    level.push(element)?;
                    i = end;
                }
                '\'' => {
                    let (string, end) = self.read_quoted(i)?;
                    let element = GrammarElement::WordLiteral(string);
                    self.push_endpoint(&mut level, element, range_open, end)?;
                    i = end;
                }
                '\\' => {
                    let (element, end) = self.read_escape(i)?;
                    self.push_endpoint(&mut level, element, range_open, end)?;
                    i = end;
                }
                '^' => level.exception_at = Some(i),
                '.' => {
                    if level.last == Some('.') {
                        level.range_open = true;
                        i += 1;
                        continue;
                    }
                }
                c if is_name_char(c) => {
                    let end = self.name_end(i);
                    let name: String = text[i..end].iter().collect();
                    let element = if level.last == Some('$') {
                        let class = NamedClass::from_name(&name).ok_or(
                            CompileError::UnknownClass {
                                name: name.clone(),
                                offset: i,
                            },
                        )?;
                        GrammarElement::CharacterSet(CharacterSet::class(class))
                    } else {
                        GrammarElement::Reference(name)
                    };
                    level.push(element)?;
                    i = end - 1;
                }
                '|' => level.flush(),
                '(' => {
                    let (inner, end) = self.compile(i + 1)?;
                    level.push(self.group(inner, i)?)?;
                    i = end - 1;
                }
                '[' => {
                    let (inner, end) = self.compile(i + 1)?;
                    let element = match inner {
                        GrammarElement::Option(option) => match *option {
                            GrammarElement::Literal(string) => {
                                GrammarElement::PartialLiteral(string)
                            }
                            other => GrammarElement::Option(Box::new(GrammarElement::Option(
                                Box::new(other),
                            ))),
                        },
                        inner => GrammarElement::Option(Box::new(inner)),
                    };
                    level.push(element)?;
                    i = end - 1;
                }
                '{' => {
                    let (inner, end) = self.compile(i + 1)?;
                    level.push(GrammarElement::Repeat(Box::new(inner)))?;
                    i = end - 1;
                }
                '<' => {
                    let (element, end) = self.read_angle(i)?;
                    level.push(element)?;
                    i = end - 1;
                }
                // `$` and `@` only change how the next token is read.
                _ => {}
            }

            level.last = Some(c);
            i += 1;
        }

        Ok((level.finish(), Stop::End))
    }

    /// Pushes a token that may be one end of a `'a'..'z'` range; `end` is
    /// the offset of its last codepoint.
    fn push_endpoint(
        &self,
        level: &mut Level,
        element: GrammarElement,
        range_open: bool,
        end: usize,
    ) -> Result<(), CompileError> {
        let single = range_endpoint(&element).is_some();
        level.elements.push(element);
        if range_open {
            level.collapse_range();
        }
        // 'a' in `^ 'a'..'z'` is the start of a range, not yet an operand.
        if let Some(offset) = level.exception_at {
            if !(single && self.range_follows(end + 1)) {
                level.exception_at = None;
                level.attach_exception(offset)?;
            }
        }
        Ok(())
    }

    /// Reads a quoted run starting at the opening quote `open`; returns the
    /// contents and the offset of the closing quote.
    fn read_quoted(&self, open: usize) -> Result<(Vec<char>, usize), CompileError> {
        let quote = self.text[open];
        let body = &self.text[open + 1..];
        let len = body
            .iter()
            .position(|c| *c == quote)
            .ok_or(CompileError::UnterminatedLiteral {
                quote,
                offset: open,
            })?;
        Ok((body[..len].to_vec(), open + 1 + len))
    }

    /// Returns `true` if `..` is the next significant text at `from`.
    fn range_follows(&self, from: usize) -> bool {
        let mut rest = self.text[from.min(self.text.len())..]
            .iter()
            .filter(|c| **c != ' ' && **c != '\t');
        rest.next() == Some(&'.') && rest.next() == Some(&'.')
    }

    fn name_end(&self, start: usize) -> usize {
        self.text[start..]
            .iter()
            .position(|c| !is_name_char(*c))
            .map_or(self.text.len(), |len| start + len)
    }

    /// Reads the escape at the backslash `at`; returns the element and the
    /// offset of the last codepoint of the escape.
    fn read_escape(&self, at: usize) -> Result<(GrammarElement, usize), CompileError> {
        let escaped = *self
            .text
            .get(at + 1)
            .ok_or(CompileError::DanglingEscape { offset: at })?;
        let single = |c: char| GrammarElement::CharacterSet(CharacterSet::single(c));
        let element = match escaped {
            'a' => single('\u{07}'),
            'b' => single('\u{08}'),
            'e' => single('\u{1B}'),
            'f' => single('\u{0C}'),
            'n' => single('\n'),
            'r' => single('\r'),
            't' => single('\t'),
            'v' => single('\u{0B}'),
            'A' => GrammarElement::Assertion(Assertion::StartOfInput),
            'Z' | 'z' => GrammarElement::Assertion(Assertion::EndOfInput),
            'W' => GrammarElement::Assertion(Assertion::WordBoundaryBefore),
            'w' => GrammarElement::Assertion(Assertion::WordBoundaryAfter),
            'u' | 'U' => {
                let digits = if escaped == 'u' { 4 } else { 6 };
                let hex = self
                    .text
                    .get(at + 2..at + 2 + digits)
                    .ok_or(CompileError::InvalidCodepoint { offset: at })?;
                let value = hex.iter().try_fold(0_u32, |value, c| {
                    c.to_digit(16).map(|digit| (value << 4) | digit)
                });
                let c = value
                    .and_then(char::from_u32)
                    .ok_or(CompileError::InvalidCodepoint { offset: at })?;
                return Ok((single(c), at + 1 + digits));
            }
            other => single(other),
        };
        Ok((element, at + 1))
    }

    /// Reads `<name>`, `<name=...>` or `<name|"a"|"b">` starting at `open`;
    /// returns the element and the offset just past its closing `>`.
    fn read_angle(&self, open: usize) -> Result<(GrammarElement, usize), CompileError> {
        let unterminated = CompileError::UnterminatedCapture { offset: open };
        let mut name = String::new();
        let mut i = open + 1;
        let delimiter = loop {
            let c = *self.text.get(i).ok_or_else(|| unterminated.clone())?;
            match c {
                '=' | '|' | '>' => break c,
                ' ' | '\t' => {}
                c => name.push(c),
            }
            i += 1;
        };

        match delimiter {
            '>' => Ok((
                GrammarElement::Backreference {
                    name,
                    substitution: None,
                },
                i + 1,
            )),
            '=' => {
                let (inner, end) = self.compile(i + 1)?;
                Ok((
                    GrammarElement::NamedCapture {
                        name,
                        element: Box::new(inner),
                    },
                    end,
                ))
            }
            _ => {
                let (inner, end) = self.compile(i + 1)?;
                let invalid = CompileError::InvalidSubstitution { offset: open };
                let GrammarElement::Alternation(mut branches) = inner else {
                    return Err(invalid);
                };
                match (branches.pop(), branches.pop(), branches.is_empty()) {
                    (
                        Some(GrammarElement::Literal(replacer)),
                        Some(GrammarElement::Literal(replacee)),
                        true,
                    ) => Ok((
                        GrammarElement::Backreference {
                            name,
                            substitution: Some((replacee, replacer)),
                        },
                        end,
                    )),
                    _ => Err(invalid),
                }
            }
        }
    }

    /// Unwraps the contents of `(...)`, rewriting `(N | ...)` into a bounded
    /// repetition.
    fn group(&self, inner: GrammarElement, open: usize) -> Result<GrammarElement, CompileError> {
        let GrammarElement::Alternation(mut branches) = inner else {
            return Ok(inner);
        };
        let count = branches
            .first()
            .and_then(GrammarElement::reference_name)
            .filter(|name| name.bytes().all(|b| b.is_ascii_digit()))
            .map(str::to_owned);
        let Some(count) = count else {
            return Ok(GrammarElement::Alternation(branches));
        };
        branches.remove(0);
        let n: usize = count
            .parse()
            .map_err(|_| CompileError::RepeatCountOverflow {
                count: count.clone(),
                offset: open,
            })?;

        // Flags live between the digit run and the first `|`.
        let digits_start = self.text[open + 1..]
            .iter()
            .position(|c| *c != ' ' && *c != '\t')
            .map_or(self.text.len(), |skip| open + 1 + skip);
        let (mut at_least, mut at_most, mut separated) = (false, false, false);
        for c in self.text.iter().skip(digits_start + count.len()) {
            match c {
                '+' => at_least = true,
                '-' => at_most = true,
                ':' => {
                    separated = true;
                    break;
                }
                '|' => break,
                _ => {}
            }
        }

        let separator = if separated {
            if branches.is_empty() {
                return Err(CompileError::MissingSeparator { offset: open });
            }
            Some(unwrap_separator(branches.remove(0)))
        } else {
            None
        };
        let element = if branches.len() == 1 {
            branches.remove(0)
        } else {
            GrammarElement::Alternation(branches)
        };

        let (min, max) = match (at_least, at_most) {
            (true, false) => (n, None),
            (false, true) => (1, Some(n)),
            _ => (n, Some(n)),
        };
        let mut repetition = Repetition::new(min, max, element);
        if let Some(separator) = separator {
            repetition = repetition.with_separator(separator);
        }
        Ok(GrammarElement::BoundedRepeat(repetition))
    }
}

/// Strips the `()`, `[]` and `{}` wrappers a separator is usually written in.
fn unwrap_separator(mut element: GrammarElement) -> GrammarElement {
    loop {
        element = match element {
            GrammarElement::Group(inner)
            | GrammarElement::Option(inner)
            | GrammarElement::Repeat(inner) => *inner,
            other => return other,
        };
    }
}

fn range_endpoint(element: &GrammarElement) -> Option<char> {
    match element {
        GrammarElement::WordLiteral(string) => match string.as_slice() {
            [c] => Some(*c),
            _ => None,
        },
        GrammarElement::CharacterSet(CharacterSet {
            kind: SetKind::Single(c),
            exceptions,
        }) if exceptions.is_empty() => Some(*c),
        _ => None,
    }
}

fn into_charset(element: GrammarElement) -> Option<CharacterSet> {
    match element {
        GrammarElement::CharacterSet(set) => Some(set),
        GrammarElement::WordLiteral(string) if string.len() == 1 => {
            Some(CharacterSet::single(string[0]))
        }
        GrammarElement::Group(inner) => into_charset(*inner),
        _ => None,
    }
}

fn charset_mut(element: &mut GrammarElement) -> Option<&mut CharacterSet> {
    match element {
        GrammarElement::CharacterSet(set) => Some(set),
        GrammarElement::Group(inner) => charset_mut(inner),
        _ => None,
    }
}

fn is_closer(c: char) -> bool {
    matches!(c, ')' | ']' | '}' | '>')
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(text: &str) -> GrammarElement {
        compile_pattern(text).unwrap()
    }

    #[test]
    fn juxtaposition_and_alternation() {
        assert_eq!(
            compile(r#""a" b | c"#),
            GrammarElement::Alternation(vec![
                GrammarElement::Sequence(vec![
                    GrammarElement::literal("a"),
                    GrammarElement::reference("b"),
                ]),
                GrammarElement::reference("c"),
            ])
        );
    }

    #[test]
    fn single_element_is_unwrapped() {
        assert_eq!(compile("  name  "), GrammarElement::reference("name"));
        assert_eq!(compile(""), GrammarElement::Sequence(Vec::new()));
    }

    #[test]
    fn character_group_and_range() {
        assert_eq!(
            compile(r#"@"xyz""#),
            GrammarElement::CharacterSet(CharacterSet::group(vec!['x', 'y', 'z']))
        );
        assert_eq!(
            compile("'z'..'a'"),
            GrammarElement::CharacterSet(CharacterSet::range('a', 'z'))
        );
        // A multi-codepoint word literal never forms a range.
        assert!(matches!(compile("'ab'..'c'"), GrammarElement::Sequence(_)));
    }

    #[test]
    fn exceptions_attach_to_previous_set() {
        let expected = CharacterSet::range('a', 'z').except(CharacterSet::single('m'));
        assert_eq!(
            compile("'a'..'z' ^ 'm'"),
            GrammarElement::CharacterSet(expected)
        );

        let expected = CharacterSet::class(NamedClass::Letter).except(CharacterSet::range('a', 'f'));
        assert_eq!(
            compile("$LETTER ^ 'a'..'f'"),
            GrammarElement::CharacterSet(expected)
        );
    }

    #[test]
    fn exception_requires_character_sets() {
        assert_eq!(
            compile_pattern(r#"$letter ^ "abc""#),
            Err(CompileError::InvalidException { offset: 8 })
        );
        assert!(matches!(
            compile_pattern("foo ^ 'x'"),
            Err(CompileError::InvalidException { .. })
        ));
    }

    #[test]
    fn escapes() {
        let single = |c| GrammarElement::CharacterSet(CharacterSet::single(c));
        assert_eq!(compile(r"\v"), single('\u{0B}'));
        assert_eq!(compile(r"\é"), single('é'));
        assert_eq!(compile(r"\U01F600"), single('\u{1F600}'));
        assert_eq!(compile(r"\|"), single('|'));
        assert_eq!(
            compile(r"\z"),
            GrammarElement::Assertion(Assertion::EndOfInput)
        );
        assert_eq!(
            compile_pattern(r"\u12"),
            Err(CompileError::InvalidCodepoint { offset: 0 })
        );
        assert_eq!(
            compile_pattern(r"\uD800"),
            Err(CompileError::InvalidCodepoint { offset: 0 })
        );
        assert_eq!(
            compile_pattern("a \\"),
            Err(CompileError::DanglingEscape { offset: 2 })
        );
    }

    #[test]
    fn unknown_class_is_rejected() {
        assert_eq!(
            compile_pattern("$vowel"),
            Err(CompileError::UnknownClass {
                name: "vowel".into(),
                offset: 1,
            })
        );
    }

    #[test]
    fn brackets() {
        assert_eq!(
            compile("[a] {b}"),
            GrammarElement::Sequence(vec![
                GrammarElement::Option(Box::new(GrammarElement::reference("a"))),
                GrammarElement::Repeat(Box::new(GrammarElement::reference("b"))),
            ])
        );
        assert_eq!(
            compile(r#"[["else"]]"#),
            GrammarElement::PartialLiteral(vec!['e', 'l', 's', 'e'])
        );
        assert_eq!(
            compile("(a | b)"),
            GrammarElement::Alternation(vec![
                GrammarElement::reference("a"),
                GrammarElement::reference("b"),
            ])
        );
        assert_eq!(compile("((a))"), GrammarElement::reference("a"));
    }

    #[test]
    fn captures_and_backreferences() {
        assert_eq!(
            compile(r#"<x="ab"> <x>"#),
            GrammarElement::Sequence(vec![
                GrammarElement::capture("x", GrammarElement::literal("ab")),
                GrammarElement::backreference("x"),
            ])
        );
        assert_eq!(
            compile(r#"<x|"foo"|"bar">"#),
            GrammarElement::Backreference {
                name: "x".into(),
                substitution: Some((vec!['f', 'o', 'o'], vec!['b', 'a', 'r'])),
            }
        );
        assert_eq!(
            compile_pattern(r#"<x|"foo">"#),
            Err(CompileError::InvalidSubstitution { offset: 0 })
        );
        assert_eq!(
            compile_pattern("<x"),
            Err(CompileError::UnterminatedCapture { offset: 0 })
        );
    }

    #[test]
    fn unterminated_literals() {
        assert_eq!(
            compile_pattern(r#"a "bc"#),
            Err(CompileError::UnterminatedLiteral {
                quote: '"',
                offset: 2,
            })
        );
        assert!(matches!(
            compile_pattern("'x"),
            Err(CompileError::UnterminatedLiteral { quote: '\'', .. })
        ));
    }

    #[test]
    fn stray_closer_is_rejected() {
        assert_eq!(
            compile_pattern("a ) b"),
            Err(CompileError::UnbalancedBracket {
                bracket: ')',
                offset: 2,
            })
        );
    }

    #[test]
    fn bounded_repetition_flags() {
        let item = || Box::new(GrammarElement::reference("item"));
        let bounded = |min, max| {
            GrammarElement::BoundedRepeat(Repetition {
                min,
                max,
                separator: None,
                element: item(),
            })
        };
        assert_eq!(compile("(3 | item)"), bounded(3, Some(3)));
        assert_eq!(compile("(3+ | item)"), bounded(3, None));
        assert_eq!(compile("(3- | item)"), bounded(1, Some(3)));
        assert_eq!(compile("(3+- | item)"), bounded(3, Some(3)));
    }

    #[test]
    fn bounded_repetition_separator() {
        let compiled = compile(r#"(2+: | [","] | item)"#);
        assert_eq!(
            compiled,
            GrammarElement::BoundedRepeat(
                Repetition::new(2, None, GrammarElement::reference("item"))
                    .with_separator(GrammarElement::literal(","))
            )
        );
        assert_eq!(
            compile_pattern("(2: |)"),
            Err(CompileError::MissingSeparator { offset: 0 })
        );
    }

    #[test]
    fn bounded_repetition_of_alternatives() {
        assert_eq!(
            compile("(2 | a | b)"),
            GrammarElement::BoundedRepeat(Repetition::new(
                2,
                Some(2),
                GrammarElement::Alternation(vec![
                    GrammarElement::reference("a"),
                    GrammarElement::reference("b"),
                ]),
            ))
        );
    }

    #[test]
    fn non_numeric_group_is_unwrapped() {
        assert_eq!(
            compile("(a2 | b)"),
            GrammarElement::Alternation(vec![
                GrammarElement::reference("a2"),
                GrammarElement::reference("b"),
            ])
        );
    }

    #[test]
    fn escapes_can_bound_ranges() {
        assert_eq!(
            compile(r"\u0027..'z'"),
            GrammarElement::CharacterSet(CharacterSet::range('\'', 'z'))
        );
        assert_eq!(
            compile(r"$any ^ 'a'..\n"),
            GrammarElement::CharacterSet(
                CharacterSet::class(NamedClass::Any).except(CharacterSet::range('\n', 'a'))
            )
        );
    }

    #[test]
    fn rendering_recompiles() {
        for source in [
            r#"("a" | 'b' | c)"#,
            "a | b",
            "[a | b]",
            "<x=a | b>",
            "(a b) c | d",
            r"'a'..'z' ^ 'm'",
            r"\u0027..'z' ^ \u0027",
            r"$any ^ \n..\u0027",
            r#"<x="ab"> <x|"a"|"b">"#,
        ] {
            let first = compile(source);
            let second = compile(&first.to_string());
            assert_eq!(first, second, "{source}");
        }
    }

    #[test]
    fn compile_reports_end_offset() {
        let text: Vec<char> = "a) b".chars().collect();
        let (element, end) = GrammarCompiler::new(&text).compile(0).unwrap();
        assert_eq!(element, GrammarElement::reference("a"));
        assert_eq!(end, 2);
        assert_eq!(compile("'a'"), GrammarElement::word("a"));
    }
}

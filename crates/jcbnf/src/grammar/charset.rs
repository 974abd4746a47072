//! Character sets: single-codepoint atoms with set subtraction.
//!
//! A [`CharacterSet`] matches exactly one codepoint. Besides its own
//! membership test it carries an ordered list of exception sets; a codepoint
//! is a member only if none of the exceptions (tested recursively, with their
//! own exceptions) contains it.

use std::fmt;

use super::tables;
use super::{write_codepoint, write_escaped_char};

/// The built-in `$name` classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedClass {
    /// `$any`: every codepoint.
    Any,
    /// `$sub`: the subscript digits U+2080..U+2089.
    Sub,
    /// `$sup`: the superscript digits (U+2070..U+2079, U+00B9, U+00B2, U+00B3).
    Sup,
    /// `$letter`: letters of all scripts.
    Letter,
    /// `$letteroid`: letter-like symbols such as currency and unit signs.
    Letteroid,
    /// `$digit`: decimal digits and other numeric symbols.
    Digit,
}

impl NamedClass {
    /// Looks a class up by name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [
            Self::Any,
            Self::Sub,
            Self::Sup,
            Self::Letter,
            Self::Letteroid,
            Self::Digit,
        ]
        .into_iter()
        .find(|class| class.name().eq_ignore_ascii_case(name))
    }

    /// Returns the canonical lowercase name, without the `$`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Sub => "sub",
            Self::Sup => "sup",
            Self::Letter => "letter",
            Self::Letteroid => "letteroid",
            Self::Digit => "digit",
        }
    }

    /// Returns `true` if `c` belongs to the class.
    #[must_use]
    pub fn contains(self, c: char) -> bool {
        match self {
            Self::Any => true,
            Self::Sub => ('\u{2080}'..='\u{2089}').contains(&c),
            Self::Sup => matches!(c, '\u{00B2}' | '\u{00B3}' | '\u{00B9}' | '\u{2070}'..='\u{2079}'),
            Self::Letter => tables::contains(tables::LETTER, c),
            Self::Letteroid => tables::contains(tables::LETTEROID, c),
            Self::Digit => tables::contains(tables::DIGIT, c),
        }
    }
}

/// The raw membership rule of a [`CharacterSet`], before exceptions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SetKind {
    /// Exactly one codepoint.
    Single(char),
    /// An inclusive range; `min <= max` always holds.
    Range(char, char),
    /// Any of the listed codepoints, kept in source order.
    Group(Vec<char>),
    /// A built-in class.
    Class(NamedClass),
}

/// A single-codepoint atom with optional exceptions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharacterSet {
    /// The raw membership rule.
    pub kind: SetKind,
    /// Sets subtracted from this one, in the order they were written.
    pub exceptions: Vec<CharacterSet>,
}

impl CharacterSet {
    /// A set matching exactly `c`.
    #[must_use]
    pub fn single(c: char) -> Self {
        Self::from_kind(SetKind::Single(c))
    }

    /// A set matching every codepoint between `a` and `b` inclusive, in either order.
    #[must_use]
    pub fn range(a: char, b: char) -> Self {
        Self::from_kind(SetKind::Range(a.min(b), a.max(b)))
    }

    /// A set matching any codepoint of `chars`.
    #[must_use]
    pub fn group(chars: impl Into<Vec<char>>) -> Self {
        Self::from_kind(SetKind::Group(chars.into()))
    }

    /// A set matching a built-in class.
    #[must_use]
    pub fn class(class: NamedClass) -> Self {
        Self::from_kind(SetKind::Class(class))
    }

    fn from_kind(kind: SetKind) -> Self {
        Self {
            kind,
            exceptions: Vec::new(),
        }
    }

    /// Returns this set with `exception` subtracted.
    #[must_use]
    pub fn except(mut self, exception: CharacterSet) -> Self {
        self.exceptions.push(exception);
        self
    }

    /// Returns `true` if `c` is a raw member and no exception contains it.
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        let raw = match &self.kind {
            SetKind::Single(x) => *x == c,
            SetKind::Range(min, max) => (*min..=*max).contains(&c),
            SetKind::Group(chars) => chars.contains(&c),
            SetKind::Class(class) => class.contains(c),
        };
        raw && !self.exceptions.iter().any(|exception| exception.contains(c))
    }

    // A single codepoint written as `'x'` only compiles back to a set when it
    // follows `^`; elsewhere it needs the escape form.
    fn write_set(&self, f: &mut fmt::Formatter<'_>, as_exception: bool) -> fmt::Result {
        match &self.kind {
            SetKind::Single(c) if as_exception && is_quotable(*c) => write!(f, "'{c}'")?,
            SetKind::Single(c) => write_escaped_char(f, *c)?,
            SetKind::Range(min, max) => {
                write_endpoint(f, *min)?;
                f.write_str("..")?;
                write_endpoint(f, *max)?;
            }
            SetKind::Group(chars) => {
                f.write_str("@\"")?;
                for c in chars {
                    write_codepoint(f, *c)?;
                }
                f.write_str("\"")?;
            }
            SetKind::Class(class) => write!(f, "${}", class.name())?,
        }
        for exception in &self.exceptions {
            f.write_str(" ^ ")?;
            if exception.exceptions.is_empty() {
                exception.write_set(f, true)?;
            } else {
                f.write_str("(")?;
                exception.write_set(f, true)?;
                f.write_str(")")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_set(f, false)
    }
}

fn is_quotable(c: char) -> bool {
    c != '\'' && !c.is_control()
}

fn write_endpoint(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    if is_quotable(c) {
        write!(f, "'{c}'")
    } else {
        write_escaped_char(f, c)
    }
}

/// Returns `true` if `c` counts as part of a word for boundary checks:
/// a `$letter`, a `$digit` or `_`.
#[must_use]
pub fn is_word_char(c: char) -> bool {
    c == '_' || NamedClass::Letter.contains(c) || NamedClass::Digit.contains(c)
}

/// Returns `true` unless both neighbours exist and are word characters.
#[must_use]
pub fn is_word_boundary(before: Option<char>, after: Option<char>) -> bool {
    !(before.is_some_and(is_word_char) && after.is_some_and(is_word_char))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_with_exception_skips_member() {
        let set = CharacterSet::range('a', 'z').except(CharacterSet::single('m'));
        for c in 'a'..='z' {
            assert_eq!(set.contains(c), c != 'm', "{c}");
        }
        assert!(!set.contains('A'));
    }

    #[test]
    fn range_endpoints_are_ordered() {
        assert_eq!(CharacterSet::range('z', 'a'), CharacterSet::range('a', 'z'));
    }

    #[test]
    fn nested_exceptions_are_recursive() {
        // $letter minus (a..z minus m): m stays a member.
        let inner = CharacterSet::range('a', 'z').except(CharacterSet::single('m'));
        let set = CharacterSet::class(NamedClass::Letter).except(inner);
        assert!(set.contains('m'));
        assert!(set.contains('Q'));
        assert!(!set.contains('b'));
    }

    #[test]
    fn class_names_are_case_insensitive() {
        assert_eq!(NamedClass::from_name("LeTTer"), Some(NamedClass::Letter));
        assert_eq!(NamedClass::from_name("digits"), None);
    }

    #[test]
    fn sub_and_sup() {
        assert!(NamedClass::Sub.contains('\u{2080}'));
        assert!(NamedClass::Sub.contains('\u{2089}'));
        assert!(!NamedClass::Sub.contains('\u{208A}'));
        assert!(NamedClass::Sup.contains('\u{00B2}'));
        assert!(NamedClass::Sup.contains('\u{2079}'));
        assert!(!NamedClass::Sup.contains('2'));
    }

    #[test]
    fn word_boundary() {
        assert!(is_word_boundary(None, Some('a')));
        assert!(is_word_boundary(Some(' '), Some('a')));
        assert!(!is_word_boundary(Some('a'), Some('_')));
        assert!(is_word_boundary(Some('a'), Some('-')));
    }

    #[test]
    fn rendering() {
        let set = CharacterSet::range('a', 'z').except(CharacterSet::single('m'));
        assert_eq!(set.to_string(), "'a'..'z' ^ 'm'");
        assert_eq!(CharacterSet::single('\n').to_string(), "\\n");
        assert_eq!(CharacterSet::range('\'', 'z').to_string(), "\\u0027..'z'");
        assert_eq!(CharacterSet::range('\t', ' ').to_string(), "\\t..' '");
        assert_eq!(CharacterSet::single('x').to_string(), "\\u0078");
        assert_eq!(CharacterSet::group(vec!['+', '-']).to_string(), "@\"+-\"");
        assert_eq!(CharacterSet::class(NamedClass::Digit).to_string(), "$digit");
    }
}

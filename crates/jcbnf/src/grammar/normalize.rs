//! Rewrites surface forms into the canonical subset the matcher interprets.
//!
//! After normalization an element is never a `Group`, `Option`, `Repeat`,
//! a `BoundedRepeat` with a separator, or a `Sequence`/`Alternation` with
//! fewer than two children. An element that reduces to nothing is reported
//! as `None`, which the matcher treats as a zero-length success.

use std::borrow::Cow;

use super::{GrammarElement, Repetition};

enum Rewrite<'a> {
    Keep,
    Empty,
    Replace(Cow<'a, GrammarElement>),
}

/// Applies one rewrite rule to the top of `element`.
fn rewrite(element: &GrammarElement) -> Rewrite<'_> {
    match element {
        GrammarElement::Group(inner) => Rewrite::Replace(Cow::Borrowed(inner)),
        GrammarElement::Option(inner) => Rewrite::Replace(Cow::Owned(
            GrammarElement::BoundedRepeat(Repetition::new(0, Some(1), (**inner).clone())),
        )),
        GrammarElement::Repeat(inner) => Rewrite::Replace(Cow::Owned(
            GrammarElement::BoundedRepeat(Repetition::new(1, None, (**inner).clone())),
        )),
        GrammarElement::BoundedRepeat(Repetition {
            min,
            max,
            separator: Some(separator),
            element,
        }) => {
            // Every repetition may be preceded by any number of separators.
            let leading = GrammarElement::BoundedRepeat(Repetition::new(
                0,
                None,
                (**separator).clone(),
            ));
            let body = GrammarElement::Sequence(vec![leading, (**element).clone()]);
            Rewrite::Replace(Cow::Owned(GrammarElement::BoundedRepeat(Repetition::new(
                *min, *max, body,
            ))))
        }
        GrammarElement::Sequence(elements) | GrammarElement::Alternation(elements) => {
            match elements.as_slice() {
                [] => Rewrite::Empty,
                [only] => Rewrite::Replace(Cow::Borrowed(only)),
                _ => Rewrite::Keep,
            }
        }
        _ => Rewrite::Keep,
    }
}

/// Reduces `element` to canonical form, applying the rewrite rules until
/// none applies.
///
/// Returns `None` when the element matches the empty string and nothing
/// else. Already-canonical elements are returned borrowed.
#[must_use]
pub fn normalize(element: &GrammarElement) -> Option<Cow<'_, GrammarElement>> {
    let mut current = element;
    loop {
        match rewrite(current) {
            Rewrite::Keep => return Some(Cow::Borrowed(current)),
            Rewrite::Empty => return None,
            Rewrite::Replace(Cow::Borrowed(next)) => current = next,
            Rewrite::Replace(Cow::Owned(next)) => return normalize_owned(next).map(Cow::Owned),
        }
    }
}

fn normalize_owned(mut current: GrammarElement) -> Option<GrammarElement> {
    loop {
        let next = match rewrite(&current) {
            Rewrite::Keep => None,
            Rewrite::Empty => return None,
            Rewrite::Replace(next) => Some(next.into_owned()),
        };
        match next {
            Some(next) => current = next,
            None => return Some(current),
        }
    }
}

/// Normalizes `element` and everything below it.
///
/// Children that reduce to nothing are kept as empty sequences so that
/// alternatives and captures keep their positions. Normalizing any part of
/// the result again leaves it unchanged.
#[must_use]
pub fn normalize_deep(element: &GrammarElement) -> Option<GrammarElement> {
    let child = |element: &GrammarElement| {
        normalize_deep(element).unwrap_or(GrammarElement::Sequence(Vec::new()))
    };
    Some(match normalize(element)?.into_owned() {
        GrammarElement::Sequence(elements) => {
            GrammarElement::Sequence(elements.iter().map(child).collect())
        }
        GrammarElement::Alternation(elements) => {
            GrammarElement::Alternation(elements.iter().map(child).collect())
        }
        GrammarElement::BoundedRepeat(repetition) => GrammarElement::BoundedRepeat(
            Repetition::new(repetition.min, repetition.max, child(&repetition.element)),
        ),
        GrammarElement::NamedCapture { name, element } => GrammarElement::NamedCapture {
            name,
            element: Box::new(child(&element)),
        },
        other => other,
    })
}

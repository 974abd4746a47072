//! Serializable views of a [`ParseTree`].
//!
//! A [`ParseTree`] refers to its definitions and to the input by index.
//! [`ParseReport`] resolves both into a self-contained owned tree that can
//! be printed as an indented outline or written out as JSON.

use std::fmt;

use facet::Facet;

use crate::matcher::{NodeId, ParseTree, Span};

/// A half-open codepoint interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Facet)]
pub struct SpanReport {
    /// First codepoint offset.
    pub start: usize,
    /// One past the last codepoint offset.
    pub end: usize,
}

impl From<Span> for SpanReport {
    fn from(span: Span) -> Self {
        Self {
            start: span.start,
            end: span.end,
        }
    }
}

/// Every capture recorded under one name.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct CaptureReport {
    /// The capture name.
    pub name: String,
    /// Captured spans, earliest entered first.
    pub spans: Vec<SpanReport>,
}

/// One matched definition with its captures and children.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct ParseReport {
    /// The definition name as written.
    pub name: String,
    /// First matched codepoint offset.
    pub start: usize,
    /// One past the last matched codepoint offset.
    pub end: usize,
    /// The matched text.
    pub text: String,
    /// Captures made directly in this definition, by name.
    #[facet(default)]
    pub captures: Vec<CaptureReport>,
    /// Definitions matched inside this one, in order.
    #[facet(default)]
    pub children: Vec<ParseReport>,
}

impl ParseReport {
    /// Builds the report for the whole tree.
    ///
    /// `input` must be the codepoints the tree was matched against.
    #[must_use]
    pub fn from_tree(tree: &ParseTree, input: &[char]) -> Self {
        Self::from_node(tree, tree.root(), input)
    }

    /// Builds the report for the subtree rooted at `id`.
    #[must_use]
    pub fn from_node(tree: &ParseTree, id: NodeId, input: &[char]) -> Self {
        let node = tree.node(id);
        let span = node.span();
        let captures = node
            .captures()
            .map(|table| {
                table
                    .iter()
                    .map(|(name, captures)| CaptureReport {
                        name: name.to_owned(),
                        spans: captures.iter().map(|c| c.span.into()).collect(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            name: node.name().to_owned(),
            start: span.start,
            end: span.end,
            text: input.get(span.range()).unwrap_or_default().iter().collect(),
            captures,
            children: node
                .children()
                .iter()
                .map(|child| Self::from_node(tree, *child, input))
                .collect(),
        }
    }

    /// Serializes the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        facet_json::to_string(self)
    }

    /// An indented outline, one `name [start..end]` line per node.
    #[must_use]
    pub fn outline(&self) -> Outline<'_> {
        Outline(self)
    }
}

/// Display adapter returned by [`ParseReport::outline`].
#[derive(Debug, Clone, Copy)]
pub struct Outline<'a>(&'a ParseReport);

impl Outline<'_> {
    fn write(f: &mut fmt::Formatter<'_>, report: &ParseReport, depth: usize) -> fmt::Result {
        writeln!(
            f,
            "{:indent$}{} [{}..{}]",
            "",
            report.name,
            report.start,
            report.end,
            indent = depth * 2
        )?;
        report
            .children
            .iter()
            .try_for_each(|child| Self::write(f, child, depth + 1))
    }
}

impl fmt::Display for Outline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::write(f, self.0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_grammar;
    use crate::matcher::MatchEngine;

    fn report(grammar: &str, input: &str) -> ParseReport {
        let registry = load_grammar(grammar).unwrap();
        let input: Vec<char> = input.chars().collect();
        let tree = MatchEngine::new(&registry)
            .parse_root("main", &input)
            .unwrap()
            .unwrap();
        ParseReport::from_tree(&tree, &input)
    }

    const PAIRS: &str = "\
main ::= pair {\",\" pair}
pair ::= <key={$letter}> \"=\" value
value ::= {$digit}
";

    #[test]
    fn report_resolves_names_and_text() {
        let report = report(PAIRS, "a=1,bé=23");
        assert_eq!(report.name, "main");
        assert_eq!(report.text, "a=1,bé=23");
        assert!(report.captures.is_empty());

        let second = &report.children[1];
        assert_eq!((second.start, second.end), (4, 9));
        assert_eq!(second.text, "bé=23");
        assert_eq!(
            second.captures,
            [CaptureReport {
                name: "key".into(),
                spans: vec![SpanReport { start: 4, end: 6 }],
            }]
        );
        assert_eq!(second.children[0].text, "23");
    }

    #[test]
    fn outline_indents_children() {
        let outline = report(PAIRS, "a=1,b=2").outline().to_string();
        assert_eq!(
            outline,
            "\
main [0..7]
  pair [0..3]
    value [2..3]
  pair [4..7]
    value [6..7]
"
        );
    }

    #[test]
    fn json_carries_the_tree() {
        let json = report(PAIRS, "a=1").to_json();
        assert!(json.starts_with('{'));
        assert!(json.contains("\"key\""));
        assert!(json.contains("\"a=1\""));
        let back: ParseReport = facet_json::from_str(&json).unwrap();
        assert_eq!(back, report(PAIRS, "a=1"));
    }
}

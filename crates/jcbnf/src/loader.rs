//! Loads JCBNF grammar files into a [`Registry`].
//!
//! A grammar file is line oriented. Each definition starts on a line that
//! begins with its name, followed by a statement symbol and the clause
//! text. Lines that begin with a statement symbol add to the definition
//! above them:
//!
//! ```text
//! #!/usr/bin/env jcbnf
//! ::= comments start with the pattern symbol and no name
//! main ::= greeting " " name
//!      ::- [ "!" ]
//!      w-- informal register
//! greeting ::= 'hello' | 'hi'
//! ```
//!
//! | Symbol | Clause |
//! |---|---|
//! | `::=` | pattern |
//! | `::-` | pattern continuation |
//! | `==>` | compiles |
//! | `-->` | compiles continuation |
//! | `<--` | oops (non-fatal error message) |
//! | `<==` | panic (fatal error message) |
//! | `w--` | warning |
//! | `w==` | unique warning |

use crate::definition::{is_valid_name, registry_key, Definition, Registry};
use crate::error::GrammarError;
use crate::grammar::compile_pattern;

const MISSING_SYMBOL: &str = "Missing statement symbol (::=, ::-, ==>, -->, <--, <==, w-- or w==)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Statement {
    Pattern,
    PatternContinued,
    Compiles,
    CompilesContinued,
    Oops,
    Panic,
    Warning,
    Unique,
}

impl Statement {
    fn parse(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "::=" => Self::Pattern,
            "::-" => Self::PatternContinued,
            "==>" => Self::Compiles,
            "-->" => Self::CompilesContinued,
            "<--" => Self::Oops,
            "<==" => Self::Panic,
            "w--" => Self::Warning,
            "w==" => Self::Unique,
            _ => return None,
        })
    }

    /// Whether this statement may follow `previous` in the same definition.
    fn continues(self, previous: Option<Self>) -> bool {
        match self {
            Self::PatternContinued => matches!(
                previous,
                Some(Self::Pattern | Self::PatternContinued)
            ),
            Self::CompilesContinued => matches!(
                previous,
                Some(Self::Compiles | Self::CompilesContinued)
            ),
            _ => true,
        }
    }
}

/// A definition whose lines are still being collected.
#[derive(Debug)]
struct Pending {
    name: String,
    line: usize,
    text: String,
    pattern: Option<String>,
    compiles: Option<String>,
    last: Option<Statement>,
    definition: Definition,
}

impl Pending {
    fn new(name: &str, line: usize, text: &str) -> Self {
        Self {
            name: name.to_owned(),
            line,
            text: text.to_owned(),
            pattern: None,
            compiles: None,
            last: None,
            definition: Definition::new(name),
        }
    }

    fn error(&self, description: impl Into<String>) -> GrammarError {
        GrammarError::new(description, self.line, self.text.clone())
    }

    fn add(&mut self, statement: Statement, body: &str) {
        let fragment = |clause: &mut Option<String>| {
            let clause = clause.get_or_insert_with(String::new);
            clause.push(' ');
            clause.push_str(body);
        };
        let message = body.trim().to_owned();
        match statement {
            Statement::Pattern | Statement::PatternContinued => fragment(&mut self.pattern),
            Statement::Compiles | Statement::CompilesContinued => fragment(&mut self.compiles),
            Statement::Oops => self.definition.oopses.push(message),
            Statement::Panic => self.definition.panics.push(message),
            Statement::Warning => self.definition.warnings.push(message),
            Statement::Unique => self.definition.uniques.push(message),
        }
        self.last = Some(statement);
    }

    fn finish(self, registry: &mut Registry) -> Result<(), GrammarError> {
        if !is_valid_name(&self.name) {
            return Err(self.error("Invalid definition name"));
        }
        if registry.contains(registry_key(&self.name)) {
            return Err(self.error("Already defined"));
        }
        let compile = |clause: Option<&str>| {
            clause
                .map(compile_pattern)
                .transpose()
                .map_err(|err| self.error(err.to_string()))
        };
        let mut definition = self.definition.clone();
        definition.pattern = compile(self.pattern.as_deref())?;
        definition.compiles = compile(self.compiles.as_deref())?;
        registry
            .insert(definition)
            .map_err(|err| self.error(err.to_string()))
    }
}

/// Parses a grammar file and compiles every definition in it.
///
/// # Errors
///
/// Returns a [`GrammarError`] naming the first offending line: a missing or
/// unknown statement symbol, a continuation with nothing to continue, an
/// invalid or duplicate name, or a clause that does not compile (reported
/// at the definition's name line).
pub fn load_grammar(text: &str) -> Result<Registry, GrammarError> {
    let mut registry = Registry::default();
    let mut pending: Option<Pending> = None;

    for (number, raw) in physical_lines(text) {
        let line = raw.trim_start_matches([' ', '\t']);
        if line.is_empty() || line.starts_with("::=") || (number == 1 && line.starts_with("#!")) {
            continue;
        }

        let name_len = if line.starts_with("w--") || line.starts_with("w==") {
            0
        } else {
            line.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '@'))
                .unwrap_or(line.len())
        };
        if name_len > 0 {
            if let Some(done) = pending.take() {
                done.finish(&mut registry)?;
            }
            pending = Some(Pending::new(&line[..name_len], number, line));
        }
        let Some(current) = pending.as_mut() else {
            return Err(GrammarError::new("Name missing", number, line));
        };

        let rest = line[name_len..].trim_start_matches([' ', '\t']);
        let Some(symbol) = rest.get(..3) else {
            let description = if rest.len() < 3 {
                MISSING_SYMBOL
            } else {
                "Unrecognised statement symbol"
            };
            return Err(GrammarError::new(description, number, line));
        };
        let statement = Statement::parse(symbol)
            .ok_or_else(|| GrammarError::new("Unrecognised statement symbol", number, line))?;
        if !statement.continues(current.last) {
            return Err(GrammarError::new("There is nothing to continue", number, line));
        }
        current.add(statement, &rest[3..]);
    }

    if let Some(done) = pending {
        done.finish(&mut registry)?;
    }
    log::debug!("loaded grammar with {} definitions", registry.len());
    Ok(registry)
}

/// Splits `text` into 1-numbered physical lines. `\n`, `\r`, `\r\n` and
/// form feed each end a line.
fn physical_lines(text: &str) -> Vec<(usize, &str)> {
    let mut lines = Vec::new();
    let mut number = 1;
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !matches!(c, '\n' | '\r' | '\u{0C}') {
            continue;
        }
        lines.push((number, &text[start..i]));
        number += 1;
        start = i + 1;
        if c == '\r' && chars.next_if(|(_, next)| *next == '\n').is_some() {
            start += 1;
        }
    }
    if start < text.len() {
        lines.push((number, &text[start..]));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarElement;

    #[test]
    fn definitions_and_continuations() {
        let text = "\
#!/usr/bin/env jcbnf
::= a comment
main ::= greeting
     ::- \" world\"
     ==> out
     <-- not quite
     w-- informal
     w== once
     <== stop

greeting ::= 'hello'
";
        let registry = load_grammar(text).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), ["main", "greeting"]);

        let main = registry.get("main").unwrap();
        assert_eq!(
            main.pattern,
            Some(GrammarElement::Sequence(vec![
                GrammarElement::reference("greeting"),
                GrammarElement::literal(" world"),
            ]))
        );
        assert_eq!(main.compiles, Some(GrammarElement::reference("out")));
        assert_eq!(main.oopses, ["not quite"]);
        assert_eq!(main.warnings, ["informal"]);
        assert_eq!(main.uniques, ["once"]);
        assert_eq!(main.panics, ["stop"]);
    }

    #[test]
    fn morphology_markers_are_kept_in_the_name() {
        let registry = load_grammar("@suffix ::= \"s\"\n").unwrap();
        let definition = registry.get("suffix").unwrap();
        assert_eq!(definition.name, "@suffix");
        assert!(definition.prepends());
    }

    #[test]
    fn hash_in_name_reports_its_line() {
        let err = load_grammar("main ::= x\n\nfo#o ::= y\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.text, "fo#o ::= y");
    }

    #[test]
    fn line_numbers_count_every_terminator() {
        let err = load_grammar("a ::= x\r\n\r\nb ::= y\x0c\rc ?? z").unwrap_err();
        assert_eq!(err.line, 5);
        assert_eq!(err.description, "Unrecognised statement symbol");
    }

    #[test]
    fn structural_errors() {
        let cases = [
            ("  ::- x", "Name missing", 1),
            ("   <-- x", "Name missing", 1),
            ("main\n", MISSING_SYMBOL, 1),
            ("main ::= x\n<-- o\n::- y", "There is nothing to continue", 3),
            ("main ::= x\n--> y", "There is nothing to continue", 2),
            ("1ab ::= x", "Invalid definition name", 1),
            ("a@b ::= x", "Invalid definition name", 1),
            ("word ::= x\nword@ ::= y", "Already defined", 2),
            ("#! not first\n#!x ::= y", "Name missing", 2),
        ];
        for (text, description, line) in cases {
            let err = load_grammar(text).unwrap_err();
            assert_eq!((err.description.as_str(), err.line), (description, line), "{text}");
        }
    }

    #[test]
    fn compile_errors_point_at_the_name_line() {
        let err = load_grammar("\nmain ::= a\n     ::- $nothing\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.text, "main ::= a");
        assert!(err.description.contains("$nothing"));
    }

    #[test]
    fn empty_clause_and_missing_pattern() {
        let registry = load_grammar("empty ::=\nquiet w-- shh\n").unwrap();
        assert_eq!(
            registry.get("empty").unwrap().pattern,
            Some(GrammarElement::Sequence(Vec::new()))
        );
        assert!(registry.get("quiet").unwrap().pattern.is_none());
    }

    #[test]
    fn physical_line_splitting() {
        let lines = physical_lines("a\r\nb\rc\nd\x0ce");
        assert_eq!(
            lines,
            [(1, "a"), (2, "b"), (3, "c"), (4, "d"), (5, "e")]
        );
        assert_eq!(physical_lines("x\n"), [(1, "x")]);
    }
}

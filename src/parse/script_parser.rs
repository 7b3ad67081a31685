use std::fmt;

use crate::model::dom::{Dom, NodeId};
use crate::parse::outline_parser::{OutlineError, tokenize};

/// Error type for event script parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: unknown action `{action}` (expected click or input)")]
    UnknownAction { line: usize, action: String },
    #[error("line {line}: missing selector")]
    MissingSelector { line: usize },
    #[error("line {line}: bad selector `{selector}`")]
    BadSelector { line: usize, selector: String },
    #[error("line {line}: input needs a value (use \"\" for empty)")]
    MissingValue { line: usize },
    #[error("line {line}: unterminated quote")]
    UnterminatedQuote { line: usize },
}

/// Addresses one node of a page.
///
/// `#id` and `.class` pick the first attached match, `.class@N` the N-th
/// (zero-based) in document order. Either may be followed by a child-index
/// path such as `/0/2`. `document` addresses the page itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Document,
    Id { id: String, path: Vec<usize> },
    Class { class: String, nth: usize, path: Vec<usize> },
}

impl Selector {
    pub fn parse(text: &str) -> Option<Selector> {
        if text == "document" {
            return Some(Selector::Document);
        }
        let mut parts = text.split('/');
        let base = parts.next()?;
        let path = parts
            .map(|p| p.parse::<usize>().ok())
            .collect::<Option<Vec<_>>>()?;

        if let Some(id) = base.strip_prefix('#') {
            if id.is_empty() {
                return None;
            }
            return Some(Selector::Id {
                id: id.to_string(),
                path,
            });
        }
        if let Some(rest) = base.strip_prefix('.') {
            let (class, nth) = match rest.split_once('@') {
                Some((class, n)) => (class, n.parse().ok()?),
                None => (rest, 0),
            };
            if class.is_empty() {
                return None;
            }
            return Some(Selector::Class {
                class: class.to_string(),
                nth,
                path,
            });
        }
        None
    }

    /// Find the addressed node among attached nodes.
    pub fn resolve(&self, dom: &Dom) -> Option<NodeId> {
        let (base, path) = match self {
            Selector::Document => return Some(dom.root()),
            Selector::Id { id, path } => (dom.get_element_by_id(id)?, path),
            Selector::Class { class, nth, path } => {
                (*dom.elements_with_class(class).get(*nth)?, path)
            }
        };
        path.iter()
            .try_fold(base, |node, &i| dom.children(node).get(i).copied())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = match self {
            Selector::Document => return write!(f, "document"),
            Selector::Id { id, path } => {
                write!(f, "#{}", id)?;
                path
            }
            Selector::Class { class, nth, path } => {
                write!(f, ".{}", class)?;
                if *nth > 0 {
                    write!(f, "@{}", nth)?;
                }
                path
            }
        };
        for i in path {
            write!(f, "/{}", i)?;
        }
        Ok(())
    }
}

/// One scripted user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Click {
        line: usize,
        selector: Selector,
    },
    /// Replace the field's value, then fire an input event on it
    Input {
        line: usize,
        selector: Selector,
        value: String,
    },
}

impl Step {
    pub fn line(&self) -> usize {
        match self {
            Step::Click { line, .. } | Step::Input { line, .. } => *line,
        }
    }

    pub fn selector(&self) -> &Selector {
        match self {
            Step::Click { selector, .. } | Step::Input { selector, .. } => selector,
        }
    }
}

/// Parse an event script: one `click <selector>` or
/// `input <selector> <value>` per line. Blank lines and `//` comments are
/// skipped.
pub fn parse_script(source: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        steps.push(parse_step(trimmed, line)?);
    }
    Ok(steps)
}

/// Parse a single script line.
pub fn parse_step(text: &str, line: usize) -> Result<Step, ScriptError> {
    let tokens = tokenize(text, line).map_err(|e| match e {
        OutlineError::UnterminatedQuote { line } => ScriptError::UnterminatedQuote { line },
        _ => ScriptError::MissingSelector { line },
    })?;
    let mut tokens = tokens.into_iter();
    let action = tokens.next().unwrap_or_default();
    let selector_text = tokens.next().ok_or(ScriptError::MissingSelector { line })?;
    let selector = Selector::parse(&selector_text).ok_or(ScriptError::BadSelector {
        line,
        selector: selector_text,
    })?;

    match action.as_str() {
        "click" => Ok(Step::Click { line, selector }),
        "input" => {
            let rest: Vec<String> = tokens.collect();
            if rest.is_empty() {
                return Err(ScriptError::MissingValue { line });
            }
            Ok(Step::Input {
                line,
                selector,
                value: rest.join(" "),
            })
        }
        _ => Err(ScriptError::UnknownAction { line, action }),
    }
}

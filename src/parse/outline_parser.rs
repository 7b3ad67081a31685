use crate::model::dom::{Dom, Node, NodeId, Tag};

/// Error type for outline parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutlineError {
    #[error("line {line}: indentation must be a multiple of two spaces")]
    OddIndent { line: usize },
    #[error("line {line}: indentation jumps more than one level")]
    IndentJump { line: usize },
    #[error("line {line}: unknown tag `{tag}`")]
    UnknownTag { line: usize, tag: String },
    #[error("line {line}: unknown attribute `{key}`")]
    UnknownAttribute { line: usize, key: String },
    #[error("line {line}: unterminated quote")]
    UnterminatedQuote { line: usize },
    #[error("line {line}: empty `{prefix}` token")]
    EmptyToken { line: usize, prefix: char },
}

/// Parse a page outline into a fresh [`Dom`].
///
/// One element per line, nested by two-space indentation:
///
/// ```text
/// div #enumerator-fields
///   div .cf-enumerator-field
///     input name=entityName value="Jane Doe"
///     button #e-17 .cf-enumerator-delete-button type=button label=Remove
/// ```
///
/// Top-level lines become children of the implicit body root. Blank lines
/// and lines starting with `//` are ignored. `value=` sets both the live
/// value and the rendered default.
pub fn parse_outline(source: &str) -> Result<Dom, OutlineError> {
    let mut dom = Dom::new();
    // open[d] is the parent for a line at depth d
    let mut open: Vec<NodeId> = vec![dom.root()];

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let indent = raw.len() - raw.trim_start_matches(' ').len();
        if indent % 2 != 0 {
            return Err(OutlineError::OddIndent { line });
        }
        let depth = indent / 2;
        if depth >= open.len() {
            return Err(OutlineError::IndentJump { line });
        }
        open.truncate(depth + 1);

        let node = parse_line(trimmed, line)?;
        let id = dom.create_child(open[depth], node);
        open.push(id);
    }

    Ok(dom)
}

/// Parse one trimmed outline line into a detached node.
pub fn parse_line(text: &str, line: usize) -> Result<Node, OutlineError> {
    let tokens = tokenize(text, line)?;
    let mut tokens = tokens.into_iter();
    let tag_name = tokens.next().unwrap_or_default();
    let tag = Tag::parse(&tag_name).ok_or(OutlineError::UnknownTag {
        line,
        tag: tag_name,
    })?;
    let mut node = Node::new(tag);

    for token in tokens {
        if let Some(id) = token.strip_prefix('#') {
            if id.is_empty() {
                return Err(OutlineError::EmptyToken { line, prefix: '#' });
            }
            node.id = Some(id.to_string());
        } else if let Some(class) = token.strip_prefix('.') {
            if class.is_empty() {
                return Err(OutlineError::EmptyToken { line, prefix: '.' });
            }
            node.add_class(class);
        } else if token == "disabled" {
            node.disabled = true;
        } else if let Some((key, value)) = token.split_once('=') {
            match key {
                "name" => node.name = Some(value.to_string()),
                "type" => node.input_type = Some(value.to_string()),
                "label" => node.label = Some(value.to_string()),
                "value" => node.set_rendered_value(value),
                _ => {
                    return Err(OutlineError::UnknownAttribute {
                        line,
                        key: key.to_string(),
                    });
                }
            }
        } else {
            return Err(OutlineError::UnknownAttribute { line, key: token });
        }
    }

    Ok(node)
}

/// Split on whitespace, honouring double quotes (with `\"` and `\\`
/// escapes). Quotes are removed from the resulting tokens.
pub(crate) fn tokenize(text: &str, line: usize) -> Result<Vec<String>, OutlineError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quote = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if in_quote {
            match c {
                '"' => in_quote = false,
                '\\' => match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => return Err(OutlineError::UnterminatedQuote { line }),
                },
                _ => current.push(c),
            }
        } else if c == '"' {
            in_quote = true;
            in_token = true;
        } else if c.is_whitespace() {
            if in_token {
                tokens.push(std::mem::take(&mut current));
                in_token = false;
            }
        } else {
            current.push(c);
            in_token = true;
        }
    }

    if in_quote {
        return Err(OutlineError::UnterminatedQuote { line });
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

//! The selector subset understood by the headless document.
//!
//! Supported: type (`div`), universal (`*`), id (`#app`), class (`.todo`),
//! attribute presence / equality (`[href]`, `[type="checkbox"]`), compound
//! forms of those, the descendant combinator (whitespace) and selector lists
//! separated by commas.

use crate::error::DomError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, Option<String>)>,
}

/// Compounds ordered from the outermost ancestor to the subject.
pub(super) type Complex = Vec<Compound>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct SelectorList(pub Vec<Complex>);

pub(super) fn parse(input: &str) -> Result<SelectorList, DomError> {
    let syntax = || DomError::Syntax(input.to_owned());
    let mut list = Vec::new();
    for part in input.split(',') {
        let complex = part
            .split_whitespace()
            .map(|compound| parse_compound(compound).ok_or_else(syntax))
            .collect::<Result<Complex, _>>()?;
        if complex.is_empty() {
            return Err(syntax());
        }
        list.push(complex);
    }
    Ok(SelectorList(list))
}

fn parse_compound(input: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut chars = input.char_indices().peekable();

    if let Some(&(_, first)) = chars.peek() {
        if first == '*' {
            chars.next();
        } else if is_name_char(first) {
            let tag = take_name(input, &mut chars);
            compound.tag = Some(tag.to_ascii_lowercase());
        }
    }

    while let Some((_, c)) = chars.next() {
        match c {
            '#' => {
                let id = take_name(input, &mut chars);
                if id.is_empty() {
                    return None;
                }
                compound.id = Some(id.to_owned());
            }
            '.' => {
                let class = take_name(input, &mut chars);
                if class.is_empty() {
                    return None;
                }
                compound.classes.push(class.to_owned());
            }
            '[' => {
                let (start, _) = *chars.peek()?;
                let end = input[start..].find(']')? + start;
                let body = &input[start..end];
                while chars.peek().is_some_and(|&(index, _)| index <= end) {
                    chars.next();
                }
                compound.attributes.push(parse_attribute(body)?);
            }
            _ => return None,
        }
    }

    Some(compound)
}

fn parse_attribute(body: &str) -> Option<(String, Option<String>)> {
    match body.split_once('=') {
        None => {
            let name = body.trim();
            (!name.is_empty() && name.chars().all(is_name_char)).then(|| (name.to_owned(), None))
        }
        Some((name, value)) => {
            let name = name.trim();
            if name.is_empty() || !name.chars().all(is_name_char) {
                return None;
            }
            let value = value.trim();
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            Some((name.to_owned(), Some(unquoted.to_owned())))
        }
    }
}

fn take_name<'a>(
    input: &'a str,
    chars: &mut core::iter::Peekable<core::str::CharIndices<'a>>,
) -> &'a str {
    let start = chars.peek().map_or(input.len(), |&(index, _)| index);
    let mut end = start;
    while let Some(&(index, c)) = chars.peek() {
        if !is_name_char(c) {
            break;
        }
        end = index + c.len_utf8();
        chars.next();
    }
    &input[start..end]
}

const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

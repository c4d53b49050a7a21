//! Tuple micro-grammar
//!
//! - tuple: `(a, b, "c, d", [x; y])`, comma separated, tokens trimmed
//! - quoted token: `"..."` keeps commas and parentheses, always a string
//! - list token: `[x; y]` becomes an ordered list
//! - column with filter: `age[gt]`
//!
//! Unquoted tokens that look like integers or floats become numbers.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Number, Value as JsonValue};

use crate::error::{FilterError, Result};

const TUPLE_START: char = '(';
const TUPLE_END: char = ')';
const LIST_START: char = '[';
const LIST_END: char = ']';
const QUOTE: char = '"';
const TUPLE_SEPARATOR: char = ',';
const LIST_SEPARATOR: char = ';';

/// Whether a raw value uses the tuple syntax
pub fn is_tuple(raw: &JsonValue) -> bool {
    raw.as_str().is_some_and(is_tuple_str)
}

pub fn is_tuple_str(raw: &str) -> bool {
    let raw = raw.trim();
    raw.len() >= 2 && raw.starts_with(TUPLE_START) && raw.ends_with(TUPLE_END)
}

/// Parsed tuple tokens, in order
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    tokens: Vec<String>,
}

impl Tuple {
    /// Parse a tuple string
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if !is_tuple_str(trimmed) {
            let reason = "it must be enclosed in parentheses";
            return Err(FilterError::malformed_tuple(raw, reason));
        }

        let inner = &trimmed[1..trimmed.len() - 1];
        if inner.trim().is_empty() {
            return Err(FilterError::malformed_tuple(raw, "it must not be empty"));
        }
        let tokens = split_tokens(raw, inner, TUPLE_SEPARATOR)?;

        Ok(Self { tokens })
    }

    /// Parse a tuple string that must have exactly `expected` tokens
    pub fn parse_with_count(raw: &str, expected: usize) -> Result<Self> {
        let tuple = Self::parse(raw)?;
        if tuple.len() != expected {
            return Err(FilterError::tuple_count(expected, tuple.len()));
        }
        Ok(tuple)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens as column names, quotes removed
    pub fn columns(&self) -> Vec<String> {
        self.tokens
            .iter()
            .map(|token| unquote(token).to_string())
            .collect()
    }

    /// First token as a column name
    pub fn first_column(&self) -> Option<String> {
        self.tokens.first().map(|token| unquote(token).to_string())
    }

    /// Tokens as values: strings, numbers or lists
    pub fn values(&self) -> Result<Vec<JsonValue>> {
        self.tokens.iter().map(|token| parse_value(token)).collect()
    }
}

/// Split a column into its name and embedded filter, `age[gt]` -> (`age`, `gt`)
pub fn split_column(raw: &str) -> (String, Option<String>) {
    static RE_COLUMN_FILTER: OnceLock<Regex> = OnceLock::new();
    let re = RE_COLUMN_FILTER
        .get_or_init(|| Regex::new(r"^(.+?)\[([A-Za-z_]+)\]$").expect("Invalid regex"));

    match re.captures(raw.trim()) {
        Some(captures) => {
            let filter = captures[2].to_string();
            (captures[1].trim().to_string(), Some(filter))
        }
        None => (raw.trim().to_string(), None),
    }
}

fn split_tokens(raw: &str, inner: &str, separator: char) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut depth = 0usize;

    for ch in inner.chars() {
        match ch {
            QUOTE => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            LIST_START if !in_quotes => {
                depth += 1;
                current.push(ch);
            }
            LIST_END if !in_quotes => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| FilterError::malformed_tuple(raw, "unexpected ]"))?;
                current.push(ch);
            }
            c if c == separator && !in_quotes && depth == 0 => {
                tokens.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if in_quotes {
        return Err(FilterError::malformed_tuple(raw, "unterminated quote"));
    }
    if depth > 0 {
        return Err(FilterError::malformed_tuple(raw, "unterminated list"));
    }

    tokens.push(current.trim().to_string());
    Ok(tokens)
}

fn is_quoted(token: &str) -> bool {
    token.len() >= 2 && token.starts_with(QUOTE) && token.ends_with(QUOTE)
}

fn unquote(token: &str) -> &str {
    if is_quoted(token) {
        &token[1..token.len() - 1]
    } else {
        token
    }
}

fn is_list(token: &str) -> bool {
    token.len() >= 2 && token.starts_with(LIST_START) && token.ends_with(LIST_END)
}

fn parse_value(token: &str) -> Result<JsonValue> {
    if is_quoted(token) {
        return Ok(JsonValue::String(unquote(token).to_string()));
    }

    if is_list(token) {
        let inner = &token[1..token.len() - 1];
        if inner.trim().is_empty() {
            return Ok(JsonValue::Array(Vec::new()));
        }
        let items = split_tokens(token, inner, LIST_SEPARATOR)?
            .iter()
            .map(|item| parse_value(item))
            .collect::<Result<Vec<_>>>()?;
        return Ok(JsonValue::Array(items));
    }

    Ok(parse_scalar(token))
}

/// Coerce an unquoted token: integers and floats become numbers
pub fn parse_scalar(token: &str) -> JsonValue {
    if let Ok(integer) = token.parse::<i64>() {
        return JsonValue::Number(integer.into());
    }
    if token.contains('.')
        && let Some(number) = token.parse::<f64>().ok().and_then(Number::from_f64)
    {
        return JsonValue::Number(number);
    }
    JsonValue::String(token.to_string())
}

//! Compact message notation.
//!
//! Event triggers carry their message as a terse, JSON-like string such as
//! `foo:1` or `sys:gateway,handle:event,args:{limit:10,tags:[a,b]}`.
//!
//! - The top level is an object; braces around it are optional
//! - Pairs are `key:value`, separated by commas; trailing commas are allowed
//! - A key without a value means `true` (`sys,gateway` == `sys:true,gateway:true`)
//! - Values may be `{...}` objects, `[...]` arrays, or quoted strings (`'` or `"`)
//! - Bare values are typed when they read as `true`, `false`, `null` or a
//!   number, and are strings otherwise

use crate::error::NotationError;
use serde_json::{Map, Number, Value};

/// Decode a compact-notation string into a JSON object.
///
/// # Errors
///
/// Returns [`NotationError`] with the character position of the first
/// syntax error.
pub fn decode_notation(source: &str) -> Result<Map<String, Value>, NotationError> {
    let mut parser = Parser::new(source);
    parser.skip_whitespace();

    let map = if parser.peek() == Some('{') {
        parser.bump();
        let map = parser.pairs(Some('}'))?;
        parser.expect('}')?;
        map
    } else {
        parser.pairs(None)?
    };

    parser.skip_whitespace();
    if let Some(c) = parser.peek() {
        return Err(NotationError::new(parser.pos, format!("unexpected '{}'", c)));
    }
    Ok(map)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), NotationError> {
        self.skip_whitespace();
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(NotationError::new(
                self.pos - 1,
                format!("expected '{}' but found '{}'", expected, c),
            )),
            None => Err(NotationError::new(
                self.pos,
                format!("expected '{}' but input ended", expected),
            )),
        }
    }

    /// Comma-separated pairs up to `close` (not consumed) or end of input.
    fn pairs(&mut self, close: Option<char>) -> Result<Map<String, Value>, NotationError> {
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    return match close {
                        None => Ok(map),
                        Some(c) => Err(NotationError::new(
                            self.pos,
                            format!("expected '{}' but input ended", c),
                        )),
                    };
                }
                Some(c) if Some(c) == close => return Ok(map),
                Some(',') => {
                    self.pos += 1;
                    continue;
                }
                Some(_) => {}
            }

            let key = self.key()?;
            self.skip_whitespace();
            let value = if self.peek() == Some(':') {
                self.pos += 1;
                self.value()?
            } else {
                Value::Bool(true)
            };
            map.insert(key, value);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(c) if Some(c) == close => {}
                None => {}
                Some(c) => {
                    return Err(NotationError::new(self.pos, format!("unexpected '{}'", c)));
                }
            }
        }
    }

    fn items(&mut self) -> Result<Vec<Value>, NotationError> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(NotationError::new(self.pos, "expected ']' but input ended")),
                Some(']') => return Ok(items),
                Some(',') => {
                    self.pos += 1;
                    continue;
                }
                Some(_) => {}
            }

            items.push(self.value()?);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') | None => {}
                Some(c) => {
                    return Err(NotationError::new(self.pos, format!("unexpected '{}'", c)));
                }
            }
        }
    }

    fn key(&mut self) -> Result<String, NotationError> {
        match self.peek() {
            Some(quote @ ('\'' | '"')) => {
                self.pos += 1;
                self.quoted(quote)
            }
            _ => {
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c.is_whitespace() || matches!(c, ':' | ',' | '{' | '}' | '[' | ']') {
                        break;
                    }
                    self.pos += 1;
                }
                if self.pos == start {
                    return Err(NotationError::new(start, "expected a key"));
                }
                Ok(self.chars[start..self.pos].iter().collect())
            }
        }
    }

    fn value(&mut self) -> Result<Value, NotationError> {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => {
                self.pos += 1;
                let map = self.pairs(Some('}'))?;
                self.expect('}')?;
                Ok(Value::Object(map))
            }
            Some('[') => {
                self.pos += 1;
                let items = self.items()?;
                self.expect(']')?;
                Ok(Value::Array(items))
            }
            Some(quote @ ('\'' | '"')) => {
                self.pos += 1;
                Ok(Value::String(self.quoted(quote)?))
            }
            Some(c @ ('}' | ']')) => Err(NotationError::new(
                self.pos,
                format!("unexpected '{}'", c),
            )),
            // `a:,b:1` and `a:` leave the value empty.
            Some(',') | None => Ok(Value::String(String::new())),
            Some(_) => Ok(self.bare()),
        }
    }

    /// Text after an opening quote up to the matching closing quote;
    /// backslash escapes the next character.
    fn quoted(&mut self, quote: char) -> Result<String, NotationError> {
        let start = self.pos;
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(NotationError::new(start, "unterminated string")),
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(c) => text.push(c),
                    None => return Err(NotationError::new(start, "unterminated string")),
                },
                Some(c) if c == quote => return Ok(text),
                Some(c) => text.push(c),
            }
        }
    }

    fn bare(&mut self) -> Value {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, ',' | '}' | ']') {
                break;
            }
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        scalar(text.trim())
    }
}

fn scalar(text: &str) -> Value {
    match text {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => {
            if let Ok(n) = text.parse::<i64>() {
                Value::Number(n.into())
            } else if let Some(n) = text
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite() && looks_numeric(text))
                .and_then(Number::from_f64)
            {
                Value::Number(n)
            } else {
                Value::String(text.to_string())
            }
        }
    }
}

/// `f64::from_str` also accepts words like `inf` and `NaN`; only digit-led
/// text counts as a number here.
fn looks_numeric(text: &str) -> bool {
    text.trim_start_matches(['-', '+'])
        .starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

#[cfg(test)]
#[path = "notation_tests.rs"]
mod tests;

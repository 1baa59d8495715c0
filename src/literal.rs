//! Lenient reader for object literals written in scripting-language style
//! rather than strict JSON: single-quoted strings, `None`/`True`/`False`,
//! tuples and trailing commas. The whole input must be a single value.

use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LiteralError {
    #[error("unexpected end of input")]
    Eof,
    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("invalid number {0:?}")]
    Number(String),
    #[error("unsupported dict key at offset {0}")]
    Key(usize),
    #[error("trailing input at offset {0}")]
    Trailing(usize),
    #[error("nesting deeper than 128 levels at offset {0}")]
    TooDeep(usize),
}

/// Same recursion ceiling serde_json applies to strict JSON.
pub const MAX_DEPTH: usize = 128;

type Parsed<T> = Result<T, LiteralError>;

pub fn parse_literal(input: &str) -> Parsed<Value> {
    let mut p = Parser { src: input, pos: 0, depth: 0 };
    p.skip_ws();
    let value = p.value()?;
    p.skip_ws();
    if p.pos < p.src.len() {
        return Err(LiteralError::Trailing(p.pos));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn unexpected(&self, found: char) -> LiteralError {
        LiteralError::Unexpected { found, offset: self.pos - found.len_utf8() }
    }

    fn expect(&mut self, want: char) -> Parsed<()> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(self.unexpected(c)),
            None => Err(LiteralError::Eof),
        }
    }

    fn value(&mut self) -> Parsed<Value> {
        match self.peek().ok_or(LiteralError::Eof)? {
            '{' => self.nested(Self::dict),
            '[' => self.nested(|p| p.seq(']')),
            '(' => self.nested(|p| p.seq(')')),
            '\'' | '"' => self.string().map(Value::String),
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            c if c.is_alphabetic() || c == '_' => self.word(),
            c => Err(LiteralError::Unexpected { found: c, offset: self.pos }),
        }
    }

    fn nested(&mut self, parse: impl FnOnce(&mut Self) -> Parsed<Value>) -> Parsed<Value> {
        if self.depth >= MAX_DEPTH {
            return Err(LiteralError::TooDeep(self.pos));
        }
        self.depth += 1;
        let out = parse(self);
        self.depth -= 1;
        out
    }

    fn dict(&mut self) -> Parsed<Value> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Object(map));
            }
            let offset = self.pos;
            let key = match self.value()? {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                _ => return Err(LiteralError::Key(offset)),
            };
            self.skip_ws();
            self.expect(':')?;
            self.skip_ws();
            let value = self.value()?;
            map.insert(key, value);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(Value::Object(map)),
                Some(c) => return Err(self.unexpected(c)),
                None => return Err(LiteralError::Eof),
            }
        }
    }

    // lists and tuples both map to arrays
    fn seq(&mut self, close: char) -> Parsed<Value> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(Value::Array(items)),
                Some(c) => return Err(self.unexpected(c)),
                None => return Err(LiteralError::Eof),
            }
        }
    }

    fn string(&mut self) -> Parsed<String> {
        let quote = self.bump().ok_or(LiteralError::Eof)?;
        let mut out = String::new();
        loop {
            match self.bump().ok_or(LiteralError::Eof)? {
                c if c == quote => return Ok(out),
                '\\' => match self.bump().ok_or(LiteralError::Eof)? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    '0' => out.push('\0'),
                    '\\' => out.push('\\'),
                    '\'' => out.push('\''),
                    '"' => out.push('"'),
                    '\n' => {}
                    'u' => out.push(self.hex_escape(4)?),
                    'x' => out.push(self.hex_escape(2)?),
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                },
                c => out.push(c),
            }
        }
    }

    fn hex_escape(&mut self, len: usize) -> Parsed<char> {
        let start = self.pos;
        let end = start + len;
        let digits = self.src.get(start..end).ok_or(LiteralError::Eof)?;
        let code = u32::from_str_radix(digits, 16).map_err(|_| LiteralError::Number(digits.to_string()))?;
        self.pos = end;
        char::from_u32(code).ok_or_else(|| LiteralError::Number(digits.to_string()))
    }

    fn number(&mut self) -> Parsed<Value> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '+')) {
            self.bump();
        }
        let text: String = self.src[start..self.pos].chars().filter(|c| *c != '_').collect();
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Value::Number(Number::from(i)));
        }
        text.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(LiteralError::Number(text))
    }

    fn word(&mut self) -> Parsed<Value> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        match &self.src[start..self.pos] {
            "None" | "null" => Ok(Value::Null),
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            word => Err(LiteralError::Unexpected {
                found: word.chars().next().unwrap_or(' '),
                offset: start,
            }),
        }
    }
}

//! Argument resolution. A token is first read as a literal from a small closed grammar: numbers,
//! quoted strings, `true`/`false`/`null` (also `True`/`False`/`None`), objects and arrays.
//! Anything else is a dotted path into the source document.
//!
//! Because literals win, a field named `1` or `true` can never be referenced by bare name.
use crate::namespace;
use serde_json::{Map, Number, Value};

/// resolves an argument token against the source document.
pub fn resolve_argument(token: &str, source: &Value) -> Value {
    parse_literal(token).unwrap_or_else(|| namespace::extract(source, token))
}

/// parses the whole token as a literal, `None` when it is not one.
pub fn parse_literal(token: &str) -> Option<Value> {
    let mut parser = Parser {
        input: token,
        position: 0,
    };
    let value = parser.value()?;
    parser.skip_whitespace();
    if parser.position == token.len() {
        Some(value)
    } else {
        None
    }
}

struct Parser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Parser<'a> {
    #[inline]
    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().map_or(false, char::is_whitespace) {
            self.bump();
        }
    }

    fn value(&mut self) -> Option<Value> {
        self.skip_whitespace();
        match self.peek()? {
            '{' => self.object(),
            '[' => self.array(),
            '"' | '\'' => self.string().map(Value::String),
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            _ => self.keyword(),
        }
    }

    fn keyword(&mut self) -> Option<Value> {
        let rest = self.rest();
        let end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or_else(|| rest.len());
        let value = match &rest[..end] {
            "true" | "True" => Value::Bool(true),
            "false" | "False" => Value::Bool(false),
            "null" | "None" => Value::Null,
            _ => return None,
        };
        self.position += end;
        Some(value)
    }

    fn digits(&mut self) -> usize {
        let mut count = 0;
        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.bump();
            count += 1;
        }
        count
    }

    fn number(&mut self) -> Option<Value> {
        let start = self.position;
        if !self.eat('-') {
            self.eat('+');
        }
        let whole = self.digits();
        let mut integer = true;
        if self.eat('.') {
            integer = false;
            if whole == 0 && self.digits() == 0 {
                return None;
            }
            self.digits();
        } else if whole == 0 {
            return None;
        }
        if let Some('e') | Some('E') = self.peek() {
            integer = false;
            self.bump();
            if !self.eat('-') {
                self.eat('+');
            }
            if self.digits() == 0 {
                return None;
            }
        }

        let text = self.input[start..self.position].trim_start_matches('+');
        if integer {
            if let Ok(i) = text.parse::<i64>() {
                return Some(Value::from(i));
            }
            if let Ok(u) = text.parse::<u64>() {
                return Some(Value::from(u));
            }
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
    }

    fn string(&mut self) -> Option<String> {
        let quote = self.bump()?;
        let mut s = String::new();
        loop {
            match self.bump()? {
                c if c == quote => return Some(s),
                '\\' => match self.bump()? {
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    'r' => s.push('\r'),
                    'b' => s.push('\u{8}'),
                    'f' => s.push('\u{c}'),
                    'u' => {
                        let rest = self.rest();
                        let hex = rest.get(..4)?;
                        let c = u32::from_str_radix(hex, 16)
                            .ok()
                            .and_then(std::char::from_u32)?;
                        self.position += 4;
                        s.push(c);
                    }
                    c @ '\\' | c @ '/' | c @ '"' | c @ '\'' => s.push(c),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                },
                c => s.push(c),
            }
        }
    }

    fn array(&mut self) -> Option<Value> {
        self.bump();
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.eat(']') {
            return Some(Value::Array(items));
        }
        loop {
            items.push(self.value()?);
            self.skip_whitespace();
            if self.eat(',') {
                self.skip_whitespace();
                if self.eat(']') {
                    break;
                }
            } else if self.eat(']') {
                break;
            } else {
                return None;
            }
        }
        Some(Value::Array(items))
    }

    fn object(&mut self) -> Option<Value> {
        self.bump();
        let mut map = Map::new();
        self.skip_whitespace();
        if self.eat('}') {
            return Some(Value::Object(map));
        }
        loop {
            self.skip_whitespace();
            let key = match self.peek()? {
                '"' | '\'' => self.string()?,
                _ => return None,
            };
            self.skip_whitespace();
            if !self.eat(':') {
                return None;
            }
            let value = self.value()?;
            map.insert(key, value);
            self.skip_whitespace();
            if self.eat(',') {
                self.skip_whitespace();
                if self.eat('}') {
                    break;
                }
            } else if self.eat('}') {
                break;
            } else {
                return None;
            }
        }
        Some(Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers() {
        assert_eq!(Some(json!(66)), parse_literal("66"));
        assert_eq!(Some(json!(-1)), parse_literal("-1"));
        assert_eq!(Some(json!(2.5)), parse_literal("2.5"));
        assert_eq!(Some(json!(12300000.0)), parse_literal("1.23e7"));
        assert_eq!(Some(json!(0.5)), parse_literal(".5"));
        assert_eq!(Some(json!(3)), parse_literal("+3"));
        assert_eq!(None, parse_literal("1.2.3"));
        assert_eq!(None, parse_literal("-"));
        assert_eq!(None, parse_literal("inf"));
        assert_eq!(None, parse_literal("1e"));
    }

    #[test]
    fn test_strings() {
        assert_eq!(Some(json!("aaa")), parse_literal("'aaa'"));
        assert_eq!(Some(json!("-")), parse_literal(r#""-""#));
        assert_eq!(Some(json!("{'a': 22}")), parse_literal(r#""{'a': 22}""#));
        assert_eq!(Some(json!("it's")), parse_literal(r"'it\'s'"));
        assert_eq!(Some(json!("é")), parse_literal(r#""é""#));
        assert_eq!(None, parse_literal("'open"));
    }

    #[test]
    fn test_keywords() {
        assert_eq!(Some(json!(true)), parse_literal("true"));
        assert_eq!(Some(json!(false)), parse_literal("False"));
        assert_eq!(Some(Value::Null), parse_literal("None"));
        assert_eq!(None, parse_literal("truex"));
        assert_eq!(None, parse_literal("a.X"));
    }

    #[test]
    fn test_structures() {
        assert_eq!(
            Some(json!({"0": "no", "1": [1, 2.5, null]})),
            parse_literal(r#"{"0": 'no', '1': [1, 2.5, None],}"#)
        );
        assert_eq!(Some(json!([])), parse_literal("[ ]"));
        assert_eq!(None, parse_literal("{a: 1}"));
        assert_eq!(None, parse_literal("[1 2]"));
    }

    #[test]
    fn test_resolve_argument() {
        let data = json!({"a": {"X": 3}, "1": "shadowed", "true": "shadowed"});
        assert_eq!(json!(3), resolve_argument("a.X", &data));
        assert_eq!(json!(1), resolve_argument("1", &data));
        assert_eq!(json!(true), resolve_argument("true", &data));
        assert_eq!(Value::Null, resolve_argument("missing", &data));
    }
}

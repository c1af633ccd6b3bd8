//! Splits pipeline expressions such as `weather.temp $ words $ 2 $ + 1.5` into segments.
//!
//! Tokens are separated by whitespace. Word characters are alphanumerics, `_` and the operator
//! characters `. + - * = < > !` so `a.b`, `**` and `>=` each stay a single token. Any other
//! character forms a token of its own, which is how `$` splits segments even without surrounding
//! whitespace. Quoted tokens keep their quotes and content verbatim.
use crate::errors::{Error, Result};

const SEPARATOR: &str = "$";
const OPERATOR_CHARS: &str = "_.+-*=<>!";

/// Segment is one `$` delimited part of an expression: an operation name followed by its argument
/// tokens. The first segment of an expression holds the primary selector instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    tokens: Vec<String>,
}

impl Segment {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn operation(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    pub fn arguments(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

enum State {
    Between,
    Word(String),
    Quoted(char, String),
}

#[inline]
fn is_word(c: char) -> bool {
    c.is_alphanumeric() || OPERATOR_CHARS.contains(c)
}

#[inline]
fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

/// splits an expression into raw tokens.
pub fn tokens(expression: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut state = State::Between;

    for c in expression.chars() {
        state = match state {
            State::Quoted(quote, mut buf) => {
                buf.push(c);
                if c == quote {
                    tokens.push(buf);
                    State::Between
                } else {
                    State::Quoted(quote, buf)
                }
            }
            State::Word(mut buf) if is_word(c) => {
                buf.push(c);
                State::Word(buf)
            }
            State::Word(buf) => {
                tokens.push(buf);
                start(c, &mut tokens)
            }
            State::Between => start(c, &mut tokens),
        };
    }

    match state {
        State::Quoted(quote, buf) => Err(Error::malformed(
            format!("no closing quotation {} for `{}`", quote, buf),
            "",
        )),
        State::Word(buf) => {
            tokens.push(buf);
            Ok(tokens)
        }
        State::Between => Ok(tokens),
    }
}

#[inline]
fn start(c: char, tokens: &mut Vec<String>) -> State {
    if c.is_whitespace() {
        State::Between
    } else if is_word(c) {
        State::Word(c.to_string())
    } else if is_quote(c) {
        State::Quoted(c, c.to_string())
    } else {
        tokens.push(c.to_string());
        State::Between
    }
}

/// tokenize splits an expression into its segments. There is always at least one segment; the
/// first one is the primary selector and may be empty.
pub fn tokenize(expression: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut current = Segment::default();
    for token in tokens(expression)? {
        if token == SEPARATOR {
            segments.push(std::mem::take(&mut current));
        } else {
            current.tokens.push(token);
        }
    }
    segments.push(current);
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(expression: &str) -> Vec<Vec<String>> {
        tokenize(expression)
            .unwrap()
            .into_iter()
            .map(|s| s.tokens)
            .collect()
    }

    #[test]
    fn test_pipeline() {
        assert_eq!(
            vec![
                vec!["weather.temp"],
                vec!["words"],
                vec!["2"],
                vec!["+", "1.5"]
            ],
            segments("weather.temp $ words $ 2 $ + 1.5")
        );
    }

    #[test]
    fn test_no_whitespace() {
        assert_eq!(
            vec![vec!["weather.temp"], vec!["words"], vec!["first"]],
            segments("weather.temp$words$first")
        );
    }

    #[test]
    fn test_operators_stay_whole() -> Result<()> {
        assert_eq!(vec!["a.X", "**", "-1", ">=", "!="], tokens("a.X ** -1 >= !=")?);
        assert_eq!(vec!["%", "/"], tokens("%/")?);
        Ok(())
    }

    #[test]
    fn test_quotes() -> Result<()> {
        assert_eq!(
            vec!["default", r#""{'a': 22}""#],
            tokens(r#"default "{'a': 22}" "#)?
        );
        assert_eq!(vec!["join", "'-'"], tokens("join '-'")?);
        assert_eq!(vec!["x", "'$'"], tokens("x'$'")?);
        Ok(())
    }

    #[test]
    fn test_leading_separator() {
        assert_eq!(
            vec![vec![], vec!["list", "a.X", "a.Y"]],
            segments("$ list a.X a.Y")
        );
        assert_eq!(vec![vec!["a"], vec![]], segments("a $"));
    }

    #[test]
    fn test_unicode_words() {
        assert_eq!(vec![vec!["名字"], vec!["upper"]], segments("名字 $ upper"));
    }

    #[test]
    fn test_unterminated_quote() {
        match tokenize("a $ default 'oops") {
            Err(Error::MalformedExpression { message, .. }) => {
                assert!(message.contains("no closing quotation"))
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}

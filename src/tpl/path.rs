use crate::error::Error;

/// Bracket indices with more digits than this are rejected.
pub const MAX_INDEX_DIGITS: usize = 16;

/// What the scanner has just consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing yet.
    Start,
    /// A dotted key or a bracket segment.
    Segment,
    /// A `.` that still needs its key.
    Dot,
}

/// A hand-written scanner for placeholder expressions.
///
/// Grammar, with whitespace allowed around every token:
/// - dotted key: `.`? followed by `[A-Za-z0-9_$]+`, where the dot is only
///   optional at the very start of the expression
/// - bracket key: `[` then a `'`, `"` or `` ` `` quoted string (taken
///   verbatim) or a non-negative integer with optional `+` and leading
///   zeros, then `]`
struct PathParser<'a> {
    /// The trimmed expression.
    input: &'a str,
    /// Byte offset of the next unread character.
    pos: usize,
    state: State,
    keys: Vec<String>,
}

impl<'a> PathParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            state: State::Start,
            keys: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<Vec<String>, Error> {
        loop {
            self.skip_whitespace();
            let Some(c) = self.peek() else {
                break;
            };

            match c {
                '.' => {
                    if self.state == State::Dot {
                        return Err(self.error("unexpected second \".\""));
                    }
                    self.state = State::Dot;
                    self.pos += 1;
                }
                '[' => {
                    if self.state == State::Dot {
                        return Err(self.error("expected a key after \".\""));
                    }
                    self.pos += 1;
                    let key = self.parse_bracket()?;
                    self.keys.push(key);
                    self.state = State::Segment;
                }
                c if is_key_char(c) => {
                    if self.state == State::Segment {
                        return Err(self.error("missing \".\" before key"));
                    }
                    let key = self.take_while(is_key_char);
                    self.keys.push(key.to_string());
                    self.state = State::Segment;
                }
                c => return Err(self.error(format!("unexpected character {c:?}"))),
            }
        }

        if self.state == State::Dot {
            return Err(self.error("expected a key after \".\""));
        }
        Ok(self.keys)
    }

    /// Parses the inside of `[...]`; the opening bracket is already consumed.
    fn parse_bracket(&mut self) -> Result<String, Error> {
        self.skip_whitespace();
        let key = match self.peek() {
            Some(q @ ('\'' | '"' | '`')) => self.parse_quoted(q)?,
            Some(c) if c == '+' || c.is_ascii_digit() => self.parse_index()?,
            Some('-') => return Err(self.error("negative index")),
            Some(']') => return Err(self.error("empty brackets")),
            Some(c) => return Err(self.error(format!("unexpected character {c:?} in brackets"))),
            None => return Err(self.error("missing \"]\"")),
        };

        self.skip_whitespace();
        match self.peek() {
            Some(']') => {
                self.pos += 1;
                Ok(key)
            }
            Some('.') => Err(self.error("index must be a whole number")),
            Some(c) => Err(self.error(format!("expected \"]\", found {c:?}"))),
            None => Err(self.error("missing \"]\"")),
        }
    }

    fn parse_quoted(&mut self, quote: char) -> Result<String, Error> {
        let start = self.pos;
        self.pos += quote.len_utf8();
        let input = self.input;
        let rest = &input[self.pos..];
        let Some(len) = rest.find(quote) else {
            self.pos = start;
            return Err(self.error(format!("missing closing {quote}")));
        };
        let key = rest[..len].to_string();
        self.pos += len + quote.len_utf8();
        Ok(key)
    }

    /// Reads `+?[0-9]+` and normalizes it to a canonical index.
    fn parse_index(&mut self) -> Result<String, Error> {
        let start = self.pos;
        if self.peek() == Some('+') {
            self.pos += 1;
        }
        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            self.pos = start;
            return Err(self.error("expected digits after \"+\""));
        }
        if digits.len() > MAX_INDEX_DIGITS {
            self.pos = start;
            return Err(self.error(format!(
                "index longer than {MAX_INDEX_DIGITS} digits"
            )));
        }

        let trimmed = digits.trim_start_matches('0');
        Ok(if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        })
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let input = self.input;
        let rest = &input[self.pos..];
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::syntax(message, self.input, self.pos)
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Parses a placeholder expression into its Ref keys without caching or
/// depth checks. An empty or all-whitespace expression yields no keys.
///
/// ```
/// use micromustache::tpl::path::parse_path;
///
/// assert_eq!(parse_path(r#"a["b"].c[3]"#).unwrap(), ["a", "b", "c", "3"]);
/// assert!(parse_path("a[-1]").is_err());
/// ```
pub fn parse_path(expr: &str) -> Result<Vec<String>, Error> {
    PathParser::new(expr.trim()).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(expr: &str) -> Vec<String> {
        match parse_path(expr) {
            Ok(keys) => keys,
            Err(e) => panic!("{expr:?} should parse: {e}"),
        }
    }

    fn fails(expr: &str) -> bool {
        matches!(parse_path(expr), Err(Error::Syntax { .. }))
    }

    #[test]
    fn test_dotted() {
        assert_eq!(keys("a"), ["a"]);
        assert_eq!(keys("a.b.c"), ["a", "b", "c"]);
        assert_eq!(keys("a.0"), ["a", "0"]);
        assert_eq!(keys("$el._x1"), ["$el", "_x1"]);
        assert_eq!(keys(" a . b "), ["a", "b"]);
        assert_eq!(keys(".a"), ["a"]);
    }

    #[test]
    fn test_brackets() {
        assert_eq!(keys(r#"a["b"].c[3]"#), ["a", "b", "c", "3"]);
        assert_eq!(keys("a['x y']"), ["a", "x y"]);
        assert_eq!(keys("a[`b\"c`]"), ["a", "b\"c"]);
        assert_eq!(keys(r#"["a"]["b"]"#), ["a", "b"]);
        assert_eq!(keys("a[0][1]"), ["a", "0", "1"]);
        assert_eq!(keys("a[ 2 ]"), ["a", "2"]);
        assert_eq!(keys(r#"a[""]"#), ["a", ""]);
        assert_eq!(keys("a[0].b"), ["a", "0", "b"]);
    }

    #[test]
    fn test_index_normalization() {
        assert_eq!(keys("a[007]"), ["a", "7"]);
        assert_eq!(keys("a[+3]"), ["a", "3"]);
        assert_eq!(keys("a[000]"), ["a", "0"]);
        assert_eq!(keys("a[1234567890123456]"), ["a", "1234567890123456"]);
    }

    #[test]
    fn test_empty_expression() {
        assert!(keys("").is_empty());
        assert!(keys("   ").is_empty());
    }

    #[test]
    fn test_syntax_errors() {
        assert!(fails("a["));
        assert!(fails("a[-1]"));
        assert!(fails("a[1.5]"));
        assert!(fails("a[b]"));
        assert!(fails("a[]"));
        assert!(fails("a[+]"));
        assert!(fails("a['b]"));
        assert!(fails("a['b\"]"));
        assert!(fails("a[0]b"));
        assert!(fails("a..b"));
        assert!(fails("."));
        assert!(fails("a."));
        assert!(fails("a.[0]"));
        assert!(fails("a b"));
        assert!(fails("a-b"));
        assert!(fails("a]"));
        assert!(fails("a[12345678901234567]"));
    }

    #[test]
    fn test_error_position() {
        match parse_path("ab..c") {
            Err(Error::Syntax { input, position, .. }) => {
                assert_eq!(input, "ab..c");
                assert_eq!(position, 3);
            }
            other => panic!("Expected Syntax, got {:?}", other),
        }
    }
}

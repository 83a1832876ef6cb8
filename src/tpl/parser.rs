use crate::error::Error;
use crate::options::Options;
use crate::tpl::ast::ParsedTemplate;

/// A left-to-right scanner that splits a template into literal strings and
/// placeholder expressions.
///
/// Only an open tag starts a placeholder. A close tag with no open tag before
/// it is ordinary text.
struct Parser<'a> {
    /// The template being scanned.
    template: &'a str,
    open: &'a str,
    close: &'a str,
    options: &'a Options,
    /// Byte offset just past the last consumed placeholder.
    pos: usize,
    strings: Vec<String>,
    paths: Vec<String>,
}

impl<'a> Parser<'a> {
    fn new(template: &'a str, options: &'a Options) -> Self {
        Self {
            template,
            open: &options.tags.open,
            close: &options.tags.close,
            options,
            pos: 0,
            strings: Vec::new(),
            paths: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<ParsedTemplate, Error> {
        while let Some(open_at) = self.find_open() {
            self.parse_placeholder(open_at)?;
        }

        // Whatever follows the last placeholder is the trailing literal.
        self.strings.push(self.template[self.pos..].to_string());

        Ok(ParsedTemplate {
            strings: self.strings,
            paths: self.paths,
        })
    }

    fn find_open(&self) -> Option<usize> {
        self.template[self.pos..]
            .find(self.open)
            .map(|i| self.pos + i)
    }

    /// Consumes `open ... close` starting at `open_at`.
    fn parse_placeholder(&mut self, open_at: usize) -> Result<(), Error> {
        let expr_start = open_at + self.open.len();
        let Some(close_len) = self.template[expr_start..].find(self.close) else {
            return Err(Error::syntax(
                format!("missing {:?} for the placeholder opened", self.close),
                &self.context(open_at),
                open_at,
            ));
        };
        let close_at = expr_start + close_len;
        let raw = &self.template[expr_start..close_at];

        if let Some(nested) = raw.find(self.open) {
            return Err(Error::syntax(
                format!("{:?} is nested inside another placeholder", self.open),
                &self.context(open_at),
                expr_start + nested,
            ));
        }

        let expr = raw.trim();
        if expr.is_empty() {
            return Err(Error::syntax(
                "empty placeholder",
                &self.context(open_at),
                open_at,
            ));
        }
        if expr.len() > self.options.max_path_len {
            return Err(Error::range(
                "path length",
                self.options.max_path_len,
                expr.len(),
            ));
        }
        if self.paths.len() >= self.options.max_path_count {
            return Err(Error::range(
                "placeholder count",
                self.options.max_path_count,
                self.paths.len() + 1,
            ));
        }

        self.strings
            .push(self.template[self.pos..open_at].to_string());
        self.paths.push(expr.to_string());
        self.pos = close_at + self.close.len();
        Ok(())
    }

    /// Up to `error_context_len` characters of template text from `at`.
    fn context(&self, at: usize) -> String {
        let limit = self.options.error_context_len;
        let rest = &self.template[at..];
        let mut snippet: String = rest.chars().take(limit).collect();
        if snippet.len() < rest.len() {
            snippet.push('…');
        }
        snippet
    }
}

/// Splits `template` into literal strings and trimmed placeholder paths.
///
/// This does not consult any cache; see [`tokenize`](crate::tokenize) for the
/// cached entry point.
pub fn parse_template(template: &str, options: &Options) -> Result<ParsedTemplate, Error> {
    options.tags.validate()?;
    check_template_len(template, options)?;
    Parser::new(template, options).parse()
}

pub(crate) fn check_template_len(template: &str, options: &Options) -> Result<(), Error> {
    if template.len() > options.max_template_len {
        return Err(Error::range(
            "template length",
            options.max_template_len,
            template.len(),
        ));
    }
    Ok(())
}

/// Re-applies the per-path limits to a template that came out of a cache
/// filled under different options.
pub(crate) fn check_parsed_limits(parsed: &ParsedTemplate, options: &Options) -> Result<(), Error> {
    if parsed.paths.len() > options.max_path_count {
        return Err(Error::range(
            "placeholder count",
            options.max_path_count,
            parsed.paths.len(),
        ));
    }
    if let Some(longest) = parsed.paths.iter().map(String::len).max()
        && longest > options.max_path_len
    {
        return Err(Error::range("path length", options.max_path_len, longest));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tpl: &str) -> Result<ParsedTemplate, Error> {
        parse_template(tpl, &Options::default())
    }

    #[test]
    fn test_parse_simple_text() {
        let parsed = parse("hello world").unwrap();
        assert_eq!(parsed.strings(), ["hello world"]);
        assert!(parsed.paths().is_empty());
    }

    #[test]
    fn test_parse_empty_template() {
        let parsed = parse("").unwrap();
        assert_eq!(parsed.strings(), [""]);
        assert!(parsed.paths().is_empty());
    }

    #[test]
    fn test_parse_var() {
        let parsed = parse("hello {{ name }}!").unwrap();
        assert_eq!(parsed.strings(), ["hello ", "!"]);
        assert_eq!(parsed.paths(), ["name"]);
    }

    #[test]
    fn test_parse_adjacent_placeholders() {
        let parsed = parse("{{a}}{{b.c}}").unwrap();
        assert_eq!(parsed.strings(), ["", "", ""]);
        assert_eq!(parsed.paths(), ["a", "b.c"]);
    }

    #[test]
    fn test_stray_close_is_text() {
        let parsed = parse("a }} b {{c}} }}").unwrap();
        assert_eq!(parsed.strings(), ["a }} b ", " }}"]);
        assert_eq!(parsed.paths(), ["c"]);
    }

    #[test]
    fn test_custom_tags() {
        let options = Options::default().tags("<%", "%>");
        let parsed = parse_template("x <% a[0] %> {{y}}", &options).unwrap();
        assert_eq!(parsed.strings(), ["x ", " {{y}}"]);
        assert_eq!(parsed.paths(), ["a[0]"]);
    }

    #[test]
    fn test_unterminated_placeholder() {
        let err = parse("Hi {{name").unwrap_err();
        match err {
            Error::Syntax { input, position, .. } => {
                assert_eq!(position, 3);
                assert_eq!(input, "{{name");
            }
            other => panic!("Expected Syntax, got {:?}", other),
        }
    }

    #[test]
    fn test_error_context_is_truncated() {
        let options = Options::default().error_context_len(4);
        let err = parse_template("{{abcdefgh", &options).unwrap_err();
        match err {
            Error::Syntax { input, .. } => assert_eq!(input, "{{ab…"),
            other => panic!("Expected Syntax, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_placeholder() {
        let err = parse("{{ a {{ b }} }}").unwrap_err();
        match err {
            Error::Syntax { position, .. } => assert_eq!(position, 5),
            other => panic!("Expected Syntax, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_placeholder() {
        assert!(matches!(parse("a {{   }} b"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("{{}}"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_limits() {
        let options = Options::default().max_template_len(5);
        assert!(matches!(
            parse_template("123456", &options),
            Err(Error::Range { what: "template length", limit: 5, actual: 6 })
        ));

        let options = Options::default().max_path_len(3);
        assert!(parse_template("{{ abc }}", &options).is_ok());
        assert!(matches!(
            parse_template("{{abcd}}", &options),
            Err(Error::Range { what: "path length", limit: 3, actual: 4 })
        ));

        let options = Options::default().max_path_count(2);
        assert!(parse_template("{{a}}{{b}}", &options).is_ok());
        assert!(matches!(
            parse_template("{{a}}{{b}}{{c}}", &options),
            Err(Error::Range { what: "placeholder count", limit: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_invalid_tags_rejected() {
        let options = Options::default().tags("{", "{{");
        assert!(matches!(parse_template("x", &options), Err(Error::Type(_))));
    }

    #[test]
    fn test_multibyte_text() {
        let parsed = parse("héllo {{ naïve }} wörld").unwrap();
        assert_eq!(parsed.strings(), ["héllo ", " wörld"]);
        assert_eq!(parsed.paths(), ["naïve"]);
    }
}

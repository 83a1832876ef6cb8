use crate::Result;
use crate::error::Error;
use crate::options::{Options, Tags};
use crate::tpl::ast::{ParsedTemplate, Ref};
use crate::tpl::render_context::get_ref;
use crate::tpl::resolver::{AsyncResolver, Resolver};
use crate::tpl::render as render_impl;
use crate::tpl::{parser, path};
use crate::value::Value;
use std::borrow::Cow;
use std::sync::Arc;

/// Splits a template into literal strings and placeholder paths.
///
/// Results are memoized in `options.template_cache`, keyed by the tags and
/// the template text. Limits are re-checked on a cache hit, since the entry
/// may have been stored under more generous options.
pub fn tokenize(template: &str, options: &Options) -> Result<Arc<ParsedTemplate>> {
    options.tags.validate()?;
    parser::check_template_len(template, options)?;

    let key = template_key(template, &options.tags);
    if let Some(parsed) = options.template_cache.get(&key) {
        parser::check_parsed_limits(&parsed, options)?;
        return Ok(parsed);
    }

    let parsed = Arc::new(parser::parse_template(template, options)?);
    options.template_cache.set(key, parsed.clone());
    Ok(parsed)
}

fn template_key(template: &str, tags: &Tags) -> String {
    let mut key = String::with_capacity(tags.open.len() + tags.close.len() + template.len() + 2);
    key.push_str(&tags.open);
    key.push('\0');
    key.push_str(&tags.close);
    key.push('\0');
    key.push_str(template);
    key
}

/// Parses a placeholder expression into a Ref, memoized in
/// `options.ref_cache` by the trimmed expression.
///
/// Fails with a syntax error for malformed expressions and with a range error
/// when the Ref is deeper than `max_ref_depth`.
pub fn path_to_ref(expr: &str, options: &Options) -> Result<Ref> {
    let expr = expr.trim();
    let reference = match options.ref_cache.get(expr) {
        Some(reference) => reference,
        None => {
            let reference: Ref = path::parse_path(expr)?.into();
            options.ref_cache.set(expr, reference.clone());
            reference
        }
    };

    if reference.len() > options.max_ref_depth {
        return Err(Error::range(
            "ref depth",
            options.max_ref_depth,
            reference.len(),
        ));
    }
    Ok(reference)
}

/// Looks `path` up in `scope`: [`path_to_ref`] followed by [`get_ref`].
pub fn get_path<'a>(scope: &'a Value, path: &str, options: &Options) -> Result<Cow<'a, Value>> {
    let reference = path_to_ref(path, options)?;
    get_ref(scope, &reference, options)
}

/// A compiled template, ready to be rendered against any number of scopes.
#[derive(Debug, Clone)]
pub struct Renderer {
    parsed: Arc<ParsedTemplate>,
    /// Refs parsed up front when `validate_var_names` is on.
    refs: Option<Vec<Ref>>,
    options: Options,
}

impl Renderer {
    /// Wraps an already parsed template, e.g. one built with
    /// [`ParsedTemplate::from_parts`].
    pub fn from_parsed(parsed: impl Into<Arc<ParsedTemplate>>, options: Options) -> Result<Self> {
        let parsed = parsed.into();
        parser::check_parsed_limits(&parsed, &options)?;
        Self::new(parsed, options)
    }

    fn new(parsed: Arc<ParsedTemplate>, options: Options) -> Result<Self> {
        let refs = if options.validate_var_names {
            let refs = parsed
                .paths()
                .iter()
                .map(|p| path_to_ref(p, &options))
                .collect::<Result<Vec<_>>>()?;
            Some(refs)
        } else {
            None
        };
        Ok(Self {
            parsed,
            refs,
            options,
        })
    }

    pub fn parsed(&self) -> &ParsedTemplate {
        &self.parsed
    }

    pub fn paths(&self) -> &[String] {
        self.parsed.paths()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub(crate) fn ref_at(&self, index: usize) -> Result<Ref> {
        match &self.refs {
            Some(refs) => refs
                .get(index)
                .cloned()
                .ok_or_else(|| Error::Type(format!("no placeholder at index {index}"))),
            None => path_to_ref(&self.parsed.paths()[index], &self.options),
        }
    }

    /// Renders the template against `scope`.
    pub fn render(&self, scope: &Value) -> Result<String> {
        render_impl::render(self, scope)
    }

    /// Renders with an asynchronous resolver. Every placeholder is resolved
    /// concurrently and the results are joined in template order.
    pub async fn render_async(&self, scope: &Value, resolver: &dyn AsyncResolver) -> Result<String> {
        render_impl::render_async(self, scope, resolver).await
    }
}

/// Tokenizes `template` once and returns a reusable [`Renderer`].
///
/// With `validate_var_names`, every placeholder path is parsed here so
/// malformed paths fail now instead of on first render.
pub fn compile(template: &str, options: Options) -> Result<Renderer> {
    let parsed = tokenize(template, &options)?;
    log::debug!(
        "compiled template of {} bytes with {} placeholders",
        template.len(),
        parsed.paths().len()
    );
    Renderer::new(parsed, options)
}

/// Builds a [`Renderer`] from literal strings and path expressions supplied
/// separately, the way a tagged call site provides them.
///
/// ```
/// use micromustache::{Options, Value, compile_tagged};
///
/// let renderer = compile_tagged(["Hi ", "!"], ["name"], Options::default()).unwrap();
/// let scope: Value = [("name", "Ada")].into_iter().collect();
/// assert_eq!(renderer.render(&scope).unwrap(), "Hi Ada!");
/// ```
pub fn compile_tagged<S, P>(
    strings: impl IntoIterator<Item = S>,
    paths: impl IntoIterator<Item = P>,
    options: Options,
) -> Result<Renderer>
where
    S: Into<String>,
    P: AsRef<str>,
{
    Renderer::from_parsed(ParsedTemplate::from_parts(strings, paths)?, options)
}

/// One-shot rendering. The compiled [`Renderer`] is not kept, though the
/// template cache still spares re-tokenizing an identical template.
pub fn render(template: &str, scope: &Value, options: &Options) -> Result<String> {
    compile(template, options.clone())?.render(scope)
}

/// One-shot rendering with a custom resolver in place of `options.resolver`.
pub fn render_with(
    template: &str,
    scope: &Value,
    resolver: impl Resolver + 'static,
    options: &Options,
) -> Result<String> {
    compile(template, options.clone().resolver(resolver))?.render(scope)
}

use crate::error::Error;
use crate::options::ResolverMode;
use crate::tpl::engine::Renderer;
use crate::tpl::render_context::get_ref;
use crate::tpl::resolver::AsyncResolver;
use crate::tpl::stringify::stringify;
use crate::value::Value;
use futures::future::try_join_all;
use std::borrow::Cow;

/// Interleaves the literal strings of a template with placeholder text.
pub(crate) struct RenderBuffer<'a> {
    out: String,
    strings: std::slice::Iter<'a, String>,
}

impl<'a> RenderBuffer<'a> {
    pub(crate) fn new(strings: &'a [String]) -> Self {
        let literal_len: usize = strings.iter().map(String::len).sum();
        let mut strings = strings.iter();
        let mut out = String::with_capacity(literal_len + 8 * strings.len());
        if let Some(first) = strings.next() {
            out.push_str(first);
        }
        Self { out, strings }
    }

    /// Appends the text of the next placeholder and the literal after it.
    pub(crate) fn push(&mut self, text: &str) {
        self.out.push_str(text);
        if let Some(literal) = self.strings.next() {
            self.out.push_str(literal);
        }
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

/// The default lookup: the placeholder's Ref walked against `scope`.
fn lookup<'a>(renderer: &Renderer, index: usize, scope: &'a Value) -> Result<Cow<'a, Value>, Error> {
    let reference = renderer.ref_at(index)?;
    get_ref(scope, &reference, renderer.options())
}

fn resolve<'a>(
    renderer: &Renderer,
    index: usize,
    path: &str,
    scope: &'a Value,
) -> Result<Cow<'a, Value>, Error> {
    let options = renderer.options();
    if let Some(resolver) = &options.resolver {
        match resolver.resolve(path, scope) {
            Ok(v) => return Ok(Cow::Owned(v)),
            Err(e) if options.resolver_mode == ResolverMode::FallbackOnError => {
                log::debug!("resolver failed for {path:?}, falling back to scope lookup: {e:#}");
            }
            Err(e) => return Err(Error::Resolver(e)),
        }
    }
    lookup(renderer, index, scope)
}

pub(crate) fn render(renderer: &Renderer, scope: &Value) -> Result<String, Error> {
    let options = renderer.options();
    let mut buf = RenderBuffer::new(renderer.parsed().strings());
    for (i, path) in renderer.paths().iter().enumerate() {
        let value = resolve(renderer, i, path, scope)?;
        buf.push(&stringify(&value, options));
    }
    Ok(buf.finish())
}

/// Resolves every placeholder concurrently, then joins in template order.
/// The first error drops all resolutions still in flight.
pub(crate) async fn render_async(
    renderer: &Renderer,
    scope: &Value,
    resolver: &dyn AsyncResolver,
) -> Result<String, Error> {
    let options = renderer.options();
    let pending = renderer
        .paths()
        .iter()
        .enumerate()
        .map(|(i, path)| async move {
            match resolver.resolve(path, scope).await {
                Ok(v) => Ok(Cow::Owned(v)),
                Err(e) if options.resolver_mode == ResolverMode::FallbackOnError => {
                    log::debug!(
                        "async resolver failed for {path:?}, falling back to scope lookup: {e:#}"
                    );
                    lookup(renderer, i, scope)
                }
                Err(e) => Err(Error::Resolver(e)),
            }
        });
    let values = try_join_all(pending).await?;

    let mut buf = RenderBuffer::new(renderer.parsed().strings());
    for value in &values {
        buf.push(&stringify(value, options));
    }
    Ok(buf.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_buffer() {
        let strings = vec!["a".to_string(), "-".to_string(), "z".to_string()];
        let mut buf = RenderBuffer::new(&strings);
        buf.push("1");
        buf.push("2");
        assert_eq!(buf.finish(), "a1-2z");
    }

    #[test]
    fn test_render_buffer_static() {
        let strings = vec!["only".to_string()];
        assert_eq!(RenderBuffer::new(&strings).finish(), "only");
    }
}

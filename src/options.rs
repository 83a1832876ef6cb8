use crate::error::Error;
use crate::tpl::cache::{REF_CACHE, RefCache, TEMPLATE_CACHE, TemplateCache};
use crate::tpl::resolver::Resolver;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_OPEN_TAG: &str = "{{";
pub const DEFAULT_CLOSE_TAG: &str = "}}";
pub const DEFAULT_MAX_TEMPLATE_LEN: usize = 1_000_000;
pub const DEFAULT_MAX_PATH_LEN: usize = 1_000;
pub const DEFAULT_MAX_PATH_COUNT: usize = 1_000;
pub const DEFAULT_MAX_REF_DEPTH: usize = 10;
pub const DEFAULT_ERROR_CONTEXT_LEN: usize = 32;
pub const DEFAULT_INVALID_OBJ: &str = "{...}";

/// The delimiter pair that marks a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tags {
    pub open: String,
    pub close: String,
}

impl Tags {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Both tags must be non-empty and neither may contain the other.
    pub fn validate(&self) -> Result<(), Error> {
        if self.open.is_empty() || self.close.is_empty() {
            return Err(Error::Type(format!(
                "tags must be non-empty strings, got {:?} and {:?}",
                self.open, self.close
            )));
        }
        if self.open.contains(&self.close) || self.close.contains(&self.open) {
            return Err(Error::Type(format!(
                "tags must not overlap, got {:?} and {:?}",
                self.open, self.close
            )));
        }
        Ok(())
    }
}

impl Default for Tags {
    fn default() -> Self {
        Self::new(DEFAULT_OPEN_TAG, DEFAULT_CLOSE_TAG)
    }
}

/// What an empty Ref (an all-whitespace path) resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyRef {
    /// The scope itself.
    #[default]
    Scope,
    /// An empty string.
    Empty,
}

/// How a failing custom [`Resolver`] is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolverMode {
    /// The resolver's error aborts rendering.
    #[default]
    Authoritative,
    /// The error is logged and the placeholder falls back to the Ref lookup.
    FallbackOnError,
}

/// Options shared by tokenizing, path parsing, lookup and stringification.
///
/// ```
/// use micromustache::Options;
///
/// let options = Options::default()
///     .tags("<%", "%>")
///     .validate_ref(true)
///     .max_ref_depth(4);
/// assert_eq!(options.tags.open, "<%");
/// ```
#[derive(Clone)]
pub struct Options {
    pub tags: Tags,
    pub max_template_len: usize,
    pub max_path_len: usize,
    pub max_path_count: usize,
    pub max_ref_depth: usize,
    /// How many characters of template text unterminated-tag errors quote.
    pub error_context_len: usize,
    /// Fail with a reference error instead of rendering missing keys as undefined.
    pub validate_ref: bool,
    /// Parse every placeholder path in `compile` rather than on first render.
    pub validate_var_names: bool,
    /// Render `null` and `undefined` literally.
    pub explicit: bool,
    pub invalid_type: String,
    pub invalid_obj: String,
    pub empty_ref: EmptyRef,
    pub resolver: Option<Arc<dyn Resolver>>,
    pub resolver_mode: ResolverMode,
    pub template_cache: Arc<TemplateCache>,
    pub ref_cache: Arc<RefCache>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tags: Tags::default(),
            max_template_len: DEFAULT_MAX_TEMPLATE_LEN,
            max_path_len: DEFAULT_MAX_PATH_LEN,
            max_path_count: DEFAULT_MAX_PATH_COUNT,
            max_ref_depth: DEFAULT_MAX_REF_DEPTH,
            error_context_len: DEFAULT_ERROR_CONTEXT_LEN,
            validate_ref: false,
            validate_var_names: false,
            explicit: false,
            invalid_type: String::new(),
            invalid_obj: DEFAULT_INVALID_OBJ.to_string(),
            empty_ref: EmptyRef::default(),
            resolver: None,
            resolver_mode: ResolverMode::default(),
            template_cache: TEMPLATE_CACHE.clone(),
            ref_cache: REF_CACHE.clone(),
        }
    }
}

impl Options {
    pub fn tags(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.tags = Tags::new(open, close);
        self
    }

    pub fn max_template_len(mut self, max: usize) -> Self {
        self.max_template_len = max;
        self
    }

    pub fn max_path_len(mut self, max: usize) -> Self {
        self.max_path_len = max;
        self
    }

    pub fn max_path_count(mut self, max: usize) -> Self {
        self.max_path_count = max;
        self
    }

    pub fn max_ref_depth(mut self, max: usize) -> Self {
        self.max_ref_depth = max;
        self
    }

    pub fn error_context_len(mut self, len: usize) -> Self {
        self.error_context_len = len;
        self
    }

    pub fn validate_ref(mut self, on: bool) -> Self {
        self.validate_ref = on;
        self
    }

    pub fn validate_var_names(mut self, on: bool) -> Self {
        self.validate_var_names = on;
        self
    }

    pub fn explicit(mut self, on: bool) -> Self {
        self.explicit = on;
        self
    }

    pub fn invalid_type(mut self, text: impl Into<String>) -> Self {
        self.invalid_type = text.into();
        self
    }

    pub fn invalid_obj(mut self, text: impl Into<String>) -> Self {
        self.invalid_obj = text.into();
        self
    }

    pub fn empty_ref(mut self, empty_ref: EmptyRef) -> Self {
        self.empty_ref = empty_ref;
        self
    }

    pub fn resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn resolver_mode(mut self, mode: ResolverMode) -> Self {
        self.resolver_mode = mode;
        self
    }

    /// Uses `cache` instead of the process-wide template cache.
    pub fn template_cache(mut self, cache: Arc<TemplateCache>) -> Self {
        self.template_cache = cache;
        self
    }

    /// Uses `cache` instead of the process-wide path cache.
    pub fn ref_cache(mut self, cache: Arc<RefCache>) -> Self {
        self.ref_cache = cache;
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("tags", &self.tags)
            .field("max_template_len", &self.max_template_len)
            .field("max_path_len", &self.max_path_len)
            .field("max_path_count", &self.max_path_count)
            .field("max_ref_depth", &self.max_ref_depth)
            .field("error_context_len", &self.error_context_len)
            .field("validate_ref", &self.validate_ref)
            .field("validate_var_names", &self.validate_var_names)
            .field("explicit", &self.explicit)
            .field("invalid_type", &self.invalid_type)
            .field("invalid_obj", &self.invalid_obj)
            .field("empty_ref", &self.empty_ref)
            .field("resolver", &self.resolver.as_ref().map(|_| "<resolver>"))
            .field("resolver_mode", &self.resolver_mode)
            .finish_non_exhaustive()
    }
}

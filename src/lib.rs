//! A micro templating engine.
//!
//! Templates are plain text with `{{path}}` placeholders. Each path is parsed
//! into a Ref (`a["b"].c[0]` is `["a", "b", "c", "0"]`), looked up in a
//! [`Value`] scope and stringified:
//!
//! ```
//! use micromustache::{Options, Value, render};
//! use serde_json::json;
//!
//! let scope = Value::from(json!({"user": {"name": "Alex", "langs": ["en", "fr"]}}));
//! let out = render("{{user.name}} speaks {{ user.langs[1] }}", &scope, &Options::default()).unwrap();
//! assert_eq!(out, "Alex speaks fr");
//! ```

extern crate self as micromustache;

pub mod error;
pub mod options;
pub mod tpl;
pub mod value;

pub use error::Error;
pub use micromustache_macros::Scope;
pub use options::{EmptyRef, Options, ResolverMode, Tags};
pub use tpl::ast::{ParsedTemplate, Ref};
pub use tpl::cache::{FifoCache, REF_CACHE, TEMPLATE_CACHE};
pub use tpl::resolver::{AsyncResolver, Resolver};
pub use tpl::{
    Renderer, compile, compile_tagged, get_path, get_ref, path_to_ref, render, render_with,
    stringify, tokenize,
};
pub use value::{Map, Object, ToValue, Value, to_value};

pub type Result<T> = std::result::Result<T, Error>;

pub mod ast;
pub mod cache;
pub(crate) mod engine;
mod parser;
pub mod path;
mod render;
mod render_context;
pub mod resolver;
mod stringify;

pub use engine::{
    Renderer, compile, compile_tagged, get_path, path_to_ref, render, render_with, tokenize,
};
pub use parser::parse_template;
pub use render_context::get_ref;
pub use stringify::stringify;

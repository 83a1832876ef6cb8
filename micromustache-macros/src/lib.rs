mod scope;

use proc_macro::TokenStream;

/// Implements `micromustache::ToValue` for a struct with named fields, so it
/// can be rendered as a scope.
///
/// Field attributes:
/// - `#[scope("key")]` or `#[scope(rename = "key")]` exposes the field under another key
/// - `#[scope(ignore)]` leaves the field out
#[proc_macro_derive(Scope, attributes(scope))]
pub fn derive_scope(input: TokenStream) -> TokenStream {
    scope::derive_scope_impl(input)
}

mod json;
mod object;
mod serializer;

pub use json::JsonError;
pub(crate) use json::to_json;
pub use object::{MAX_PROTOTYPE_DEPTH, Object};
pub use serializer::{ValueSerializer, to_value};

use indexmap::IndexMap;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Key-value map with insertion order preserved.
pub type Map = IndexMap<String, Value>;

/// A callable stored in a scope. Templates never call it; it only exists so
/// that function-valued properties can be represented and stringified.
pub type NativeFn = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// The dynamic data a template is rendered against.
#[derive(Clone, Default)]
pub enum Value {
    /// A missing value. Also what a failed lookup yields.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(String),

    /// Ordered list of values, indexed by canonical decimal keys
    List(Vec<Value>),

    /// Plain key-value object
    Map(Map),

    /// Host object with computed properties
    Object(Arc<dyn Object>),

    Function(NativeFn),
}

impl Value {
    pub fn object(object: impl Object + 'static) -> Self {
        Value::Object(Arc::new(object))
    }

    pub fn function(f: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Value::Function(Arc::new(f))
    }

    /// A short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::I64(_) | Value::U64(_) | Value::F64(_) => "number",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// Reads the property `key` of this node, reporting presence.
    ///
    /// Maps answer for any stored key (including ones holding
    /// [`Value::Undefined`]), lists answer for canonical indices and
    /// `length`, objects answer through their prototype chain. Nothing else
    /// has properties.
    pub fn get_property(&self, key: &str) -> Option<Cow<'_, Value>> {
        match self {
            Value::Map(map) => map.get(key).map(Cow::Borrowed),
            Value::List(items) => {
                if key == "length" {
                    return Some(Cow::Owned(Value::U64(items.len() as u64)));
                }
                parse_index(key)
                    .and_then(|i| items.get(i))
                    .map(Cow::Borrowed)
            }
            Value::Object(obj) => object::lookup(obj.as_ref(), key).map(Cow::Owned),
            _ => None,
        }
    }
}

/// Accepts `0` and decimal digits without a leading zero.
fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse().ok()
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("Undefined"),
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::I64(n) => f.debug_tuple("I64").field(n).finish(),
            Value::U64(n) => f.debug_tuple("U64").field(n).finish(),
            Value::F64(n) => f.debug_tuple("F64").field(n).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Value::Object(obj) => write!(f, "Object(<{}>)", obj.type_name()),
            Value::Function(_) => f.write_str("Function(<native>)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Anything that can be used as (part of) a scope.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

macro_rules! impl_to_value_primitive {
    ($rust_type:ty, $variant:ident, $as:ty) => {
        impl ToValue for $rust_type {
            fn to_value(&self) -> Value {
                Value::$variant(*self as $as)
            }
        }

        impl From<$rust_type> for Value {
            fn from(v: $rust_type) -> Self {
                v.to_value()
            }
        }
    };
}

impl_to_value_primitive!(i8, I64, i64);
impl_to_value_primitive!(i16, I64, i64);
impl_to_value_primitive!(i32, I64, i64);
impl_to_value_primitive!(i64, I64, i64);
impl_to_value_primitive!(isize, I64, i64);
impl_to_value_primitive!(u8, U64, u64);
impl_to_value_primitive!(u16, U64, u64);
impl_to_value_primitive!(u32, U64, u64);
impl_to_value_primitive!(u64, U64, u64);
impl_to_value_primitive!(usize, U64, u64);
impl_to_value_primitive!(f32, F64, f64);
impl_to_value_primitive!(f64, F64, f64);

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for () {
    fn to_value(&self) -> Value {
        Value::Undefined
    }
}

impl<T> ToValue for &T
where
    T: ToValue + ?Sized,
{
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(|v| v.to_value()).collect())
    }
}

impl<T: ToValue> ToValue for HashMap<String, T> {
    fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(self.len());
        for (k, v) in self {
            map.insert(k.clone(), v.to_value());
        }
        Value::Map(map)
    }
}

impl<T: ToValue> ToValue for IndexMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

impl<T: ToValue> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        v.to_value()
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Map(v)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

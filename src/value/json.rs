use crate::value::{Map, Object, Value};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Containers nested deeper than this are assumed to be generated endlessly.
const MAX_JSON_DEPTH: usize = 128;

/// 2^53, the largest float that still maps exactly to every integer below it.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Error, Debug, PartialEq)]
pub enum JsonError {
    #[error("converting circular structure to JSON ({0})")]
    Circular(String),
    #[error("structure nested deeper than {0} levels")]
    TooDeep(usize),
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::I64(i)
                } else if let Some(u) = n.as_u64() {
                    Value::U64(u)
                } else {
                    Value::F64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => Value::Str(s),
            JsonValue::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Map>(),
            ),
        }
    }
}

impl crate::value::ToValue for JsonValue {
    fn to_value(&self) -> Value {
        Value::from(self.clone())
    }
}

/// Converts `value` to JSON the way `JSON.stringify` sees data: undefined
/// and function members of a map are dropped, inside a list they become
/// `null`, and non-finite numbers become `null`.
///
/// Returns `Ok(None)` when the value itself has no JSON form.
pub(crate) fn to_json(value: &Value) -> Result<Option<JsonValue>, JsonError> {
    let mut stack = Vec::new();
    convert(value, 0, &mut stack)
}

/// Integral floats print without a fraction, as in script engines.
fn float_to_json(n: f64) -> JsonValue {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return JsonValue::from(n as i64);
    }
    serde_json::Number::from_f64(n)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

fn convert(
    value: &Value,
    depth: usize,
    stack: &mut Vec<*const ()>,
) -> Result<Option<JsonValue>, JsonError> {
    if depth > MAX_JSON_DEPTH {
        return Err(JsonError::TooDeep(MAX_JSON_DEPTH));
    }

    let json = match value {
        Value::Undefined | Value::Function(_) => return Ok(None),
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::I64(n) => JsonValue::from(*n),
        Value::U64(n) => JsonValue::from(*n),
        Value::F64(n) => float_to_json(*n),
        Value::Str(s) => JsonValue::String(s.clone()),
        Value::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(convert(item, depth + 1, stack)?.unwrap_or(JsonValue::Null));
            }
            JsonValue::Array(out)
        }
        Value::Map(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                if let Some(j) = convert(v, depth + 1, stack)? {
                    out.insert(k.clone(), j);
                }
            }
            JsonValue::Object(out)
        }
        Value::Object(obj) => {
            let ptr = std::sync::Arc::as_ptr(obj) as *const ();
            if stack.contains(&ptr) {
                return Err(JsonError::Circular(obj.type_name().to_string()));
            }
            stack.push(ptr);
            let out = convert_object(obj.as_ref(), depth + 1, stack);
            stack.pop();
            JsonValue::Object(out?)
        }
    };
    Ok(Some(json))
}

fn convert_object(
    obj: &dyn Object,
    depth: usize,
    stack: &mut Vec<*const ()>,
) -> Result<serde_json::Map<String, JsonValue>, JsonError> {
    let mut out = serde_json::Map::new();
    for key in obj.keys() {
        let Some(v) = obj.get(&key) else {
            continue;
        };
        if let Some(j) = convert(&v, depth, stack)? {
            out.insert(key, j);
        }
    }
    Ok(out)
}

use crate::options::Options;
use crate::value::{Value, to_json};
use std::borrow::Cow;

/// Converts a resolved value into the text that replaces its placeholder.
///
/// | value | text |
/// |---|---|
/// | string, boolean, finite number | as is |
/// | NaN | `""` |
/// | ±infinity | `"∞"` / `"-∞"` |
/// | null, undefined | `""` (or `"null"` / `"undefined"` with `explicit`) |
/// | object with [`to_display`](crate::Object::to_display) | that text |
/// | other lists, maps, objects | compact JSON, or `invalid_obj` if that fails |
/// | function | `invalid_type` |
pub fn stringify<'a>(value: &'a Value, options: &'a Options) -> Cow<'a, str> {
    match value {
        Value::Str(s) => Cow::Borrowed(s.as_str()),
        Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        Value::I64(n) => Cow::Owned(n.to_string()),
        Value::U64(n) => Cow::Owned(n.to_string()),
        Value::F64(n) => format_number(*n),
        Value::Null => Cow::Borrowed(if options.explicit { "null" } else { "" }),
        Value::Undefined => Cow::Borrowed(if options.explicit { "undefined" } else { "" }),
        Value::Object(obj) => match obj.to_display() {
            Some(text) => Cow::Owned(text),
            None => json_or(value, options),
        },
        Value::List(_) | Value::Map(_) => json_or(value, options),
        Value::Function(_) => Cow::Borrowed(options.invalid_type.as_str()),
    }
}

fn json_or<'a>(value: &Value, options: &'a Options) -> Cow<'a, str> {
    let json = match to_json(value) {
        Ok(Some(json)) => json,
        Ok(None) => return Cow::Borrowed(options.invalid_type.as_str()),
        Err(e) => {
            log::debug!("cannot stringify {}: {e}", value.kind());
            return Cow::Borrowed(options.invalid_obj.as_str());
        }
    };
    match serde_json::to_string(&json) {
        Ok(text) => Cow::Owned(text),
        Err(e) => {
            log::debug!("cannot stringify {}: {e}", value.kind());
            Cow::Borrowed(options.invalid_obj.as_str())
        }
    }
}

/// Formats a float the way script engines print numbers: integral values
/// without a fraction, exponent form for very large or small magnitudes.
fn format_number(n: f64) -> Cow<'static, str> {
    if n.is_nan() {
        return Cow::Borrowed("");
    }
    if n.is_infinite() {
        return Cow::Borrowed(if n > 0.0 { "∞" } else { "-∞" });
    }
    if n == 0.0 {
        // Covers -0.0 as well.
        return Cow::Borrowed("0");
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return Cow::Owned(n.to_string());
    }

    // `{:e}` prints `1e21` / `1.5e-7`; the sign of a positive exponent is explicit.
    let text = format!("{n:e}");
    Cow::Owned(match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => text,
    })
}

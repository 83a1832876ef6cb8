use crate::error::Error;
use crate::options::{EmptyRef, Options};
use crate::value::Value;
use std::borrow::Cow;

/// Walks `scope` along `keys`, one property at a time.
///
/// A missing key either yields [`Value::Undefined`] right away or, with
/// `validate_ref`, a reference error naming the key and the path walked so
/// far. Values stored in the scope are borrowed; computed ones are owned.
pub fn get_ref<'a>(
    scope: &'a Value,
    keys: &[String],
    options: &Options,
) -> Result<Cow<'a, Value>, Error> {
    if keys.len() > options.max_ref_depth {
        return Err(Error::range("ref depth", options.max_ref_depth, keys.len()));
    }

    if keys.is_empty() {
        return Ok(match options.empty_ref {
            EmptyRef::Scope => Cow::Borrowed(scope),
            EmptyRef::Empty => Cow::Owned(Value::Str(String::new())),
        });
    }

    let mut current = Cow::Borrowed(scope);
    for (i, key) in keys.iter().enumerate() {
        let next = match &current {
            Cow::Borrowed(node) => {
                let node: &'a Value = *node;
                node.get_property(key)
            }
            Cow::Owned(node) => node
                .get_property(key)
                .map(|v| Cow::Owned(v.into_owned())),
        };

        match next {
            Some(v) => current = v,
            None if options.validate_ref => {
                return Err(Error::Reference {
                    key: key.clone(),
                    path: keys[..=i].join("."),
                });
            }
            None => {
                log::trace!(
                    "{key:?} not found on {} at {:?}",
                    current.kind(),
                    keys[..i].join(".")
                );
                return Ok(Cow::Owned(Value::Undefined));
            }
        }
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ToValue;
    use serde_json::json;

    fn keys(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    fn scope() -> Value {
        Value::from(json!({
            "a": {"b": {"c": 5}},
            "list": [{"name": "x"}, {"name": "y"}],
            "nothing": null,
        }))
    }

    #[test]
    fn test_lookup_simple() {
        let scope = scope();
        let options = Options::default();
        let v = get_ref(&scope, &keys(&["a", "b", "c"]), &options).unwrap();
        assert_eq!(*v, Value::I64(5));
        assert!(matches!(v, Cow::Borrowed(_)));
    }

    #[test]
    fn test_lookup_list() {
        let scope = scope();
        let options = Options::default();
        let v = get_ref(&scope, &keys(&["list", "1", "name"]), &options).unwrap();
        assert_eq!(*v, "y".to_value());

        let v = get_ref(&scope, &keys(&["list", "length"]), &options).unwrap();
        assert_eq!(*v, Value::U64(2));
    }

    #[test]
    fn test_missing_short_circuits() {
        let scope = scope();
        let options = Options::default();
        let v = get_ref(&scope, &keys(&["x", "y", "z"]), &options).unwrap();
        assert_eq!(*v, Value::Undefined);

        let v = get_ref(&scope, &keys(&["nothing", "deeper"]), &options).unwrap();
        assert_eq!(*v, Value::Undefined);
    }

    #[test]
    fn test_validate_ref() {
        let scope = scope();
        let options = Options::default().validate_ref(true);
        let err = get_ref(&scope, &keys(&["a", "x", "c"]), &options).unwrap_err();
        match err {
            Error::Reference { key, path } => {
                assert_eq!(key, "x");
                assert_eq!(path, "a.x");
            }
            other => panic!("Expected Reference, got {:?}", other),
        }

        // A present key holding null is not a reference error.
        let v = get_ref(&scope, &keys(&["nothing"]), &options).unwrap();
        assert_eq!(*v, Value::Null);
    }

    #[test]
    fn test_depth_limit() {
        let scope = scope();
        let options = Options::default().max_ref_depth(3);
        assert!(get_ref(&scope, &keys(&["a", "b", "c"]), &options).is_ok());
        assert!(matches!(
            get_ref(&scope, &keys(&["a", "b", "c", "d"]), &options),
            Err(Error::Range { what: "ref depth", limit: 3, actual: 4 })
        ));
    }

    #[test]
    fn test_empty_ref() {
        let scope = scope();
        let v = get_ref(&scope, &[], &Options::default()).unwrap();
        assert_eq!(*v, scope);

        let options = Options::default().empty_ref(EmptyRef::Empty);
        let v = get_ref(&scope, &[], &options).unwrap();
        assert_eq!(*v, Value::Str(String::new()));
    }
}

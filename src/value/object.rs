use crate::value::Value;
use std::sync::Arc;

/// Prototype chains longer than this are treated as ending, which also stops
/// accidental cycles between prototypes.
pub const MAX_PROTOTYPE_DEPTH: usize = 64;

/// A scope node whose properties are computed rather than stored.
///
/// Implement this for host types that should be reachable from a template
/// without first being copied into a [`Value::Map`]. Lookups go through
/// [`Object::get`] first and then through each [`Object::prototype`] in turn,
/// so a type can inherit properties from a shared parent object.
///
/// ```
/// use micromustache::{Object, Options, Value};
///
/// #[derive(Debug)]
/// struct Clock;
///
/// impl Object for Clock {
///     fn get(&self, key: &str) -> Option<Value> {
///         (key == "hour").then(|| Value::I64(12))
///     }
/// }
///
/// let scope = Value::object(Clock);
/// let out = micromustache::render("{{hour}}h", &scope, &Options::default()).unwrap();
/// assert_eq!(out, "12h");
/// ```
pub trait Object: Send + Sync {
    /// Returns the own property `key`, or `None` when it is absent.
    fn get(&self, key: &str) -> Option<Value>;

    /// Enumerable own keys, in output order. Used for JSON output only.
    fn keys(&self) -> Vec<String> {
        Vec::new()
    }

    /// The object that absent properties are looked up on next.
    fn prototype(&self) -> Option<Arc<dyn Object>> {
        None
    }

    /// A custom textual form. `None` keeps the default JSON rendering.
    fn to_display(&self) -> Option<String> {
        None
    }

    fn type_name(&self) -> &str {
        "Object"
    }
}

/// Looks `key` up on `object` and then along its prototype chain.
pub(crate) fn lookup(object: &dyn Object, key: &str) -> Option<Value> {
    if let Some(v) = object.get(key) {
        return Some(v);
    }

    let mut next = object.prototype();
    let mut depth = 0;
    while let Some(proto) = next {
        if depth >= MAX_PROTOTYPE_DEPTH {
            log::debug!("prototype chain deeper than {MAX_PROTOTYPE_DEPTH}, lookup of {key:?} stopped");
            return None;
        }
        if let Some(v) = proto.get(key) {
            return Some(v);
        }
        next = proto.prototype();
        depth += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Base;

    impl Object for Base {
        fn get(&self, key: &str) -> Option<Value> {
            (key == "kind").then(|| Value::Str("base".to_string()))
        }
    }

    struct Derived {
        proto: Arc<dyn Object>,
    }

    impl Object for Derived {
        fn get(&self, key: &str) -> Option<Value> {
            (key == "name").then(|| Value::Str("derived".to_string()))
        }

        fn prototype(&self) -> Option<Arc<dyn Object>> {
            Some(self.proto.clone())
        }
    }

    struct Loop;

    impl Object for Loop {
        fn get(&self, _key: &str) -> Option<Value> {
            None
        }

        fn prototype(&self) -> Option<Arc<dyn Object>> {
            Some(Arc::new(Loop))
        }
    }

    #[test]
    fn test_lookup_walks_prototype() {
        let obj = Derived {
            proto: Arc::new(Base),
        };
        assert_eq!(lookup(&obj, "name"), Some(Value::Str("derived".to_string())));
        assert_eq!(lookup(&obj, "kind"), Some(Value::Str("base".to_string())));
        assert_eq!(lookup(&obj, "missing"), None);
    }

    #[test]
    fn test_lookup_stops_on_endless_chain() {
        assert_eq!(lookup(&Loop, "anything"), None);
    }
}

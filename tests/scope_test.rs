use micromustache::{Object, Options, Scope, ToValue, Value, render, to_value};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Scope)]
struct Author {
    name: String,
    #[scope("yearOfBirth")]
    born: u32,
    #[scope(rename = "tags")]
    labels: Vec<String>,
    #[scope(ignore)]
    #[allow(dead_code)]
    password: String,
    nickname: Option<String>,
}

#[derive(Scope)]
struct Page<T: ToValue> {
    title: &'static str,
    item: T,
}

fn author() -> Author {
    Author {
        name: "Ursula".to_string(),
        born: 1929,
        labels: vec!["sf".to_string(), "fantasy".to_string()],
        password: "secret".to_string(),
        nickname: None,
    }
}

#[test]
fn test_derive_scope_fields() {
    let scope = author().to_value();
    let options = Options::default();

    assert_eq!(
        render("{{name}} ({{yearOfBirth}}) {{tags[1]}}", &scope, &options).unwrap(),
        "Ursula (1929) fantasy"
    );
    assert_eq!(render("[{{born}}][{{password}}]", &scope, &options).unwrap(), "[][]");
    assert_eq!(
        render("{{nickname}}", &scope, &options.clone().explicit(true)).unwrap(),
        "null"
    );
}

#[test]
fn test_derive_scope_generic() {
    let page = Page {
        title: "Authors",
        item: author(),
    };
    let out = render("{{title}}: {{ item.name }}", &page.to_value(), &Options::default()).unwrap();
    assert_eq!(out, "Authors: Ursula");
}

#[derive(Serialize)]
struct Order {
    id: u64,
    status: Status,
    lines: Vec<Line>,
    meta: HashMap<String, f64>,
}

#[derive(Serialize)]
enum Status {
    Shipped { carrier: String },
}

#[derive(Serialize)]
struct Line {
    sku: &'static str,
    qty: i32,
}

#[test]
fn test_serde_scope() {
    let order = Order {
        id: 7,
        status: Status::Shipped {
            carrier: "post".to_string(),
        },
        lines: vec![Line { sku: "A-1", qty: 2 }],
        meta: HashMap::from([("weight".to_string(), 1.5)]),
    };
    let scope = to_value(&order).unwrap();
    let out = render(
        "#{{id}} via {{status.Shipped.carrier}}: {{lines[0].qty}}x{{lines.0.sku}} {{meta.weight}}kg",
        &scope,
        &Options::default(),
    )
    .unwrap();
    assert_eq!(out, "#7 via post: 2xA-1 1.5kg");
}

struct Base;

impl Object for Base {
    fn get(&self, key: &str) -> Option<Value> {
        (key == "kind").then(|| Value::Str("base".to_string()))
    }
}

struct Derived {
    parent: Arc<dyn Object>,
}

impl Object for Derived {
    fn get(&self, key: &str) -> Option<Value> {
        (key == "own").then(|| Value::Bool(true))
    }

    fn keys(&self) -> Vec<String> {
        vec!["own".to_string()]
    }

    fn prototype(&self) -> Option<Arc<dyn Object>> {
        Some(self.parent.clone())
    }
}

struct Money(i64);

impl Object for Money {
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    fn to_display(&self) -> Option<String> {
        Some(format!("${}.{:02}", self.0 / 100, self.0 % 100))
    }
}

#[test]
fn test_object_prototype_and_display() {
    let options = Options::default();
    let scope: Value = [
        (
            "d",
            Value::object(Derived {
                parent: Arc::new(Base),
            }),
        ),
        ("price", Value::object(Money(1250))),
    ]
    .into_iter()
    .collect();

    assert_eq!(
        render("{{d.own}}/{{d.kind}}/{{d.none}}", &scope, &options).unwrap(),
        "true/base/"
    );
    // Inherited properties stay out of the JSON form.
    assert_eq!(render("{{d}}", &scope, &options).unwrap(), r#"{"own":true}"#);
    assert_eq!(render("{{price}}", &scope, &options).unwrap(), "$12.50");
}

#[test]
fn test_functions_render_as_invalid_type() {
    let scope: Value = [("f", Value::function(|_| Value::Null))].into_iter().collect();
    let options = Options::default();

    assert_eq!(render("[{{f}}]", &scope, &options).unwrap(), "[]");
    assert_eq!(
        render("{{f}}", &scope, &options.clone().invalid_type("<fn>")).unwrap(),
        "<fn>"
    );
    // Functions carry no properties.
    assert_eq!(render("[{{f.name}}]", &scope, &options).unwrap(), "[]");
}

use std::collections::BTreeMap;

use serde_json::Value;

/// Projects a JSON value onto dotted-path keys with string values.
///
/// Object keys and array indices become path segments; scalars are
/// stringified (`null`, `true`/`false`, numbers in their JSON form, strings
/// verbatim). Empty objects and arrays contribute no keys. A scalar at the top
/// level is stored under the empty key.
pub fn flatten(value: &Value) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    flatten_into(value, "", &mut out);
    out
}

fn flatten_into(value: &Value, path: &str, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(child, &join(path, key), out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, &join(path, &index.to_string()), out);
            }
        }
        Value::String(s) => {
            out.insert(path.to_owned(), s.clone());
        }
        Value::Null => {
            out.insert(path.to_owned(), "null".to_owned());
        }
        Value::Bool(b) => {
            out.insert(path.to_owned(), b.to_string());
        }
        Value::Number(n) => {
            out.insert(path.to_owned(), n.to_string());
        }
    }
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_owned()
    } else {
        format!("{path}.{segment}")
    }
}

//! Safe traversal of resolution contexts.
//!
//! A context is any `serde_json::Value`. Lookups never panic: a missing key,
//! a null intermediate or a scalar where descent is required all come back
//! as [`Lookup::Absent`], which callers treat as "leave the binding alone".

use serde_json::Value;

/// Result of a keyed lookup. `Absent` plays the role of an undefined value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Absent,
    Found(&'a Value),
}

impl<'a> Lookup<'a> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }

    pub fn value(self) -> Option<&'a Value> {
        match self {
            Lookup::Found(v) => Some(v),
            Lookup::Absent => None,
        }
    }
}

/// One step of descent. Only objects and arrays can be descended into;
/// on arrays the key must be a canonical decimal index.
///
/// Array properties such as `length` are not looked up: the editor runtime
/// would answer `items.length` with the element count, here it is absent and
/// the placeholder is preserved.
pub fn get<'a>(current: &'a Value, key: &str) -> Lookup<'a> {
    let found = match current {
        Value::Object(map) => map.get(key),
        Value::Array(arr) => parse_index(key).and_then(|i| arr.get(i)),
        _ => None,
    };
    found.map(Lookup::Found).unwrap_or(Lookup::Absent)
}

/// Walk a dotted path from the root of `context`.
///
/// The path is trimmed as a whole, then split on `.`. Segments themselves are
/// used verbatim, so `a. b` looks up the key `" b"`.
pub fn lookup_path<'a>(context: &'a Value, path: &str) -> Lookup<'a> {
    let mut current = context;
    for key in path.trim().split('.') {
        if current.is_null() {
            return Lookup::Absent;
        }
        match get(current, key) {
            Lookup::Found(next) => current = next,
            Lookup::Absent => return Lookup::Absent,
        }
    }
    Lookup::Found(current)
}

fn parse_index(key: &str) -> Option<usize> {
    // "01" or "+1" are keys, not indices
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// Textual form of a resolved value: strings bare, `null` literally,
/// containers as compact JSON.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => {
            let value = integral_floats_as_ints(value);
            serde_json::to_string(&value).unwrap_or_else(|_| value.to_string())
        }
    }
}

// `{"k":5.0}` serializes as `{"k":5}`, matching how scalars print.
fn integral_floats_as_ints(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
                Value::from(f as i64)
            }
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(integral_floats_as_ints).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), integral_floats_as_ints(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Integral floats render without the fractional part (`5.0` -> `5`).
pub(crate) fn number_text(n: &serde_json::Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            return f.to_string();
        }
    }
    n.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn get_on_scalars_is_absent() {
        assert!(get(&json!(5), "a").is_absent());
        assert!(get(&json!("abc"), "length").is_absent());
        assert!(get(&Value::Null, "a").is_absent());
    }

    #[test]
    fn array_segments_must_be_indices() {
        let ctx = json!({"items": [10, 20, 30]});
        assert_eq!(lookup_path(&ctx, "items.1").value(), Some(&json!(20)));
        assert!(lookup_path(&ctx, "items.01").is_absent());
        assert!(lookup_path(&ctx, "items.length").is_absent());
        assert!(lookup_path(&ctx, "items.7").is_absent());
    }

    #[test]
    fn path_is_trimmed_as_a_whole() {
        let ctx = json!({"a": {"b": 1}, " b": 2});
        assert_eq!(lookup_path(&ctx, "  a.b ").value(), Some(&json!(1)));
        assert!(lookup_path(&ctx, "a. b").is_absent());
    }

    #[test]
    fn null_leaf_is_found() {
        let ctx = json!({"a": {"b": null}});
        assert_eq!(lookup_path(&ctx, "a.b"), Lookup::Found(&Value::Null));
        assert!(lookup_path(&ctx, "a.b.c").is_absent());
    }

    #[test]
    fn text_forms() {
        assert_eq!(to_text(&json!(null)), "null");
        assert_eq!(to_text(&json!(true)), "true");
        assert_eq!(to_text(&json!(5.0)), "5");
        assert_eq!(to_text(&json!(1.5)), "1.5");
        assert_eq!(to_text(&json!("x")), "x");
        assert_eq!(to_text(&json!({"z": 1, "a": [1, "b"]})), r#"{"z":1,"a":[1,"b"]}"#);
    }

    #[test]
    fn integral_floats_inside_containers_drop_fraction() {
        assert_eq!(to_text(&json!({"k": 5.0})), r#"{"k":5}"#);
        assert_eq!(to_text(&json!([1.0, 2.5, {"n": -3.0}])), r#"[1,2.5,{"n":-3}]"#);
    }
}

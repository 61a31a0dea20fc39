//! `${dotted.path}` interpolation against a runtime context.
//!
//! Bindings that cannot be resolved are left exactly as written so a broken
//! reference stays visible in whatever the caller builds from the output.

use serde_json::{Map, Value};
use tracing::debug;

use crate::context::{lookup_path, to_text, Lookup};
use crate::parser::{Parser, Segment};

/// Substitute every placeholder in `template` with its value in `context`.
pub fn resolve(template: &str, context: &Value) -> String {
    if !template.contains("${") {
        return template.to_string();
    }
    Template::parse(template).render(context)
}

/// Trimmed paths of every placeholder, in order of appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    Template::parse(template).paths().map(str::to_string).collect()
}

/// Paths of placeholders that `resolve` would leave untouched.
pub fn unresolved(template: &str, context: &Value) -> Vec<String> {
    Template::parse(template)
        .paths()
        .filter(|path| lookup_path(context, path).is_absent())
        .map(str::to_string)
        .collect()
}

/// Resolve every string inside a JSON document. Keys and non-string leaves
/// are copied unchanged.
pub fn resolve_value(value: &Value, context: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(resolve(s, context)),
        Value::Array(items) => Value::Array(
            items.iter().map(|v| resolve_value(v, context)).collect(),
        ),
        Value::Object(map) => {
            let resolved: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), resolve_value(v, context)))
                .collect();
            Value::Object(resolved)
        }
        other => other.clone(),
    }
}

/// A template scanned once and rendered against any number of contexts.
#[derive(Debug, Clone)]
pub struct Template<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> Template<'a> {
    pub fn parse(template: &'a str) -> Self {
        Self {
            segments: Parser::new(template).placeholders(),
        }
    }

    pub fn has_placeholders(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Placeholder { .. }))
    }

    pub fn paths(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.segments.iter().filter_map(|s| match *s {
            Segment::Placeholder { path, .. } => Some(path.trim()),
            Segment::Text(_) => None,
        })
    }

    pub fn render(&self, context: &Value) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Text(t) => out.push_str(t),
                Segment::Placeholder { raw, path } => match lookup_path(context, path) {
                    Lookup::Found(v) => out.push_str(&to_text(v)),
                    Lookup::Absent => {
                        debug!(placeholder = %raw, "binding left unresolved");
                        out.push_str(raw);
                    }
                },
            }
        }
        out
    }
}

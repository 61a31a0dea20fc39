use itertools::Itertools;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::context::number_text;
use crate::schema::{limit_text, ErrorKind, ErrorRecord};

/// Returned for an empty or missing error list.
pub const UNKNOWN_ERROR: &str = "Unknown validation error";
/// Used when a record with an unhandled keyword has no engine message.
pub const GENERIC_ERROR: &str = "Validation error";

/// Trait for per-keyword message formatters.
pub trait MessageFormat: Send + Sync {
    fn keyword(&self) -> &'static str;
    fn format(&self, err: &ErrorRecord) -> String;
}

/// Thread-safe formatter registry.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<HashMap<&'static str, Arc<dyn MessageFormat>>>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    pub fn with_builtins() -> Self {
        let mut map: HashMap<&'static str, Arc<dyn MessageFormat>> = HashMap::new();
        map.insert("required", Arc::new(builtins::Required));
        map.insert("type", Arc::new(builtins::Type));
        map.insert("minimum", Arc::new(builtins::Minimum));
        map.insert("maximum", Arc::new(builtins::Maximum));
        map.insert("minLength", Arc::new(builtins::MinLength));
        map.insert("maxLength", Arc::new(builtins::MaxLength));
        map.insert("pattern", Arc::new(builtins::Pattern));
        map.insert("format", Arc::new(builtins::Format));
        map.insert("enum", Arc::new(builtins::Enum));
        Self { inner: Arc::new(map) }
    }

    /// Add a formatter, replacing any existing one for the same keyword.
    pub fn register<F: MessageFormat + 'static>(&mut self, f: F) {
        let mut_map = Arc::make_mut(&mut self.inner);
        mut_map.insert(f.keyword(), Arc::new(f));
    }

    pub fn get(&self, keyword: &str) -> Option<Arc<dyn MessageFormat>> {
        self.inner.get(keyword).cloned()
    }

    /// One line for one record.
    pub fn format_one(&self, err: &ErrorRecord) -> String {
        match self.get(err.keyword()) {
            Some(f) => f.format(err),
            None => err.message.clone().unwrap_or_else(|| GENERIC_ERROR.to_string()),
        }
    }

    /// All records, newline separated.
    pub fn format_all(&self, errors: Option<&[ErrorRecord]>) -> String {
        match errors {
            Some(errors) if !errors.is_empty() => {
                errors.iter().map(|e| self.format_one(e)).join("\n")
            }
            _ => UNKNOWN_ERROR.to_string(),
        }
    }
}

/// Format with the builtin keyword table.
pub fn format_errors(errors: Option<&[ErrorRecord]>) -> String {
    Registry::with_builtins().format_all(errors)
}

/// Format with a caller-supplied registry.
pub fn format_errors_with(registry: &Registry, errors: Option<&[ErrorRecord]>) -> String {
    registry.format_all(errors)
}

// Renders a value the way an array join does in the editor: strings bare,
// null empty, nested arrays comma joined, objects opaque.
fn join_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(join_text).join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

pub mod builtins {
    use super::*;

    pub struct Required;
    impl MessageFormat for Required {
        fn keyword(&self) -> &'static str { "required" }
        fn format(&self, err: &ErrorRecord) -> String {
            match &err.kind {
                ErrorKind::Required { missing_property } => {
                    format!("Missing required property: {missing_property}")
                }
                _ => format!("Missing required property: {}", err.path()),
            }
        }
    }

    pub struct Type;
    impl MessageFormat for Type {
        fn keyword(&self) -> &'static str { "type" }
        fn format(&self, err: &ErrorRecord) -> String {
            let expected = match &err.kind {
                ErrorKind::Type { expected } => expected.as_str(),
                _ => "",
            };
            format!("{}: should be {expected}", err.path())
        }
    }

    pub struct Minimum;
    impl MessageFormat for Minimum {
        fn keyword(&self) -> &'static str { "minimum" }
        fn format(&self, err: &ErrorRecord) -> String {
            format!("{}: should be >= {}", err.path(), limit_of(err))
        }
    }

    pub struct Maximum;
    impl MessageFormat for Maximum {
        fn keyword(&self) -> &'static str { "maximum" }
        fn format(&self, err: &ErrorRecord) -> String {
            format!("{}: should be <= {}", err.path(), limit_of(err))
        }
    }

    pub struct MinLength;
    impl MessageFormat for MinLength {
        fn keyword(&self) -> &'static str { "minLength" }
        fn format(&self, err: &ErrorRecord) -> String {
            format!("{}: should have minimum length of {}", err.path(), limit_of(err))
        }
    }

    pub struct MaxLength;
    impl MessageFormat for MaxLength {
        fn keyword(&self) -> &'static str { "maxLength" }
        fn format(&self, err: &ErrorRecord) -> String {
            format!("{}: should have maximum length of {}", err.path(), limit_of(err))
        }
    }

    pub struct Pattern;
    impl MessageFormat for Pattern {
        fn keyword(&self) -> &'static str { "pattern" }
        fn format(&self, err: &ErrorRecord) -> String {
            let pattern = match &err.kind {
                ErrorKind::Pattern { pattern } => pattern.as_str(),
                _ => "",
            };
            format!("{}: does not match pattern \"{pattern}\"", err.path())
        }
    }

    pub struct Format;
    impl MessageFormat for Format {
        fn keyword(&self) -> &'static str { "format" }
        fn format(&self, err: &ErrorRecord) -> String {
            let format = match &err.kind {
                ErrorKind::Format { format } => format.as_str(),
                _ => "",
            };
            format!("{}: should match format \"{format}\"", err.path())
        }
    }

    pub struct Enum;
    impl MessageFormat for Enum {
        fn keyword(&self) -> &'static str { "enum" }
        fn format(&self, err: &ErrorRecord) -> String {
            let allowed = match &err.kind {
                ErrorKind::Enum { allowed_values } => allowed_values.iter().map(join_text).join(", "),
                _ => String::new(),
            };
            format!("{}: should be one of [{allowed}]", err.path())
        }
    }

    fn limit_of(err: &ErrorRecord) -> String {
        match &err.kind {
            ErrorKind::Minimum { limit } | ErrorKind::Maximum { limit } => limit_text(limit),
            ErrorKind::MinLength { limit } | ErrorKind::MaxLength { limit } => limit.to_string(),
            _ => String::new(),
        }
    }
}

//! JSON Schema validation of workflow inputs and outputs.
//!
//! Validation never fails with an `Err` at this layer: a schema that cannot be
//! compiled is reported as a single [`ErrorKind::Internal`] record inside an
//! [`ValidationResult::Invalid`], so callers always branch on one shape.

use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::{Retrieve, Uri, ValidationError, Validator};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::context::number_text;
use crate::errors::{BindError, Result};

/// Message used when a compile failure carries no text of its own.
pub const COMPILE_FALLBACK: &str = "Schema validation failed";
/// Prefix of the error returned for any external `$ref`.
pub const REMOTE_REF_REFUSED: &str = "external schema references are not allowed";

/// JSON Schema drafts that can be pinned instead of relying on `$schema`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Draft {
    Draft4,
    Draft6,
    Draft7,
    Draft201909,
    Draft202012,
}

impl From<Draft> for jsonschema::Draft {
    fn from(d: Draft) -> Self {
        match d {
            Draft::Draft4 => jsonschema::Draft::Draft4,
            Draft::Draft6 => jsonschema::Draft::Draft6,
            Draft::Draft7 => jsonschema::Draft::Draft7,
            Draft::Draft201909 => jsonschema::Draft::Draft201909,
            Draft::Draft202012 => jsonschema::Draft::Draft202012,
        }
    }
}

/// Validator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Collect every violation instead of stopping at the first.
    pub all_errors: bool,
    /// Enforce the `format` keyword.
    pub validate_formats: bool,
    /// Pin a draft; `None` lets `$schema` decide.
    pub draft: Option<Draft>,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            all_errors: true,
            validate_formats: true,
            draft: None,
        }
    }
}

/// Keyword-specific detail of a violation.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    Required { missing_property: String },
    /// Expected type(s), comma separated when several are allowed.
    Type { expected: String },
    Minimum { limit: Value },
    Maximum { limit: Value },
    MinLength { limit: u64 },
    MaxLength { limit: u64 },
    Pattern { pattern: String },
    Format { format: String },
    Enum { allowed_values: Vec<Value> },
    Other { keyword: String },
    /// Synthetic record for a schema that could not be compiled.
    Internal,
}

impl ErrorKind {
    pub fn keyword(&self) -> &str {
        match self {
            ErrorKind::Required { .. } => "required",
            ErrorKind::Type { .. } => "type",
            ErrorKind::Minimum { .. } => "minimum",
            ErrorKind::Maximum { .. } => "maximum",
            ErrorKind::MinLength { .. } => "minLength",
            ErrorKind::MaxLength { .. } => "maxLength",
            ErrorKind::Pattern { .. } => "pattern",
            ErrorKind::Format { .. } => "format",
            ErrorKind::Enum { .. } => "enum",
            ErrorKind::Other { keyword } => keyword,
            ErrorKind::Internal => "",
        }
    }

    /// Parameters in the camelCase shape editors already consume.
    pub fn params(&self) -> Value {
        match self {
            ErrorKind::Required { missing_property } => json!({ "missingProperty": missing_property }),
            ErrorKind::Type { expected } => json!({ "type": expected }),
            ErrorKind::Minimum { limit } | ErrorKind::Maximum { limit } => json!({ "limit": limit }),
            ErrorKind::MinLength { limit } | ErrorKind::MaxLength { limit } => json!({ "limit": limit }),
            ErrorKind::Pattern { pattern } => json!({ "pattern": pattern }),
            ErrorKind::Format { format } => json!({ "format": format }),
            ErrorKind::Enum { allowed_values } => json!({ "allowedValues": allowed_values }),
            ErrorKind::Other { .. } | ErrorKind::Internal => json!({}),
        }
    }
}

/// One violation, detached from the validated instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    /// JSON pointer into the data ("" for the root).
    pub instance_path: String,
    /// JSON pointer into the schema.
    pub schema_path: String,
    /// The engine's own description.
    pub message: Option<String>,
}

impl ErrorRecord {
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: ErrorKind::Internal,
            instance_path: String::new(),
            schema_path: String::new(),
            message: Some(if message.is_empty() {
                COMPILE_FALLBACK.to_string()
            } else {
                message
            }),
        }
    }

    pub fn keyword(&self) -> &str {
        self.kind.keyword()
    }

    /// Location used in messages. For `required` the engine points at the
    /// containing object, so the missing child is appended.
    pub fn path(&self) -> String {
        match &self.kind {
            ErrorKind::Required { missing_property } => {
                format!("{}/{}", self.instance_path, missing_property)
            }
            _ => self.instance_path.clone(),
        }
    }

    fn from_engine(schema: &Value, e: ValidationError<'_>) -> Self {
        let message = e.to_string();
        let instance_path = e.instance_path.to_string();
        let schema_path = e.schema_path.to_string();
        let keyword = schema_path.rsplit('/').next().unwrap_or_default().to_string();
        let kind = match e.kind {
            ValidationErrorKind::Required { property, .. } => ErrorKind::Required {
                missing_property: match property {
                    Value::String(s) => s,
                    other => other.to_string(),
                },
            },
            ValidationErrorKind::Type { kind, .. } => ErrorKind::Type {
                expected: match kind {
                    TypeKind::Single(t) => t.to_string(),
                    // the engine keeps a bitmap; list them as the schema author wrote them
                    TypeKind::Multiple(types) => match schema.pointer(&schema_path) {
                        Some(Value::Array(names)) => names
                            .iter()
                            .filter_map(Value::as_str)
                            .collect::<Vec<_>>()
                            .join(","),
                        _ => types
                            .into_iter()
                            .map(|t| t.to_string())
                            .collect::<Vec<_>>()
                            .join(","),
                    },
                },
            },
            ValidationErrorKind::Minimum { limit, .. } => ErrorKind::Minimum { limit },
            ValidationErrorKind::Maximum { limit, .. } => ErrorKind::Maximum { limit },
            ValidationErrorKind::MinLength { limit, .. } => ErrorKind::MinLength { limit },
            ValidationErrorKind::MaxLength { limit, .. } => ErrorKind::MaxLength { limit },
            ValidationErrorKind::Pattern { pattern, .. } => ErrorKind::Pattern { pattern },
            ValidationErrorKind::Format { format, .. } => ErrorKind::Format { format },
            ValidationErrorKind::Enum { options, .. } => ErrorKind::Enum {
                allowed_values: match options {
                    Value::Array(values) => values,
                    single => vec![single],
                },
            },
            _ => ErrorKind::Other { keyword },
        };
        Self {
            kind,
            instance_path,
            schema_path,
            message: Some(message),
        }
    }
}

impl Serialize for ErrorRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ErrorRecord", 5)?;
        s.serialize_field("keyword", self.keyword())?;
        s.serialize_field("instancePath", &self.instance_path)?;
        s.serialize_field("schemaPath", &self.schema_path)?;
        s.serialize_field("params", &self.kind.params())?;
        s.serialize_field("message", &self.message)?;
        s.end()
    }
}

/// Outcome of validating one value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<ErrorRecord>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn errors(&self) -> Option<&[ErrorRecord]> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(errors) => Some(errors),
        }
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ValidationResult::Valid => {
                let mut s = serializer.serialize_struct("ValidationResult", 1)?;
                s.serialize_field("valid", &true)?;
                s.end()
            }
            ValidationResult::Invalid(errors) => {
                let mut s = serializer.serialize_struct("ValidationResult", 2)?;
                s.serialize_field("valid", &false)?;
                s.serialize_field("errors", errors)?;
                s.end()
            }
        }
    }
}

/// Refuses every external `$ref`: schemas are user-authored, so validation
/// must never reach the network or the local disk.
struct NoRemoteRetriever;

impl Retrieve for NoRemoteRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> std::result::Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        debug!(uri = uri.as_str(), "refusing external schema reference");
        Err(format!("{REMOTE_REF_REFUSED}: {}", uri.as_str()).into())
    }
}

/// A compiled schema, reusable across values.
pub struct SchemaValidator {
    validator: Validator,
    schema: Value,
    all_errors: bool,
}

impl SchemaValidator {
    pub fn compile(schema: &Value, opts: &ValidatorOptions) -> Result<Self> {
        let mut builder = jsonschema::options();
        builder.should_validate_formats(opts.validate_formats);
        builder.with_retriever(NoRemoteRetriever);
        if let Some(draft) = opts.draft {
            builder.with_draft(draft.into());
        }
        let validator = builder.build(schema).map_err(|e| {
            warn!(error = %e, "schema failed to compile");
            BindError::Schema(e.to_string())
        })?;
        debug!(all_errors = opts.all_errors, "schema compiled");
        Ok(Self {
            validator,
            schema: schema.clone(),
            all_errors: opts.all_errors,
        })
    }

    pub fn validate(&self, data: &Value) -> ValidationResult {
        if self.validator.is_valid(data) {
            return ValidationResult::Valid;
        }
        let errors = self.validator.iter_errors(data)
            .map(|e| ErrorRecord::from_engine(&self.schema, e));
        let errors: Vec<ErrorRecord> = if self.all_errors {
            errors.collect()
        } else {
            errors.take(1).collect()
        };
        debug!(count = errors.len(), "validation failed");
        ValidationResult::Invalid(errors)
    }
}

/// Validate `data` against `schema` with the given options. Compile failures
/// become a single synthetic record.
pub fn validate_with(schema: &Value, data: &Value, opts: &ValidatorOptions) -> ValidationResult {
    match SchemaValidator::compile(schema, opts) {
        Ok(validator) => validator.validate(data),
        Err(BindError::Schema(message)) => ValidationResult::Invalid(vec![ErrorRecord::internal(message)]),
        Err(other) => ValidationResult::Invalid(vec![ErrorRecord::internal(other.to_string())]),
    }
}

/// Validate in all-errors mode with default options.
pub fn validate(schema: &Value, data: &Value) -> ValidationResult {
    validate_with(schema, data, &ValidatorOptions::default())
}

/// Textual form of a limit, matching how numbers are printed elsewhere.
pub(crate) fn limit_text(limit: &Value) -> String {
    match limit {
        Value::Number(n) => number_text(n),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn person_schema() -> Value {
        json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": {"type": "string", "minLength": 2, "pattern": "^[a-z]+$"},
                "age": {"type": "integer", "minimum": 0, "maximum": 150},
                "role": {"enum": ["admin", "user"]},
                "email": {"type": "string", "format": "email"}
            }
        })
    }

    #[test]
    fn missing_required_property() {
        let result = validate(&person_schema(), &json!({}));
        let errors = result.errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].keyword(), "required");
        assert_eq!(
            errors[0].kind,
            ErrorKind::Required { missing_property: "name".into() }
        );
        assert_eq!(errors[0].instance_path, "");
        assert_eq!(errors[0].path(), "/name");
    }

    #[test]
    fn valid_document() {
        assert_eq!(validate(&person_schema(), &json!({"name": "ab"})), ValidationResult::Valid);
    }

    #[test]
    fn collects_all_errors() {
        let data = json!({"name": "A", "age": -1, "role": "root", "email": "nope"});
        let result = validate(&person_schema(), &data);
        let keywords: Vec<&str> = result.errors().unwrap().iter().map(|e| e.keyword()).collect();
        for expected in ["minLength", "pattern", "minimum", "enum", "format"] {
            assert!(keywords.contains(&expected), "missing {expected} in {keywords:?}");
        }
    }

    #[test]
    fn first_error_only() {
        let opts = ValidatorOptions { all_errors: false, ..Default::default() };
        let data = json!({"name": "A", "age": -1});
        let result = validate_with(&person_schema(), &data, &opts);
        assert_eq!(result.errors().unwrap().len(), 1);
    }

    #[test]
    fn formats_can_be_ignored() {
        let opts = ValidatorOptions { validate_formats: false, ..Default::default() };
        let data = json!({"name": "ab", "email": "nope"});
        assert!(validate_with(&person_schema(), &data, &opts).is_valid());
    }

    #[test]
    fn type_error_params() {
        let result = validate(&person_schema(), &json!({"name": 5}));
        let err = &result.errors().unwrap()[0];
        assert_eq!(err.kind, ErrorKind::Type { expected: "string".into() });
        assert_eq!(err.instance_path, "/name");
        assert_eq!(err.schema_path, "/properties/name/type");
    }

    #[test]
    fn bad_schema_becomes_single_record() {
        let schema = json!({"type": "no-such-type"});
        let result = validate(&schema, &json!(1));
        let errors = result.errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Internal);
        assert!(!errors[0].message.as_deref().unwrap_or_default().is_empty());
    }

    #[test]
    fn external_refs_are_refused_without_fetching() {
        for uri in ["http://example.invalid/x.json", "file:///etc/passwd"] {
            let result = validate(&json!({"$ref": uri}), &json!(1));
            let errors = result.errors().unwrap();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].kind, ErrorKind::Internal);
            let message = errors[0].message.as_deref().unwrap_or_default();
            assert!(message.contains(REMOTE_REF_REFUSED), "unexpected message: {message}");
            assert!(!message.contains("error sending request"), "unexpected message: {message}");
        }
    }

    #[test]
    fn multiple_types_keep_schema_order() {
        let schema = json!({"type": "object", "properties": {"n": {"type": ["string", "null"]}}});
        let result = validate(&schema, &json!({"n": 5}));
        let err = &result.errors().unwrap()[0];
        assert_eq!(err.kind, ErrorKind::Type { expected: "string,null".into() });
        assert_eq!(
            crate::messages::format_errors(result.errors()),
            "/n: should be string,null"
        );
    }

    #[test]
    fn internal_record_falls_back_to_generic_text() {
        assert_eq!(ErrorRecord::internal("").message.as_deref(), Some(COMPILE_FALLBACK));
    }

    #[test]
    fn unknown_keywords_come_from_schema_path() {
        let schema = json!({"type": "object", "additionalProperties": false});
        let result = validate(&schema, &json!({"x": 1}));
        let err = &result.errors().unwrap()[0];
        assert_eq!(err.kind, ErrorKind::Other { keyword: "additionalProperties".into() });
        assert!(err.message.is_some());
    }

    #[test]
    fn serializes_in_result_shape() {
        assert_eq!(serde_json::to_value(ValidationResult::Valid).unwrap(), json!({"valid": true}));
        let out = serde_json::to_value(validate(&person_schema(), &json!({}))).unwrap();
        assert_eq!(out["valid"], json!(false));
        assert_eq!(out["errors"][0]["keyword"], json!("required"));
        assert_eq!(out["errors"][0]["params"], json!({"missingProperty": "name"}));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: ValidatorOptions = serde_json::from_value(json!({"draft": "draft7"})).unwrap();
        assert_eq!(
            opts,
            ValidatorOptions { draft: Some(Draft::Draft7), ..Default::default() }
        );
    }
}

use crate::messages::{self, Registry};
use crate::schema::{self, ErrorRecord, SchemaValidator, ValidationResult, ValidatorOptions};
use crate::template;
use serde_json::Value;

/// Bundles validator options and a formatter registry so workflow code can
/// resolve, validate and report with one handle.
#[derive(Clone)]
pub struct Binder {
    options: ValidatorOptions,
    registry: Registry,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new(ValidatorOptions::default(), Registry::with_builtins())
    }
}

impl Binder {
    pub fn new(options: ValidatorOptions, registry: Registry) -> Self {
        Self { options, registry }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    pub fn resolve(&self, template: &str, context: &Value) -> String {
        template::resolve(template, context)
    }

    pub fn resolve_value(&self, value: &Value, context: &Value) -> Value {
        template::resolve_value(value, context)
    }

    pub fn validate(&self, schema: &Value, data: &Value) -> ValidationResult {
        schema::validate_with(schema, data, &self.options)
    }

    /// Compile once for repeated validation.
    pub fn compile(&self, schema: &Value) -> crate::Result<SchemaValidator> {
        SchemaValidator::compile(schema, &self.options)
    }

    pub fn format_errors(&self, errors: Option<&[ErrorRecord]>) -> String {
        messages::format_errors_with(&self.registry, errors)
    }

    /// Validate and, on failure, return the formatted message.
    pub fn check(&self, schema: &Value, data: &Value) -> std::result::Result<(), String> {
        match self.validate(schema, data) {
            ValidationResult::Valid => Ok(()),
            invalid => Err(self.format_errors(invalid.errors())),
        }
    }
}

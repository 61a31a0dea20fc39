//! Runtime binding support for workflow nodes: `${path}` template resolution
//! against live request data, and JSON Schema validation of node inputs and
//! outputs with one-line, user-facing error messages.

pub mod errors;
pub mod context;
pub mod engine;
pub mod live;
pub mod messages;  // keyword -> message formatters
pub mod schema;
pub mod template;
mod parser;

pub use engine::Binder;
pub use errors::{BindError, Result};
pub use messages::{format_errors, format_errors_with, MessageFormat, Registry};
pub use schema::{
    validate, validate_with, Draft, ErrorKind, ErrorRecord, SchemaValidator, ValidationResult,
    ValidatorOptions,
};
pub use template::{placeholders, resolve, resolve_value, unresolved, Template};

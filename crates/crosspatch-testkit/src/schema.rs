//! JSON schema validators for crosspatch DTOs.
//!
//! Schemas are generated from the schemars derives at validation time, so a
//! report that serializes differently from its declared shape fails loudly
//! in tests.

use jsonschema::JSONSchema;
use schemars::schema_for;

use crosspatch_types::{ConfigFile, PackageReport};

/// Error type for schema validation failures.
#[derive(Debug)]
pub struct SchemaValidationError {
    pub errors: Vec<String>,
}

impl std::fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Schema validation failed: {}", self.errors.join("; "))
    }
}

impl std::error::Error for SchemaValidationError {}

/// Compile the PackageReport JSON schema.
pub fn load_report_schema() -> JSONSchema {
    let schema = schema_for!(PackageReport);
    let value = serde_json::to_value(&schema).expect("Report schema should serialize");
    JSONSchema::compile(&value).expect("Report schema should compile")
}

/// Compile the ConfigFile JSON schema.
pub fn load_config_schema() -> JSONSchema {
    let schema = schema_for!(ConfigFile);
    let value = serde_json::to_value(&schema).expect("Config schema should serialize");
    JSONSchema::compile(&value).expect("Config schema should compile")
}

/// Validate a PackageReport against its JSON schema.
pub fn validate_report(report: &PackageReport) -> Result<(), SchemaValidationError> {
    let schema = load_report_schema();
    let value = serde_json::to_value(report).expect("PackageReport should serialize");
    validate_with_schema(&schema, &value)
}

/// Validate a ConfigFile against its JSON schema.
pub fn validate_config(config: &ConfigFile) -> Result<(), SchemaValidationError> {
    let schema = load_config_schema();
    let value = serde_json::to_value(config).expect("ConfigFile should serialize");
    validate_with_schema(&schema, &value)
}

/// Validate any JSON value against the PackageReport schema.
pub fn validate_report_json(json: &serde_json::Value) -> Result<(), SchemaValidationError> {
    let schema = load_report_schema();
    validate_with_schema(&schema, json)
}

fn validate_with_schema(
    schema: &JSONSchema,
    value: &serde_json::Value,
) -> Result<(), SchemaValidationError> {
    let result = schema.validate(value);
    if let Err(errors) = result {
        let errors: Vec<String> = errors.map(|e| e.to_string()).collect();
        return Err(SchemaValidationError { errors });
    }
    Ok(())
}

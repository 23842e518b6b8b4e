//! JSON Schema validation for offer and lead documents.
//!
//! Both schemas are embedded at compile time from `schemas/` and compiled
//! once on first use.

use std::sync::OnceLock;
use thiserror::Error;

const OFFER_SCHEMA_JSON: &str = include_str!("../../../../schemas/offer.schema.json");
const LEAD_SCHEMA_JSON: &str = include_str!("../../../../schemas/lead.schema.json");

static OFFER_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();
static LEAD_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from schema loading.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),
}

fn compile(source: &str) -> Result<jsonschema::Validator, String> {
    let schema_value: serde_json::Value = match serde_json::from_str(source) {
        Ok(v) => v,
        Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
    };

    jsonschema::options()
        .build(&schema_value)
        .map_err(|e| format!("Failed to compile schema: {}", e))
}

fn validator(
    cell: &'static OnceLock<Result<jsonschema::Validator, String>>,
    source: &str,
) -> Result<&'static jsonschema::Validator, SchemaError> {
    match cell.get_or_init(|| compile(source)) {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::LoadError(e.clone())),
    }
}

fn collect_errors(
    validator: &jsonschema::Validator,
    instance: &serde_json::Value,
) -> Result<(), Vec<String>> {
    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate an offer document against the offer schema.
pub fn validate_offer_schema(offer_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = validator(&OFFER_SCHEMA, OFFER_SCHEMA_JSON).map_err(|e| vec![e.to_string()])?;
    collect_errors(validator, offer_json)
}

/// Validate a single lead document against the lead schema.
pub fn validate_lead_schema(lead_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = validator(&LEAD_SCHEMA, LEAD_SCHEMA_JSON).map_err(|e| vec![e.to_string()])?;
    collect_errors(validator, lead_json)
}

// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON ingestion with structural validation.

use forestplot::{ForestError, ForestSpec};
use serde_json::Value;

/// Theme sections that must be objects.
const THEME_SECTIONS: [&str; 3] = ["colors", "typography", "spacing"];

/// Checks the shape of a specification before deserializing it.
///
/// `data.rows` must be a list and `theme.colors`, `theme.typography` and
/// `theme.spacing` must be objects.
pub fn validate_spec_json(value: &Value) -> Result<(), ForestError> {
    if !matches!(value.pointer("/data/rows"), Some(Value::Array(_))) {
        return Err(ForestError::invalid("data.rows", "must be a list"));
    }
    for section in THEME_SECTIONS {
        if !matches!(value.pointer(&format!("/theme/{section}")), Some(Value::Object(_))) {
            return Err(ForestError::invalid(
                format!("theme.{section}"),
                "must be an object",
            ));
        }
    }
    Ok(())
}

/// Parses and validates a JSON specification.
pub fn parse_spec(json: &str) -> Result<ForestSpec, ForestError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| ForestError::invalid("$", format!("is not valid JSON: {e}")))?;
    validate_spec_json(&value)?;
    serde_json::from_value(value).map_err(|e| {
        ForestError::invalid("$", format!("does not describe a forest plot: {e}"))
    })
}

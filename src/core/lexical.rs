//! XML Schema lexical forms for `xs:int` and `xs:double`.

use crate::utils::error::{BindError, Result};
use regex::Regex;
use std::sync::LazyLock;

static INT_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+$").unwrap());

static DOUBLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?$").unwrap()
});

fn collapse(text: &str) -> &str {
    text.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

fn lexical_error(element: &str, xsd_type: &str, value: &str, reason: impl Into<String>) -> BindError {
    BindError::LexicalError {
        element: element.to_string(),
        xsd_type: xsd_type.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn format_int(value: i32) -> String {
    value.to_string()
}

/// Shortest text that parses back to the same bits; never locale formatted.
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "INF".to_string()
        } else {
            "-INF".to_string()
        }
    } else {
        // Debug keeps the ".0" on integral values and switches to exponent form for very large/small magnitudes
        format!("{:?}", value)
    }
}

pub fn parse_int(element: &str, text: &str) -> Result<i32> {
    let value = collapse(text);
    if !INT_PATTERN.is_match(value) {
        return Err(lexical_error(element, "int", text, "expected an optionally signed decimal integer"));
    }
    value
        .parse::<i32>()
        .map_err(|_| lexical_error(element, "int", text, "out of range for a 32-bit signed integer"))
}

pub fn parse_double(element: &str, text: &str) -> Result<f64> {
    let value = collapse(text);
    match value {
        "INF" | "+INF" => return Ok(f64::INFINITY),
        "-INF" => return Ok(f64::NEG_INFINITY),
        "NaN" => return Ok(f64::NAN),
        _ => {}
    }
    if !DOUBLE_PATTERN.is_match(value) {
        return Err(lexical_error(
            element,
            "double",
            text,
            "expected a decimal or scientific number, INF, -INF or NaN",
        ));
    }
    value
        .parse::<f64>()
        .map_err(|e| lexical_error(element, "double", text, e.to_string()))
}

/// JSON form of an `xs:double`: finite values as numbers, `INF`/`-INF`/`NaN` as strings.
pub mod json_double {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DoubleRepr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&super::format_double(*value))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match DoubleRepr::deserialize(deserializer)? {
            DoubleRepr::Number(value) => Ok(value),
            DoubleRepr::Text(text) => {
                super::parse_double("qty", &text).map_err(serde::de::Error::custom)
            }
        }
    }
}

//! Core data types for the Vinted search client
//!
//! Contains the translator's output and the ordered parameter map used to
//! assemble the API querystring.

use serde::{Deserialize, Serialize};

/// Result of translating a catalog page URL
///
/// Serializes as `{"validURL": false}` for rejected URLs and as
/// `{"validURL": true, "domain": "fr", "querystring": "..."}` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedUrl {
    /// Whether the URL matched `https://www.vinted.<domain>`
    #[serde(rename = "validURL")]
    pub valid_url: bool,

    /// Domain suffix captured from the hostname (e.g., "fr", "de")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Querystring for the `/api/v2/items` endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub querystring: Option<String>,
}

impl ParsedUrl {
    /// Result for a URL that is not a Vinted catalog page
    pub fn invalid() -> Self {
        Self {
            valid_url: false,
            domain: None,
            querystring: None,
        }
    }

    pub(crate) fn valid(domain: String, querystring: String) -> Self {
        Self {
            valid_url: true,
            domain: Some(domain),
            querystring: Some(querystring),
        }
    }
}

/// Value of a single API parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Scalar parameter, emitted as `name=value`
    Single(String),
    /// Array parameter, emitted as `name=v1,v2,...`
    Multiple(Vec<String>),
}

impl ParamValue {
    /// Renders the value the way the items endpoint expects it
    pub fn to_query_value(&self) -> String {
        match self {
            ParamValue::Single(value) => value.clone(),
            ParamValue::Multiple(values) => values.join(","),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::Multiple(values)
    }
}

/// Insertion-ordered mapping from parameter name to value
///
/// Overwriting an existing key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMap {
    entries: Vec<(String, ParamValue)>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any scalar or array already stored
    pub fn set(&mut self, name: &str, value: ParamValue) {
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Appends `value` to the array stored under `name`
    ///
    /// Creates a one-element array when the key is new. A scalar previously
    /// stored under the same key becomes the first element of the array.
    pub fn push(&mut self, name: &str, value: String) {
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some((_, ParamValue::Multiple(values))) => values.push(value),
            Some((_, slot)) => {
                let existing = slot.to_query_value();
                *slot = ParamValue::Multiple(vec![existing, value]);
            }
            None => self
                .entries
                .push((name.to_string(), ParamValue::Multiple(vec![value]))),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Joins all entries as `name=value` pairs separated by `&`
    pub fn to_querystring(&self) -> String {
        self.iter()
            .map(|(key, value)| format!("{}={}", key, value.to_query_value()))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Options accepted by a search call
///
/// `disable_order` and `allow_swap` are carried for interface stability;
/// no translation rule reads them yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub disable_order: bool,
    pub allow_swap: bool,
    /// Overrides applied after the URL-derived parameters
    pub custom_params: Vec<(String, ParamValue)>,
}

impl SearchOptions {
    /// Adds a custom parameter override
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.custom_params.push((name.into(), value.into()));
        self
    }
}

//! Tauri commands for the Vinted search client
//!
//! This module contains all Tauri command implementations.

use serde_json::{Map, Value};
use tauri::State;
use vinted_core::{ParamValue, ParsedUrl, SearchOptions};

use crate::ScraperState;

/// Custom parameter overrides as sent by the frontend
///
/// Keys keep the order of the frontend object, so new keys are appended to
/// the querystring in that order.
pub type CustomParams = Map<String, Value>;

pub(crate) fn search_options(custom_params: Option<CustomParams>) -> Result<SearchOptions, String> {
    let custom_params = custom_params
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| param_value(&name, value).map(|value| (name, value)))
        .collect::<Result<Vec<_>, String>>()?;

    Ok(SearchOptions {
        custom_params,
        ..Default::default()
    })
}

/// Strings, numbers and booleans become scalars, arrays become comma-joined lists
fn param_value(name: &str, value: Value) -> Result<ParamValue, String> {
    match value {
        Value::String(s) => Ok(ParamValue::Single(s)),
        Value::Number(n) => Ok(ParamValue::Single(n.to_string())),
        Value::Bool(b) => Ok(ParamValue::Single(b.to_string())),
        Value::Array(values) => values
            .into_iter()
            .map(|value| match value {
                Value::String(s) => Ok(s),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(format!("Unsupported value in {}: {}", name, other)),
            })
            .collect::<Result<Vec<_>, String>>()
            .map(ParamValue::Multiple),
        other => Err(format!("Unsupported value for {}: {}", name, other)),
    }
}

/// Search Vinted with the filters of a catalog page URL
///
/// # Arguments
/// * `state` - Managed ScraperState from Tauri
/// * `url` - Catalog page URL copied from the browser
/// * `custom_params` - Optional overrides, e.g. `{ "per_page": "96" }`
///
/// # Returns
/// The items API response as JSON
///
/// # Errors
/// Returns error message as String if the search fails; a non-JSON
/// response body is returned as-is
#[tauri::command]
pub async fn search_items(
    state: State<'_, ScraperState>,
    url: String,
    custom_params: Option<CustomParams>,
) -> Result<Value, String> {
    let options = search_options(custom_params)?;
    state
        .scraper
        .search(&url, &options)
        .await
        .map_err(|e| e.to_string())
}

/// Translate a catalog page URL without querying the API
///
/// # Returns
/// `{ validURL, domain?, querystring? }`
///
/// # Errors
/// Returns error message if a custom parameter is not a string, number,
/// boolean or array of those
#[tauri::command]
pub fn parse_url(
    state: State<'_, ScraperState>,
    url: String,
    custom_params: Option<CustomParams>,
) -> Result<ParsedUrl, String> {
    let options = search_options(custom_params)?;
    Ok(state.scraper.parse_url(&url, &options))
}

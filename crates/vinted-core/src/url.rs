//! URL translation for the Vinted catalog search API
//!
//! Turns a browser-facing catalog URL such as
//! `https://www.vinted.fr/catalog?catalog[]=5&search_text=shoes` into the
//! domain suffix and querystring expected by `/api/v2/items`.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{ParamValue, ParameterMap, ParsedUrl};

const MARKETPLACE: &str = "vinted";
const ITEMS_PATH: &str = "/api/v2/items";

/// Array parameters whose API name carries an `_id` suffix
const ID_SUFFIXED_PARAMS: [&str; 2] = ["catalog", "status"];

/// Bytes `decodeURI` leaves percent-encoded
const RESERVED: &[u8] = b";/?:@&=+$,#";

static HOST_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(&format!(r"^https://www\.{}\.([a-z]+)", MARKETPLACE)).ok());

/// One `name[]=value` occurrence found in a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryToken<'a> {
    /// Parameter name without the `[]` marker
    pub name: &'a str,
    /// Whether the name was followed by `[]`
    pub is_array: bool,
    /// Raw value, possibly empty
    pub value: &'a str,
}

/// Translates a Vinted catalog URL into an API querystring
///
/// `disable_order` and `allow_swap` are accepted for interface stability
/// and do not change the output. `custom_params` are applied after the
/// URL-derived parameters: an existing key keeps its position and takes the
/// new value, a new key is appended.
///
/// # Returns
/// `ParsedUrl::invalid()` if the URL cannot be decoded or does not start
/// with `https://www.vinted.<domain>`; otherwise the domain suffix and the
/// assembled querystring (empty if no parameter was recognised).
///
/// # Example
/// ```
/// use vinted_core::url::parse_vinted_url;
/// let parsed = parse_vinted_url(
///     "https://www.vinted.fr/catalog?catalog[]=5&catalog[]=9&search_text=shoes",
///     false,
///     false,
///     &[],
/// );
/// assert!(parsed.valid_url);
/// assert_eq!(parsed.domain.as_deref(), Some("fr"));
/// assert_eq!(parsed.querystring.as_deref(), Some("catalog_ids=5,9&search_text=shoes"));
/// ```
pub fn parse_vinted_url(
    url: &str,
    _disable_order: bool,
    _allow_swap: bool,
    custom_params: &[(String, ParamValue)],
) -> ParsedUrl {
    let Some(decoded) = decode_uri(url) else {
        return ParsedUrl::invalid();
    };
    let Some(domain) = match_domain(&decoded) else {
        return ParsedUrl::invalid();
    };

    let mut params = ParameterMap::new();
    for token in tokenize(&decoded) {
        let value = token.value.replace(' ', "+");
        if token.is_array {
            let name = if ID_SUFFIXED_PARAMS.contains(&token.name) {
                format!("{}_ids", token.name)
            } else {
                format!("{}s", token.name)
            };
            params.push(&name, value);
        } else {
            params.set(token.name, ParamValue::Single(value));
        }
    }

    for (name, value) in custom_params {
        params.set(name, value.clone());
    }

    ParsedUrl::valid(domain, params.to_querystring())
}

/// Percent-decodes a URL the way browsers' `decodeURI` does
///
/// Escapes that decode to one of `; / ? : @ & = + $ , #` stay encoded so
/// they cannot be confused with URL syntax.
///
/// # Returns
/// `None` for a truncated or non-hex escape, or if the decoded bytes are
/// not valid UTF-8
pub fn decode_uri(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            decoded.push(bytes[i]);
            i += 1;
            continue;
        }

        let hex = bytes.get(i + 1..i + 3)?;
        if !hex.iter().all(u8::is_ascii_hexdigit) {
            return None;
        }
        let byte = (hex_value(hex[0]) << 4) | hex_value(hex[1]);
        if RESERVED.contains(&byte) {
            decoded.extend_from_slice(&bytes[i..i + 3]);
        } else {
            decoded.push(byte);
        }
        i += 3;
    }

    String::from_utf8(decoded).ok()
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

/// Extracts the domain suffix from `https://www.vinted.<domain>`
fn match_domain(url: &str) -> Option<String> {
    HOST_RE
        .as_ref()?
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Splits a URL into `name[]=value` tokens
///
/// Scans left to right for `name`, an optional `[]`, `=`, a value and an
/// optional trailing `&`. Names are lowercase ASCII letters and `_`; a name
/// glued to a digit or uppercase letter is skipped entirely. Values run
/// over ASCII letters, digits, space, `.`, `_`, `+`, `%` and `À`..=`ú`, and
/// stop at the first other character.
pub fn tokenize(input: &str) -> Vec<QueryToken<'_>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        let name_len = rest
            .find(|c: char| !is_name_char(c))
            .unwrap_or(rest.len());

        if name_len == 0 {
            pos += rest.chars().next().map_or(1, char::len_utf8);
            continue;
        }

        let glued = input[..pos]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric());
        let after_name = &rest[name_len..];
        let marker = if glued {
            None
        } else if let Some(after) = after_name.strip_prefix("[]=") {
            Some((true, after))
        } else {
            after_name.strip_prefix('=').map(|after| (false, after))
        };

        let Some((is_array, after_marker)) = marker else {
            pos += name_len;
            continue;
        };

        let value_len = after_marker
            .find(|c: char| !is_value_char(c))
            .unwrap_or(after_marker.len());
        let mut consumed = rest.len() - after_marker.len() + value_len;
        if after_marker[value_len..].starts_with('&') {
            consumed += 1;
        }

        tokens.push(QueryToken {
            name: &rest[..name_len],
            is_array,
            value: &after_marker[..value_len],
        });
        pos += consumed;
    }

    tokens
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c == '_'
}

fn is_value_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, ' ' | '.' | '_' | '+' | '%')
        || ('\u{C0}'..='\u{FA}').contains(&c)
}

/// Builds the homepage URL that hands out session cookies
///
/// # Example
/// ```
/// use vinted_core::url::build_homepage_url;
/// assert_eq!(build_homepage_url("fr"), "https://vinted.fr");
/// ```
pub fn build_homepage_url(domain: &str) -> String {
    format!("https://{}.{}", MARKETPLACE, domain)
}

/// Builds the items endpoint URL for a translated querystring
///
/// # Example
/// ```
/// use vinted_core::url::build_items_url;
/// let url = build_items_url("de", "search_text=boots");
/// assert_eq!(url, "https://www.vinted.de/api/v2/items?search_text=boots");
/// ```
pub fn build_items_url(domain: &str, querystring: &str) -> String {
    format!(
        "https://www.{}.{}{}?{}",
        MARKETPLACE, domain, ITEMS_PATH, querystring
    )
}

/// Items endpoint URL relative to an arbitrary base (used with `ClientConfig::base_url`)
pub(crate) fn build_items_url_from_base(base_url: &str, querystring: &str) -> String {
    format!(
        "{}{}?{}",
        base_url.trim_end_matches('/'),
        ITEMS_PATH,
        querystring
    )
}

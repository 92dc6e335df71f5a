//! Upstream provider table.
//!
//! Each provider module knows its endpoint layout, its raw response schema
//! and how to map that schema onto [`GeoRecord`]. The table order is the
//! order results appear in the payload.

mod geojs;
mod ip_api_com;
mod ipapi_co;
mod ipinfo_io;
mod ipwho_is;

use crate::domain::entities::GeoRecord;
use crate::domain::errors::ProviderError;
use reqwest::Url;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Static descriptor of one upstream provider.
pub struct ProviderSpec {
    /// Stable identifier used in payloads and configuration
    pub id: &'static str,
    /// Display name
    pub label: &'static str,
    /// Production base URL (scheme + host)
    pub base_url: &'static str,
    /// Build the request URL for a target; the target is escaped
    pub build_url: fn(&Url, &str) -> Url,
    /// Map a decoded JSON body onto the common record
    pub normalize: fn(Value) -> Result<GeoRecord, ProviderError>,
}

/// All known providers, in declaration order.
pub static PROVIDERS: [ProviderSpec; 5] = [
    ipapi_co::SPEC,
    ipwho_is::SPEC,
    ip_api_com::SPEC,
    ipinfo_io::SPEC,
    geojs::SPEC,
];

/// Find a provider by id.
pub fn find_provider(id: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|p| p.id.eq_ignore_ascii_case(id.trim()))
}

/// Pick the providers named in `ids`, in the order given.
///
/// An empty list selects every provider. Unknown and repeated ids are
/// skipped; if nothing valid remains, every provider is selected.
pub fn select_providers(ids: &[String]) -> Vec<&'static ProviderSpec> {
    let mut selected: Vec<&'static ProviderSpec> = Vec::new();
    for id in ids {
        match find_provider(id) {
            Some(spec) if !selected.iter().any(|s| s.id == spec.id) => selected.push(spec),
            Some(_) => {}
            None => tracing::warn!("ignoring unknown provider id {:?}", id),
        }
    }

    if selected.is_empty() {
        if !ids.is_empty() {
            tracing::warn!("no known provider selected, enabling all");
        }
        return PROVIDERS.iter().collect();
    }
    selected
}

/// Append path segments to a base URL, escaping each one.
fn with_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ProviderError> {
    serde_json::from_value(body).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
}

/// Accept a JSON string, number or boolean as text; anything else is empty.
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Accept a JSON number or numeric string as a finite float.
fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(coerce_f64))
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_f64(s),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split a `"lat,lon"` pair into individually parsed coordinates.
fn split_coordinates(pair: &str) -> (Option<f64>, Option<f64>) {
    let mut parts = pair.splitn(2, ',');
    let lat = parts.next().and_then(parse_f64);
    let lon = parts.next().and_then(parse_f64);
    (lat, lon)
}

/// Normalize an autonomous system number to the `AS<n>` form.
///
/// Accepts `15169`, `"15169"`, `"AS15169"` and `"as15169"`.
fn asn_label(raw: &str) -> String {
    let raw = raw.trim();
    let digits = if is_asn(raw) { &raw[2..] } else { raw };

    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        format!("AS{}", digits)
    } else {
        raw.to_string()
    }
}

/// Split an `"AS15169 Google LLC"` style string into ASN and organisation.
fn split_as_org(raw: &str) -> (String, String) {
    let raw = raw.trim();
    let (head, rest) = raw.split_once(char::is_whitespace).unwrap_or((raw, ""));
    if is_asn(head) {
        (asn_label(head), rest.trim().to_string())
    } else {
        (String::new(), raw.to_string())
    }
}

fn is_asn(s: &str) -> bool {
    s.len() > 2
        && s.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("as"))
        && s[2..].chars().all(|c| c.is_ascii_digit())
}

fn first_non_empty<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates.iter().copied().find(|s| !s.trim().is_empty())
}

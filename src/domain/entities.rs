//! Domain Entities - Core lookup objects
//!
//! These entities describe a single lookup request as it moves through the
//! pipeline: the resolved target, one result per provider, and the aggregate
//! coordinate computed from all of them.

use serde::{Deserialize, Serialize};

/// The concrete address a lookup runs against.
///
/// Created once by the target resolver and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTarget {
    /// Trimmed user input
    pub input: String,
    /// IP address literal (empty when the caller's own address is wanted)
    pub target: String,
    /// Set when the input was a hostname that had to be resolved
    pub hostname: Option<String>,
}

impl ResolvedTarget {
    /// Whether the target still has to be filled with the caller's address.
    pub fn is_self_lookup(&self) -> bool {
        self.target.is_empty()
    }
}

/// Provider-independent geolocation record.
///
/// Every provider normalizer produces this exact shape. Text fields that the
/// upstream does not supply are empty strings; coordinates are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoRecord {
    pub ip: String,
    pub hostname: String,
    pub asn: String,
    pub isp: String,
    pub org: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub country_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Outcome of one provider call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Success(GeoRecord),
    Failure { error: String },
}

/// Result of querying a single provider, tagged with its identity.
///
/// Serializes as `{id, label, ok, ...record fields}` on success and
/// `{id, label, ok: false, error}` on failure.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    pub id: &'static str,
    pub label: &'static str,
    pub outcome: Outcome,
}

impl LookupResult {
    pub fn success(id: &'static str, label: &'static str, record: GeoRecord) -> Self {
        Self {
            id,
            label,
            outcome: Outcome::Success(record),
        }
    }

    pub fn failure(id: &'static str, label: &'static str, error: impl Into<String>) -> Self {
        Self {
            id,
            label,
            outcome: Outcome::Failure {
                error: error.into(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    /// The normalized record, if the provider succeeded.
    pub fn record(&self) -> Option<&GeoRecord> {
        match &self.outcome {
            Outcome::Success(record) => Some(record),
            Outcome::Failure { .. } => None,
        }
    }

    /// The failure message, if the provider failed.
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::Failure { error } => Some(error),
        }
    }
}

impl Serialize for LookupResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Tagged<'a> {
            id: &'a str,
            label: &'a str,
            ok: bool,
            #[serde(flatten)]
            outcome: &'a Outcome,
        }

        Tagged {
            id: self.id,
            label: self.label,
            ok: self.is_ok(),
            outcome: &self.outcome,
        }
        .serialize(serializer)
    }
}

/// Median coordinate across all successful providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Aggregate {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Output of one fan-out over all providers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatePayload {
    /// Target address the providers were queried with
    pub query: String,
    /// One entry per configured provider, in declaration order
    pub providers: Vec<LookupResult>,
    pub aggregate: Aggregate,
}

/// Full response returned to the HTTP caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupResponse {
    pub query: String,
    pub input: String,
    pub resolved: String,
    pub hostname: Option<String>,
    pub providers: Vec<LookupResult>,
    pub aggregate: Aggregate,
}

impl LookupResponse {
    pub fn new(target: ResolvedTarget, payload: AggregatePayload) -> Self {
        Self {
            query: payload.query,
            input: target.input,
            resolved: target.target,
            hostname: target.hostname,
            providers: payload.providers,
            aggregate: payload.aggregate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> GeoRecord {
        GeoRecord {
            ip: "8.8.8.8".to_string(),
            asn: "AS15169".to_string(),
            org: "Google LLC".to_string(),
            city: "Mountain View".to_string(),
            country_code: "US".to_string(),
            latitude: Some(37.4),
            longitude: Some(-122.1),
            ..Default::default()
        }
    }

    #[test]
    fn test_success_serializes_flat() {
        let result = LookupResult::success("ipapi", "ipapi.co", sample_record());
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["id"], "ipapi");
        assert_eq!(value["label"], "ipapi.co");
        assert_eq!(value["ok"], true);
        assert_eq!(value["countryCode"], "US");
        assert_eq!(value["latitude"], 37.4);
        assert_eq!(value["hostname"], "");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_failure_serializes_error_only() {
        let result = LookupResult::failure("ipinfo", "ipinfo.io", "HTTP 429");
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(
            value,
            json!({"id": "ipinfo", "label": "ipinfo.io", "ok": false, "error": "HTTP 429"})
        );
    }

    #[test]
    fn test_absent_coordinates_are_omitted() {
        let record = GeoRecord {
            latitude: None,
            longitude: None,
            ..sample_record()
        };
        let value = serde_json::to_value(LookupResult::success("a", "A", record)).unwrap();

        assert!(value.get("latitude").is_none());
        assert!(value.get("longitude").is_none());
    }

    #[test]
    fn test_accessors() {
        let ok = LookupResult::success("a", "A", sample_record());
        let err = LookupResult::failure("b", "B", "boom");

        assert!(ok.is_ok());
        assert_eq!(ok.record().unwrap().city, "Mountain View");
        assert!(ok.error().is_none());

        assert!(!err.is_ok());
        assert!(err.record().is_none());
        assert_eq!(err.error(), Some("boom"));
    }

    #[test]
    fn test_null_aggregate_serializes_as_null() {
        let value = serde_json::to_value(Aggregate::default()).unwrap();
        assert_eq!(value, json!({"latitude": null, "longitude": null}));
    }

    #[test]
    fn test_lookup_response_combines_target_and_payload() {
        let target = ResolvedTarget {
            input: "dns.google".to_string(),
            target: "8.8.8.8".to_string(),
            hostname: Some("dns.google".to_string()),
        };
        let payload = AggregatePayload {
            query: "8.8.8.8".to_string(),
            providers: vec![LookupResult::failure("a", "A", "x")],
            aggregate: Aggregate::default(),
        };

        let response = LookupResponse::new(target, payload);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["query"], "8.8.8.8");
        assert_eq!(value["input"], "dns.google");
        assert_eq!(value["resolved"], "8.8.8.8");
        assert_eq!(value["hostname"], "dns.google");
        assert_eq!(value["providers"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_self_lookup_detection() {
        let target = ResolvedTarget {
            input: String::new(),
            target: String::new(),
            hostname: None,
        };
        assert!(target.is_self_lookup());
    }
}

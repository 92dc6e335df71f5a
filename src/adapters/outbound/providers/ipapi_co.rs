//! ipapi.co
//!
//! `GET https://ipapi.co/{ip}/json/`. Failures come back with HTTP 200 and
//! `"error": true`, the reason in `reason`.

use super::{
    asn_label, decode, first_non_empty, lenient_f64, lenient_string, with_segments, ProviderSpec,
};
use crate::domain::entities::GeoRecord;
use crate::domain::errors::ProviderError;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

pub(super) const SPEC: ProviderSpec = ProviderSpec {
    id: "ipapi",
    label: "ipapi.co",
    base_url: "https://ipapi.co",
    build_url,
    normalize,
};

#[derive(Debug, Deserialize)]
struct IpapiResponse {
    #[serde(default)]
    error: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    reason: String,
    #[serde(default, deserialize_with = "lenient_string")]
    message: String,
    #[serde(default, deserialize_with = "lenient_string")]
    ip: String,
    #[serde(default, deserialize_with = "lenient_string")]
    asn: String,
    #[serde(default, deserialize_with = "lenient_string")]
    org: String,
    #[serde(default, deserialize_with = "lenient_string")]
    city: String,
    #[serde(default, deserialize_with = "lenient_string")]
    region: String,
    #[serde(default, deserialize_with = "lenient_string")]
    country_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    country_code: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    longitude: Option<f64>,
}

fn build_url(base: &Url, target: &str) -> Url {
    // trailing slash is significant for ipapi.co
    with_segments(base, &[target, "json", ""])
}

fn normalize(body: Value) -> Result<GeoRecord, ProviderError> {
    let r: IpapiResponse = decode(body)?;

    if r.error {
        let message = first_non_empty(&[r.reason.as_str(), r.message.as_str()])
            .unwrap_or("Unknown API error");
        return Err(ProviderError::Upstream(message.to_string()));
    }

    Ok(GeoRecord {
        ip: r.ip,
        hostname: String::new(),
        asn: asn_label(&r.asn),
        // ipapi.co reports the ISP as the organisation
        isp: r.org.clone(),
        org: r.org,
        city: r.city,
        region: r.region,
        country: r.country_name,
        country_code: r.country_code,
        latitude: r.latitude,
        longitude: r.longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_url() {
        let base = Url::parse(SPEC.base_url).unwrap();
        assert_eq!(build_url(&base, "8.8.8.8").as_str(), "https://ipapi.co/8.8.8.8/json/");
    }

    #[test]
    fn test_normalize_success() {
        let body = json!({
            "ip": "8.8.8.8",
            "network": "8.8.8.0/24",
            "version": "IPv4",
            "city": "Mountain View",
            "region": "California",
            "region_code": "CA",
            "country": "US",
            "country_name": "United States",
            "country_code": "US",
            "latitude": 37.42301,
            "longitude": -122.083352,
            "timezone": "America/Los_Angeles",
            "asn": "AS15169",
            "org": "GOOGLE"
        });

        let record = normalize(body).unwrap();
        assert_eq!(record.ip, "8.8.8.8");
        assert_eq!(record.asn, "AS15169");
        assert_eq!(record.org, "GOOGLE");
        assert_eq!(record.isp, "GOOGLE");
        assert_eq!(record.city, "Mountain View");
        assert_eq!(record.region, "California");
        assert_eq!(record.country, "United States");
        assert_eq!(record.country_code, "US");
        assert_eq!(record.latitude, Some(37.42301));
        assert_eq!(record.longitude, Some(-122.083352));
        assert_eq!(record.hostname, "");
    }

    #[test]
    fn test_normalize_error_flag() {
        let body = json!({"ip": "127.0.0.1", "error": true, "reason": "Reserved IP Address", "reserved": true});
        let err = normalize(body).unwrap_err();
        assert_eq!(err, ProviderError::Upstream("Reserved IP Address".to_string()));
    }

    #[test]
    fn test_normalize_error_without_reason() {
        let err = normalize(json!({"error": true})).unwrap_err();
        assert_eq!(err.to_string(), "Unknown API error");
    }

    #[test]
    fn test_normalize_missing_fields_default() {
        let record = normalize(json!({"ip": "1.2.3.4"})).unwrap();
        assert_eq!(record.city, "");
        assert_eq!(record.asn, "");
        assert_eq!(record.latitude, None);
        assert_eq!(record.longitude, None);
    }

    #[test]
    fn test_normalize_null_coordinates() {
        let record = normalize(json!({"ip": "1.2.3.4", "latitude": null, "longitude": null})).unwrap();
        assert_eq!(record.latitude, None);
    }

    #[test]
    fn test_normalize_rejects_non_object() {
        let err = normalize(json!("not an object")).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }
}

//! ip-api.com
//!
//! `GET http://ip-api.com/json/{ip}?fields=...`. The free tier is plain HTTP
//! only. `status` is `"success"` or `"fail"`, with the reason in `message`.

use super::{decode, lenient_f64, lenient_string, split_as_org, with_segments, ProviderSpec};
use crate::domain::entities::GeoRecord;
use crate::domain::errors::ProviderError;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

pub(super) const SPEC: ProviderSpec = ProviderSpec {
    id: "ipapicom",
    label: "ip-api.com",
    base_url: "http://ip-api.com",
    build_url,
    normalize,
};

const FIELDS: &str = "status,message,query,country,countryCode,regionName,city,lat,lon,isp,org,as,reverse";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    status: String,
    #[serde(default, deserialize_with = "lenient_string")]
    message: String,
    #[serde(default, deserialize_with = "lenient_string")]
    query: String,
    #[serde(default, deserialize_with = "lenient_string")]
    reverse: String,
    #[serde(default, rename = "as", deserialize_with = "lenient_string")]
    as_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    isp: String,
    #[serde(default, deserialize_with = "lenient_string")]
    org: String,
    #[serde(default, deserialize_with = "lenient_string")]
    city: String,
    #[serde(default, deserialize_with = "lenient_string")]
    region_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    country: String,
    #[serde(default, deserialize_with = "lenient_string")]
    country_code: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    lon: Option<f64>,
}

fn build_url(base: &Url, target: &str) -> Url {
    let mut url = with_segments(base, &["json", target]);
    url.query_pairs_mut().append_pair("fields", FIELDS);
    url
}

fn normalize(body: Value) -> Result<GeoRecord, ProviderError> {
    let r: IpApiResponse = decode(body)?;

    if r.status != "success" {
        let message = if r.message.is_empty() {
            format!("status {}", if r.status.is_empty() { "missing" } else { r.status.as_str() })
        } else {
            r.message
        };
        return Err(ProviderError::Upstream(message));
    }

    let (asn, _) = split_as_org(&r.as_name);

    Ok(GeoRecord {
        ip: r.query,
        hostname: r.reverse,
        asn,
        isp: r.isp,
        org: r.org,
        city: r.city,
        region: r.region_name,
        country: r.country,
        country_code: r.country_code,
        latitude: r.lat,
        longitude: r.lon,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_url_requests_fields() {
        let base = Url::parse(SPEC.base_url).unwrap();
        let url = build_url(&base, "8.8.8.8");

        assert_eq!(url.path(), "/json/8.8.8.8");
        let fields = url
            .query_pairs()
            .find(|(k, _)| k == "fields")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(fields, FIELDS);
    }

    #[test]
    fn test_normalize_success() {
        let body = json!({
            "status": "success",
            "country": "United States",
            "countryCode": "US",
            "regionName": "Virginia",
            "city": "Ashburn",
            "lat": 39.03,
            "lon": -77.5,
            "isp": "Google LLC",
            "org": "Google Public DNS",
            "as": "AS15169 Google LLC",
            "reverse": "dns.google",
            "query": "8.8.8.8"
        });

        let record = normalize(body).unwrap();
        assert_eq!(record.ip, "8.8.8.8");
        assert_eq!(record.hostname, "dns.google");
        assert_eq!(record.asn, "AS15169");
        assert_eq!(record.isp, "Google LLC");
        assert_eq!(record.org, "Google Public DNS");
        assert_eq!(record.region, "Virginia");
        assert_eq!(record.country_code, "US");
        assert_eq!(record.latitude, Some(39.03));
        assert_eq!(record.longitude, Some(-77.5));
    }

    #[test]
    fn test_normalize_fail_status() {
        let body = json!({"status": "fail", "message": "reserved range", "query": "10.0.0.1"});
        let err = normalize(body).unwrap_err();
        assert_eq!(err, ProviderError::Upstream("reserved range".to_string()));
    }

    #[test]
    fn test_normalize_missing_status_is_failure() {
        let err = normalize(json!({"query": "8.8.8.8"})).unwrap_err();
        assert_eq!(err.to_string(), "status missing");
    }
}

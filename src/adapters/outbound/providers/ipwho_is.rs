//! ipwho.is
//!
//! `GET https://ipwho.is/{ip}`. Reports `"success": false` with a `message`
//! on failure. Network data lives under `connection`.

use super::{asn_label, decode, lenient_f64, lenient_string, with_segments, ProviderSpec};
use crate::domain::entities::GeoRecord;
use crate::domain::errors::ProviderError;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

pub(super) const SPEC: ProviderSpec = ProviderSpec {
    id: "ipwhois",
    label: "ipwho.is",
    base_url: "https://ipwho.is",
    build_url,
    normalize,
};

#[derive(Debug, Deserialize)]
struct IpwhoResponse {
    success: Option<bool>,
    #[serde(default, deserialize_with = "lenient_string")]
    message: String,
    #[serde(default, deserialize_with = "lenient_string")]
    ip: String,
    #[serde(default, deserialize_with = "lenient_string")]
    city: String,
    #[serde(default, deserialize_with = "lenient_string")]
    region: String,
    #[serde(default, deserialize_with = "lenient_string")]
    country: String,
    #[serde(default, deserialize_with = "lenient_string")]
    country_code: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    longitude: Option<f64>,
    connection: Option<Connection>,
}

#[derive(Debug, Default, Deserialize)]
struct Connection {
    #[serde(default, deserialize_with = "lenient_string")]
    asn: String,
    #[serde(default, deserialize_with = "lenient_string")]
    org: String,
    #[serde(default, deserialize_with = "lenient_string")]
    isp: String,
}

fn build_url(base: &Url, target: &str) -> Url {
    with_segments(base, &[target])
}

fn normalize(body: Value) -> Result<GeoRecord, ProviderError> {
    let r: IpwhoResponse = decode(body)?;

    if r.success == Some(false) {
        let message = if r.message.is_empty() {
            "Unknown API error".to_string()
        } else {
            r.message
        };
        return Err(ProviderError::Upstream(message));
    }

    let connection = r.connection.unwrap_or_default();

    Ok(GeoRecord {
        ip: r.ip,
        hostname: String::new(),
        asn: asn_label(&connection.asn),
        isp: connection.isp,
        org: connection.org,
        city: r.city,
        region: r.region,
        country: r.country,
        country_code: r.country_code,
        latitude: r.latitude,
        longitude: r.longitude,
    })
}

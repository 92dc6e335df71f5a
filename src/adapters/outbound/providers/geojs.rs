//! GeoJS
//!
//! `GET https://get.geojs.io/v1/ip/geo/{ip}.json`. Coordinates are encoded as
//! strings. There is no explicit failure flag; a body without `ip` means the
//! address could not be looked up.

use super::{
    asn_label, decode, lenient_f64, lenient_string, split_as_org, with_segments, ProviderSpec,
};
use crate::domain::entities::GeoRecord;
use crate::domain::errors::ProviderError;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

pub(super) const SPEC: ProviderSpec = ProviderSpec {
    id: "geojs",
    label: "GeoJS",
    base_url: "https://get.geojs.io",
    build_url,
    normalize,
};

#[derive(Debug, Deserialize)]
struct GeoJsResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    ip: String,
    #[serde(default, deserialize_with = "lenient_string")]
    asn: String,
    #[serde(default, deserialize_with = "lenient_string")]
    organization: String,
    #[serde(default, deserialize_with = "lenient_string")]
    organization_name: String,
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
}

fn build_url(base: &Url, target: &str) -> Url {
    let file = format!("{}.json", target);
    with_segments(base, &["v1", "ip", "geo", file.as_str()])
}

fn normalize(body: Value) -> Result<GeoRecord, ProviderError> {
    let r: GeoJsResponse = decode(body)?;

    if r.ip.is_empty() {
        return Err(ProviderError::Upstream("No data for address".to_string()));
    }

    let org = if r.organization_name.is_empty() {
        split_as_org(&r.organization).1
    } else {
        r.organization_name
    };

    Ok(GeoRecord {
        ip: r.ip,
        hostname: String::new(),
        asn: asn_label(&r.asn),
        isp: String::new(),
        org,
        city: r.city,
        region: r.region,
        country: r.country,
        country_code: r.country_code,
        latitude: r.latitude,
        longitude: r.longitude,
    })
}

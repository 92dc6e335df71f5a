//! ipinfo.io
//!
//! `GET https://ipinfo.io/{ip}/json`. Coordinates arrive joined in `loc`
//! (`"lat,lon"`), the ASN is the prefix of `org`, and `country` is the ISO
//! code only. Errors come as an `error` object; private ranges as
//! `"bogon": true`.

use super::{decode, lenient_string, split_as_org, split_coordinates, with_segments, ProviderSpec};
use crate::domain::entities::GeoRecord;
use crate::domain::errors::ProviderError;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

pub(super) const SPEC: ProviderSpec = ProviderSpec {
    id: "ipinfo",
    label: "ipinfo.io",
    base_url: "https://ipinfo.io",
    build_url,
    normalize,
};

#[derive(Debug, Deserialize)]
struct IpinfoResponse {
    error: Option<IpinfoError>,
    #[serde(default)]
    bogon: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    ip: String,
    #[serde(default, deserialize_with = "lenient_string")]
    hostname: String,
    #[serde(default, deserialize_with = "lenient_string")]
    city: String,
    #[serde(default, deserialize_with = "lenient_string")]
    region: String,
    #[serde(default, deserialize_with = "lenient_string")]
    country: String,
    #[serde(default, deserialize_with = "lenient_string")]
    loc: String,
    #[serde(default, deserialize_with = "lenient_string")]
    org: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IpinfoError {
    Detailed {
        #[serde(default, deserialize_with = "lenient_string")]
        title: String,
        #[serde(default, deserialize_with = "lenient_string")]
        message: String,
    },
    Plain(String),
}

impl IpinfoError {
    fn into_message(self) -> String {
        match self {
            Self::Detailed { title, message } => match (title.is_empty(), message.is_empty()) {
                (false, false) => format!("{}: {}", title, message),
                (false, true) => title,
                (true, false) => message,
                (true, true) => "Unknown API error".to_string(),
            },
            Self::Plain(message) => message,
        }
    }
}

fn build_url(base: &Url, target: &str) -> Url {
    with_segments(base, &[target, "json"])
}

fn normalize(body: Value) -> Result<GeoRecord, ProviderError> {
    let r: IpinfoResponse = decode(body)?;

    if let Some(error) = r.error {
        return Err(ProviderError::Upstream(error.into_message()));
    }
    if r.bogon {
        return Err(ProviderError::Upstream("Bogon IP address".to_string()));
    }

    let (latitude, longitude) = split_coordinates(&r.loc);
    let (asn, org) = split_as_org(&r.org);

    Ok(GeoRecord {
        ip: r.ip,
        hostname: r.hostname,
        asn,
        isp: String::new(),
        org,
        city: r.city,
        region: r.region,
        country: String::new(),
        country_code: r.country,
        latitude,
        longitude,
    })
}

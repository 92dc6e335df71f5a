use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // HTTP server settings
    pub listen_addr: String,
    pub public_dir: Option<String>,
    pub debug: bool,

    // Lookup settings
    pub provider_timeout_ms: u64,
    pub dns_timeout_ms: u64,
    /// Provider ids to enable, in the order given; empty means all
    pub providers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            public_dir: None,
            debug: false,
            provider_timeout_ms: 5000,
            dns_timeout_ms: 5000,
            providers: Vec::new(),
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    let defaults = Config::default();

    let listen_addr = match std::env::var("GEOLOOKUP_LISTEN_ADDR") {
        Ok(addr) => addr,
        Err(_) => match std::env::var("PORT") {
            Ok(port) => format!("0.0.0.0:{}", port.trim()),
            Err(_) => defaults.listen_addr,
        },
    };

    let public_dir = std::env::var("GEOLOOKUP_PUBLIC_DIR")
        .ok()
        .filter(|v| !v.trim().is_empty());

    let debug = std::env::var("DEBUG").is_ok();

    let provider_timeout_ms = std::env::var("GEOLOOKUP_PROVIDER_TIMEOUT_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.provider_timeout_ms);

    let dns_timeout_ms = std::env::var("GEOLOOKUP_DNS_TIMEOUT_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.dns_timeout_ms);

    let providers = std::env::var("GEOLOOKUP_PROVIDERS")
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(Config {
        listen_addr,
        public_dir,
        debug,
        provider_timeout_ms,
        dns_timeout_ms,
        providers,
    })
}

mod http_geo_provider;
pub mod providers;
mod system_host_resolver;

pub use http_geo_provider::{build_client, HttpGeoProvider};
pub use providers::{find_provider, select_providers, ProviderSpec, PROVIDERS};
pub use system_host_resolver::SystemHostResolver;

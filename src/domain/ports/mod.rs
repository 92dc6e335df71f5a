mod geo_provider;
mod host_resolver;

pub use geo_provider::GeoProvider;
pub use host_resolver::HostResolver;

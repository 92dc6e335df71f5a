//! System Host Resolver
//!
//! Implements HostResolver with the operating system resolver via tokio.

use crate::domain::ports::HostResolver;
use async_trait::async_trait;
use std::net::IpAddr;

/// Forward resolver backed by `getaddrinfo` (run on tokio's blocking pool).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHostResolver;

impl SystemHostResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HostResolver for SystemHostResolver {
    async fn lookup(&self, host: &str) -> std::io::Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((host, 0)).await?;
        Ok(addrs.map(|sa| sa.ip()).collect())
    }
}

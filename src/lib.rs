//! geo-lookup Library
//!
//! This module exposes the geo-lookup components for use in integration tests
//! and as a library.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::LookupService;
pub use config::load_config;
pub use domain::entities::{
    Aggregate, AggregatePayload, GeoRecord, LookupResponse, LookupResult, ResolvedTarget,
};
pub use domain::errors::{LookupError, ProviderError, ResolveError};
pub use domain::ports::{GeoProvider, HostResolver};
pub use domain::services::{aggregate, median, TargetResolver};

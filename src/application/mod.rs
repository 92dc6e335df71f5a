//! Application Layer
//!
//! Use cases that coordinate the domain and its ports.

mod lookup_service;

pub use lookup_service::LookupService;

//! Domain Layer
//!
//! Entities, ports and pure services. Nothing here performs I/O directly.

pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;

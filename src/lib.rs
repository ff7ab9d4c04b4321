//! mcage library
//!
//! Exposes the manifest cache, the age formatter and the HTTP server so the
//! binary and the integration tests share one implementation.

pub mod age;
pub mod cache;
pub mod cli;
pub mod clock;
pub mod data;
pub mod handler;
pub mod render;
pub mod server;

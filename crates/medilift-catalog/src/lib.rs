//! Read-only client for the fleet catalog service.

pub mod client;

pub use client::CatalogClient;

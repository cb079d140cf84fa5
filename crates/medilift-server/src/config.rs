//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub catalog_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("MEDILIFT_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            catalog_url: env::var("MEDILIFT_CATALOG_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
        }
    }
}

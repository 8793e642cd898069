//! Server configuration.
//!
//! Every setting is a CLI flag with an environment fallback, so the same
//! struct serves `matriculas serve --port 8080` and `MATRICULAS_PORT=8080`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::Result;

use crate::db::{Database, DEFAULT_POOL_SIZE};

#[derive(Debug, Clone, clap::Args)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to
    #[arg(long, env = "MATRICULAS_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port for the HTTP API
    #[arg(short, long, env = "MATRICULAS_PORT", default_value_t = 5000)]
    pub port: u16,

    /// SQLite database file (defaults to the platform data directory)
    #[arg(long, env = "MATRICULAS_DATABASE")]
    pub database: Option<PathBuf>,

    /// Number of pooled database connections
    #[arg(long, env = "MATRICULAS_POOL_SIZE", default_value_t = DEFAULT_POOL_SIZE)]
    pub pool_size: usize,

    /// Allowed CORS origins, comma-separated. Empty allows any origin.
    #[arg(
        long = "cors-origin",
        env = "MATRICULAS_CORS_ORIGINS",
        value_delimiter = ','
    )]
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn open_database(&self) -> Result<Database> {
        match &self.database {
            Some(path) => Database::open(path, self.pool_size),
            None => Database::open_default(self.pool_size),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
            database: None,
            pool_size: DEFAULT_POOL_SIZE,
            cors_origins: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        config: ServerConfig,
    }

    #[test]
    fn parses_flags() {
        let harness = Harness::try_parse_from([
            "matriculas",
            "--port",
            "8080",
            "--database",
            "/tmp/escola.db",
            "--pool-size",
            "2",
            "--cors-origin",
            "http://localhost:3000,http://localhost:5173",
        ])
        .unwrap();

        let config = harness.config;
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.database, Some(PathBuf::from("/tmp/escola.db")));
        assert_eq!(config.pool_size, 2);
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3000", "http://localhost:5173"]
        );
    }

    #[test]
    fn default_matches_flag_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:5000");
        assert_eq!(config.pool_size, DEFAULT_POOL_SIZE);
        assert!(config.cors_origins.is_empty());
    }
}

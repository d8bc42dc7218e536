use std::net::{IpAddr, SocketAddr};

use anyhow::{bail, Result};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "todo-api")]
#[command(about = "To-do service exposing an RPC surface and a REST gateway")]
pub struct Config {
    /// Port for the RPC surface
    #[arg(long, env = "GRPC_PORT", default_value_t = 9090)]
    pub grpc_port: u16,

    /// Port for the REST gateway
    #[arg(long, env = "HTTP_PORT", default_value_t = 8080)]
    pub http_port: u16,

    /// Address both listeners bind to
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1")]
    pub bind: IpAddr,

    /// SQLite connection URL, e.g. `sqlite://todos.db` or `sqlite::memory:`
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://todos.db")]
    pub database_url: String,

    /// Log filter directive, e.g. `info` or `todo_api=debug`; RUST_LOG takes precedence
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// strftime format for log timestamps, e.g. `%Y-%m-%dT%H:%M:%S%.3fZ`
    #[arg(long, env = "LOG_TIME_FORMAT")]
    pub log_time_format: Option<String>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.grpc_port == 0 {
            bail!("invalid TCP port for RPC server: '{}'", self.grpc_port);
        }
        if self.http_port == 0 {
            bail!("invalid TCP port for HTTP gateway: '{}'", self.http_port);
        }
        if self.grpc_port == self.http_port {
            bail!("RPC and HTTP ports must differ, both are {}", self.grpc_port);
        }
        Ok(())
    }

    pub fn rpc_addr(&self) -> SocketAddr { SocketAddr::new(self.bind, self.grpc_port) }
    pub fn http_addr(&self) -> SocketAddr { SocketAddr::new(self.bind, self.http_port) }
}

use anyhow::Context;
use clap::builder::BoolishValueParser;
use clap::Parser;
use dnsleak_domain::CliOverrides;
use std::net::SocketAddr;
use tracing::info;

mod bootstrap;
mod di;
mod server;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "dnsleak")]
#[command(version)]
#[command(about = "dnsleak - passive DNS leak-detection probe")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// UDP port to listen on
    #[arg(short = 'd', long, env = "DNSLEAK_PORT")]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long, env = "DNSLEAK_BIND")]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DNSLEAK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Event store host
    #[arg(long, env = "ES_HOST")]
    es_host: Option<String>,

    /// Event store port
    #[arg(long, env = "ES_PORT")]
    es_port: Option<u16>,

    /// Event store username
    #[arg(long, env = "ES_USERNAME")]
    es_username: Option<String>,

    /// Event store password
    #[arg(long, env = "ES_PASSWORD", hide_env_values = true)]
    es_password: Option<String>,

    /// Verify the event store TLS certificate
    #[arg(long, env = "ES_VERIFY_CERTS", value_parser = BoolishValueParser::new())]
    es_verify_certs: Option<bool>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            dns_port: self.dns_port,
            bind_address: self.bind.clone(),
            log_level: self.log_level.clone(),
            store_host: self.es_host.clone(),
            store_port: self.es_port,
            store_username: self.es_username.clone(),
            store_password: self.es_password.clone(),
            store_verify_certs: self.es_verify_certs,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;

    bootstrap::init_logging(&config.logging);

    info!("Starting dnsleak probe v{}", env!("CARGO_PKG_VERSION"));

    let event_store = bootstrap::init_event_store(&config.event_store).await?;
    let services = di::ProbeServices::new(&config, event_store);

    let listen_addr = config.server.listen_addr();
    let dns_addr: SocketAddr = listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address {}", listen_addr))?;
    server::start_dns_server(dns_addr, config.server.recv_buffer_size, services.handler).await?;

    info!("Probe shutdown complete");
    Ok(())
}

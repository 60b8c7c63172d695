use anyhow::Context;
use dnsleak_infrastructure::dns::{DnsListener, ProbeHandler};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn start_dns_server(
    bind_addr: SocketAddr,
    recv_buffer_size: usize,
    handler: Arc<ProbeHandler>,
) -> anyhow::Result<()> {
    info!(bind_address = %bind_addr, "Starting DNS probe");

    let listener = DnsListener::bind(bind_addr, recv_buffer_size)
        .with_context(|| format!("Failed to bind UDP socket on {}", bind_addr))?;

    listener.run_until(handler, shutdown_signal()).await;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("Shutdown signal received");
}

use super::server::ProbeHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

const SOCKET_BUFFER_SIZE: usize = 512 * 1024;
const RECV_ERROR_BACKOFF: Duration = Duration::from_millis(50);

/// UDP front end of the probe.
///
/// A single loop reads the socket; every datagram is handled on its own
/// task, which sends the reply through the shared socket.
pub struct DnsListener {
    socket: Arc<UdpSocket>,
    recv_buffer_size: usize,
}

impl DnsListener {
    /// Binds the socket. Must be called from within a tokio runtime.
    pub fn bind(addr: SocketAddr, recv_buffer_size: usize) -> io::Result<Self> {
        let socket = create_udp_socket(addr)?;
        Ok(Self {
            socket: Arc::new(UdpSocket::from_std(socket)?),
            recv_buffer_size,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub async fn run(self, handler: Arc<ProbeHandler>) {
        self.run_until(handler, std::future::pending()).await
    }

    /// Serves until `shutdown` resolves. Tasks already spawned are left to finish on their own.
    pub async fn run_until<F>(self, handler: Arc<ProbeHandler>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let local_addr = self.local_addr().ok();
        info!(bind_address = ?local_addr, "DNS listener ready");

        let mut recv_buf = vec![0u8; self.recv_buffer_size];
        tokio::pin!(shutdown);

        loop {
            let (len, from) = tokio::select! {
                _ = &mut shutdown => {
                    info!("DNS listener shutting down");
                    return;
                }
                result = self.socket.recv_from(&mut recv_buf) => match result {
                    Ok(received) => received,
                    Err(e) => {
                        let pause = recv_error_backoff(e.kind());
                        if !pause.is_zero() {
                            warn!(error = %e, "UDP recv error");
                            tokio::time::sleep(pause).await;
                        }
                        continue;
                    }
                },
            };

            let datagram: Arc<[u8]> = Arc::from(&recv_buf[..len]);
            let handler = Arc::clone(&handler);
            let socket = Arc::clone(&self.socket);

            tokio::spawn(async move {
                let Some(handled) = handler.handle_datagram(&datagram, from) else {
                    return;
                };
                if let Err(e) = socket.send_to(&handled.reply, from).await {
                    warn!(error = %e, peer = %from, "Failed to send reply");
                } else {
                    debug!(peer = %from, len = handled.reply.len(), "Reply sent");
                }
            });
        }
    }
}

/// Transient errors (signals, ICMP feedback from an earlier send) retry at once;
/// anything else pauses the loop so a broken socket cannot spin it.
fn recv_error_backoff(kind: io::ErrorKind) -> Duration {
    match kind {
        io::ErrorKind::Interrupted
        | io::ErrorKind::WouldBlock
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionRefused => Duration::ZERO,
        _ => RECV_ERROR_BACKOFF,
    }
}

fn create_udp_socket(socket_addr: SocketAddr) -> io::Result<std::net::UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_recv_buffer_size(SOCKET_BUFFER_SIZE)?;
    socket.set_send_buffer_size(SOCKET_BUFFER_SIZE)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    Ok(socket.into())
}

//! TCP connection to a valnote server

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};
use tracing::{debug, info, trace};
use valnote_protocol::LineFramer;

use crate::error::{TransportError, TransportResult};

/// A TCP stream carrying one `\n`-terminated response per request
pub struct Connection {
    stream: TcpStream,
    framer: LineFramer,
    peer_addr: SocketAddr,
    timeout: Option<Duration>,
}

impl Connection {
    /// Connect to the first reachable address of `host`.
    ///
    /// `timeout`, when set, bounds each connect attempt and every later
    /// send and receive.
    pub async fn connect(host: &str, port: u16, timeout: Option<Duration>) -> TransportResult<Self> {
        let addrs: Vec<SocketAddr> = match with_timeout(timeout, lookup_host((host, port))).await {
            Ok(addrs) => addrs.collect(),
            Err(TransportError::Io(source)) => {
                return Err(TransportError::Resolve {
                    host: host.to_string(),
                    source,
                })
            }
            Err(e) => return Err(e),
        };

        for addr in addrs {
            match Self::connect_addr(addr, timeout).await {
                Ok(stream) => {
                    info!(addr = %addr, "Connected");
                    return Ok(Self {
                        stream,
                        framer: LineFramer::new(),
                        peer_addr: addr,
                        timeout,
                    });
                }
                Err(e) => {
                    debug!(addr = %addr, error = %e, "Connection attempt failed");
                }
            }
        }

        Err(TransportError::Unreachable(format!("{}:{}", host, port)))
    }

    async fn connect_addr(addr: SocketAddr, timeout: Option<Duration>) -> TransportResult<TcpStream> {
        let stream = with_timeout(timeout, TcpStream::connect(addr)).await?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }

    /// Write all of `data` to the server
    pub async fn send(&mut self, data: &str) -> TransportResult<()> {
        let limit = self.timeout;
        let stream = &mut self.stream;
        with_timeout(limit, async move {
            stream.write_all(data.as_bytes()).await?;
            stream.flush().await
        })
        .await
    }

    /// Read the next response line, without its `\n`
    pub async fn recv(&mut self) -> TransportResult<String> {
        let mut buf = [0u8; 4096];

        loop {
            if let Some(line) = self.framer.next_line()? {
                trace!(peer = %self.peer_addr, len = line.len(), "Received response");
                return Ok(line);
            }

            let n = with_timeout(self.timeout, self.stream.read(&mut buf)).await?;
            if n == 0 {
                debug!(peer = %self.peer_addr, "Server closed the connection");
                return Err(TransportError::ConnectionClosed);
            }
            self.framer.feed(&buf[..n])?;
        }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

async fn with_timeout<T, F>(limit: Option<Duration>, fut: F) -> TransportResult<T>
where
    F: Future<Output = std::io::Result<T>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| TransportError::Timeout(limit))?
            .map_err(TransportError::from),
        None => fut.await.map_err(TransportError::from),
    }
}

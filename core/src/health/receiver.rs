//! Bounded request/response exchange over one connection
//!
//! The receiver writes the request, then polls the connection for readability
//! in slices no longer than the polling interval. Between slices it re-checks
//! the total deadline and then the cancellation flag, in that order. A peer
//! signals the end of its response by closing the connection after sending at
//! least one byte; the protocol has no length prefix or terminator. A reset
//! after data counts as that close: a peer that replies without reading the
//! request makes its kernel answer with RST instead of FIN.
//!
//! ```text
//! SENDING -> POLLING <-> ACCUMULATING -> DONE | TIMED_OUT | CANCELLED | ERROR
//! ```

use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::{sleep_until, timeout, Instant};
use tracing::{debug, trace};

use super::CancelToken;
use crate::config::ProbeConfig;

/// Transport operations the receiver needs from a connection
#[async_trait]
pub trait Connection: Send {
    /// Write the whole payload; a short write is an error
    async fn send_all(&mut self, payload: &[u8]) -> io::Result<()>;

    /// Wait at most `slice` for the connection to become readable
    ///
    /// Returns `Ok(false)` when the slice elapsed without readability.
    async fn wait_readable(&mut self, slice: Duration) -> io::Result<bool>;

    /// Non-blocking read; `Ok(0)` means the peer closed its side
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Release the underlying transport
    fn close(&mut self);
}

/// [`Connection`] over a connected TCP stream
#[derive(Debug)]
pub struct TcpConnection {
    stream: Option<TcpStream>,
    peer: SocketAddr,
}

impl TcpConnection {
    /// Wrap a connected stream
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self {
            stream: Some(stream),
            peer,
        }
    }

    /// Remote address of the connection
    #[must_use]
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    fn stream(&mut self) -> io::Result<&mut TcpStream> {
        self.stream
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "connection already closed"))
    }
}

#[async_trait]
impl Connection for TcpConnection {
    async fn send_all(&mut self, payload: &[u8]) -> io::Result<()> {
        let stream = self.stream()?;
        stream.write_all(payload).await?;
        stream.flush().await
    }

    async fn wait_readable(&mut self, slice: Duration) -> io::Result<bool> {
        let stream = self.stream()?;
        match timeout(slice, stream.readable()).await {
            Ok(Ok(())) => Ok(true),
            Ok(Err(e)) => Err(e),
            Err(_elapsed) => Ok(false),
        }
    }

    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream()?.try_read(buf)
    }

    fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!("Closed connection to {}", self.peer);
        }
    }
}

/// Closes the wrapped connection exactly once when dropped
///
/// Dropping covers every exit path, including a caller abandoning the
/// exchange future part-way through.
#[derive(Debug)]
pub struct ConnectionGuard<C: Connection> {
    conn: C,
}

impl<C: Connection> ConnectionGuard<C> {
    /// Take ownership of `conn` for the rest of the exchange
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Borrow the guarded connection
    pub fn get_mut(&mut self) -> &mut C {
        &mut self.conn
    }
}

impl<C: Connection> Drop for ConnectionGuard<C> {
    fn drop(&mut self) {
        self.conn.close();
    }
}

/// Time and size limits for one exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveLimits {
    /// Total budget, measured from the start of sending
    pub timeout: Duration,
    /// Longest single readiness wait
    pub polling_interval: Duration,
    /// Bytes requested per read
    pub buffer_size: usize,
}

impl From<&ProbeConfig> for ReceiveLimits {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            timeout: config.timeout(),
            polling_interval: config.polling_interval(),
            buffer_size: config.buffer_size,
        }
    }
}

/// Terminal state of the receive state machine
#[derive(Debug)]
pub enum Terminal {
    /// Peer closed after sending; carries every byte received
    Done(Vec<u8>),
    /// Deadline reached first; carries the elapsed time
    TimedOut(Duration),
    /// Cancellation observed before the deadline
    Cancelled,
    /// Send or receive failed
    Error(io::Error),
}

/// Send `request` and collect the reply within `limits`
///
/// The connection is left open; [`super::outcome::exchange`] owns closing it.
pub async fn receive<C: Connection + ?Sized>(
    conn: &mut C,
    request: &[u8],
    limits: &ReceiveLimits,
    cancel: &CancelToken,
) -> Terminal {
    let started = Instant::now();

    // A peer that already replied and hung up fails the send; its reply may
    // still be queued, so keep reading and only report the send error if
    // nothing arrives.
    let mut send_failure = match conn.send_all(request).await {
        Ok(()) => {
            debug!("Sent {} byte request", request.len());
            None
        }
        Err(e) if peer_closed(&e) => {
            debug!("Send failed ({}), collecting any reply already delivered", e);
            Some(e)
        }
        Err(e) => return Terminal::Error(e),
    };

    let mut buf = vec![0u8; limits.buffer_size];
    let mut received: Vec<u8> = Vec::new();

    loop {
        let elapsed = started.elapsed();
        if elapsed >= limits.timeout {
            return match send_failure {
                Some(e) => Terminal::Error(e),
                None => Terminal::TimedOut(elapsed),
            };
        }
        if cancel.is_cancelled() {
            return Terminal::Cancelled;
        }

        let slice = limits.polling_interval.min(limits.timeout - elapsed);
        let slice_started = Instant::now();

        match conn.wait_readable(slice).await {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Terminal::Error(e),
        }

        match conn.try_read(&mut buf) {
            Ok(0) if !received.is_empty() => {
                debug!("Socket closed from remote after {} bytes", received.len());
                return Terminal::Done(received);
            }
            Ok(0) => {
                if let Some(e) = send_failure.take() {
                    return Terminal::Error(e);
                }
                // Closed before any byte arrived. Keep polling, but at the
                // slice cadence: an EOF socket stays readable forever.
                trace!("Remote closed with nothing received, waiting out the slice");
                sleep_until(slice_started + slice).await;
            }
            Ok(n) => {
                trace!("Read {} bytes", n);
                received.extend_from_slice(&buf[..n]);
            }
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) => {}
            Err(e) if peer_closed(&e) && !received.is_empty() => {
                debug!("Connection reset by remote after {} bytes", received.len());
                return Terminal::Done(received);
            }
            Err(e) => return Terminal::Error(send_failure.take().unwrap_or(e)),
        }
    }
}

fn peer_closed(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted | io::ErrorKind::BrokenPipe
    )
}

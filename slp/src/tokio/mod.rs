//! An async client on top of the tokio runtime.

mod resolver;

use std::time::Duration;

use ::tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    time::timeout,
};
use tracing::{debug, trace, warn};

pub use resolver::{DnsResolver, SRV_PREFIX, ServiceRecord, ServiceResolver, resolve, resolver, sort_records};

use crate::{Address, DEFAULT_PORT, Error, PingResponse, PingStrategy, Strategy};

/// How long connecting, or waiting for the next bytes, may take.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3600);
/// How long to wait before retrying with the other protocol.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(250);

const READ_CHUNK: usize = 4096;

/// Queries servers for their status.
///
/// Each [`ping`](Self::ping) parses the address, resolves its SRV record,
/// then connects with the configured [`Strategy`] (modern unless set). If that
/// attempt fails it waits [`retry_delay`](Self::set_retry_delay) and tries once
/// more on a new connection with the other strategy.
///
/// Configuration is read when a ping starts. Use one `Pinger` per task if it
/// is reconfigured while pings are running.
///
/// # Examples
///
/// ```no_run
/// # async {
/// use std::time::Duration;
///
/// use slp::{Legacy, tokio::Pinger};
///
/// let mut pinger = Pinger::new();
/// pinger.set_strategy(Legacy).set_timeout(Duration::from_secs(2));
///
/// let response = pinger.ping("mc.hypixel.net").await?;
/// println!("{} players online", response.status.players.online);
/// # Ok::<(), slp::Error>(())
/// # };
/// ```
#[derive(Debug, Clone)]
pub struct Pinger<R = DnsResolver> {
    strategy: Option<Strategy>,
    timeout: Duration,
    retry_delay: Duration,
    default_port: u16,
    resolver: R,
}

impl Pinger {
    /// A pinger that resolves SRV records through DNS.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_resolver(DnsResolver)
    }
}

impl Default for Pinger {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ServiceResolver> Pinger<R> {
    #[must_use]
    pub const fn with_resolver(resolver: R) -> Self {
        Self {
            strategy: None,
            timeout: DEFAULT_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
            default_port: DEFAULT_PORT,
            resolver,
        }
    }

    /// Pins the strategy tried first. Without one, every ping starts modern.
    pub fn set_strategy(&mut self, strategy: impl Into<Strategy>) -> &mut Self {
        self.strategy = Some(strategy.into());
        self
    }

    pub const fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    pub const fn set_retry_delay(&mut self, retry_delay: Duration) -> &mut Self {
        self.retry_delay = retry_delay;
        self
    }

    /// The port used for addresses that do not name one.
    pub const fn set_default_port(&mut self, port: u16) -> &mut Self {
        self.default_port = port;
        self
    }

    #[must_use]
    pub const fn strategy(&self) -> Option<Strategy> {
        self.strategy
    }

    /// Retrieves the status of the server at `address` (`host[:port]`).
    ///
    /// Dropping the returned future closes any open connection.
    ///
    /// # Errors
    /// [`Error::InvalidAddress`] if `address` cannot be parsed, otherwise the
    /// error of the second attempt when both strategies failed.
    pub async fn ping(&self, address: &str) -> Result<PingResponse, Error> {
        let address = Address::parse(address, self.default_port)?;
        let address = resolve(address, &self.resolver).await;
        let strategy = self.strategy.unwrap_or_default();

        match self.attempt(strategy, &address).await {
            Err(error) if error.is_retryable() => {
                let fallback = strategy.fallback();
                warn!(%address, %strategy, %fallback, %error, "Ping failed, retrying with fallback");
                ::tokio::time::sleep(self.retry_delay).await;
                self.attempt(fallback, &address).await
            }
            result => result,
        }
    }

    async fn attempt(&self, strategy: Strategy, address: &Address) -> Result<PingResponse, Error> {
        debug!(%address, %strategy, "Connecting");
        let mut stream = timeout(
            self.timeout,
            TcpStream::connect((address.host.as_str(), address.port)),
        )
        .await
        .map_err(|_| Error::SocketTimeout)??;
        let ip = stream.peer_addr().ok().map(|peer| peer.ip().to_string());

        stream.write_all(&strategy.handshake(address)).await?;
        let response = self.receive(&mut stream).await?;
        trace!(%address, %strategy, bytes = response.len(), "Connection closed by server");

        let status = strategy.parse(&response)?;
        Ok(PingResponse {
            host: address.host.clone(),
            port: address.port,
            ip,
            status,
        })
    }

    /// Reads until the server closes the connection.
    async fn receive(&self, stream: &mut TcpStream) -> Result<Vec<u8>, Error> {
        let mut response = Vec::new();
        let mut chunk = [0; READ_CHUNK];
        loop {
            let read = timeout(self.timeout, stream.read(&mut chunk))
                .await
                .map_err(|_| Error::SocketTimeout)??;
            if read == 0 {
                break;
            }
            if response.is_empty() {
                // nothing more will be sent, the server closes once it has answered
                if let Err(error) = stream.shutdown().await {
                    trace!(%error, "Failed to shut down the write half");
                }
            }
            response.extend_from_slice(&chunk[..read]);
        }

        if response.is_empty() {
            return Err(Error::NoDataReceived);
        }
        Ok(response)
    }
}

/// Retrieve the status of the server at `address` with a default [`Pinger`].
///
/// # Examples
///
/// ```no_run
/// # async {
/// let response = slp::tokio::get_status("mc.hypixel.net").await?;
/// println!("{}", response.status.description.plain_text());
/// # Ok::<(), slp::Error>(())
/// # };
/// ```
///
/// # Errors
/// If the server status cannot be received with either protocol.
pub async fn get_status(address: &str) -> Result<PingResponse, Error> {
    Pinger::new().ping(address).await
}

//! Parsing of user supplied `host[:port]` server addresses.

use std::{
    fmt,
    net::{IpAddr, Ipv6Addr},
    str::FromStr,
};

use crate::{DEFAULT_PORT, Error};

/// A server address as given by the user, or as overridden by an SRV record.
///
/// # Examples
///
/// ```
/// use slp::Address;
///
/// let address = Address::parse("mc.example.com", 25565)?;
/// assert_eq!(address.host, "mc.example.com");
/// assert_eq!(address.port, 25565);
///
/// let address: Address = "[::1]:19384".parse()?;
/// assert_eq!(address.host, "::1");
/// assert_eq!(address.port, 19384);
/// # Ok::<(), slp::Error>(())
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Address {
    /// A hostname or an IP literal, without brackets.
    pub host: String,
    pub port: u16,
}

impl Address {
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parses `host`, `host:port`, `[v6]`, `[v6]:port` or a bare IPv6
    /// literal. `default_port` is used when no port is given.
    ///
    /// # Errors
    /// If the host is empty, or the port is not a number in `0..=65535`.
    pub fn parse(input: &str, default_port: u16) -> Result<Self, Error> {
        let input = input.trim();
        let (host, port) = if let Some(rest) = input.strip_prefix('[') {
            let (host, after) = rest
                .split_once(']')
                .ok_or_else(|| Error::InvalidAddress(format!("unclosed `[` in `{input}`")))?;
            let port = if after.is_empty() {
                None
            } else {
                Some(after.strip_prefix(':').ok_or_else(|| {
                    Error::InvalidAddress(format!("unexpected `{after}` after `]` in `{input}`"))
                })?)
            };
            (host, port)
        } else if input.parse::<Ipv6Addr>().is_ok() {
            (input, None)
        } else {
            match input.rsplit_once(':') {
                Some((host, _)) if host.contains(':') => {
                    return Err(Error::InvalidAddress(format!("too many `:` in `{input}`")));
                }
                Some((host, port)) => (host, Some(port)),
                None => (input, None),
            }
        };

        if host.is_empty() {
            return Err(Error::InvalidAddress(format!("no host in `{input}`")));
        }
        let port = match port {
            Some(port) => port
                .parse()
                .map_err(|_| Error::InvalidAddress(format!("invalid port `{port}` in `{input}`")))?,
            None => default_port,
        };

        Ok(Self::new(host, port))
    }

    /// The host as an IP address, if it is a literal one.
    #[must_use]
    pub fn ip(&self) -> Option<IpAddr> {
        self.host.parse().ok()
    }

    /// Literal IPs are connected to directly, without an SRV lookup.
    #[must_use]
    pub fn is_ip_literal(&self) -> bool {
        self.ip().is_some()
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, DEFAULT_PORT)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
use std::time::Duration;

use slp::{Legacy, Modern, tokio::Pinger};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[macro_use]
extern crate tracing;

/// Query a Minecraft Java server for its status and print it as JSON.
#[derive(argh::FromArgs)]
struct Args {
    /// server address, `host[:port]`
    #[argh(positional)]
    address: String,
    /// try the legacy (pre-1.7) protocol first
    #[argh(switch)]
    legacy: bool,
    /// announce protocol version -1 in the modern handshake
    #[argh(switch)]
    any_version: bool,
    /// protocol version to announce in the modern handshake
    #[argh(option)]
    protocol: Option<i32>,
    /// connect and read timeout, in milliseconds
    #[argh(option)]
    timeout: Option<u64>,
    /// wait before retrying with the other protocol, in milliseconds
    #[argh(option)]
    retry_delay: Option<u64>,
    /// print only the MOTD, without formatting codes
    #[argh(switch)]
    plain: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    start_tracing();
    let args: Args = argh::from_env();

    let mut pinger = Pinger::new();
    if args.legacy {
        pinger.set_strategy(Legacy);
    } else if args.any_version {
        pinger.set_strategy(Modern::any_version());
    } else if let Some(protocol) = args.protocol {
        pinger.set_strategy(Modern::new(protocol));
    }
    if let Some(timeout) = args.timeout {
        pinger.set_timeout(Duration::from_millis(timeout));
    }
    if let Some(retry_delay) = args.retry_delay {
        pinger.set_retry_delay(Duration::from_millis(retry_delay));
    }

    let response = pinger
        .ping(&args.address)
        .await
        .inspect_err(|error| error!(address = %args.address, %error, "Ping failed"))?;
    debug!(host = %response.host, port = response.port, ip = ?response.ip, "Got status");

    if args.plain {
        println!("{}", response.status.description.to_component().plain_text());
    } else {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    Ok(())
}

/// Used when `LOG` is not set.
const DEFAULT_LOG: &str = concat!(env!("CARGO_PKG_NAME"), "=info,slp=info");

fn start_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_env_var("LOG")
        .try_from_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::filter::Directive;

    use super::*;

    #[test]
    fn default_log_shows_library_warnings() {
        assert_eq!(DEFAULT_LOG, "mcslp=info,slp=info");
        for directive in DEFAULT_LOG.split(',') {
            assert!(directive.parse::<Directive>().is_ok(), "{directive}");
        }
    }
}

//! SRV based address resolution.

use std::{future::Future, sync::OnceLock};

use hickory_resolver::{
    Resolver, TokioResolver,
    config::{ResolverConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
};
use tracing::debug;

use crate::{Address, Error};

/// Prepended to a hostname to get the name of its Minecraft SRV record.
pub const SRV_PREFIX: &str = "_minecraft._tcp.";

/// A DNS SRV record, reduced to what is needed to pick a server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceRecord {
    /// The target hostname, without the trailing dot.
    pub target: String,
    pub port: u16,
    pub priority: u16,
    pub weight: u16,
}

/// Looks up SRV records.
pub trait ServiceResolver {
    /// Returns the records for `name`, most preferred first.
    fn lookup_srv(&self, name: &str) -> impl Future<Output = Result<Vec<ServiceRecord>, Error>> + Send;
}

/// Resolves through DNS with a shared [`resolver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DnsResolver;

impl ServiceResolver for DnsResolver {
    async fn lookup_srv(&self, name: &str) -> Result<Vec<ServiceRecord>, Error> {
        let lookup = resolver()
            .srv_lookup(name)
            .await
            .map_err(|e| Error::DnsLookupFailed(e.to_string()))?;
        let mut records: Vec<ServiceRecord> = lookup
            .iter()
            .map(|srv| ServiceRecord {
                target: srv.target().to_string().trim_end_matches('.').to_string(),
                port: srv.port(),
                priority: srv.priority(),
                weight: srv.weight(),
            })
            .collect();
        sort_records(&mut records);
        Ok(records)
    }
}

/// Lowest priority first, then highest weight.
pub fn sort_records(records: &mut [ServiceRecord]) {
    records.sort_by(|a, b| a.priority.cmp(&b.priority).then(b.weight.cmp(&a.weight)));
}

/// Replaces `address` with the first `_minecraft._tcp` SRV record of its host.
///
/// IP literals are returned as-is without a lookup. A failed lookup, no
/// records, or a record with an empty target (`.`, "service not available")
/// also leave the address unchanged; resolution never fails a ping.
pub async fn resolve<R: ServiceResolver + ?Sized>(address: Address, resolver: &R) -> Address {
    if address.is_ip_literal() {
        return address;
    }

    let name = format!("{SRV_PREFIX}{}", address.host);
    let records = match resolver.lookup_srv(&name).await {
        Ok(records) => records,
        Err(error) => {
            debug!(%name, %error, "SRV lookup failed, using the address as given");
            return address;
        }
    };
    match records.into_iter().next() {
        Some(record) if !record.target.is_empty() => {
            debug!(%name, target = %record.target, port = record.port, "Using SRV record");
            Address::new(record.target, record.port)
        }
        Some(_) => {
            debug!(%name, "SRV record marks the service unavailable, using the address as given");
            address
        }
        None => address,
    }
}

fn new_resolver() -> TokioResolver {
    let config = ResolverConfig::cloudflare();
    let mut opts = ResolverOpts::default();
    opts.cache_size = 64;
    opts.attempts = 3;
    Resolver::builder_with_config(config, TokioConnectionProvider::default())
        .with_options(opts)
        .build()
}

/// The process wide DNS resolver.
pub fn resolver() -> &'static TokioResolver {
    static RESOLVER: OnceLock<TokioResolver> = OnceLock::new();
    RESOLVER.get_or_init(new_resolver)
}
